use crate::data::{Clip, Project};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Project,
    Clip { used_in: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
}

/// A project → clip containment relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub project: String,
    pub clip: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Flattens projects and clips into one node list (projects first, both in
/// input order) and derives one edge per clip reference. References are not
/// checked here; the simulation rejects edges it cannot resolve.
pub fn build_graph(projects: &[Project], clips: &[Clip]) -> GraphData {
    let mut nodes = Vec::with_capacity(projects.len() + clips.len());
    nodes.extend(projects.iter().map(|project| GraphNode {
        id: project.id.clone(),
        name: project.name.clone(),
        kind: NodeKind::Project,
    }));
    nodes.extend(clips.iter().map(|clip| GraphNode {
        id: clip.id.clone(),
        name: clip.name.clone(),
        kind: NodeKind::Clip {
            used_in: clip.used_in_projects.len(),
        },
    }));

    let edges = projects
        .iter()
        .flat_map(|project| {
            project.clips.iter().map(|clip_id| GraphEdge {
                project: project.id.clone(),
                clip: clip_id.clone(),
            })
        })
        .collect();

    GraphData { nodes, edges }
}
