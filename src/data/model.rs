use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub clips: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Clip {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "usedInProjects")]
    pub used_in_projects: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub clips: Vec<Clip>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("id `{0}` is used by more than one project or clip")]
    DuplicateId(String),
    #[error("project `{project}` references unknown clip `{clip}`")]
    UnknownClip { project: String, clip: String },
    #[error("clip `{clip}` lists unknown project `{project}`")]
    UnknownProject { clip: String, project: String },
    #[error("project `{project}` uses clip `{clip}` but the clip does not list it")]
    MissingBackReference { project: String, clip: String },
    #[error("clip `{clip}` lists project `{project}` but the project does not use it")]
    MissingForwardReference { clip: String, project: String },
}

impl Dataset {
    pub fn new(projects: Vec<Project>, clips: Vec<Clip>) -> Self {
        Self { projects, clips }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.clips.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.projects.len() + self.clips.len()
    }

    /// Total number of project → clip references, which is also the edge count.
    pub fn reference_count(&self) -> usize {
        self.projects.iter().map(|project| project.clips.len()).sum()
    }

    pub fn validate(&self) -> Result<(), DataError> {
        let mut seen = HashSet::with_capacity(self.node_count());
        let ids = self
            .projects
            .iter()
            .map(|project| project.id.as_str())
            .chain(self.clips.iter().map(|clip| clip.id.as_str()));
        for id in ids {
            if !seen.insert(id) {
                return Err(DataError::DuplicateId(id.to_owned()));
            }
        }

        let projects_by_id = self
            .projects
            .iter()
            .map(|project| (project.id.as_str(), project))
            .collect::<HashMap<_, _>>();
        let clips_by_id = self
            .clips
            .iter()
            .map(|clip| (clip.id.as_str(), clip))
            .collect::<HashMap<_, _>>();

        for project in &self.projects {
            for clip_id in &project.clips {
                let Some(clip) = clips_by_id.get(clip_id.as_str()) else {
                    return Err(DataError::UnknownClip {
                        project: project.id.clone(),
                        clip: clip_id.clone(),
                    });
                };
                if !clip.used_in_projects.contains(&project.id) {
                    return Err(DataError::MissingBackReference {
                        project: project.id.clone(),
                        clip: clip_id.clone(),
                    });
                }
            }
        }

        for clip in &self.clips {
            for project_id in &clip.used_in_projects {
                let Some(project) = projects_by_id.get(project_id.as_str()) else {
                    return Err(DataError::UnknownProject {
                        clip: clip.id.clone(),
                        project: project_id.clone(),
                    });
                };
                if !project.clips.contains(&clip.id) {
                    return Err(DataError::MissingForwardReference {
                        clip: clip.id.clone(),
                        project: project_id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn project(id: &str, clips: &[&str]) -> Project {
        Project {
            id: id.to_owned(),
            name: format!("Project {id}"),
            clips: clips.iter().map(|clip| clip.to_string()).collect(),
        }
    }

    pub(crate) fn clip(id: &str, used_in: &[&str]) -> Clip {
        Clip {
            id: id.to_owned(),
            name: format!("Clip {id}"),
            used_in_projects: used_in.iter().map(|project| project.to_string()).collect(),
        }
    }

    pub(crate) fn two_project_dataset() -> Dataset {
        Dataset::new(
            vec![project("p1", &["c1", "c2"]), project("p2", &["c2"])],
            vec![clip("c1", &["p1"]), clip("c2", &["p1", "p2"])],
        )
    }

    #[test]
    fn consistent_dataset_validates() {
        let dataset = two_project_dataset();
        assert_eq!(dataset.validate(), Ok(()));
        assert_eq!(dataset.reference_count(), 3);
        assert_eq!(dataset.node_count(), 4);
    }

    #[test]
    fn empty_dataset_is_valid() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert_eq!(dataset.validate(), Ok(()));
    }

    #[test]
    fn ids_are_unique_across_projects_and_clips() {
        let dataset = Dataset::new(
            vec![project("shared", &[])],
            vec![clip("shared", &[])],
        );
        assert_eq!(
            dataset.validate(),
            Err(DataError::DuplicateId("shared".to_owned()))
        );
    }

    #[test]
    fn dangling_clip_reference_is_rejected() {
        let dataset = Dataset::new(vec![project("p1", &["missing"])], Vec::new());
        assert_eq!(
            dataset.validate(),
            Err(DataError::UnknownClip {
                project: "p1".to_owned(),
                clip: "missing".to_owned(),
            })
        );
    }

    #[test]
    fn dangling_project_reference_is_rejected() {
        let dataset = Dataset::new(Vec::new(), vec![clip("c1", &["ghost"])]);
        assert_eq!(
            dataset.validate(),
            Err(DataError::UnknownProject {
                clip: "c1".to_owned(),
                project: "ghost".to_owned(),
            })
        );
    }

    #[test]
    fn inverse_relation_must_match() {
        let missing_back = Dataset::new(vec![project("p1", &["c1"])], vec![clip("c1", &[])]);
        assert!(matches!(
            missing_back.validate(),
            Err(DataError::MissingBackReference { .. })
        ));

        let missing_forward = Dataset::new(vec![project("p1", &[])], vec![clip("c1", &["p1"])]);
        assert!(matches!(
            missing_forward.validate(),
            Err(DataError::MissingForwardReference { .. })
        ));
    }
}
