use eframe::egui::{Vec2, vec2};

use crate::graph::{GraphData, NodeKind};
use crate::sim::{SimNode, Simulation, TickSubscriber};

use super::timeline::{Appearance, ElementRef};

pub const NODE_RADIUS: f32 = 10.0;
pub const LABEL_OFFSET: Vec2 = vec2(12.0, 3.0);
/// Clips used by more projects than this are highlighted.
pub const HIGHLIGHT_USAGE_THRESHOLD: usize = 2;

pub const SHOWN: Appearance = Appearance {
    radius: NODE_RADIUS,
    opacity: 1.0,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeFill {
    Project,
    HighlightClip,
    Clip,
}

impl NodeFill {
    pub fn classify(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Project => Self::Project,
            NodeKind::Clip { used_in } if *used_in > HIGHLIGHT_USAGE_THRESHOLD => {
                Self::HighlightClip
            }
            NodeKind::Clip { .. } => Self::Clip,
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Project => [0xB7, 0xAA, 0x98],
            Self::HighlightClip => [0xEB, 0x59, 0x39],
            Self::Clip => [0x80, 0x80, 0x80],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CircleElement {
    pub node: usize,
    pub center: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub fill: NodeFill,
    removed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineElement {
    pub source: usize,
    pub target: usize,
    pub from: Vec2,
    pub to: Vec2,
    pub opacity: f32,
    removed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelElement {
    pub node: usize,
    pub text: String,
    pub anchor: Vec2,
    pub opacity: f32,
    removed: bool,
}

impl CircleElement {
    pub fn is_live(&self) -> bool {
        !self.removed
    }
}

impl LineElement {
    pub fn is_live(&self) -> bool {
        !self.removed
    }
}

impl LabelElement {
    pub fn is_live(&self) -> bool {
        !self.removed
    }
}

/// Drawn primitives for one graph. Elements are addressed by index, so
/// removal only tombstones them until [`Scene::compact`] runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    circles: Vec<CircleElement>,
    lines: Vec<LineElement>,
    labels: Vec<LabelElement>,
}

impl Scene {
    /// Creates one circle and label per node and one line per link, all in
    /// `initial` state and placed at the current simulation positions.
    pub fn populate(graph: &GraphData, simulation: &Simulation, initial: Appearance) -> Self {
        let circles = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(node, graph_node)| CircleElement {
                node,
                center: Vec2::ZERO,
                radius: initial.radius,
                opacity: initial.opacity,
                fill: NodeFill::classify(&graph_node.kind),
                removed: false,
            })
            .collect();

        let lines = simulation
            .links()
            .iter()
            .map(|link| LineElement {
                source: link.source,
                target: link.target,
                from: Vec2::ZERO,
                to: Vec2::ZERO,
                opacity: initial.opacity,
                removed: false,
            })
            .collect();

        let labels = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(node, graph_node)| LabelElement {
                node,
                text: graph_node.name.clone(),
                anchor: Vec2::ZERO,
                opacity: initial.opacity,
                removed: false,
            })
            .collect();

        let mut scene = Self {
            circles,
            lines,
            labels,
        };
        scene.on_tick(simulation.nodes());
        scene
    }

    pub fn circles(&self) -> &[CircleElement] {
        &self.circles
    }

    pub fn live_circles(&self) -> impl Iterator<Item = (usize, &CircleElement)> {
        self.circles.iter().enumerate().filter(|(_, circle)| circle.is_live())
    }

    pub fn live_lines(&self) -> impl Iterator<Item = (usize, &LineElement)> {
        self.lines.iter().enumerate().filter(|(_, line)| line.is_live())
    }

    pub fn live_labels(&self) -> impl Iterator<Item = (usize, &LabelElement)> {
        self.labels.iter().enumerate().filter(|(_, label)| label.is_live())
    }

    pub fn live_count(&self) -> usize {
        self.live_circles().count() + self.live_lines().count() + self.live_labels().count()
    }

    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }

    pub fn apply(&mut self, element: ElementRef, appearance: Appearance) {
        match element {
            ElementRef::Circle(index) => {
                if let Some(circle) = self.circles.get_mut(index) {
                    circle.radius = appearance.radius;
                    circle.opacity = appearance.opacity;
                }
            }
            ElementRef::Line(index) => {
                if let Some(line) = self.lines.get_mut(index) {
                    line.opacity = appearance.opacity;
                }
            }
            ElementRef::Label(index) => {
                if let Some(label) = self.labels.get_mut(index) {
                    label.opacity = appearance.opacity;
                }
            }
        }
    }

    pub fn appearance(&self, element: ElementRef) -> Option<Appearance> {
        match element {
            ElementRef::Circle(index) => self.circles.get(index).map(|circle| Appearance {
                radius: circle.radius,
                opacity: circle.opacity,
            }),
            ElementRef::Line(index) => self.lines.get(index).map(|line| Appearance {
                radius: 0.0,
                opacity: line.opacity,
            }),
            ElementRef::Label(index) => self.labels.get(index).map(|label| Appearance {
                radius: 0.0,
                opacity: label.opacity,
            }),
        }
    }

    pub fn remove(&mut self, element: ElementRef) {
        match element {
            ElementRef::Circle(index) => {
                if let Some(circle) = self.circles.get_mut(index) {
                    circle.removed = true;
                }
            }
            ElementRef::Line(index) => {
                if let Some(line) = self.lines.get_mut(index) {
                    line.removed = true;
                }
            }
            ElementRef::Label(index) => {
                if let Some(label) = self.labels.get_mut(index) {
                    label.removed = true;
                }
            }
        }
    }

    /// Drops tombstoned elements. Only valid while no tween refers to the
    /// scene, since indices shift.
    pub fn compact(&mut self) {
        self.circles.retain(CircleElement::is_live);
        self.lines.retain(LineElement::is_live);
        self.labels.retain(LabelElement::is_live);
    }
}

impl TickSubscriber for Scene {
    fn on_tick(&mut self, nodes: &[SimNode]) {
        let position = |index: usize| nodes.get(index).map(|node| node.position);

        for circle in &mut self.circles {
            if let Some(center) = position(circle.node) {
                circle.center = center;
            }
        }
        for line in &mut self.lines {
            if let (Some(from), Some(to)) = (position(line.source), position(line.target)) {
                line.from = from;
                line.to = to;
            }
        }
        for label in &mut self.labels {
            if let Some(center) = position(label.node) {
                label.anchor = center + LABEL_OFFSET;
            }
        }
    }
}
