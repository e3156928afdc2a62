mod forces;
mod quadtree;

use std::collections::HashMap;
use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};
use log::{debug, info};
use thiserror::Error;

use crate::graph::GraphData;
use forces::{ChargeParams, apply_center, apply_charge, apply_links};

pub const CANVAS_WIDTH: f32 = 1000.0;
pub const CANVAS_HEIGHT: f32 = 800.0;

const PHYLLOTAXIS_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub link_distance: f32,
    pub charge_strength: f32,
    pub charge_theta: f32,
    pub charge_distance_min: f32,
    pub center: Vec2,
    pub center_strength: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    /// Alpha target held while at least one node is being dragged.
    pub interaction_alpha_target: f32,
    pub velocity_decay: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            link_distance: 150.0,
            charge_strength: -600.0,
            charge_theta: 0.9,
            charge_distance_min: 1.0,
            center: vec2(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
            center_strength: 1.0,
            alpha_decay: 0.05,
            alpha_min: 0.001,
            interaction_alpha_target: 0.3,
            velocity_decay: 0.4,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("node id `{0}` appears more than once")]
    DuplicateNode(String),
    #[error("edge {project} -> {clip} references unknown node `{missing}`")]
    UnknownNode {
        project: String,
        clip: String,
        missing: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Fixed position override; owned by the drag controller while set.
    pub pin: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    strength: f32,
    bias: f32,
}

/// Receives the node slice after every simulation tick.
pub trait TickSubscriber {
    fn on_tick(&mut self, nodes: &[SimNode]);
}

pub struct Simulation {
    config: SimulationConfig,
    nodes: Vec<SimNode>,
    index_by_id: HashMap<String, usize>,
    links: Vec<Link>,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    tick_count: u64,
    scratch: Vec<Vec2>,
}

impl Simulation {
    pub fn new(graph: &GraphData, config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::reseeded(graph, config, None)
    }

    /// Builds a fresh simulation. Nodes whose id existed in `prior` start at
    /// their prior position; everything else (velocity, pins, links, alpha)
    /// is recreated.
    pub fn reseeded(
        graph: &GraphData,
        config: SimulationConfig,
        prior: Option<&Simulation>,
    ) -> Result<Self, SimulationError> {
        let mut index_by_id = HashMap::with_capacity(graph.nodes.len());
        for (index, node) in graph.nodes.iter().enumerate() {
            if index_by_id.insert(node.id.clone(), index).is_some() {
                return Err(SimulationError::DuplicateNode(node.id.clone()));
            }
        }

        let mut links = Vec::with_capacity(graph.edges.len());
        let mut degree = vec![0usize; graph.nodes.len()];
        for edge in &graph.edges {
            let resolve = |id: &String| {
                index_by_id
                    .get(id)
                    .copied()
                    .ok_or_else(|| SimulationError::UnknownNode {
                        project: edge.project.clone(),
                        clip: edge.clip.clone(),
                        missing: id.clone(),
                    })
            };
            let source = resolve(&edge.project)?;
            let target = resolve(&edge.clip)?;
            degree[source] += 1;
            degree[target] += 1;
            links.push(Link {
                source,
                target,
                strength: 0.0,
                bias: 0.0,
            });
        }

        for link in &mut links {
            let source_degree = degree[link.source] as f32;
            let target_degree = degree[link.target] as f32;
            link.strength = 1.0 / source_degree.min(target_degree);
            link.bias = source_degree / (source_degree + target_degree);
        }

        let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
        let mut reused = 0usize;
        let nodes = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let seeded = prior
                    .and_then(|prior| prior.node(&node.id))
                    .map(|prior_node| prior_node.position);
                let position = match seeded {
                    Some(position) => {
                        reused += 1;
                        position
                    }
                    None => {
                        let radius = PHYLLOTAXIS_RADIUS * (0.5 + index as f32).sqrt();
                        let angle = index as f32 * golden_angle;
                        config.center + vec2(angle.cos(), angle.sin()) * radius
                    }
                };
                SimNode {
                    id: node.id.clone(),
                    position,
                    velocity: Vec2::ZERO,
                    pin: None,
                }
            })
            .collect::<Vec<_>>();

        info!(
            "simulation initialised with {} nodes, {} links ({} positions carried over)",
            nodes.len(),
            links.len(),
            reused
        );

        Ok(Self {
            config,
            running: !nodes.is_empty(),
            nodes,
            index_by_id,
            links,
            alpha: 1.0,
            alpha_target: 0.0,
            tick_count: 0,
            scratch: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resumes ticking. A simulation without nodes stays idle.
    pub fn restart(&mut self) {
        if !self.running && !self.nodes.is_empty() {
            debug!("simulation restarted at alpha {:.3}", self.alpha);
        }
        self.running = !self.nodes.is_empty();
    }

    pub fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(position);
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    /// Advances the layout by one step regardless of the running flag.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;

        apply_links(&mut self.nodes, &self.links, self.config.link_distance, alpha);
        apply_charge(
            &mut self.nodes,
            &mut self.scratch,
            ChargeParams {
                strength: self.config.charge_strength,
                theta: self.config.charge_theta,
                distance_min_sq: self.config.charge_distance_min * self.config.charge_distance_min,
            },
            alpha,
        );
        apply_center(&mut self.nodes, self.config.center, self.config.center_strength);

        let retain = 1.0 - self.config.velocity_decay;
        for node in &mut self.nodes {
            match node.pin {
                Some(pin) => {
                    node.position = pin;
                    node.velocity = Vec2::ZERO;
                }
                None => {
                    node.velocity *= retain;
                    node.position += node.velocity;
                }
            }
        }

        self.tick_count += 1;
    }

    /// One scheduler slot: ticks if running, hands the positions to
    /// `subscriber`, and stops once alpha has cooled below `alpha_min`.
    /// Returns whether a tick happened.
    pub fn run_frame(&mut self, subscriber: &mut dyn TickSubscriber) -> bool {
        if !self.running {
            return false;
        }

        self.tick();
        subscriber.on_tick(&self.nodes);

        if self.alpha < self.config.alpha_min {
            self.running = false;
            debug!(
                "simulation at rest after {} ticks (alpha {:.4})",
                self.tick_count, self.alpha
            );
        }
        true
    }
}
