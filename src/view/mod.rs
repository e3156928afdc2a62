mod interaction;
mod lifecycle;
mod scene;
mod timeline;

use eframe::egui::Vec2;
use log::{error, info, warn};

use crate::data::Dataset;
use crate::graph::{GraphData, build_graph};
use crate::sim::{Simulation, SimulationConfig, SimulationError};

pub use interaction::DragPhase;
pub use lifecycle::{LifecycleState, TransitionTiming};
pub use scene::NodeFill;

use interaction::DragController;
use lifecycle::LifecycleAnimator;
use scene::{SHOWN, Scene};
use timeline::Appearance;

/// Everything one graph canvas needs, owned in one place. The simulation is
/// the only writer of node positions; the drag controller is the only writer
/// of pins; the lifecycle animator is the only writer of element visibility.
pub struct GraphView {
    dataset: Dataset,
    config: SimulationConfig,
    graph: GraphData,
    simulation: Simulation,
    scene: Scene,
    drag: DragController,
    lifecycle: LifecycleAnimator,
}

impl GraphView {
    pub fn new(
        dataset: Dataset,
        config: SimulationConfig,
        timing: TransitionTiming,
    ) -> Result<Self, SimulationError> {
        let graph = build_graph(&dataset.projects, &dataset.clips);
        let simulation = Simulation::new(&graph, config)?;
        let scene = Scene::populate(&graph, &simulation, SHOWN);
        let mut drag = DragController::new(graph.nodes.len());
        drag.attach_all();

        info!(
            "graph view ready: {} nodes, {} edges, {} draggable",
            graph.nodes.len(),
            graph.edges.len(),
            drag.attached_count()
        );

        Ok(Self {
            dataset,
            config,
            graph,
            simulation,
            scene,
            drag,
            lifecycle: LifecycleAnimator::new(timing),
        })
    }

    pub fn graph(&self) -> &GraphData {
        &self.graph
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn toggle_label(&self) -> &'static str {
        self.lifecycle.state().toggle_label()
    }

    pub fn is_animating(&self) -> bool {
        self.lifecycle.is_animating()
    }

    /// One pass of the cooperative loop: advance tweens to `now_ms`, then run
    /// at most one simulation tick into the scene. Returns whether anything
    /// is still moving.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.lifecycle.advance(now_ms, &mut self.scene, &mut self.drag);
        let ticked = self.simulation.run_frame(&mut self.scene);
        ticked || self.lifecycle.is_animating()
    }

    pub fn toggle(&mut self, now_ms: f64) -> Result<LifecycleState, SimulationError> {
        match self.lifecycle.state() {
            LifecycleState::Present => self.disappear(now_ms),
            LifecycleState::Disappeared => self.reappear(now_ms)?,
        }
        Ok(self.lifecycle.state())
    }

    pub fn disappear(&mut self, now_ms: f64) {
        if self.lifecycle.state() == LifecycleState::Disappeared {
            warn!("disappear requested while already disappeared; ignoring");
            return;
        }

        self.lifecycle.flush(&mut self.scene, &mut self.drag);
        self.drag.detach_all(&mut self.simulation);
        let scheduled = self.lifecycle.begin_disappear(&self.scene, now_ms);
        info!("disappearing {scheduled} elements");
    }

    /// Rebuilds graph, simulation and scene from the dataset and fades the
    /// new scene in. On error the view stays disappeared.
    pub fn reappear(&mut self, now_ms: f64) -> Result<(), SimulationError> {
        if self.lifecycle.state() == LifecycleState::Present {
            warn!("reappear requested while present; ignoring");
            return Ok(());
        }

        self.lifecycle.flush(&mut self.scene, &mut self.drag);

        let graph = build_graph(&self.dataset.projects, &self.dataset.clips);
        let mut simulation = Simulation::reseeded(&graph, self.config, Some(&self.simulation))
            .inspect_err(|reason| error!("reappear rejected: {reason}"))?;
        simulation.set_alpha(1.0);
        simulation.restart();

        self.drag.reset(graph.nodes.len());
        self.scene = Scene::populate(&graph, &simulation, Appearance::HIDDEN);
        self.graph = graph;
        self.simulation = simulation;

        let scheduled = self.lifecycle.begin_appear(&self.scene, now_ms);
        info!("reappearing {scheduled} elements");
        Ok(())
    }

    /// Top-most draggable node whose circle contains `point`.
    pub fn node_at(&self, point: Vec2) -> Option<usize> {
        self.scene
            .live_circles()
            .filter(|(_, circle)| circle.radius > 0.0 && self.drag.handle(circle.node).is_some())
            .filter(|(_, circle)| (circle.center - point).length() <= circle.radius)
            .last()
            .map(|(_, circle)| circle.node)
    }

    pub fn begin_drag(&mut self, node: usize) -> bool {
        let Some(handle) = self.drag.handle(node) else {
            return false;
        };
        self.drag.drag_start(handle, &mut self.simulation)
    }

    pub fn drag_to(&mut self, node: usize, pointer: Vec2) -> bool {
        let Some(handle) = self.drag.handle(node) else {
            return false;
        };
        self.drag.drag_move(handle, pointer, &mut self.simulation)
    }

    pub fn end_drag(&mut self, node: usize) -> bool {
        let Some(handle) = self.drag.handle(node) else {
            return false;
        };
        self.drag.drag_end(handle, &mut self.simulation)
    }
}
