use eframe::egui::Vec2;
use log::{debug, warn};

use crate::sim::Simulation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Free,
    Dragging,
}

/// Proof that drag behavior is attached to a node. Handles are tied to the
/// controller generation, so handles issued before a reset stop working.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragHandle {
    node: usize,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct DragController {
    phases: Vec<DragPhase>,
    handles: Vec<Option<DragHandle>>,
    active: usize,
    generation: u64,
}

impl DragController {
    pub fn new(node_count: usize) -> Self {
        let mut controller = Self::default();
        controller.reset(node_count);
        controller
    }

    /// Forgets every handle and drag. Callers must have released pins first
    /// (see [`DragController::detach_all`]) or be discarding the simulation.
    pub fn reset(&mut self, node_count: usize) {
        self.generation = self.generation.wrapping_add(1);
        self.phases = vec![DragPhase::Free; node_count];
        self.handles = vec![None; node_count];
        self.active = 0;
    }

    pub fn attach(&mut self, node: usize) -> Option<DragHandle> {
        let slot = self.handles.get_mut(node)?;
        let handle = DragHandle {
            node,
            generation: self.generation,
        };
        *slot = Some(handle);
        Some(handle)
    }

    pub fn attach_all(&mut self) {
        for node in 0..self.handles.len() {
            self.attach(node);
        }
    }

    /// Removes every handle, ending in-progress drags so no pin survives.
    pub fn detach_all(&mut self, simulation: &mut Simulation) {
        for node in 0..self.phases.len() {
            if self.phases[node] == DragPhase::Dragging {
                simulation.unpin(node);
                self.phases[node] = DragPhase::Free;
            }
        }
        if self.active > 0 {
            simulation.set_alpha_target(0.0);
            self.active = 0;
        }
        self.handles.iter_mut().for_each(|handle| *handle = None);
    }

    pub fn handle(&self, node: usize) -> Option<DragHandle> {
        self.handles.get(node).copied().flatten()
    }

    pub fn attached_count(&self) -> usize {
        self.handles.iter().filter(|handle| handle.is_some()).count()
    }

    pub fn phase(&self, node: usize) -> DragPhase {
        self.phases.get(node).copied().unwrap_or(DragPhase::Free)
    }

    pub fn active_drags(&self) -> usize {
        self.active
    }

    fn is_current(&self, handle: DragHandle) -> bool {
        handle.generation == self.generation && self.handle(handle.node) == Some(handle)
    }

    pub fn drag_start(&mut self, handle: DragHandle, simulation: &mut Simulation) -> bool {
        if !self.is_current(handle) {
            warn!("ignoring drag start with stale handle for node {}", handle.node);
            return false;
        }
        if self.phases[handle.node] == DragPhase::Dragging {
            return false;
        }
        let Some(position) = simulation.nodes().get(handle.node).map(|node| node.position) else {
            return false;
        };

        if self.active == 0 {
            let target = simulation.config().interaction_alpha_target;
            simulation.set_alpha_target(target);
            simulation.restart();
        }
        self.active += 1;
        self.phases[handle.node] = DragPhase::Dragging;
        simulation.pin(handle.node, position);
        debug!("drag started on node {} ({} active)", handle.node, self.active);
        true
    }

    pub fn drag_move(
        &mut self,
        handle: DragHandle,
        pointer: Vec2,
        simulation: &mut Simulation,
    ) -> bool {
        if !self.is_current(handle) || self.phases[handle.node] != DragPhase::Dragging {
            return false;
        }
        simulation.pin(handle.node, pointer);
        true
    }

    pub fn drag_end(&mut self, handle: DragHandle, simulation: &mut Simulation) -> bool {
        if !self.is_current(handle) || self.phases[handle.node] != DragPhase::Dragging {
            return false;
        }

        self.active = self.active.saturating_sub(1);
        if self.active == 0 {
            simulation.set_alpha_target(0.0);
        }
        self.phases[handle.node] = DragPhase::Free;
        simulation.unpin(handle.node);
        debug!("drag ended on node {} ({} active)", handle.node, self.active);
        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::data::sample_dataset;
    use crate::graph::build_graph;
    use crate::sim::{SimulationConfig, TickSubscriber};

    struct Ignore;

    impl TickSubscriber for Ignore {
        fn on_tick(&mut self, _nodes: &[crate::sim::SimNode]) {}
    }

    fn rested_simulation() -> Simulation {
        let dataset = sample_dataset();
        let graph = build_graph(&dataset.projects, &dataset.clips);
        let mut simulation = Simulation::new(&graph, SimulationConfig::default()).unwrap();
        while simulation.run_frame(&mut Ignore) {}
        simulation
    }

    fn attached(node_count: usize) -> DragController {
        let mut controller = DragController::new(node_count);
        controller.attach_all();
        controller
    }

    #[test]
    fn nothing_is_draggable_until_attached() {
        let controller = DragController::new(3);
        assert_eq!(controller.attached_count(), 0);
        assert!(controller.handle(0).is_none());
        assert!(controller.handle(99).is_none());
    }

    #[test]
    fn drag_start_warms_a_resting_simulation() {
        let mut simulation = rested_simulation();
        assert!(!simulation.is_running());
        let mut controller = attached(simulation.nodes().len());
        let handle = controller.handle(2).unwrap();
        let before = simulation.nodes()[2].position;

        assert!(controller.drag_start(handle, &mut simulation));
        assert!(simulation.is_running());
        assert_eq!(simulation.alpha_target(), 0.3);
        assert_eq!(simulation.nodes()[2].pin, Some(before));
        assert_eq!(controller.phase(2), DragPhase::Dragging);
        assert!(!controller.drag_start(handle, &mut simulation));
    }

    #[test]
    fn dragged_node_follows_pointer_every_tick() {
        let mut simulation = rested_simulation();
        let mut controller = attached(simulation.nodes().len());
        let handle = controller.handle(5).unwrap();
        controller.drag_start(handle, &mut simulation);

        let others_before = simulation.nodes()[6].position;
        for step in 0..30 {
            let pointer = vec2(200.0 + step as f32 * 7.5, 650.0 - step as f32 * 3.25);
            assert!(controller.drag_move(handle, pointer, &mut simulation));
            assert!(simulation.run_frame(&mut Ignore));
            assert_eq!(simulation.nodes()[5].position, pointer);
        }
        assert_ne!(simulation.nodes()[6].position, others_before);
    }

    #[test]
    fn drag_end_releases_pin_and_lets_alpha_cool() {
        let mut simulation = rested_simulation();
        let mut controller = attached(simulation.nodes().len());
        let handle = controller.handle(0).unwrap();
        controller.drag_start(handle, &mut simulation);
        controller.drag_move(handle, vec2(50.0, 50.0), &mut simulation);

        assert!(controller.drag_end(handle, &mut simulation));
        assert_eq!(simulation.alpha_target(), 0.0);
        assert!(simulation.nodes()[0].pin.is_none());
        assert_eq!(controller.phase(0), DragPhase::Free);
        assert!(!controller.drag_end(handle, &mut simulation));

        let mut frames = 0;
        while simulation.run_frame(&mut Ignore) {
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(!simulation.is_running());
    }

    #[test]
    fn concurrent_drags_are_independent() {
        let mut simulation = rested_simulation();
        let mut controller = attached(simulation.nodes().len());
        let first = controller.handle(1).unwrap();
        let second = controller.handle(9).unwrap();

        controller.drag_start(first, &mut simulation);
        controller.drag_start(second, &mut simulation);
        assert_eq!(controller.active_drags(), 2);

        controller.drag_move(first, vec2(100.0, 100.0), &mut simulation);
        controller.drag_move(second, vec2(900.0, 700.0), &mut simulation);
        controller.drag_end(first, &mut simulation);

        assert_eq!(simulation.alpha_target(), 0.3);
        assert!(simulation.nodes()[1].pin.is_none());
        assert_eq!(simulation.nodes()[9].pin, Some(vec2(900.0, 700.0)));

        controller.drag_end(second, &mut simulation);
        assert_eq!(simulation.alpha_target(), 0.0);
    }

    #[test]
    fn stale_handles_are_rejected_after_reset() {
        let mut simulation = rested_simulation();
        let mut controller = attached(simulation.nodes().len());
        let stale = controller.handle(4).unwrap();

        controller.reset(simulation.nodes().len());
        controller.attach(4);
        assert_ne!(controller.handle(4), Some(stale));
        assert!(!controller.drag_start(stale, &mut simulation));
        assert!(simulation.nodes()[4].pin.is_none());
    }

    #[test]
    fn detach_all_releases_active_pins() {
        let mut simulation = rested_simulation();
        let mut controller = attached(simulation.nodes().len());
        let handle = controller.handle(3).unwrap();
        controller.drag_start(handle, &mut simulation);

        controller.detach_all(&mut simulation);
        assert_eq!(controller.attached_count(), 0);
        assert_eq!(controller.active_drags(), 0);
        assert_eq!(simulation.alpha_target(), 0.0);
        assert!(simulation.nodes()[3].pin.is_none());
        assert!(!controller.drag_move(handle, vec2(1.0, 1.0), &mut simulation));
    }
}
