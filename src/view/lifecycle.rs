use log::debug;

use super::interaction::DragController;
use super::scene::{SHOWN, Scene};
use super::timeline::{Appearance, Completion, ElementRef, Timeline};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Present,
    Disappeared,
}

impl LifecycleState {
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Present => "Disappear Nodes",
            Self::Disappeared => "Reappear Nodes",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionTiming {
    pub duration_ms: f64,
    pub disappear_stagger_ms: f64,
    pub appear_node_stagger_ms: f64,
    pub appear_edge_stagger_ms: f64,
    pub appear_label_stagger_ms: f64,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration_ms: 500.0,
            disappear_stagger_ms: 100.0,
            appear_node_stagger_ms: 100.0,
            appear_edge_stagger_ms: 200.0,
            appear_label_stagger_ms: 100.0,
        }
    }
}

/// Owns the appear/disappear tweens. Graph data, simulation and scene
/// contents belong to the caller; this only animates visibility.
#[derive(Debug)]
pub struct LifecycleAnimator {
    state: LifecycleState,
    timing: TransitionTiming,
    timeline: Timeline,
}

impl LifecycleAnimator {
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            state: LifecycleState::Present,
            timing,
            timeline: Timeline::default(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        !self.timeline.is_idle()
    }

    /// Fades every live element out, removing each as its tween ends.
    /// Returns the number of scheduled tweens.
    pub fn begin_disappear(&mut self, scene: &Scene, now_ms: f64) -> usize {
        let timing = self.timing;
        let fade_out = |element: ElementRef| {
            let from = scene.appearance(element).unwrap_or(SHOWN);
            (element, from, Appearance::HIDDEN)
        };

        let circles = scene
            .live_circles()
            .map(|(index, _)| fade_out(ElementRef::Circle(index)))
            .collect::<Vec<_>>();
        let lines = scene
            .live_lines()
            .map(|(index, _)| fade_out(ElementRef::Line(index)))
            .collect::<Vec<_>>();
        let labels = scene
            .live_labels()
            .map(|(index, _)| fade_out(ElementRef::Label(index)))
            .collect::<Vec<_>>();

        let mut scheduled = 0;
        for group in [circles, lines, labels] {
            scheduled += self.timeline.schedule_staggered(
                now_ms,
                timing.disappear_stagger_ms,
                timing.duration_ms,
                group,
                Completion::Remove,
            );
        }

        self.state = LifecycleState::Disappeared;
        debug!(
            "disappear scheduled {scheduled} tweens ({} pending)",
            self.timeline.pending()
        );
        scheduled
    }

    /// Fades a freshly populated (hidden) scene in. Circles get their drag
    /// handle once their own tween completes.
    pub fn begin_appear(&mut self, scene: &Scene, now_ms: f64) -> usize {
        let timing = self.timing;
        let hidden = Appearance::HIDDEN;

        let circles = scene
            .live_circles()
            .map(|(index, _)| (ElementRef::Circle(index), hidden, SHOWN))
            .collect::<Vec<_>>();
        let lines = scene
            .live_lines()
            .map(|(index, _)| (ElementRef::Line(index), hidden, SHOWN))
            .collect::<Vec<_>>();
        let labels = scene
            .live_labels()
            .map(|(index, _)| (ElementRef::Label(index), hidden, SHOWN))
            .collect::<Vec<_>>();

        let mut scheduled = self.timeline.schedule_staggered(
            now_ms,
            timing.appear_node_stagger_ms,
            timing.duration_ms,
            circles,
            Completion::AttachDrag,
        );
        scheduled += self.timeline.schedule_staggered(
            now_ms,
            timing.appear_edge_stagger_ms,
            timing.duration_ms,
            lines,
            Completion::Nothing,
        );
        scheduled += self.timeline.schedule_staggered(
            now_ms,
            timing.appear_label_stagger_ms,
            timing.duration_ms,
            labels,
            Completion::Nothing,
        );

        self.state = LifecycleState::Present;
        debug!(
            "appear scheduled {scheduled} tweens ({} pending)",
            self.timeline.pending()
        );
        scheduled
    }

    pub fn advance(&mut self, now_ms: f64, scene: &mut Scene, drag: &mut DragController) {
        if self.timeline.is_idle() {
            return;
        }
        let finished = self
            .timeline
            .advance(now_ms, |element, appearance| scene.apply(element, appearance));
        Self::complete(finished, scene, drag);
        if self.timeline.is_idle() {
            scene.compact();
        }
    }

    /// Snaps all pending tweens to their end state and runs their
    /// completions. Used before starting a new transition.
    pub fn flush(&mut self, scene: &mut Scene, drag: &mut DragController) -> usize {
        if self.timeline.is_idle() {
            return 0;
        }
        let finished = self
            .timeline
            .finish_all(|element, appearance| scene.apply(element, appearance));
        let count = finished.len();
        Self::complete(finished, scene, drag);
        scene.compact();
        debug!("flushed {count} pending tweens");
        count
    }

    fn complete(
        finished: Vec<(ElementRef, Completion)>,
        scene: &mut Scene,
        drag: &mut DragController,
    ) {
        for (element, completion) in finished {
            match (completion, element) {
                (Completion::Remove, element) => scene.remove(element),
                (Completion::AttachDrag, ElementRef::Circle(index)) => {
                    if let Some(circle) = scene.circles().get(index) {
                        drag.attach(circle.node);
                    }
                }
                (Completion::AttachDrag, _) | (Completion::Nothing, _) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_dataset;
    use crate::graph::build_graph;
    use crate::sim::{Simulation, SimulationConfig};

    fn populated(initial: Appearance) -> (Scene, DragController) {
        let dataset = sample_dataset();
        let graph = build_graph(&dataset.projects, &dataset.clips);
        let simulation = Simulation::new(&graph, SimulationConfig::default()).unwrap();
        let scene = Scene::populate(&graph, &simulation, initial);
        let drag = DragController::new(graph.nodes.len());
        (scene, drag)
    }

    #[test]
    fn labels_follow_state() {
        assert_eq!(LifecycleState::Present.toggle_label(), "Disappear Nodes");
        assert_eq!(LifecycleState::Disappeared.toggle_label(), "Reappear Nodes");
    }

    #[test]
    fn disappear_removes_everything_after_last_stagger() {
        let (mut scene, mut drag) = populated(SHOWN);
        let mut animator = LifecycleAnimator::new(TransitionTiming::default());

        // 15 circles, 28 lines, 15 labels.
        assert_eq!(animator.begin_disappear(&scene, 0.0), 58);
        assert_eq!(animator.state(), LifecycleState::Disappeared);

        animator.advance(1_000.0, &mut scene, &mut drag);
        assert!(animator.is_animating());
        // Circles 0..=5 finished (start + 500 <= 1000), circle 6 is mid-flight.
        assert_eq!(scene.live_circles().count(), 9);

        let last_line_end = 27.0 * 100.0 + 500.0;
        animator.advance(last_line_end, &mut scene, &mut drag);
        assert!(!animator.is_animating());
        assert!(scene.is_empty());
        assert!(scene.circles().is_empty());
    }

    #[test]
    fn shrinking_circles_lose_radius_and_opacity() {
        let (mut scene, mut drag) = populated(SHOWN);
        let mut animator = LifecycleAnimator::new(TransitionTiming::default());
        animator.begin_disappear(&scene, 0.0);

        animator.advance(250.0, &mut scene, &mut drag);
        let first = &scene.circles()[0];
        assert!((first.radius - 5.0).abs() < 1e-4);
        assert!((first.opacity - 0.5).abs() < 1e-5);
        let untouched = &scene.circles()[5];
        assert_eq!(untouched.radius, 10.0);
    }

    #[test]
    fn appear_attaches_drag_per_circle_on_completion() {
        let (mut scene, mut drag) = populated(Appearance::HIDDEN);
        let mut animator = LifecycleAnimator::new(TransitionTiming::default());
        animator.begin_disappear(&Scene::default(), 0.0);
        animator.begin_appear(&scene, 0.0);
        assert_eq!(animator.state(), LifecycleState::Present);

        animator.advance(499.0, &mut scene, &mut drag);
        assert_eq!(drag.attached_count(), 0);

        animator.advance(700.0, &mut scene, &mut drag);
        assert_eq!(drag.attached_count(), 3);
        assert!(drag.handle(0).is_some() && drag.handle(2).is_some());
        assert!(drag.handle(3).is_none());

        animator.advance(100_000.0, &mut scene, &mut drag);
        assert_eq!(drag.attached_count(), 15);
        assert!(scene.circles().iter().all(|circle| circle.radius == 10.0));
        assert!(scene.live_lines().all(|(_, line)| line.opacity == 1.0));
        assert!(scene.live_labels().all(|(_, label)| label.opacity == 1.0));
    }

    #[test]
    fn edges_use_their_own_stagger() {
        let (scene, _) = populated(Appearance::HIDDEN);
        let mut animator = LifecycleAnimator::new(TransitionTiming::default());
        animator.begin_appear(&scene, 50.0);

        let line_starts = animator
            .timeline
            .tweens
            .iter()
            .filter(|tween| matches!(tween.element, ElementRef::Line(_)))
            .map(|tween| tween.start_ms)
            .take(3)
            .collect::<Vec<_>>();
        assert_eq!(line_starts, vec![50.0, 250.0, 450.0]);
    }

    #[test]
    fn flush_finishes_pending_work() {
        let (mut scene, mut drag) = populated(SHOWN);
        let mut animator = LifecycleAnimator::new(TransitionTiming::default());
        animator.begin_disappear(&scene, 0.0);
        animator.advance(300.0, &mut scene, &mut drag);

        assert_eq!(animator.flush(&mut scene, &mut drag), 58);
        assert!(!animator.is_animating());
        assert!(scene.is_empty());
        assert_eq!(animator.flush(&mut scene, &mut drag), 0);
    }

    #[test]
    fn disappear_on_empty_scene_is_immediate() {
        let mut scene = Scene::default();
        let mut drag = DragController::new(0);
        let mut animator = LifecycleAnimator::new(TransitionTiming::default());

        assert_eq!(animator.begin_disappear(&scene, 0.0), 0);
        assert_eq!(animator.state(), LifecycleState::Disappeared);
        assert!(!animator.is_animating());
        animator.advance(10.0, &mut scene, &mut drag);
        assert!(scene.is_empty());
    }
}
