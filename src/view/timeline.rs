/// Addresses one drawn primitive by its index in the scene group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Circle(usize),
    Line(usize),
    Label(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    /// Ignored by lines and labels.
    pub radius: f32,
    pub opacity: f32,
}

impl Appearance {
    pub const HIDDEN: Self = Self {
        radius: 0.0,
        opacity: 0.0,
    };

    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            radius: self.radius + (to.radius - self.radius) * t,
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }
}

/// Continuation run once a tween has reached its end state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Nothing,
    Remove,
    AttachDrag,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub element: ElementRef,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub from: Appearance,
    pub to: Appearance,
    pub on_end: Completion,
}

impl Tween {
    fn progress(&self, now_ms: f64) -> Option<f32> {
        if now_ms < self.start_ms {
            return None;
        }
        if self.duration_ms <= 0.0 {
            return Some(1.0);
        }
        Some(((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32)
    }
}

pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Pending and in-flight tweens. Nothing runs on its own: the owner calls
/// [`Timeline::advance`] from the frame loop with the current time.
#[derive(Debug, Default)]
pub struct Timeline {
    pub(super) tweens: Vec<Tween>,
}

impl Timeline {
    pub fn schedule(&mut self, tween: Tween) {
        self.tweens.push(tween);
    }

    /// Schedules `appearances` as one staggered group: entry `i` starts at
    /// `now_ms + i * stagger_ms`.
    pub fn schedule_staggered(
        &mut self,
        now_ms: f64,
        stagger_ms: f64,
        duration_ms: f64,
        entries: impl IntoIterator<Item = (ElementRef, Appearance, Appearance)>,
        on_end: Completion,
    ) -> usize {
        let mut count = 0;
        for (index, (element, from, to)) in entries.into_iter().enumerate() {
            self.schedule(Tween {
                element,
                start_ms: now_ms + stagger_ms * index as f64,
                duration_ms,
                from,
                to,
                on_end,
            });
            count += 1;
        }
        count
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.tweens.len()
    }

    /// Applies the eased state of every started tween through `apply` and
    /// returns the completions of tweens that finished, in schedule order.
    pub fn advance(
        &mut self,
        now_ms: f64,
        mut apply: impl FnMut(ElementRef, Appearance),
    ) -> Vec<(ElementRef, Completion)> {
        let mut finished = Vec::new();
        self.tweens.retain(|tween| {
            let Some(progress) = tween.progress(now_ms) else {
                return true;
            };
            apply(
                tween.element,
                tween.from.lerp(tween.to, ease_cubic_in_out(progress)),
            );
            if progress >= 1.0 {
                finished.push((tween.element, tween.on_end));
                false
            } else {
                true
            }
        });
        finished
    }

    /// Jumps every tween to its end state and returns all completions.
    pub fn finish_all(
        &mut self,
        mut apply: impl FnMut(ElementRef, Appearance),
    ) -> Vec<(ElementRef, Completion)> {
        self.tweens
            .drain(..)
            .map(|tween| {
                apply(tween.element, tween.to);
                (tween.element, tween.on_end)
            })
            .collect()
    }
}
