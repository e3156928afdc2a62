use std::collections::HashSet;

use eframe::egui::{Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::sim::{CANVAS_HEIGHT, CANVAS_WIDTH};

use super::super::render_utils::{
    EDGE_COLOR, EDGE_OPACITY, SEARCH_RING_COLOR, canvas_to_screen, dim_color, draw_background,
    fill_color, with_opacity,
};
use super::super::{SearchMatchCache, ViewModel};

const NODE_STROKE_WIDTH: f32 = 1.5;
const EDGE_STROKE_WIDTH: f32 = 1.0;
const LABEL_FONT_SIZE: f32 = 12.0;
const UNMATCHED_DIM: f32 = 0.35;

pub(in crate::app) fn fuzzy_match_score(
    matcher: &SkimMatcherV2,
    text: &str,
    query: &str,
) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    /// Node indices whose name fuzzy-matches the search box, or `None` when
    /// the search is empty.
    pub(in crate::app) fn search_matches(&mut self) -> Option<&HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            self.search_match_cache = None;
            return None;
        }

        let stale = self
            .search_match_cache
            .as_ref()
            .is_none_or(|cached| cached.query != query);
        if stale {
            let matcher = SkimMatcherV2::default();
            let matches = self
                .view
                .graph()
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, node)| fuzzy_match_score(&matcher, &node.name, query).is_some())
                .map(|(index, _)| index)
                .collect();
            self.search_match_cache = Some(SearchMatchCache {
                query: query.to_owned(),
                matches,
            });
        }

        self.search_match_cache.as_ref().map(|cached| &cached.matches)
    }

    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) =
            ui.allocate_exact_size(vec2(CANVAS_WIDTH, CANVAS_HEIGHT), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect);
        self.handle_canvas_drag(ui, rect, &response);

        let matches = self.search_matches().cloned();
        let is_dimmed = |node: usize| {
            matches
                .as_ref()
                .is_some_and(|matches| !matches.contains(&node))
        };
        let scene = self.view.scene();

        for (_, line) in scene.live_lines() {
            painter.line_segment(
                [
                    canvas_to_screen(rect, line.from),
                    canvas_to_screen(rect, line.to),
                ],
                Stroke::new(
                    EDGE_STROKE_WIDTH,
                    with_opacity(EDGE_COLOR, EDGE_OPACITY * line.opacity),
                ),
            );
        }

        for (_, circle) in scene.live_circles() {
            if circle.radius <= 0.0 {
                continue;
            }
            let center = canvas_to_screen(rect, circle.center);
            let mut color = fill_color(circle.fill);
            if is_dimmed(circle.node) {
                color = dim_color(color, UNMATCHED_DIM);
            }

            painter.circle_filled(center, circle.radius, with_opacity(color, circle.opacity));
            painter.circle_stroke(
                center,
                circle.radius,
                Stroke::new(
                    NODE_STROKE_WIDTH,
                    with_opacity(Color32::WHITE, circle.opacity),
                ),
            );
            if matches.is_some() && !is_dimmed(circle.node) {
                painter.circle_stroke(
                    center,
                    circle.radius + 4.0,
                    Stroke::new(1.5, with_opacity(SEARCH_RING_COLOR, circle.opacity)),
                );
            }
        }

        for (_, label) in scene.live_labels() {
            let opacity = if is_dimmed(label.node) {
                label.opacity * UNMATCHED_DIM
            } else {
                label.opacity
            };
            painter.text(
                canvas_to_screen(rect, label.anchor),
                Align2::LEFT_CENTER,
                &label.text,
                FontId::proportional(LABEL_FONT_SIZE),
                with_opacity(Color32::WHITE, opacity),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_match_falls_back_to_case_insensitive() {
        let matcher = SkimMatcherV2::default();
        assert!(fuzzy_match_score(&matcher, "Sunset Timelapse", "sunset").is_some());
        assert!(fuzzy_match_score(&matcher, "Sunset Timelapse", "STL").is_some());
        assert!(fuzzy_match_score(&matcher, "Interview A", "zebra").is_none());
    }
}
