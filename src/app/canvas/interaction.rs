use eframe::egui::{self, CursorIcon, Rect, Ui};
use log::debug;

use crate::view::DragPhase;

use super::super::ViewModel;
use super::super::render_utils::screen_to_canvas;

impl ViewModel {
    /// Routes pointer drags on the canvas to the node under the press point.
    pub(in crate::app) fn handle_canvas_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if response.drag_started()
            && let Some(origin) = ui.input(|input| input.pointer.press_origin())
            && let Some(node) = self.view.node_at(screen_to_canvas(rect, origin))
            && self.view.begin_drag(node)
        {
            debug!("pointer grabbed node {node}");
            self.dragging = Some(node);
        }

        if let Some(node) = self.dragging {
            if response.drag_stopped() {
                self.view.end_drag(node);
                self.dragging = None;
            } else if let Some(pointer) = response.interact_pointer_pos()
                && !self.view.drag_to(node, screen_to_canvas(rect, pointer))
            {
                // Handle went away underneath us, e.g. a disappear started.
                self.dragging = None;
            }
        }

        if let Some(node) = self.dragging
            && self.view.drag().phase(node) == DragPhase::Dragging
        {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        } else if let Some(hover) = response.hover_pos()
            && self.view.node_at(screen_to_canvas(rect, hover)).is_some()
        {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }
    }
}
