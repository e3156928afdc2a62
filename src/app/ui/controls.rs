use log::{error, info};

use eframe::egui::{TextEdit, Ui};

use crate::view::LifecycleState;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, now_ms: f64) {
        ui.heading("Zettelkasten for Video Editing");
        ui.separator();

        let toggle = ui
            .button(self.view.toggle_label())
            .on_hover_text("Fade the whole graph out, or rebuild it and fade it back in.");
        if toggle.clicked() {
            self.dragging = None;
            match self.view.toggle(now_ms) {
                Ok(state) => {
                    info!("toggled graph to {state:?}");
                    self.last_error = None;
                }
                Err(reason) => {
                    error!("toggle failed: {reason}");
                    self.last_error = Some(reason.to_string());
                }
            }
        }

        ui.separator();
        ui.label("Search");
        let present = self.view.state() == LifecycleState::Present;
        ui.add_enabled(present, TextEdit::singleline(&mut self.search))
            .on_hover_text("Fuzzy-highlight projects and clips by name.");
    }
}
