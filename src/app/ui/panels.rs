use eframe::egui::{self, Align, Color32, Context, Layout};

use crate::view::GraphView;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(view: GraphView) -> Self {
        Self {
            view,
            search: String::new(),
            search_match_cache: None,
            dragging: None,
            last_error: None,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        let now_ms = ctx.input(|input| input.time) * 1000.0;
        let moving = self.view.frame(now_ms);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    self.draw_controls(ui, now_ms);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.status_text());
                        if let Some(error) = &self.last_error {
                            ui.colored_label(Color32::from_rgb(235, 89, 57), error);
                        }
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::from_gray(12)))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    self.draw_canvas(ui);
                });
            });

        if moving || self.view.drag().active_drags() > 0 {
            ctx.request_repaint();
        }
    }

    fn status_text(&self) -> String {
        let simulation = self.view.simulation();
        let motion = if simulation.is_running() {
            format!(
                "alpha: {:.3} -> {:.2}",
                simulation.alpha(),
                simulation.alpha_target()
            )
        } else {
            format!("alpha: {:.3} (at rest)", simulation.alpha())
        };
        format!(
            "nodes: {}  |  edges: {}  |  {motion}",
            self.view.graph().nodes.len(),
            self.view.graph().edges.len(),
        )
    }
}
