use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use log::{error, info, warn};

use crate::data::{Dataset, DatasetSource};
use crate::sim::SimulationConfig;
use crate::view::{GraphView, TransitionTiming};

mod canvas;
mod render_utils;
mod ui;

pub struct ZettelkastenApp {
    source: DatasetSource,
    config: SimulationConfig,
    timing: TransitionTiming,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Dataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    view: GraphView,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    dragging: Option<usize>,
    last_error: Option<String>,
}

struct SearchMatchCache {
    query: String,
    matches: HashSet<usize>,
}

impl ZettelkastenApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: DatasetSource,
        config: SimulationConfig,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            config,
            timing: TransitionTiming::default(),
            state,
        }
    }

    fn spawn_load(source: DatasetSource) -> Receiver<Result<Dataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: DatasetSource) -> AppState {
        info!("loading dataset from {}", source.describe());
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready_state(&self, dataset: Dataset) -> AppState {
        if dataset.is_empty() {
            warn!("dataset has no projects or clips; the canvas will stay empty");
        } else {
            info!(
                "dataset ready: {} projects, {} clips, {} references",
                dataset.projects.len(),
                dataset.clips.len(),
                dataset.reference_count()
            );
        }

        match GraphView::new(dataset, self.config, self.timing) {
            Ok(view) => AppState::Ready(Box::new(ViewModel::new(view))),
            Err(reason) => {
                error!("could not build graph: {reason}");
                AppState::Error(format!("Could not build graph: {reason}"))
            }
        }
    }
}

impl eframe::App for ZettelkastenApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading projects and clips...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the clip graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if retry {
            self.state = Self::start_load(self.source.clone());
        }

        if let Some(result) = transition {
            self.state = match result {
                Ok(dataset) => self.ready_state(dataset),
                Err(error) => {
                    error!("dataset load failed: {error}");
                    AppState::Error(error)
                }
            };
        }
    }
}
