mod app;
mod data;
mod graph;
mod sim;
mod view;

use std::path::PathBuf;

use clap::Parser;
use log::info;

use data::DatasetSource;
use sim::SimulationConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with `projects` and `clips`. Uses the built-in sample when omitted.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Rest length of every project-clip link.
    #[arg(long, default_value_t = 150.0)]
    link_distance: f32,
    /// Many-body strength; negative values repel.
    #[arg(long, default_value_t = -600.0, allow_negative_numbers = true)]
    charge_strength: f32,
    #[arg(long, default_value_t = 0.05)]
    alpha_decay: f32,
    #[arg(long, default_value_t = 0.4)]
    velocity_decay: f32,
}

impl Args {
    fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            link_distance: self.link_distance,
            charge_strength: self.charge_strength,
            alpha_decay: self.alpha_decay,
            velocity_decay: self.velocity_decay,
            ..SimulationConfig::default()
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let source = DatasetSource::from_arg(args.data.clone());
    let config = args.simulation_config();
    info!("starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1080.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Zettelkasten for Video Editing",
        options,
        Box::new(move |cc| Ok(Box::new(app::ZettelkastenApp::new(cc, source, config)))),
    )
}
