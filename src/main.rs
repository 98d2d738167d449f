use clap::Parser;
use eframe::egui;
use log::LevelFilter;

mod app;
mod basis;
mod camera;
mod config;
mod driver;
mod input;
mod math;
mod model;
mod render;
mod scene;
mod solver;


use app::SubspaceApp;
use config::Args;


fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();
    init_logger();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Four Fundamental Subspaces")
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };
    eframe::run_native(
        "Four Fundamental Subspaces",
        options,
        Box::new(move |cc| Box::new(SubspaceApp::new(cc, &args))),
    )
}


// --- Helpers ---

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some(env!("CARGO_PKG_NAME")), LevelFilter::Info)
        .parse_default_env()
        .init();
}
