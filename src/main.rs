mod app;
mod ui;

use app::TrainerApp;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 400.0])
            .with_min_inner_size([420.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Morse Code Trainer",
        options,
        Box::new(|cc| Ok(Box::new(TrainerApp::new(cc)?))),
    )
}
