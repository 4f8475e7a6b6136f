mod app;
mod io;
mod model;

use app::DesktopApp;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([420.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "BatikScan",
        options,
        Box::new(|_cc| Box::new(DesktopApp::default())),
    )
}
