mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use contact_core::{load_settings, ManualCaptchaWidget};
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use ui::app::{ContactApp, PersistedGuiSettings, SETTINGS_STORAGE_KEY};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);

    let widget = ManualCaptchaWidget::new();
    let startup_config = load_settings();
    backend_bridge::runtime::launch(cmd_rx, ui_tx, widget.clone(), startup_config.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Smart Contact Form")
            .with_inner_size([900.0, 760.0])
            .with_min_inner_size([640.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Smart Contact Form",
        options,
        Box::new(|cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedGuiSettings>(&text).ok())
            });
            Ok(Box::new(ContactApp::new(
                cmd_tx,
                ui_rx,
                widget,
                startup_config,
                persisted_settings,
            )))
        }),
    )
}
