mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

use iced::{window, Size};
use tracing_subscriber::EnvFilter;

use crate::api::ApiConfig;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mockup_studio=info")),
        )
        .init();

    let config = ApiConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid configuration, using defaults");
        ApiConfig::default()
    });

    iced::application(
        move || app::StudioApp::new(config.clone()),
        app::update,
        app::view,
    )
    .title("Mockup Studio")
    .window(window::Settings {
        size: Size::new(1280.0, 860.0),
        ..Default::default()
    })
    .run()
}
