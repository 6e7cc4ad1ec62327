#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod app;
mod domain;
mod infra;
mod ui;
mod util;

use dioxus::prelude::*;

#[cfg(feature = "desktop")]
use dioxus_desktop::{tao::window::WindowBuilder, Config as DesktopConfig};

use crate::util::{
    config::{AppConfig, LOG_FILTER_VAR},
    logging::init_logging,
    version::{version_label, APP_NAME},
};

fn main() {
    // Wayland explicit-sync crashes on some drivers; fall back to GL unless the caller opts in.
    if std::env::var("WAYLAND_DISPLAY").is_ok() && std::env::var("WGPU_BACKEND").is_err() {
        std::env::set_var("WGPU_BACKEND", "gl");
    }

    if std::env::var("WAYLAND_DISPLAY").is_ok()
        && std::env::var("WEBKIT_DISABLE_DMABUF_RENDERER").is_err()
    {
        std::env::set_var("WEBKIT_DISABLE_DMABUF_RENDERER", "1");
    }

    let config = AppConfig::from_env();
    let filter = config
        .as_ref()
        .map(|config| config.log_filter.clone())
        .unwrap_or_else(|_| std::env::var(LOG_FILTER_VAR).unwrap_or_else(|_| "info".into()));
    init_logging(&filter);

    let config = config.unwrap_or_else(|err| {
        tracing::error!("invalid configuration, continuing with demo accounts: {err}");
        AppConfig {
            backend: None,
            log_filter: filter,
        }
    });
    tracing::info!(version = %version_label(), "starting {APP_NAME}");

    let builder = LaunchBuilder::new().with_context(app::build_services(&config));

    #[cfg(feature = "desktop")]
    let builder = {
        let config = desktop! {
            DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title(APP_NAME)
            )
        };
        builder.with_cfg(config)
    };

    #[cfg(not(feature = "desktop"))]
    let builder = builder;

    builder.launch(app::App);
}
