//! Prompt Desk desktop client
//!
//! A single-window chat front end for a prompt/response backend.

mod api;
mod app;
mod components;
mod i18n;
mod keyboard;
mod state;
mod theme;
mod views;

use anyhow::Result;
use gpui::prelude::*;
use gpui::*;
use prompt_desk_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Prompt Desk");

    let config = Config::load()?;
    tracing::info!("Backend: {} (user {})", config.base_url, config.user_id);
    let api = api::ApiState::new(&config)?;

    Application::new().run(move |cx: &mut App| {
        i18n::init(cx);
        tracing::debug!("Locale: {}", cx.global::<i18n::I18n>().locale());

        state::init(cx, &config);
        theme::init(cx);
        keyboard::init(cx);
        api::init(cx, api);

        let title = cx.global::<i18n::I18n>().t("window.title");
        let opened = cx.open_window(
            WindowOptions {
                titlebar: Some(TitlebarOptions {
                    title: Some(title.into()),
                    ..Default::default()
                }),
                window_bounds: Some(WindowBounds::Windowed(Bounds {
                    origin: point(px(100.0), px(100.0)),
                    size: size(px(900.0), px(720.0)),
                })),
                ..Default::default()
            },
            |window, cx| cx.new(|cx| app::AppRoot::new(window, cx)),
        );

        match opened {
            Ok(_) => tracing::info!("Prompt Desk window opened"),
            Err(e) => {
                tracing::error!("Failed to open window: {}", e);
                cx.quit();
            }
        }
    });

    Ok(())
}
