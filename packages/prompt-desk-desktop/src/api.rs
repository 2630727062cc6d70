//! Backend access for the window
//!
//! HTTP calls run on a dedicated Tokio runtime; gpui's executors only await
//! the join handles.

use anyhow::Context as _;
use gpui::*;
use prompt_desk_core::{ChatClient, Config};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Global HTTP client plus the runtime its futures are driven on
pub struct ApiState {
    pub client: ChatClient,
    pub runtime: Arc<Runtime>,
}

impl ApiState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("prompt-desk-http")
            .build()
            .context("Failed to create Tokio runtime")?;

        Ok(Self {
            client: ChatClient::new(&config.base_url),
            runtime: Arc::new(runtime),
        })
    }
}

impl Global for ApiState {}

pub fn init(cx: &mut App, api: ApiState) {
    tracing::debug!("API client initialized for {}", api.client.base_url());
    cx.set_global(api);
}

/// Clone out the client and runtime so a task can own them
pub fn handles(cx: &App) -> (ChatClient, Arc<Runtime>) {
    let api = cx.global::<ApiState>();
    (api.client.clone(), api.runtime.clone())
}
