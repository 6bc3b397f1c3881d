//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from
//! main.rs for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use clipvault_core::Config;
use clipvault_db::VideoRepository;
use clipvault_reaper::ExpiryReaper;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup storage
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config, pool, storage));

    // Background expiry sweep
    let reaper = Arc::new(ExpiryReaper::new(
        VideoRepository::new(state.pool.clone()),
        state.storage.clone(),
        Duration::from_secs(state.config.reaper_interval_secs),
    ));
    reaper.start();
    tracing::info!(
        interval_secs = state.config.reaper_interval_secs,
        "Expiry reaper started"
    );

    // Setup routes
    let router = routes::setup_routes(&state.config.clone(), state.clone())?;

    Ok((state, router))
}
