// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use maritima_gateway::{
    api::{router, services},
    auth::AuthPolicy,
    config::{Config, LogFormat, DEFAULT_LOG_FILTER},
    error::Error,
    service_config::ServiceConfig,
    state::AppState,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    if config.signing_secret.is_empty() {
        if config.environment.is_production() {
            return Err(Error::MissingSigningSecret);
        }
        tracing::warn!("APP_KEY is not set; bearer tokens cannot be meaningfully verified");
    }

    // Built once; read-only for the lifetime of the process.
    let service_config =
        ServiceConfig::load_with_policy(&config.api_config_path, config.config_load_policy)?;
    let policy = AuthPolicy::from_service_config(&service_config, &config.provider_id);

    let state = AppState::new(policy, config.signing_secret.clone())
        .with_environment(config.environment);
    let app = router(state, services());

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        %addr,
        environment = %config.environment,
        "The server has been started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("The server has been stopped");
    Ok(())
}
