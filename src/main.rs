// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use relational_ownership_verifier::{
    api::router,
    config::AppConfig,
    notify::{ConfiguredNotifier, NotificationDispatcher, NotificationQueue},
    state::AppState,
    telemetry,
};

/// Time allowed for in-flight requests after a shutdown signal.
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    telemetry::init(config.log_format);

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let notifier =
        ConfiguredNotifier::from_config(&config.mail).expect("Failed to build mail notifier");
    if matches!(notifier, ConfiguredNotifier::Log(_)) {
        info!("MAIL_API_URL not set; notifications will only be logged");
    }

    let shutdown = CancellationToken::new();
    let (queue, receiver) = NotificationQueue::channel();
    let dispatcher = tokio::spawn(
        NotificationDispatcher::new(notifier, receiver).run(shutdown.clone()),
    );

    let app = router(AppState::in_memory(queue), &config.cors_allowed_origins)
        .into_make_service_with_connect_info::<SocketAddr>();

    let addr = config.bind_addr().expect("Failed to parse bind address");

    let handle = Handle::new();
    let signal_handle = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        signal_handle.graceful_shutdown(Some(GRACEFUL_SHUTDOWN_TIMEOUT));
    });

    let served = match &config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .expect("Failed to load TLS certificate and key");
            info!("Ownership verifier listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app)
                .await
        }
        None => {
            info!("Ownership verifier listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr).handle(handle).serve(app).await
        }
    };

    if let Err(e) = served {
        error!(error = %e, "Server failed");
    }

    shutdown.cancel();
    if let Err(e) = dispatcher.await {
        error!(error = %e, "Notification dispatcher task failed");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
