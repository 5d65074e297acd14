//! weapp-notify web server - Mini-program notification receiver.
//!
//! This binary serves the notification endpoint with logging handlers for
//! the fire-and-forget kinds. Applications that answer balance or logistics
//! events embed the library and register their own handlers.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weapp_notify::web::{router, AppState};
use weapp_notify::{Config, Gateway, Handlers};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        notify_path = %config.notify_path,
        app_id = %config.app_id,
        validate = config.validate,
        merchant_configured = config.mch_id.is_some() && config.api_key.is_some(),
        "config_loaded"
    );

    let gateway_config = config
        .gateway_config()
        .context("Invalid gateway configuration")?;

    let handlers = logging_handlers();
    info!(registered = ?handlers.registered(), "handlers_registered");

    let state = AppState::new(Gateway::new(gateway_config, handlers));
    let app = router(state, &config.notify_path);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Handlers that record each notification in the log.
fn logging_handlers() -> Handlers {
    Handlers::new()
        .on_text_message(|msg| {
            info!(from = %msg.from_user_name, msg_id = msg.msg_id, "text_message_received");
        })
        .on_image_message(|msg| {
            info!(from = %msg.from_user_name, media_id = %msg.media_id, "image_message_received");
        })
        .on_card_message(|msg| {
            info!(from = %msg.from_user_name, page_path = %msg.page_path, "card_message_received");
        })
        .on_user_enter_tempsession(|event| {
            info!(from = %event.from_user_name, session_from = %event.session_from, "tempsession_entered");
        })
        .on_media_check_async(|event| {
            info!(
                trace_id = %event.trace_id,
                is_risky = event.is_risky,
                status_code = event.status_code,
                "media_check_result"
            );
        })
        .on_express_path_update(|event| {
            info!(
                delivery_id = %event.delivery_id,
                waybill_id = %event.waybill_id,
                actions = event.actions.len(),
                "express_path_updated"
            );
        })
        .on_add_nearby_poi_audit(|event| {
            info!(
                audit_id = event.audit_id,
                poi_id = event.poi_id,
                status = event.status,
                "nearby_poi_audited"
            );
        })
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
