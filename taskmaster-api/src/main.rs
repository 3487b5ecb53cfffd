//! # TaskMaster API Server
//!
//! REST API for TaskMaster: account registration and login, owner-scoped
//! task management, profile self-service, and the team directory.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskmaster-api
//! ```

use std::sync::Arc;
use taskmaster_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskmaster_shared::{
    db::{migrations, pool},
    notify::{Notifier, NullNotifier, SmtpNotifier},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskmaster_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskMaster API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Missing mandatory secrets fail here, before the server accepts anything
    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    // Notification dispatcher: SMTP when configured, explicit no-op otherwise
    let notifier: Arc<dyn Notifier> = match &config.mail {
        Some(mail) => {
            tracing::info!(host = %mail.host, "Mail transport configured");
            Arc::new(SmtpNotifier::new(
                &mail.host,
                mail.port,
                mail.username.clone(),
                mail.password.clone(),
                &mail.from,
            )?)
        }
        None => {
            tracing::info!("Mail transport not configured, notifications disabled");
            Arc::new(NullNotifier)
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(db, config, notifier);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
