mod admin;
mod app;
mod auth;
mod cities;
mod community;
mod config;
mod error;
mod itinerary;
mod notify;
mod state;
mod trips;
mod users;
mod verification;

#[cfg(test)]
mod testutil;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "globetrotter=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    sqlx::migrate!("./migrations").run(&app_state.db).await?;

    if app_state.config.dev_mode {
        tracing::warn!("dev mode enabled: verification codes are echoed in responses");
    }

    let app = app::build_app(app_state);
    app::serve(app).await
}
