//! Scenario store server
//!
//! (c) Softlandia 2025

use scenario_store::api;
use scenario_store::config::AppConfig;
use scenario_store::core::services::{
    ChatsService, ClassesService, DebugService, FeedbackService, ScenariosService, UsersService,
};
use scenario_store::infrastructure::database::DatabaseConnection;

use anyhow::{Context, anyhow};
use axum::Router;
use axum::http::{HeaderValue, Method};
use di::{Injectable, ServiceCollection, existing_as_self};
use di_axum::RouterServiceProviderExtensions;
use log::info;
use tokio::runtime::{Builder, Runtime};
use tower_http::cors::{Any, CorsLayer};

fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(web_server_task(config))
}

async fn web_server_task(config: AppConfig) -> anyhow::Result<()> {
    let database = DatabaseConnection::connect(&config)
        .await
        .with_context(|| format!("cannot open database {}", config.database_url))?;
    let pool = database.pool().clone();

    let provider = ServiceCollection::new()
        .add(existing_as_self(database))
        .add(UsersService::scoped())
        .add(ClassesService::scoped())
        .add(ScenariosService::scoped())
        .add(ChatsService::scoped())
        .add(FeedbackService::scoped())
        .add(DebugService::scoped())
        .build_provider()
        .map_err(|e| anyhow!("invalid service registrations: {e:?}"))?;

    let app = Router::new()
        .nest("/debug", api::debug::router())
        .layer(
            CorsLayer::new()
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::DELETE])
                .allow_origin([
                    HeaderValue::from_static("http://localhost:3000"),
                    HeaderValue::from_static("http://localhost:5173"),
                ]),
        )
        .with_provider(provider);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    info!("Shutting down...");

    pool.close().await;
    Ok(())
}
