//! Debug endpoints, development only

use crate::api::internal_error;
use crate::api::debug::schemas::DatabaseCleared;
use crate::core::services::DebugService;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use di_axum::Inject;
use std::collections::BTreeMap;

pub fn router() -> Router {
    Router::new().route("/db", get(database_state).delete(clear_database))
}

async fn database_state(
    Inject(debug_service): Inject<DebugService>,
) -> Result<(StatusCode, Json<BTreeMap<&'static str, i64>>), (StatusCode, String)> {
    let state = debug_service
        .database_state()
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::OK, Json(state)))
}

async fn clear_database(
    Inject(debug_service): Inject<DebugService>,
) -> Result<(StatusCode, Json<DatabaseCleared>), (StatusCode, String)> {
    let removed = debug_service
        .clear_database()
        .await
        .map_err(internal_error)?;

    Ok((
        StatusCode::OK,
        Json(DatabaseCleared {
            status: "database cleared",
            removed,
        }),
    ))
}

pub mod schemas {
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize, Debug)]
    pub struct DatabaseCleared {
        pub status: &'static str,
        pub removed: BTreeMap<&'static str, u64>,
    }
}
