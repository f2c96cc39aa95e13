use axum::extract::State;
use sqlx::query;

use crate::{pkg::server::state::AppState, prelude::Result};

pub async fn livez() -> Result<&'static str> {
    tracing::debug!("liveness probe ok");
    Ok("ok")
}

pub async fn healthz(State(state): State<AppState>) -> Result<&'static str> {
    query("select 1").execute(&*state.db_pool).await?;
    tracing::debug!("database reachable, service healthy");
    Ok("ok")
}
