use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::pkg::internal::adaptors::candidates::selectors::CandidateSelector;
use crate::pkg::internal::adaptors::criteria::selectors::CriterionSelector;
use crate::pkg::internal::adaptors::processes::selectors::ProcessSelector;
use crate::pkg::internal::adaptors::rankings::selectors::RankingSelector;
use crate::pkg::internal::adaptors::scores::selectors::ScoreSelector;
use crate::pkg::internal::adaptors::scores::spec::ProcessScoreRow;
use crate::pkg::server::state::{AppState, GetTxn};
use crate::pkg::server::uispec::{BoardPage, DashboardPage, ProcessCard, ProcessListPage};
use crate::prelude::{ApiError, Result};

#[derive(Debug, Deserialize)]
pub struct ProcessFilter {
    pub status: Option<String>,
}

pub async fn home(
    State(state): State<AppState>,
    Query(filter): Query<ProcessFilter>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let mut selector = ProcessSelector::new(&mut tx);

    let status_filter = filter
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let processes = match status_filter {
        Some(status) => selector.get_by_status(status).await?,
        None => selector.get_all().await?,
    };
    tracing::debug!(count = processes.len(), filter = ?status_filter, "listing processes");

    let template = ProcessListPage::assemble(&processes, status_filter.unwrap_or(""));
    Ok(Html(template.render()?))
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;

    let active_processes = ProcessSelector::new(&mut tx).count_active().await?;
    let candidates = CandidateSelector::new(&mut tx).count().await?;
    let pending_evaluations = RankingSelector::new(&mut tx).count_pending().await?;
    let completed_evaluations = RankingSelector::new(&mut tx).count_evaluated().await?;
    let recent = ProcessSelector::new(&mut tx).recent(5).await?;

    let template = DashboardPage {
        active_processes,
        candidates,
        pending_evaluations,
        completed_evaluations,
        recent: recent.iter().map(ProcessCard::from_entry).collect(),
    };
    Ok(Html(template.render()?))
}

/// The tier board: criteria header plus the seven tier buckets, each card
/// carrying per-criterion scores and the weighted average.
pub async fn board(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let process = ProcessSelector::new(&mut tx)
        .get_by_id(process_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("process {process_id} not found")))?;

    let criteria = CriterionSelector::new(&mut tx)
        .list_for_process(process_id)
        .await?;
    let rankings = RankingSelector::new(&mut tx)
        .list_for_process(process_id)
        .await?;
    let score_rows = ScoreSelector::new(&mut tx)
        .weighted_for_process(process_id)
        .await?;
    let scores = ProcessScoreRow::group_by_ranking(score_rows);

    let template = BoardPage::assemble(&process, &criteria, rankings, scores);
    Ok(Html(template.render()?))
}
