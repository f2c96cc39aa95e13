use askama::Template;
use axum::extract::{Path, State};
use axum::response::Html;
use axum::{Form, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::PgConnection;

use crate::pkg::internal::adaptors::candidates::selectors::CandidateSelector;
use crate::pkg::internal::adaptors::criteria::selectors::CriterionSelector;
use crate::pkg::internal::adaptors::rankings::mutators::RankingMutator;
use crate::pkg::internal::adaptors::rankings::selectors::RankingSelector;
use crate::pkg::internal::adaptors::rankings::spec::RankingEntry;
use crate::pkg::internal::adaptors::scores::mutators::ScoreMutator;
use crate::pkg::internal::adaptors::scores::selectors::ScoreSelector;
use crate::pkg::internal::normalize::{parse_with_fallback, trim_to_none};
use crate::pkg::internal::scoring::{ensure_same_process, validate_score};
use crate::pkg::internal::tiers::{parse_assignment, stamp_evaluated_at};
use crate::pkg::server::state::{AppState, GetTxn};
use crate::pkg::server::uispec::EvaluateModal;
use crate::prelude::{ApiError, Result};

#[derive(Debug, Deserialize)]
pub struct ScoreForm {
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct NotesForm {
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct TierForm {
    pub tier: Option<String>,
    #[serde(default)]
    pub order: String,
}

async fn get_ranking(tx: &mut PgConnection, ranking_id: i32) -> Result<RankingEntry> {
    RankingSelector::new(&mut *tx)
        .get_by_id(ranking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("ranking {ranking_id} not found")))
}

/// Gathers everything the evaluation modal shows for one ranking.
async fn load_modal(tx: &mut PgConnection, ranking: &RankingEntry) -> Result<EvaluateModal> {
    let candidate = CandidateSelector::new(&mut *tx)
        .get_by_id(ranking.candidate_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("candidate {} not found", ranking.candidate_id))
        })?;
    let criteria = CriterionSelector::new(&mut *tx)
        .list_for_process(ranking.process_id)
        .await?;
    let scores = ScoreSelector::new(&mut *tx)
        .list_for_ranking(ranking.id)
        .await?;
    let weighted = ScoreSelector::new(&mut *tx)
        .weighted_for_ranking(ranking.id)
        .await?;
    Ok(EvaluateModal::assemble(
        ranking,
        &candidate.name,
        &criteria,
        &scores,
        &weighted,
    ))
}

pub async fn modal(
    State(state): State<AppState>,
    Path(ranking_id): Path<i32>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let ranking = get_ranking(&mut tx, ranking_id).await?;
    let template = load_modal(&mut tx, &ranking).await?;
    Ok(Html(template.render()?))
}

/// Upserts one criterion score and re-renders the modal from the same
/// transaction so the new value and average show up immediately. An
/// out-of-range score puts the error inline instead.
pub async fn save_score(
    State(state): State<AppState>,
    Path((ranking_id, criterion_id)): Path<(i32, i32)>,
    Form(form): Form<ScoreForm>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let ranking = get_ranking(&mut tx, ranking_id).await?;
    let criterion = CriterionSelector::new(&mut tx)
        .get_by_id(criterion_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("criterion {criterion_id} not found")))?;
    ensure_same_process(criterion.process_id, ranking.process_id)?;

    let (score, defaulted) = parse_with_fallback(Some(form.score.as_str()), 0.0);
    if defaulted {
        tracing::debug!(ranking_id, criterion_id, raw = %form.score, "score input defaulted to 0");
    }
    let note = trim_to_none(Some(form.note.as_str()));

    match validate_score(score) {
        Ok(()) => {}
        Err(ApiError::Validation(message)) => {
            let template = load_modal(&mut tx, &ranking).await?.with_error(message);
            return Ok(Html(template.render()?));
        }
        Err(err) => return Err(err),
    }

    ScoreMutator::new(&mut tx)
        .upsert(ranking_id, criterion_id, score, note.as_deref())
        .await?;

    let template = load_modal(&mut tx, &ranking).await?;
    tx.commit().await?;
    tracing::info!(ranking_id, criterion_id, score, "score recorded");
    Ok(Html(template.render()?))
}

pub async fn save_notes(
    State(state): State<AppState>,
    Path(ranking_id): Path<i32>,
    Form(form): Form<NotesForm>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let notes = trim_to_none(Some(form.notes.as_str()));
    let updated = RankingMutator::new(&mut tx)
        .set_notes(ranking_id, notes.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("ranking {ranking_id} not found")))?;

    let template = load_modal(&mut tx, &updated).await?;
    tx.commit().await?;
    tracing::info!(ranking_id, "evaluation notes saved");
    Ok(Html(template.render()?))
}

/// Sets tier and intra-tier order from the board. The first tier
/// assignment stamps `evaluated_at`; clearing the tier later keeps the
/// stamp.
pub async fn update_tier(
    State(state): State<AppState>,
    Path(ranking_id): Path<i32>,
    Form(form): Form<TierForm>,
) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let ranking = get_ranking(&mut tx, ranking_id).await?;

    let tier = parse_assignment(form.tier.as_deref())?;
    let (order, defaulted) = parse_with_fallback::<u32>(Some(form.order.as_str()), 0);
    if defaulted && !form.order.trim().is_empty() {
        tracing::debug!(ranking_id, raw = %form.order, "tier order defaulted to 0");
    }
    let evaluated_at = stamp_evaluated_at(tier, ranking.evaluated_at, Utc::now());

    let updated = RankingMutator::new(&mut tx)
        .set_tier(
            ranking_id,
            tier.map(|t| t.as_str()),
            order.min(i32::MAX as u32) as i32,
            evaluated_at,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("ranking {ranking_id} not found")))?;
    tx.commit().await?;

    tracing::info!(ranking_id, tier = ?updated.tier, order = updated.tier_order, "tier updated");
    Ok(Json(json!({
        "success": true,
        "ranking_id": updated.id,
        "tier": updated.tier,
        "order": updated.tier_order,
    })))
}
