use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use crate::pkg::internal::adaptors::candidates::mutators::CandidateMutator;
use crate::pkg::internal::adaptors::candidates::selectors::CandidateSelector;
use crate::pkg::internal::adaptors::candidates::spec::CandidateEntry;
use crate::pkg::internal::adaptors::processes::mutators::ProcessMutator;
use crate::pkg::internal::adaptors::processes::selectors::ProcessSelector;
use crate::pkg::internal::adaptors::processes::spec::ProcessEntry;
use crate::pkg::internal::adaptors::rankings::mutators::RankingMutator;
use crate::pkg::internal::adaptors::rankings::selectors::RankingSelector;
use crate::pkg::internal::adaptors::rankings::spec::{RankingEntry, RankingWithCandidate};
use crate::pkg::server::handlers::candidates::{CandidateFields, CandidatePatch};
use crate::pkg::server::handlers::processes::{NewProcess, ProcessPatch};
use crate::pkg::server::state::{AppState, GetTxn};
use crate::prelude::{ApiError, Result};

pub async fn list_candidates(State(state): State<AppState>) -> Result<Json<Vec<CandidateEntry>>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let candidates = CandidateSelector::new(&mut tx).get_all().await?;
    Ok(Json(candidates))
}

pub async fn create_candidate(
    State(state): State<AppState>,
    Json(input): Json<CandidateFields>,
) -> Result<Json<CandidateEntry>> {
    let fields = input.validated()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let candidate = CandidateMutator::new(&mut tx).create(&fields, None).await?;
    tx.commit().await?;
    tracing::info!(candidate_id = candidate.id, "candidate created via api");
    Ok(Json(candidate))
}

pub async fn get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<i32>,
) -> Result<Json<CandidateEntry>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let candidate = CandidateSelector::new(&mut tx)
        .get_by_id(candidate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("candidate {candidate_id} not found")))?;
    Ok(Json(candidate))
}

pub async fn update_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<i32>,
    Json(patch): Json<CandidatePatch>,
) -> Result<Json<CandidateEntry>> {
    let patch = patch.validated()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let candidate = CandidateMutator::new(&mut tx)
        .update(candidate_id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("candidate {candidate_id} not found")))?;
    tx.commit().await?;
    Ok(Json(candidate))
}

pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<i32>,
) -> Result<()> {
    let mut tx = state.db_pool.begin_txn().await?;
    let deleted = CandidateMutator::new(&mut tx).delete(candidate_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!(
            "candidate {candidate_id} not found"
        )));
    }
    tx.commit().await?;
    tracing::info!(candidate_id, "candidate deleted via api");
    Ok(())
}

pub async fn list_processes(State(state): State<AppState>) -> Result<Json<Vec<ProcessEntry>>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let processes = ProcessSelector::new(&mut tx).get_all().await?;
    Ok(Json(processes))
}

pub async fn create_process(
    State(state): State<AppState>,
    Json(input): Json<NewProcess>,
) -> Result<Json<ProcessEntry>> {
    let process = input.validated()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let created = ProcessMutator::new(&mut tx).create(&process).await?;
    tx.commit().await?;
    tracing::info!(process_id = created.id, "process created via api");
    Ok(Json(created))
}

pub async fn get_process(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
) -> Result<Json<ProcessEntry>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let process = ProcessSelector::new(&mut tx)
        .get_by_id(process_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("process {process_id} not found")))?;
    Ok(Json(process))
}

pub async fn update_process(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
    Json(patch): Json<ProcessPatch>,
) -> Result<Json<ProcessEntry>> {
    let patch = patch.validated()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let process = ProcessMutator::new(&mut tx)
        .update(process_id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("process {process_id} not found")))?;
    tx.commit().await?;
    Ok(Json(process))
}

pub async fn delete_process(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
) -> Result<()> {
    let mut tx = state.db_pool.begin_txn().await?;
    let deleted = ProcessMutator::new(&mut tx).delete(process_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!(
            "process {process_id} not found"
        )));
    }
    tx.commit().await?;
    tracing::info!(process_id, "process deleted via api");
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct AttachCandidateInput {
    pub candidate_id: i32,
}

pub async fn list_rankings(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
) -> Result<Json<Vec<RankingWithCandidate>>> {
    let mut tx = state.db_pool.begin_txn().await?;
    ProcessSelector::new(&mut tx)
        .get_by_id(process_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("process {process_id} not found")))?;
    let rankings = RankingSelector::new(&mut tx)
        .list_for_process(process_id)
        .await?;
    Ok(Json(rankings))
}

/// Attaches an existing candidate to a process. The unique (candidate,
/// process) pair turns duplicates into a structured conflict.
pub async fn attach_candidate(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
    Json(input): Json<AttachCandidateInput>,
) -> Result<Json<RankingEntry>> {
    let mut tx = state.db_pool.begin_txn().await?;
    ProcessSelector::new(&mut tx)
        .get_by_id(process_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("process {process_id} not found")))?;
    CandidateSelector::new(&mut tx)
        .get_by_id(input.candidate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("candidate {} not found", input.candidate_id)))?;

    let ranking = RankingMutator::new(&mut tx)
        .create(input.candidate_id, process_id)
        .await?;
    tx.commit().await?;
    tracing::info!(
        ranking_id = ranking.id,
        process_id,
        candidate_id = input.candidate_id,
        "candidate attached via api"
    );
    Ok(Json(ranking))
}

pub async fn delete_ranking(
    State(state): State<AppState>,
    Path(ranking_id): Path<i32>,
) -> Result<()> {
    let mut tx = state.db_pool.begin_txn().await?;
    let deleted = RankingMutator::new(&mut tx).delete(ranking_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!(
            "ranking {ranking_id} not found"
        )));
    }
    tx.commit().await?;
    tracing::info!(ranking_id, "ranking removed via api");
    Ok(())
}
