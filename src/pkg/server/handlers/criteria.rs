use askama::Template;
use axum::Form;
use axum::extract::{Path, State};
use axum::response::Html;
use serde::Deserialize;
use sqlx::PgConnection;

use crate::pkg::internal::adaptors::criteria::mutators::CriterionMutator;
use crate::pkg::internal::adaptors::criteria::selectors::CriterionSelector;
use crate::pkg::internal::adaptors::criteria::spec::CriterionEntry;
use crate::pkg::internal::adaptors::processes::selectors::ProcessSelector;
use crate::pkg::internal::adaptors::processes::spec::ProcessEntry;
use crate::pkg::internal::normalize::{
    WEIGHT_FALLBACK, clamp_weight, parse_with_fallback, trim_to_none,
};
use crate::pkg::server::state::{AppState, GetTxn};
use crate::pkg::server::uispec::{CriteriaModal, CriterionFormModal};
use crate::prelude::{ApiError, Result};

/// Normalized criterion payload, ready for the adaptor layer.
#[derive(Debug)]
pub struct CriterionFields {
    pub name: String,
    pub description: Option<String>,
    pub weight: f64,
    pub display_order: i32,
}

/// Raw form text. Weight and order are normalized with silent fallbacks;
/// only a missing name is rejected.
#[derive(Debug, Deserialize)]
pub struct CriterionFormInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub order: String,
}

impl CriterionFormInput {
    pub fn normalized(&self) -> Result<CriterionFields> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation(
                "criterion name is required".to_string(),
            ));
        }
        let (weight, weight_defaulted) =
            parse_with_fallback(Some(self.weight.as_str()), WEIGHT_FALLBACK);
        let (order, order_defaulted) = parse_with_fallback::<u32>(Some(self.order.as_str()), 0);
        if weight_defaulted || order_defaulted {
            tracing::debug!(
                weight = %self.weight,
                order = %self.order,
                "criterion numerics defaulted"
            );
        }
        Ok(CriterionFields {
            name: name.to_string(),
            description: trim_to_none(Some(self.description.as_str())),
            weight: clamp_weight(weight),
            display_order: order.min(i32::MAX as u32) as i32,
        })
    }
}

async fn get_process(tx: &mut PgConnection, process_id: i32) -> Result<ProcessEntry> {
    ProcessSelector::new(&mut *tx)
        .get_by_id(process_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("process {process_id} not found")))
}

async fn get_criterion(tx: &mut PgConnection, criterion_id: i32) -> Result<CriterionEntry> {
    CriterionSelector::new(&mut *tx)
        .get_by_id(criterion_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("criterion {criterion_id} not found")))
}

async fn criteria_modal(tx: &mut PgConnection, process: &ProcessEntry) -> Result<CriteriaModal> {
    let criteria = CriterionSelector::new(&mut *tx)
        .list_for_process(process.id)
        .await?;
    Ok(CriteriaModal::assemble(process, &criteria))
}

/// Puts the submitted text back into the form partial next to the error.
fn echo(
    mut modal: CriterionFormModal,
    input: &CriterionFormInput,
    error: String,
) -> CriterionFormModal {
    modal.name = input.name.trim().to_string();
    modal.description = input.description.trim().to_string();
    if !input.weight.trim().is_empty() {
        modal.weight = input.weight.trim().to_string();
    }
    if !input.order.trim().is_empty() {
        modal.display_order = input.order.trim().to_string();
    }
    modal.error = Some(error);
    modal
}

pub async fn list_modal(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let process = get_process(&mut tx, process_id).await?;
    let template = criteria_modal(&mut tx, &process).await?;
    Ok(Html(template.render()?))
}

pub async fn create_form(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let process = get_process(&mut tx, process_id).await?;
    let template = CriterionFormModal::blank(&process);
    Ok(Html(template.render()?))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(criterion_id): Path<i32>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let criterion = get_criterion(&mut tx, criterion_id).await?;
    let process = get_process(&mut tx, criterion.process_id).await?;
    let template = CriterionFormModal::edit(&process, &criterion);
    Ok(Html(template.render()?))
}

pub async fn create(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
    Form(input): Form<CriterionFormInput>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let process = get_process(&mut tx, process_id).await?;

    let fields = match input.normalized() {
        Ok(fields) => fields,
        Err(ApiError::Validation(message)) => {
            let template = echo(CriterionFormModal::blank(&process), &input, message);
            return Ok(Html(template.render()?));
        }
        Err(err) => return Err(err),
    };

    let created = match CriterionMutator::new(&mut tx).create(process_id, &fields).await {
        Ok(created) => created,
        Err(ApiError::Conflict(message)) => {
            let template = echo(CriterionFormModal::blank(&process), &input, message);
            return Ok(Html(template.render()?));
        }
        Err(err) => return Err(err),
    };

    let template = criteria_modal(&mut tx, &process).await?;
    tx.commit().await?;
    tracing::info!(criterion_id = created.id, process_id, "criterion created");
    Ok(Html(template.render()?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(criterion_id): Path<i32>,
    Form(input): Form<CriterionFormInput>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let criterion = get_criterion(&mut tx, criterion_id).await?;
    let process = get_process(&mut tx, criterion.process_id).await?;

    let fields = match input.normalized() {
        Ok(fields) => fields,
        Err(ApiError::Validation(message)) => {
            let template = echo(CriterionFormModal::edit(&process, &criterion), &input, message);
            return Ok(Html(template.render()?));
        }
        Err(err) => return Err(err),
    };

    match CriterionMutator::new(&mut tx).update(criterion_id, &fields).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(ApiError::NotFound(format!(
                "criterion {criterion_id} not found"
            )));
        }
        Err(ApiError::Conflict(message)) => {
            let template = echo(CriterionFormModal::edit(&process, &criterion), &input, message);
            return Ok(Html(template.render()?));
        }
        Err(err) => return Err(err),
    }

    let template = criteria_modal(&mut tx, &process).await?;
    tx.commit().await?;
    tracing::info!(criterion_id, "criterion updated");
    Ok(Html(template.render()?))
}

pub async fn remove(State(state): State<AppState>, Path(criterion_id): Path<i32>) -> Result<()> {
    let mut tx = state.db_pool.begin_txn().await?;
    let deleted = CriterionMutator::new(&mut tx).delete(criterion_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!(
            "criterion {criterion_id} not found"
        )));
    }
    tx.commit().await?;
    tracing::info!(criterion_id, "criterion deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, weight: &str, order: &str) -> CriterionFormInput {
        CriterionFormInput {
            name: name.to_string(),
            description: "  ".to_string(),
            weight: weight.to_string(),
            order: order.to_string(),
        }
    }

    #[test]
    fn name_is_the_only_hard_requirement() {
        assert!(input("", "1.0", "0").normalized().is_err());
        assert!(input("   ", "1.0", "0").normalized().is_err());
        assert!(input("Communication", "", "").normalized().is_ok());
    }

    #[test]
    fn blank_description_becomes_none() {
        let fields = input("Communication", "2.0", "1").normalized().unwrap();
        assert_eq!(fields.description, None);
    }

    #[test]
    fn malformed_numerics_default_silently() {
        let fields = input("Communication", "heavy", "first").normalized().unwrap();
        assert_eq!(fields.weight, WEIGHT_FALLBACK);
        assert_eq!(fields.display_order, 0);
    }

    #[test]
    fn out_of_range_weight_clamps() {
        assert_eq!(input("A", "99", "0").normalized().unwrap().weight, 10.0);
        assert_eq!(input("A", "0", "0").normalized().unwrap().weight, 0.01);
    }

    #[test]
    fn negative_order_defaults_and_huge_order_saturates() {
        assert_eq!(input("A", "1", "-5").normalized().unwrap().display_order, 0);
        assert_eq!(
            input("A", "1", "2147483648").normalized().unwrap().display_order,
            i32::MAX
        );
    }
}
