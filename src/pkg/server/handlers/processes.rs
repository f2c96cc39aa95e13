use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::pkg::internal::adaptors::processes::mutators::ProcessMutator;
use crate::pkg::internal::adaptors::processes::spec::ProcessStatus;
use crate::pkg::internal::normalize::trim_to_none;
use crate::pkg::server::state::{AppState, GetTxn};
use crate::prelude::{ApiError, Result};

/// Payload for creating a selection process, shared by the list-page form
/// and the JSON API.
#[derive(Debug, Deserialize, Validate)]
pub struct NewProcess {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "job title cannot be empty"))]
    pub job_title: String,
    pub department: Option<String>,
    #[serde(default)]
    pub status: ProcessStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewProcess {
    pub fn validated(mut self) -> Result<NewProcess> {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.job_title = self.job_title.trim().to_string();
        self.department = trim_to_none(self.department.as_deref());
        self.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub status: Option<ProcessStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ProcessPatch {
    pub fn validated(mut self) -> Result<ProcessPatch> {
        for (field, value) in [
            ("title", &mut self.title),
            ("description", &mut self.description),
            ("job_title", &mut self.job_title),
        ] {
            if let Some(text) = value {
                *text = text.trim().to_string();
                if text.is_empty() {
                    return Err(ApiError::Validation(format!("{field} cannot be blank")));
                }
            }
        }
        if let Some(department) = &mut self.department {
            *department = department.trim().to_string();
        }
        Ok(self)
    }
}

/// Raw text fields as the browser posts them. Dates and status arrive as
/// strings and are parsed here so a bad value surfaces as a validation
/// failure rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct ProcessForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl ProcessForm {
    pub fn into_new_process(self) -> Result<NewProcess> {
        let status = match self.status.trim() {
            "" => ProcessStatus::default(),
            raw => ProcessStatus::parse(raw)
                .ok_or_else(|| ApiError::Validation(format!("unknown status {raw:?}")))?,
        };
        let start_date = self.start_date.trim().parse::<NaiveDate>().map_err(|_| {
            ApiError::Validation("start date must be a valid date (YYYY-MM-DD)".to_string())
        })?;
        let end_date = match self.end_date.trim() {
            "" => None,
            raw => Some(raw.parse::<NaiveDate>().map_err(|_| {
                ApiError::Validation("end date must be a valid date (YYYY-MM-DD)".to_string())
            })?),
        };

        NewProcess {
            title: self.title,
            description: self.description,
            job_title: self.job_title,
            department: Some(self.department),
            status,
            start_date,
            end_date,
        }
        .validated()
    }
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ProcessForm>,
) -> Result<Redirect> {
    let process = form.into_new_process()?;

    let mut tx = state.db_pool.begin_txn().await?;
    let created = ProcessMutator::new(&mut tx).create(&process).await?;
    tx.commit().await?;

    tracing::info!(process_id = created.id, title = %created.title, "process created");
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(status: &str, start_date: &str, end_date: &str) -> ProcessForm {
        ProcessForm {
            title: "  Backend hiring  ".to_string(),
            description: "Round one".to_string(),
            job_title: "Backend engineer".to_string(),
            department: "  ".to_string(),
            status: status.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        }
    }

    #[test]
    fn form_trims_text_and_defaults_status() {
        let process = form("", "2025-03-01", "").into_new_process().unwrap();
        assert_eq!(process.title, "Backend hiring");
        assert_eq!(process.department, None);
        assert_eq!(process.status, ProcessStatus::Open);
        assert_eq!(process.end_date, None);
    }

    #[test]
    fn form_rejects_unknown_status_and_bad_dates() {
        assert!(form("archived", "2025-03-01", "").into_new_process().is_err());
        assert!(form("open", "yesterday", "").into_new_process().is_err());
        assert!(form("open", "2025-03-01", "soon").into_new_process().is_err());
    }

    #[test]
    fn blank_required_fields_fail_validation() {
        let mut input = form("open", "2025-03-01", "2025-04-01");
        input.title = "   ".to_string();
        assert!(input.into_new_process().is_err());
    }

    #[test]
    fn patch_rejects_blanked_required_fields() {
        let patch = ProcessPatch {
            title: Some("  ".to_string()),
            ..ProcessPatch::default()
        };
        assert!(patch.validated().is_err());

        let patch = ProcessPatch {
            job_title: Some(" Staff engineer ".to_string()),
            ..ProcessPatch::default()
        };
        assert_eq!(
            patch.validated().unwrap().job_title.as_deref(),
            Some("Staff engineer")
        );
    }
}
