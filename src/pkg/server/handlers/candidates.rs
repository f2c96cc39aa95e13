use askama::Template;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use url::Url;
use validator::{Validate, ValidateEmail};

use crate::conf::settings;
use crate::pkg::internal::adaptors::candidates::mutators::CandidateMutator;
use crate::pkg::internal::adaptors::candidates::selectors::CandidateSelector;
use crate::pkg::internal::adaptors::processes::selectors::ProcessSelector;
use crate::pkg::internal::adaptors::processes::spec::ProcessEntry;
use crate::pkg::internal::adaptors::rankings::mutators::RankingMutator;
use crate::pkg::internal::documents::{self, StoredDocument};
use crate::pkg::internal::normalize::trim_to_none;
use crate::pkg::server::state::{AppState, GetTxn};
use crate::pkg::server::uispec::{CandidateFormModal, CloseModal};
use crate::prelude::{ApiError, Result};

lazy_static! {
    static ref PHONE_RE: Regex =
        Regex::new(r"^\+?1?\d{9,15}$").expect("phone pattern is valid");
}

/// Payload for creating a candidate, shared by the modal form and the
/// JSON API.
#[derive(Debug, Deserialize, Validate)]
pub struct CandidateFields {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub phone: Option<String>,
    pub profile_url: Option<String>,
    pub notes: Option<String>,
}

impl CandidateFields {
    pub fn validated(mut self) -> Result<CandidateFields> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone = trim_to_none(self.phone.as_deref());
        self.profile_url = trim_to_none(self.profile_url.as_deref());
        self.notes = trim_to_none(self.notes.as_deref());
        self.validate()?;
        check_phone(self.phone.as_deref())?;
        check_profile_url(self.profile_url.as_deref())?;
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile_url: Option<String>,
    pub notes: Option<String>,
}

impl CandidatePatch {
    pub fn validated(mut self) -> Result<CandidatePatch> {
        if let Some(name) = &mut self.name {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(ApiError::Validation("name cannot be blank".to_string()));
            }
        }
        if let Some(email) = &mut self.email {
            *email = email.trim().to_string();
            if !email.validate_email() {
                return Err(ApiError::Validation(
                    "email must be a valid address".to_string(),
                ));
            }
        }
        if let Some(phone) = &mut self.phone {
            *phone = phone.trim().to_string();
            if !phone.is_empty() {
                check_phone(Some(phone.as_str()))?;
            }
        }
        if let Some(profile_url) = &mut self.profile_url {
            *profile_url = profile_url.trim().to_string();
            if !profile_url.is_empty() {
                check_profile_url(Some(profile_url.as_str()))?;
            }
        }
        Ok(self)
    }
}

fn check_phone(phone: Option<&str>) -> Result<()> {
    if let Some(phone) = phone {
        if !PHONE_RE.is_match(phone) {
            return Err(ApiError::Validation(
                "phone must be digits with an optional leading +, 9 to 15 digits".to_string(),
            ));
        }
    }
    Ok(())
}

fn check_profile_url(profile_url: Option<&str>) -> Result<()> {
    if let Some(profile_url) = profile_url {
        Url::parse(profile_url)
            .map_err(|_| ApiError::Validation("profile URL must be a valid URL".to_string()))?;
    }
    Ok(())
}

fn bad_multipart(err: MultipartError) -> ApiError {
    ApiError::Validation(format!("malformed multipart request: {err}"))
}

pub async fn create_form(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let process = ProcessSelector::new(&mut tx)
        .get_by_id(process_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("process {process_id} not found")))?;

    let template = CandidateFormModal {
        process_id: process.id,
        process_title: process.title,
        error: None,
    };
    Ok(Html(template.render()?))
}

/// Creates the candidate and its ranking in one transaction. Validation
/// and duplicate-email conflicts re-render the form with the error instead
/// of failing the request; the document file is only written once the rows
/// are in place.
pub async fn create(
    State(state): State<AppState>,
    Path(process_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut name = String::new();
    let mut email = String::new();
    let mut phone = String::new();
    let mut profile_url = String::new();
    let mut notes = String::new();
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        match field.name().unwrap_or("") {
            "name" => name = field.text().await.map_err(bad_multipart)?,
            "email" => email = field.text().await.map_err(bad_multipart)?,
            "phone" => phone = field.text().await.map_err(bad_multipart)?,
            "profile_url" => profile_url = field.text().await.map_err(bad_multipart)?,
            "notes" => notes = field.text().await.map_err(bad_multipart)?,
            "document" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(bad_multipart)?;
                if !file_name.is_empty() && !data.is_empty() {
                    upload = Some((file_name, data));
                }
            }
            _ => {
                let _ = field.bytes().await.map_err(bad_multipart)?;
            }
        }
    }

    let mut tx = state.db_pool.begin_txn().await?;
    let process = ProcessSelector::new(&mut tx)
        .get_by_id(process_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("process {process_id} not found")))?;

    let fields = CandidateFields {
        name,
        email,
        phone: Some(phone),
        profile_url: Some(profile_url),
        notes: Some(notes),
    };
    let fields = match fields.validated() {
        Ok(fields) => fields,
        Err(ApiError::Validation(message)) => return form_with_error(&process, message),
        Err(err) => return Err(err),
    };

    let document = match upload {
        Some((file_name, data)) => match StoredDocument::plan(&file_name, data.len()) {
            Ok(planned) => Some((planned, data)),
            Err(ApiError::Validation(message)) => return form_with_error(&process, message),
            Err(err) => return Err(err),
        },
        None => None,
    };

    let candidate = match CandidateMutator::new(&mut tx)
        .create(&fields, document.as_ref().map(|(planned, _)| planned))
        .await
    {
        Ok(candidate) => candidate,
        Err(ApiError::Conflict(message)) => return form_with_error(&process, message),
        Err(err) => return Err(err),
    };
    let ranking = RankingMutator::new(&mut tx)
        .create(candidate.id, process_id)
        .await?;

    if let Some((planned, data)) = &document {
        planned.persist(&settings.upload_dir, data).await?;
    }
    tx.commit().await?;

    tracing::info!(
        candidate_id = candidate.id,
        ranking_id = ranking.id,
        process_id,
        "candidate added to process"
    );

    let mut response = Html(CloseModal.render()?).into_response();
    response.headers_mut().insert(
        HeaderName::from_static("hx-refresh"),
        HeaderValue::from_static("true"),
    );
    Ok(response)
}

fn form_with_error(process: &ProcessEntry, error: String) -> Result<Response> {
    let template = CandidateFormModal {
        process_id: process.id,
        process_title: process.title.clone(),
        error: Some(error),
    };
    Ok(Html(template.render()?).into_response())
}

pub async fn document(
    State(state): State<AppState>,
    Path(candidate_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let mut tx = state.db_pool.begin_txn().await?;
    let candidate = CandidateSelector::new(&mut tx)
        .get_by_id(candidate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("candidate {candidate_id} not found")))?;

    let (path, original_name, mime) = match (
        candidate.document_path,
        candidate.document_name,
        candidate.document_mime,
    ) {
        (Some(path), Some(name), Some(mime)) => (path, name, mime),
        _ => {
            return Err(ApiError::NotFound(format!(
                "candidate {candidate_id} has no document"
            )));
        }
    };

    let data = documents::load(&settings.upload_dir, &path).await?;
    tracing::debug!(candidate_id, file = %path, size = data.len(), "serving candidate document");
    let disposition = format!("attachment; filename=\"{}\"", original_name.replace('"', ""));
    Ok((
        [(CONTENT_TYPE, mime), (CONTENT_DISPOSITION, disposition)],
        data,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, email: &str) -> CandidateFields {
        CandidateFields {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            profile_url: None,
            notes: None,
        }
    }

    #[test]
    fn blank_optionals_collapse_to_none() {
        let mut input = fields("  Ada Lovelace ", " ada@example.com ");
        input.phone = Some("   ".to_string());
        input.notes = Some("".to_string());

        let validated = input.validated().unwrap();
        assert_eq!(validated.name, "Ada Lovelace");
        assert_eq!(validated.email, "ada@example.com");
        assert_eq!(validated.phone, None);
        assert_eq!(validated.notes, None);
    }

    #[test]
    fn name_and_email_are_required() {
        assert!(fields("  ", "ada@example.com").validated().is_err());
        assert!(fields("Ada", "not-an-email").validated().is_err());
    }

    #[test]
    fn phone_must_match_the_loose_international_pattern() {
        let mut input = fields("Ada", "ada@example.com");
        input.phone = Some("+5511999999999".to_string());
        assert!(input.validated().is_ok());

        let mut input = fields("Ada", "ada@example.com");
        input.phone = Some("call me".to_string());
        assert!(input.validated().is_err());

        let mut input = fields("Ada", "ada@example.com");
        input.phone = Some("123".to_string());
        assert!(input.validated().is_err());
    }

    #[test]
    fn profile_url_must_parse() {
        let mut input = fields("Ada", "ada@example.com");
        input.profile_url = Some("https://example.com/in/ada".to_string());
        assert!(input.validated().is_ok());

        let mut input = fields("Ada", "ada@example.com");
        input.profile_url = Some("not a url".to_string());
        assert!(input.validated().is_err());
    }

    #[test]
    fn patch_checks_only_present_fields() {
        let patch = CandidatePatch {
            notes: Some("strong take-home".to_string()),
            ..CandidatePatch::default()
        };
        assert!(patch.validated().is_ok());

        let patch = CandidatePatch {
            name: Some("   ".to_string()),
            ..CandidatePatch::default()
        };
        assert!(patch.validated().is_err());

        let patch = CandidatePatch {
            email: Some("bad".to_string()),
            ..CandidatePatch::default()
        };
        assert!(patch.validated().is_err());
    }
}
