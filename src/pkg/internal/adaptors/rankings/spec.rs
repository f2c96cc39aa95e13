use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankingEntry {
    pub id: i32,
    pub candidate_id: i32,
    pub process_id: i32,
    pub tier: Option<String>,
    pub tier_order: i32,
    pub notes: Option<String>,
    pub evaluated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Ranking joined with the candidate it belongs to, as shown on the board.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankingWithCandidate {
    pub id: i32,
    pub candidate_id: i32,
    pub process_id: i32,
    pub tier: Option<String>,
    pub tier_order: i32,
    pub notes: Option<String>,
    pub evaluated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub candidate_name: String,
    pub candidate_email: String,
    pub has_document: bool,
}
