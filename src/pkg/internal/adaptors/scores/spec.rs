use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pkg::internal::scoring::ScoreWithWeight;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoreEntry {
    pub id: i32,
    pub ranking_id: i32,
    pub criterion_id: i32,
    pub score: f64,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// One weighted score row for any ranking in a process.
#[derive(Debug, Clone, FromRow)]
pub struct ProcessScoreRow {
    pub ranking_id: i32,
    pub criterion_id: i32,
    pub score: f64,
    pub weight: f64,
}

impl ProcessScoreRow {
    /// Groups a process-wide score listing by ranking, keeping the row
    /// order inside each group.
    pub fn group_by_ranking(rows: Vec<ProcessScoreRow>) -> HashMap<i32, Vec<ScoreWithWeight>> {
        let mut grouped: HashMap<i32, Vec<ScoreWithWeight>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.ranking_id)
                .or_default()
                .push(ScoreWithWeight {
                    criterion_id: row.criterion_id,
                    score: row.score,
                    weight: row.weight,
                });
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ranking_id: i32, criterion_id: i32, score: f64, weight: f64) -> ProcessScoreRow {
        ProcessScoreRow {
            ranking_id,
            criterion_id,
            score,
            weight,
        }
    }

    #[test]
    fn grouping_splits_rows_per_ranking() {
        let rows = vec![
            row(1, 10, 8.0, 1.0),
            row(2, 10, 4.0, 1.0),
            row(1, 11, 6.0, 2.0),
        ];
        let grouped = ProcessScoreRow::group_by_ranking(rows);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&1].len(), 2);
        assert_eq!(grouped[&1][0].criterion_id, 10);
        assert_eq!(grouped[&1][1].weight, 2.0);
        assert_eq!(grouped[&2].len(), 1);
    }

    #[test]
    fn grouping_empty_input_yields_no_entries() {
        assert!(ProcessScoreRow::group_by_ranking(Vec::new()).is_empty());
    }
}
