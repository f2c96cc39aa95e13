use std::collections::HashMap;

use askama::Template;

use crate::pkg::internal::adaptors::criteria::spec::CriterionEntry;
use crate::pkg::internal::adaptors::processes::spec::{ProcessEntry, ProcessStatus};
use crate::pkg::internal::adaptors::rankings::spec::{RankingEntry, RankingWithCandidate};
use crate::pkg::internal::adaptors::scores::spec::ScoreEntry;
use crate::pkg::internal::scoring::{ScoreWithWeight, weighted_average};
use crate::pkg::internal::tiers::{Tier, partition_by_tier};

pub fn format_score(value: f64) -> String {
    format!("{value:.2}")
}

/// Card data for one selection process, shown on the list page, the
/// dashboard and the board header.
pub struct ProcessCard {
    pub id: i32,
    pub title: String,
    pub job_title: String,
    pub department: Option<String>,
    pub status_key: &'static str,
    pub status_label: &'static str,
    pub active: bool,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: String,
}

impl ProcessCard {
    pub fn from_entry(entry: &ProcessEntry) -> ProcessCard {
        // The DDL constrains status to the known labels; anything else
        // renders as open instead of failing the page.
        let status = ProcessStatus::parse(&entry.status).unwrap_or_default();
        ProcessCard {
            id: entry.id,
            title: entry.title.clone(),
            job_title: entry.job_title.clone(),
            department: entry.department.clone(),
            status_key: status.as_str(),
            status_label: status.label(),
            active: status.is_active(),
            start_date: entry.start_date.format("%Y-%m-%d").to_string(),
            end_date: entry.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            description: entry.description.clone(),
        }
    }
}

fn status_options() -> Vec<(&'static str, &'static str)> {
    ProcessStatus::ALL
        .iter()
        .map(|s| (s.as_str(), s.label()))
        .collect()
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct ProcessListPage {
    pub processes: Vec<ProcessCard>,
    pub status_filter: String,
    pub statuses: Vec<(&'static str, &'static str)>,
}

impl ProcessListPage {
    pub fn assemble(processes: &[ProcessEntry], status_filter: &str) -> ProcessListPage {
        ProcessListPage {
            processes: processes.iter().map(ProcessCard::from_entry).collect(),
            status_filter: status_filter.to_string(),
            statuses: status_options(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub active_processes: i64,
    pub candidates: i64,
    pub pending_evaluations: i64,
    pub completed_evaluations: i64,
    pub recent: Vec<ProcessCard>,
}

pub struct CriterionView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub weight: String,
    pub display_order: i32,
}

impl CriterionView {
    fn from_entry(entry: &CriterionEntry) -> CriterionView {
        CriterionView {
            id: entry.id,
            name: entry.name.clone(),
            description: entry.description.clone(),
            weight: format_score(entry.weight),
            display_order: entry.display_order,
        }
    }
}

/// One candidate card on the board: score cells aligned with the criteria
/// header, plus the weighted average.
pub struct BoardCard {
    pub ranking_id: i32,
    pub candidate_id: i32,
    pub candidate_name: String,
    pub candidate_email: String,
    pub has_document: bool,
    pub tier_order: i32,
    pub scores: Vec<Option<String>>,
    pub average: Option<String>,
}

impl BoardCard {
    fn assemble(
        ranking: &RankingWithCandidate,
        criteria: &[CriterionEntry],
        scores: &[ScoreWithWeight],
    ) -> BoardCard {
        let by_criterion: HashMap<i32, f64> =
            scores.iter().map(|s| (s.criterion_id, s.score)).collect();
        BoardCard {
            ranking_id: ranking.id,
            candidate_id: ranking.candidate_id,
            candidate_name: ranking.candidate_name.clone(),
            candidate_email: ranking.candidate_email.clone(),
            has_document: ranking.has_document,
            tier_order: ranking.tier_order,
            scores: criteria
                .iter()
                .map(|c| by_criterion.get(&c.id).map(|v| format_score(*v)))
                .collect(),
            average: weighted_average(scores).map(format_score),
        }
    }
}

pub struct TierRow {
    pub key: &'static str,
    pub heading: String,
    pub cards: Vec<BoardCard>,
}

#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardPage {
    pub process: ProcessCard,
    pub criteria: Vec<CriterionView>,
    pub rows: Vec<TierRow>,
    pub has_candidates: bool,
}

impl BoardPage {
    pub fn assemble(
        process: &ProcessEntry,
        criteria: &[CriterionEntry],
        rankings: Vec<RankingWithCandidate>,
        mut scores: HashMap<i32, Vec<ScoreWithWeight>>,
    ) -> BoardPage {
        let tagged: Vec<(Option<Tier>, BoardCard)> = rankings
            .iter()
            .map(|ranking| {
                let ranking_scores = scores.remove(&ranking.id).unwrap_or_default();
                let tier = ranking.tier.as_deref().and_then(Tier::parse);
                (tier, BoardCard::assemble(ranking, criteria, &ranking_scores))
            })
            .collect();

        let board = partition_by_tier(tagged, |(tier, _)| *tier);
        let has_candidates = board.total() > 0;
        let rows = board
            .buckets
            .into_iter()
            .map(|bucket| TierRow {
                key: bucket.tier.map(|t| t.as_str()).unwrap_or("unranked"),
                heading: match bucket.tier {
                    Some(tier) => format!("Tier {} - {}", tier.as_str(), tier.label()),
                    None => "Unranked".to_string(),
                },
                cards: bucket.entries.into_iter().map(|(_, card)| card).collect(),
            })
            .collect();

        BoardPage {
            process: ProcessCard::from_entry(process),
            criteria: criteria.iter().map(CriterionView::from_entry).collect(),
            rows,
            has_candidates,
        }
    }
}

#[derive(Template)]
#[template(path = "partials/candidate_form_modal.html")]
pub struct CandidateFormModal {
    pub process_id: i32,
    pub process_title: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "partials/close_modal.html")]
pub struct CloseModal;

#[derive(Template)]
#[template(path = "partials/criteria_modal.html")]
pub struct CriteriaModal {
    pub process_id: i32,
    pub process_title: String,
    pub criteria: Vec<CriterionView>,
}

impl CriteriaModal {
    pub fn assemble(process: &ProcessEntry, criteria: &[CriterionEntry]) -> CriteriaModal {
        CriteriaModal {
            process_id: process.id,
            process_title: process.title.clone(),
            criteria: criteria.iter().map(CriterionView::from_entry).collect(),
        }
    }
}

/// Criterion create/edit form. `action` is the URL the form posts to;
/// numeric fields stay strings so submitted text can be echoed back.
#[derive(Template)]
#[template(path = "partials/criterion_form.html")]
pub struct CriterionFormModal {
    pub process_id: i32,
    pub process_title: String,
    pub action: String,
    pub heading: &'static str,
    pub name: String,
    pub description: String,
    pub weight: String,
    pub display_order: String,
    pub error: Option<String>,
}

impl CriterionFormModal {
    pub fn blank(process: &ProcessEntry) -> CriterionFormModal {
        CriterionFormModal {
            process_id: process.id,
            process_title: process.title.clone(),
            action: format!("/processes/{}/criteria", process.id),
            heading: "New criterion",
            name: String::new(),
            description: String::new(),
            weight: "1.00".to_string(),
            display_order: "0".to_string(),
            error: None,
        }
    }

    pub fn edit(process: &ProcessEntry, criterion: &CriterionEntry) -> CriterionFormModal {
        CriterionFormModal {
            process_id: process.id,
            process_title: process.title.clone(),
            action: format!("/criteria/{}", criterion.id),
            heading: "Edit criterion",
            name: criterion.name.clone(),
            description: criterion.description.clone().unwrap_or_default(),
            weight: format_score(criterion.weight),
            display_order: criterion.display_order.to_string(),
            error: None,
        }
    }
}

/// One criterion row in the evaluation modal, prefilled with any recorded
/// score and note.
pub struct ScoreFormRow {
    pub criterion_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub weight: String,
    pub score: Option<String>,
    pub note: Option<String>,
}

#[derive(Template)]
#[template(path = "partials/evaluate_modal.html")]
pub struct EvaluateModal {
    pub ranking_id: i32,
    pub candidate_name: String,
    pub tier: Option<String>,
    pub rows: Vec<ScoreFormRow>,
    pub average: Option<String>,
    pub notes: String,
    pub error: Option<String>,
}

impl EvaluateModal {
    pub fn assemble(
        ranking: &RankingEntry,
        candidate_name: &str,
        criteria: &[CriterionEntry],
        scores: &[ScoreEntry],
        weighted: &[ScoreWithWeight],
    ) -> EvaluateModal {
        let by_criterion: HashMap<i32, &ScoreEntry> =
            scores.iter().map(|s| (s.criterion_id, s)).collect();
        let rows = criteria
            .iter()
            .map(|criterion| {
                let recorded = by_criterion.get(&criterion.id);
                ScoreFormRow {
                    criterion_id: criterion.id,
                    name: criterion.name.clone(),
                    description: criterion.description.clone(),
                    weight: format_score(criterion.weight),
                    score: recorded.map(|s| format_score(s.score)),
                    note: recorded.and_then(|s| s.note.clone()),
                }
            })
            .collect();

        EvaluateModal {
            ranking_id: ranking.id,
            candidate_name: candidate_name.to_string(),
            tier: ranking.tier.clone(),
            rows,
            average: weighted_average(weighted).map(format_score),
            notes: ranking.notes.clone().unwrap_or_default(),
            error: None,
        }
    }

    pub fn with_error(mut self, message: String) -> EvaluateModal {
        self.error = Some(message);
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn process(status: &str) -> ProcessEntry {
        ProcessEntry {
            id: 7,
            title: "Backend hiring".to_string(),
            description: "First round for the platform team".to_string(),
            job_title: "Backend engineer".to_string(),
            department: Some("Engineering".to_string()),
            status: status.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn criterion(id: i32, name: &str, weight: f64) -> CriterionEntry {
        CriterionEntry {
            id,
            process_id: 7,
            name: name.to_string(),
            description: None,
            weight,
            display_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ranking(id: i32, tier: Option<&str>, name: &str) -> RankingWithCandidate {
        RankingWithCandidate {
            id,
            candidate_id: id + 100,
            process_id: 7,
            tier: tier.map(str::to_string),
            tier_order: 0,
            notes: None,
            evaluated_at: None,
            candidate_name: name.to_string(),
            candidate_email: format!("{}@example.com", name.to_lowercase()),
            has_document: false,
        }
    }

    #[test]
    fn board_buckets_cards_from_s_down_to_unranked() {
        let criteria = [criterion(1, "Communication", 1.0)];
        let rankings = vec![
            ranking(1, Some("B"), "Bia"),
            ranking(2, None, "Nuno"),
            ranking(3, Some("S"), "Sara"),
        ];
        let page = BoardPage::assemble(&process("open"), &criteria, rankings, HashMap::new());

        assert_eq!(page.rows.len(), 7);
        assert_eq!(page.rows[0].key, "S");
        assert_eq!(page.rows[0].cards[0].candidate_name, "Sara");
        assert_eq!(page.rows[2].key, "B");
        assert_eq!(page.rows[2].cards[0].candidate_name, "Bia");
        assert_eq!(page.rows[6].key, "unranked");
        assert_eq!(page.rows[6].cards[0].candidate_name, "Nuno");
        assert!(page.has_candidates);
    }

    #[test]
    fn board_cells_align_with_the_criteria_header() {
        let criteria = [criterion(1, "Communication", 1.0), criterion(2, "Code", 3.0)];
        let mut scores = HashMap::new();
        scores.insert(
            1,
            vec![ScoreWithWeight {
                criterion_id: 2,
                score: 10.0,
                weight: 3.0,
            }],
        );
        let page = BoardPage::assemble(
            &process("open"),
            &criteria,
            vec![ranking(1, Some("A"), "Ana")],
            scores,
        );

        let card = &page.rows[1].cards[0];
        assert_eq!(card.scores, vec![None, Some("10.00".to_string())]);
        assert_eq!(card.average, Some("10.00".to_string()));
    }

    #[test]
    fn empty_board_reports_no_candidates() {
        let page = BoardPage::assemble(&process("open"), &[], Vec::new(), HashMap::new());
        assert!(!page.has_candidates);
        assert!(page.rows.iter().all(|row| row.cards.is_empty()));
    }

    #[test]
    fn evaluate_modal_prefills_recorded_scores() {
        let entry = RankingEntry {
            id: 5,
            candidate_id: 9,
            process_id: 7,
            tier: Some("A".to_string()),
            tier_order: 1,
            notes: Some("solid".to_string()),
            evaluated_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let criteria = [criterion(1, "Communication", 1.0), criterion(2, "Code", 2.0)];
        let scores = [ScoreEntry {
            id: 1,
            ranking_id: 5,
            criterion_id: 2,
            score: 8.5,
            note: Some("clean".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }];
        let weighted = [ScoreWithWeight {
            criterion_id: 2,
            score: 8.5,
            weight: 2.0,
        }];

        let modal = EvaluateModal::assemble(&entry, "Ana", &criteria, &scores, &weighted);
        assert_eq!(modal.rows.len(), 2);
        assert_eq!(modal.rows[0].score, None);
        assert_eq!(modal.rows[1].score, Some("8.50".to_string()));
        assert_eq!(modal.rows[1].note.as_deref(), Some("clean"));
        assert_eq!(modal.average, Some("8.50".to_string()));
        assert_eq!(modal.notes, "solid");
    }

    #[test]
    fn unknown_status_renders_as_open() {
        let card = ProcessCard::from_entry(&process("archived"));
        assert_eq!(card.status_key, "open");
        assert_eq!(card.status_label, "Open");
    }

    #[test]
    fn pages_and_partials_render() {
        let page = ProcessListPage::assemble(&[process("in_progress")], "in_progress");
        let html = page.render().unwrap();
        assert!(html.contains("Backend hiring"));
        assert!(html.contains("In progress"));

        let board = BoardPage::assemble(
            &process("open"),
            &[criterion(1, "Communication", 1.0)],
            vec![ranking(1, Some("S"), "Sara")],
            HashMap::new(),
        );
        let html = board.render().unwrap();
        assert!(html.contains("Tier S - Exceptional"));
        assert!(html.contains("Sara"));

        let modal = CandidateFormModal {
            process_id: 7,
            process_title: "Backend hiring".to_string(),
            error: Some("a candidate with this email already exists".to_string()),
        };
        let html = modal.render().unwrap();
        assert!(html.contains("already exists"));

        let dashboard = DashboardPage {
            active_processes: 2,
            candidates: 14,
            pending_evaluations: 3,
            completed_evaluations: 11,
            recent: vec![ProcessCard::from_entry(&process("open"))],
        };
        assert!(dashboard.render().unwrap().contains("14"));
    }
}
