use chrono::{DateTime, Utc};

use crate::prelude::{ApiError, Result};

/// Ranking tiers from best to worst. A ranking without a tier is "unranked".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Tier {
    pub const ALL: [Tier; 6] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::D, Tier::F];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::F => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::S => "Exceptional",
            Tier::A => "Excellent",
            Tier::B => "Good",
            Tier::C => "Fair",
            Tier::D => "Below average",
            Tier::F => "Unsuitable",
        }
    }

    pub fn parse(raw: &str) -> Option<Tier> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "S" => Some(Tier::S),
            "A" => Some(Tier::A),
            "B" => Some(Tier::B),
            "C" => Some(Tier::C),
            "D" => Some(Tier::D),
            "F" => Some(Tier::F),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            Tier::S => 0,
            Tier::A => 1,
            Tier::B => 2,
            Tier::C => 3,
            Tier::D => 4,
            Tier::F => 5,
        }
    }
}

/// Interprets a tier value posted from the board. A missing value, a blank
/// string or the literal "unranked" clears the tier; anything else must be
/// one of the six tier letters.
pub fn parse_assignment(raw: Option<&str>) -> Result<Option<Tier>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("unranked") => Ok(None),
        Some(value) => Tier::parse(value).map(Some).ok_or_else(|| {
            ApiError::Validation(format!("unknown tier {value:?}, expected S, A, B, C, D or F"))
        }),
    }
}

/// The evaluation timestamp is a one-way stamp: set the first time a tier
/// is assigned, never cleared or refreshed afterwards.
pub fn stamp_evaluated_at(
    new_tier: Option<Tier>,
    existing: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (new_tier, existing) {
        (Some(_), None) => Some(now),
        (_, existing) => existing,
    }
}

#[derive(Debug)]
pub struct TierBucket<T> {
    pub tier: Option<Tier>,
    pub entries: Vec<T>,
}

/// All seven buckets in display order: S through F, then unranked.
#[derive(Debug)]
pub struct TierBoard<T> {
    pub buckets: Vec<TierBucket<T>>,
}

impl<T> TierBoard<T> {
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }
}

/// Partitions items into the seven tier buckets, preserving the incoming
/// order inside each bucket. Every bucket is present even when empty.
pub fn partition_by_tier<T, F>(items: Vec<T>, tier_of: F) -> TierBoard<T>
where
    F: Fn(&T) -> Option<Tier>,
{
    let mut buckets: Vec<TierBucket<T>> = Tier::ALL
        .iter()
        .map(|tier| TierBucket {
            tier: Some(*tier),
            entries: Vec::new(),
        })
        .chain(std::iter::once(TierBucket {
            tier: None,
            entries: Vec::new(),
        }))
        .collect();

    for item in items {
        let slot = match tier_of(&item) {
            Some(tier) => tier.index(),
            None => Tier::ALL.len(),
        };
        buckets[slot].entries.push(item);
    }

    TierBoard { buckets }
}
