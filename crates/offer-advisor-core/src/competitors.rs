use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compensation::{aggregate, CompensationRecord, PackageAggregate};
use crate::error::OfferAdvisorError;
use crate::types::Money;
use crate::OfferAdvisorResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named competing offer, entered for comparison only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub record: CompensationRecord,
}

/// Competing offers in insertion order. Ids are unique and handed out
/// monotonically; a removed id is never reused.
///
/// Deserializes from either `{"entries": [...], "next_id": n}` or a bare list
/// of competitors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CompetitorSetRepr")]
pub struct CompetitorSet {
    entries: Vec<Competitor>,
    next_id: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CompetitorSetRepr {
    List(Vec<Competitor>),
    Full {
        #[serde(default)]
        entries: Vec<Competitor>,
        #[serde(default)]
        next_id: u32,
    },
}

impl TryFrom<CompetitorSetRepr> for CompetitorSet {
    type Error = OfferAdvisorError;

    fn try_from(repr: CompetitorSetRepr) -> Result<Self, Self::Error> {
        match repr {
            CompetitorSetRepr::List(entries) => Self::from_competitors(entries),
            CompetitorSetRepr::Full { entries, next_id } => {
                let mut set = Self::from_competitors(entries)?;
                set.next_id = set.next_id.max(next_id);
                Ok(set)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorAggregate {
    pub id: u32,
    pub name: String,
    pub aggregate: PackageAggregate,
}

/// Strongest competing package and every competitor's totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorBenchmark {
    pub max_package: Money,
    pub max_competitor_id: Option<u32>,
    pub max_competitor_name: Option<String>,
    pub per_competitor: Vec<CompetitorAggregate>,
}

// ---------------------------------------------------------------------------
// Competitor set
// ---------------------------------------------------------------------------

impl CompetitorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from existing competitors, keeping their ids. The next
    /// id continues after the largest one seen.
    pub fn from_competitors(entries: Vec<Competitor>) -> OfferAdvisorResult<Self> {
        for (i, c) in entries.iter().enumerate() {
            if entries[..i].iter().any(|prev| prev.id == c.id) {
                return Err(OfferAdvisorError::InvalidInput {
                    field: "competitors".into(),
                    reason: format!("Duplicate competitor id {}", c.id),
                });
            }
        }
        let mut next_id = 0;
        for c in &entries {
            next_id = next_id.max(following_id(c.id)?);
        }
        Ok(Self { entries, next_id })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Competitor> {
        self.entries.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Competitor> {
        self.entries.iter().find(|c| c.id == id)
    }

    /// Copy of the set with a new competitor appended, plus its id.
    ///
    /// Fails once the id space is used up, since ids are never reused.
    pub fn with_added(
        &self,
        name: &str,
        record: CompensationRecord,
    ) -> OfferAdvisorResult<(Self, u32)> {
        let mut next = self.clone();
        let id = next.next_id;
        next.next_id = following_id(id)?;
        next.entries.push(Competitor {
            id,
            name: name.to_string(),
            record,
        });
        Ok((next, id))
    }

    pub fn with_removed(&self, id: u32) -> OfferAdvisorResult<Self> {
        let position = self.position(id)?;
        let mut next = self.clone();
        next.entries.remove(position);
        Ok(next)
    }

    pub fn with_renamed(&self, id: u32, name: &str) -> OfferAdvisorResult<Self> {
        let position = self.position(id)?;
        let mut next = self.clone();
        next.entries[position].name = name.to_string();
        Ok(next)
    }

    /// Copy of the set with one competitor's record transformed.
    pub fn with_record<F>(&self, id: u32, update: F) -> OfferAdvisorResult<Self>
    where
        F: FnOnce(&CompensationRecord) -> CompensationRecord,
    {
        let position = self.position(id)?;
        let mut next = self.clone();
        next.entries[position].record = update(&self.entries[position].record);
        Ok(next)
    }

    fn position(&self, id: u32) -> OfferAdvisorResult<usize> {
        self.entries
            .iter()
            .position(|c| c.id == id)
            .ok_or(OfferAdvisorError::CompetitorNotFound { id })
    }
}

fn following_id(id: u32) -> OfferAdvisorResult<u32> {
    id.checked_add(1).ok_or_else(|| OfferAdvisorError::InvalidInput {
        field: "competitors".into(),
        reason: format!("Competitor id {id} leaves no id for the next competitor"),
    })
}

// ---------------------------------------------------------------------------
// Benchmark
// ---------------------------------------------------------------------------

/// Aggregate every competitor and find the largest total package.
///
/// The first competitor reaching the maximum wins ties. An empty set, or one
/// where no package is positive, yields `max_package = 0` and no owner.
pub fn benchmark(competitors: &CompetitorSet) -> CompetitorBenchmark {
    let mut max_package = Decimal::ZERO;
    let mut max_owner: Option<&Competitor> = None;
    let mut per_competitor = Vec::with_capacity(competitors.len());

    for competitor in competitors.iter() {
        let agg = aggregate(&competitor.record);
        if agg.total_package > max_package {
            max_package = agg.total_package;
            max_owner = Some(competitor);
        }
        per_competitor.push(CompetitorAggregate {
            id: competitor.id,
            name: competitor.name.clone(),
            aggregate: agg,
        });
    }

    debug!(
        competitors = competitors.len(),
        max_package = %max_package,
        max_competitor_id = ?max_owner.map(|c| c.id),
        "competitor benchmark"
    );

    CompetitorBenchmark {
        max_package,
        max_competitor_id: max_owner.map(|c| c.id),
        max_competitor_name: max_owner.map(|c| c.name.clone()),
        per_competitor,
    }
}
