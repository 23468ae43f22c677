use super::AccessScope;
use crate::domain::{InstitutionId, SymptomCategory};
use chrono::{DateTime, FixedOffset, NaiveDate};
use getset::{CopyGetters, Getters};
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a visit.
pub type VisitId = u64;

/// A patient visit as supplied by the persistence layer. Read only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct VisitRecord {
    #[getset(get_copy = "pub")]
    id: VisitId,
    #[getset(get_copy = "pub")]
    visited_at: DateTime<FixedOffset>,
    #[getset(get_copy = "pub")]
    institution: InstitutionId,
    /// Anonymized patient code.
    #[getset(get = "pub")]
    patient: Option<String>,
    /// Category of each reported symptom, in reporting order.
    #[getset(get = "pub")]
    symptoms: Vec<SymptomCategory>,
}

impl VisitRecord {
    pub fn new(id: VisitId, visited_at: DateTime<FixedOffset>, institution: InstitutionId) -> Self {
        VisitRecord {
            id,
            visited_at,
            institution,
            patient: None,
            symptoms: vec![],
        }
    }

    pub fn with_patient(mut self, code: impl Into<String>) -> Self {
        self.patient = Some(code.into());
        self
    }

    pub fn with_symptoms(mut self, symptoms: impl IntoIterator<Item = SymptomCategory>) -> Self {
        self.symptoms = symptoms.into_iter().collect();
        self
    }

    /// Calendar day of the visit in the offset it was stored with.
    pub fn day(&self) -> NaiveDate {
        self.visited_at.date_naive()
    }
}

/// Number of visits in a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: usize,
}

/// Number of reported symptoms of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: SymptomCategory,
    pub count: usize,
}

/// Dashboard statistics. Serializes with the field names of the statistics
/// endpoint: `disease_dynamics` and `disease_distribution`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct AggregationResult {
    /// Visits per day, ascending by day.
    #[serde(rename = "disease_dynamics")]
    daily_counts: Vec<DailyCount>,
    /// Symptom counts per category, descending by count. Ties keep the order
    /// in which categories first appear in the input.
    #[serde(rename = "disease_distribution")]
    category_counts: Vec<CategoryCount>,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.daily_counts.is_empty() && self.category_counts.is_empty()
    }

    /// Render as the JSON body of the statistics endpoint.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Aggregate visits per day and per symptom category.
///
/// `visits` must already be restricted to what `scope` may see; the scope is
/// only recorded here, never enforced. Empty input gives an empty result.
pub fn aggregate<'a, I>(visits: I, scope: &AccessScope) -> AggregationResult
where
    I: IntoIterator<Item = &'a VisitRecord>,
{
    let visits: Vec<&VisitRecord> = visits.into_iter().collect();
    let result = AggregationResult {
        daily_counts: daily_counts(visits.iter().copied()),
        category_counts: category_counts(visits.iter().copied()),
    };
    debug!(
        target: "stats",
        "aggregated {} visits for {}: {} days, {} categories",
        visits.len(),
        scope,
        result.daily_counts.len(),
        result.category_counts.len()
    );
    return result;
}

/// Count visits per calendar day, ascending by day.
pub fn daily_counts<'a>(visits: impl IntoIterator<Item = &'a VisitRecord>) -> Vec<DailyCount> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for visit in visits {
        *days.entry(visit.day()).or_insert(0) += 1;
    }
    days.into_iter()
        .map(|(day, count)| DailyCount { day, count })
        .collect()
}

/// Count symptom categories over all visits. A visit reporting k symptoms
/// contributes k to the counts; a visit without symptoms contributes nothing.
pub fn category_counts<'a>(visits: impl IntoIterator<Item = &'a VisitRecord>) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::with_capacity(SymptomCategory::ALL.len());
    for visit in visits {
        for &category in visit.symptoms() {
            match counts.iter_mut().find(|c| c.category == category) {
                Some(c) => c.count += 1,
                None => counts.push(CategoryCount { category, count: 1 }),
            }
        }
    }
    // Stable sort: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    return counts;
}
