use super::{category_counts, AccessScope, CategoryCount, VisitRecord, VisitSource};
use crate::domain::InstitutionId;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, fmt::Write};

/// Number of recent visits listed by default.
pub const LATEST_VISITS: usize = 5;

/// Short summary of the epidemiological situation, the data behind the quick
/// report download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct QuickReport {
    #[getset(get_copy = "pub")]
    total_visits: usize,
    /// Distinct patient codes among the visits.
    #[getset(get_copy = "pub")]
    total_patients: usize,
    #[getset(get_copy = "pub")]
    most_common: Option<CategoryCount>,
    /// Most recent visits, newest first.
    #[getset(get = "pub")]
    latest: Vec<VisitRecord>,
}

impl QuickReport {
    /// Summarize visits, listing at most `latest` recent ones.
    pub fn build(visits: &[VisitRecord], latest: usize) -> Self {
        let patients: BTreeSet<&str> = visits.iter().filter_map(|v| v.patient().as_deref()).collect();

        let mut recent: Vec<VisitRecord> = visits.to_vec();
        recent.sort_by(|a, b| b.visited_at().cmp(&a.visited_at()));
        recent.truncate(latest);

        QuickReport {
            total_visits: visits.len(),
            total_patients: patients.len(),
            most_common: category_counts(visits).first().copied(),
            latest: recent,
        }
    }

    /// Summarize what the source exposes for the given scope.
    pub fn from_source<S: VisitSource + ?Sized>(source: &S, scope: &AccessScope, latest: usize) -> Self {
        QuickReport::build(&source.visits(scope), latest)
    }

    /// Render as plain text. Institution names are resolved with the given
    /// lookup and omitted when unknown.
    pub fn render<F>(&self, institution_name: F) -> String
    where
        F: Fn(InstitutionId) -> Option<String>,
    {
        let mut out = String::new();
        self.write_to(&mut out, institution_name).unwrap_or_default();
        return out;
    }

    fn write_to<F>(&self, out: &mut String, institution_name: F) -> fmt::Result
    where
        F: Fn(InstitutionId) -> Option<String>,
    {
        writeln!(out, "Quick report: epidemiological situation")?;
        writeln!(out, "---------------------------------------------")?;
        writeln!(out, "Total visits: {}", self.total_visits)?;
        writeln!(out, "Total patients: {}", self.total_patients)?;
        match self.most_common {
            Some(c) => writeln!(out, "Most common symptom category: {} ({} cases)", c.category, c.count)?,
            None => writeln!(out, "Most common symptom category: No data")?,
        }
        writeln!(out)?;
        writeln!(out, "Latest {} visits:", self.latest.len())?;
        for visit in &self.latest {
            let patient = visit.patient().as_deref().unwrap_or("unknown patient");
            write!(out, "  * {} - patient: {}", visit.day().format("%Y-%m-%d"), patient)?;
            if let Some(name) = institution_name(visit.institution()) {
                write!(out, " - {}", name)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl fmt::Display for QuickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|_| None))
    }
}
