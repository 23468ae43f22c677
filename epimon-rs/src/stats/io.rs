use super::{VisitId, VisitRecord};
use crate::{
    domain::{InstitutionId, SymptomCategory},
    error::Result,
};
use chrono::{DateTime, FixedOffset};
use log::*;
use serde::Deserialize;
use std::{io, path::Path};

/// Separator of symptom categories inside the `symptoms` column.
pub const SYMPTOM_SEPARATOR: char = ';';

#[derive(Debug, Deserialize)]
struct VisitRow {
    id: VisitId,
    visited_at: DateTime<FixedOffset>,
    institution: InstitutionId,
    patient: Option<String>,
    #[serde(default)]
    symptoms: String,
}

impl VisitRow {
    fn into_record(self) -> Result<VisitRecord> {
        let symptoms = parse_symptoms(&self.symptoms)?;
        let mut visit =
            VisitRecord::new(self.id, self.visited_at, self.institution).with_symptoms(symptoms);
        if let Some(code) = self.patient.filter(|c| !c.trim().is_empty()) {
            visit = visit.with_patient(code.trim());
        }
        Ok(visit)
    }
}

/// Parse a `;`-separated list of symptom category labels. Blank entries are
/// skipped.
pub fn parse_symptoms(data: &str) -> Result<Vec<SymptomCategory>> {
    data.split(SYMPTOM_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Read visits from CSV data with an `id,visited_at,institution,patient,symptoms`
/// header. Timestamps use RFC 3339 and keep their offset.
pub fn read_visits<R: io::Read>(reader: R) -> Result<Vec<VisitRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut visits = vec![];
    for row in reader.deserialize::<VisitRow>() {
        visits.push(row?.into_record()?);
    }
    info!(target: "stats", "read {} visits", visits.len());
    return Ok(visits);
}

/// Read visits from a CSV file.
pub fn read_visits_from_path(path: impl AsRef<Path>) -> Result<Vec<VisitRecord>> {
    let file = std::fs::File::open(path)?;
    read_visits(io::BufReader::new(file))
}
