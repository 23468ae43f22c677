use crate::{
    error::Result,
    models::{Compartment, TrajectoryPoint},
    params::SimulationParameters,
    prelude::{Day, Real},
};
use getset::CopyGetters;
use serde::{Deserialize, Serialize};
use std::{io, slice};

/// Ordered table of daily compartment sizes produced by a simulation.
///
/// Rows are days and columns are the S, I, R compartments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty table with room for n days.
    pub fn with_capacity(n: usize) -> Self {
        Trajectory {
            points: Vec::with_capacity(n),
        }
    }

    /// Append a new row.
    pub fn push(&mut self, point: TrajectoryPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn iter(&self) -> slice::Iter<'_, TrajectoryPoint> {
        self.points.iter()
    }

    /// Return the row for the given day.
    pub fn row(&self, day: Day) -> Option<TrajectoryPoint> {
        self.points.get(day).copied()
    }

    /// Return the values of a single compartment for all days.
    pub fn col(&self, compartment: Compartment) -> Vec<Real> {
        self.points.iter().map(|p| p.get(compartment)).collect()
    }

    /// Return the last row, if any.
    pub fn tip(&self) -> Option<TrajectoryPoint> {
        self.points.last().copied()
    }

    /// Write table as CSV with a `day,S,I,R` header.
    pub fn write_csv<W: io::Write>(&self, writer: W, sep: u8) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().delimiter(sep).from_writer(writer);
        let mut head = vec!["day"];
        head.extend(Compartment::ALL.iter().map(|c| c.symbol()));
        wtr.write_record(&head)?;

        for p in &self.points {
            wtr.write_record(&[
                p.day().to_string(),
                p.susceptible().to_string(),
                p.infected().to_string(),
                p.recovered().to_string(),
            ])?;
        }
        wtr.flush()?;
        return Ok(());
    }

    /// Render table as a CSV string.
    pub fn render_csv(&self, sep: u8) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf, sep)?;
        return Ok(String::from_utf8_lossy(&buf).into_owned());
    }

    /// Compute headline numbers of the epidemic. Return None for an empty
    /// trajectory.
    pub fn summary(&self, params: &SimulationParameters) -> Option<TrajectorySummary> {
        let first = self.points.first()?;
        let last = self.tip()?;
        let peak = self
            .points
            .iter()
            .fold(first, |best, p| if p.infected() > best.infected() { p } else { best });

        let n = params.population() as Real;
        let attack_rate = if n > 0.0 {
            (first.susceptible() - last.susceptible()) / n
        } else {
            0.0
        };

        Some(TrajectorySummary {
            peak_day: peak.day(),
            peak_infected: peak.infected(),
            final_susceptible: last.susceptible(),
            final_recovered: last.recovered(),
            attack_rate,
            reproduction_number: params.reproduction_number(),
        })
    }
}

impl FromIterator<TrajectoryPoint> for Trajectory {
    fn from_iter<I: IntoIterator<Item = TrajectoryPoint>>(iter: I) -> Self {
        Trajectory {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryPoint;
    type IntoIter = slice::Iter<'a, TrajectoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Headline numbers extracted from a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct TrajectorySummary {
    /// First day with the largest infected count.
    peak_day: Day,
    peak_infected: Real,
    final_susceptible: Real,
    final_recovered: Real,
    /// Fraction of the population that left the susceptible compartment.
    attack_rate: Real,
    reproduction_number: Real,
}

/// Simulation result as exposed to callers: parallel arrays aligned by day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub days: Vec<Day>,
    pub susceptible: Vec<Real>,
    pub infected: Vec<Real>,
    pub recovered: Vec<Real>,
}

impl From<&Trajectory> for SimulationResponse {
    fn from(curve: &Trajectory) -> Self {
        SimulationResponse {
            days: curve.iter().map(|p| p.day()).collect(),
            susceptible: curve.col(Compartment::Susceptible),
            infected: curve.col(Compartment::Infected),
            recovered: curve.col(Compartment::Recovered),
        }
    }
}

impl From<Trajectory> for SimulationResponse {
    fn from(curve: Trajectory) -> Self {
        SimulationResponse::from(&curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::simulate;
    use assert_approx_eq::assert_approx_eq;

    fn small_curve() -> Trajectory {
        vec![
            TrajectoryPoint::new(0, 9.0, 1.0, 0.0),
            TrajectoryPoint::new(1, 8.0, 1.5, 0.5),
            TrajectoryPoint::new(2, 7.5, 1.25, 1.25),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn rows_and_columns() {
        let curve = small_curve();
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.row(1).unwrap().infected(), 1.5);
        assert_eq!(curve.row(3), None);
        assert_eq!(curve.col(Compartment::Recovered), vec![0.0, 0.5, 1.25]);
        assert_eq!(curve.tip().unwrap().day(), 2);
        assert_eq!(Trajectory::new().tip(), None);
    }

    #[test]
    fn render_csv_includes_every_day() {
        let data = small_curve().render_csv(b',').unwrap();
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(lines[0], "day,S,I,R");
        assert_eq!(lines[1], "0,9,1,0");
        assert_eq!(lines[3], "2,7.5,1.25,1.25");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn summary_of_small_curve() {
        let params = SimulationParameters::new(10, 1, 0, 0.2, 0.1, 3);
        let summary = small_curve().summary(&params).unwrap();
        assert_eq!(summary.peak_day(), 1);
        assert_eq!(summary.peak_infected(), 1.5);
        assert_eq!(summary.final_recovered(), 1.25);
        assert_approx_eq!(summary.attack_rate(), 0.15);
        assert_approx_eq!(summary.reproduction_number(), 2.0);
        assert_eq!(Trajectory::new().summary(&params), None);
    }

    #[test]
    fn summary_of_default_projection() {
        let params = SimulationParameters::default();
        let summary = simulate(&params).summary(&params).unwrap();
        assert!(summary.peak_day() > 30 && summary.peak_day() < 120);
        assert!(summary.peak_infected() > 100.0);
        assert!(summary.attack_rate() > 0.5 && summary.attack_rate() < 1.0);
    }

    #[test]
    fn response_arrays_are_aligned() {
        let params = SimulationParameters::default().with_days(12);
        let response = SimulationResponse::from(simulate(&params));
        assert_eq!(response.days, (0..12).collect::<Vec<_>>());
        assert_eq!(response.susceptible.len(), 12);
        assert_eq!(response.infected.len(), 12);
        assert_eq!(response.recovered.len(), 12);
        assert_eq!(response.susceptible[0], 999.0);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("days").is_some());
        assert!(json.get("susceptible").is_some());
        assert!(json.get("infected").is_some());
        assert!(json.get("recovered").is_some());
    }
}
