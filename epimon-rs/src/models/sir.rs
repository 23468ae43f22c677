use crate::{
    params::SimulationParameters,
    prelude::{Day, Real},
    trackers::Trajectory,
};
use getset::CopyGetters;
use log::*;
use serde::{Deserialize, Serialize};
use std::iter;

/// Compartments of the SIR model.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Compartment {
    Susceptible,
    Infected,
    Recovered,
}

impl Compartment {
    pub const CARDINALITY: usize = 3;
    pub const CSV_HEADER: &'static str = "S,I,R";
    pub const ALL: [Compartment; 3] = [
        Compartment::Susceptible,
        Compartment::Infected,
        Compartment::Recovered,
    ];

    /// Position of compartment in S, I, R order.
    pub fn index(&self) -> usize {
        match self {
            Self::Susceptible => 0,
            Self::Infected => 1,
            Self::Recovered => 2,
        }
    }

    /// Single letter used in tables and plots.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Susceptible => "S",
            Self::Infected => "I",
            Self::Recovered => "R",
        }
    }
}

/// Compartment sizes at a given day. Sizes are real numbers since the model is
/// deterministic and works with expected values, and never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct TrajectoryPoint {
    day: Day,
    susceptible: Real,
    infected: Real,
    recovered: Real,
}

impl TrajectoryPoint {
    /// Create new point. Each compartment is clamped to zero independently.
    pub fn new(day: Day, susceptible: Real, infected: Real, recovered: Real) -> Self {
        TrajectoryPoint {
            day,
            susceptible: clamp(susceptible),
            infected: clamp(infected),
            recovered: clamp(recovered),
        }
    }

    /// State at day 0: (N - I0 - R0, I0, R0) with the susceptible count
    /// clamped at zero.
    pub fn initial(params: &SimulationParameters) -> Self {
        TrajectoryPoint::new(
            0,
            params.initial_susceptible(),
            params.initial_infected() as Real,
            params.initial_recovered() as Real,
        )
    }

    /// Size of the given compartment.
    pub fn get(&self, compartment: Compartment) -> Real {
        match compartment {
            Compartment::Susceptible => self.susceptible,
            Compartment::Infected => self.infected,
            Compartment::Recovered => self.recovered,
        }
    }

    /// Compartment sizes in S, I, R order.
    pub fn as_array(&self) -> [Real; Compartment::CARDINALITY] {
        [self.susceptible, self.infected, self.recovered]
    }

    /// S + I + R. Equals the population as long as no compartment was
    /// clamped.
    pub fn total(&self) -> Real {
        self.susceptible + self.infected + self.recovered
    }

    /// Advance one day with a forward Euler step.
    ///
    /// New infections are beta * S * I / N (zero for an empty population) and
    /// new recoveries are gamma * I. Every compartment is then clamped at zero
    /// on its own, so S + I + R is not preserved when clamping kicks in.
    pub fn step(&self, params: &SimulationParameters) -> Self {
        let new_infections = if params.population() > 0 {
            params.beta() * self.susceptible * self.infected / params.population() as Real
        } else {
            0.0
        };
        let new_recoveries = params.gamma() * self.infected;

        TrajectoryPoint::new(
            self.day + 1,
            self.susceptible - new_infections,
            self.infected + new_infections - new_recoveries,
            self.recovered + new_recoveries,
        )
    }
}

/// Run the deterministic SIR projection.
///
/// Returns exactly `params.days()` points for days 0, 1, ..., days - 1. The
/// computation is pure: identical parameters always give identical output.
pub fn simulate(params: &SimulationParameters) -> Trajectory {
    debug!(
        target: "sir",
        "simulate: N={}, I0={}, R0={}, beta={}, gamma={}, days={}",
        params.population(),
        params.initial_infected(),
        params.initial_recovered(),
        params.beta(),
        params.gamma(),
        params.days()
    );
    let initial = TrajectoryPoint::initial(params);
    iter::successors(Some(initial), |point| Some(point.step(params)))
        .take(params.days())
        .collect()
}

/// Clamp at zero. NaN is also mapped to zero.
#[inline(always)]
fn clamp(x: Real) -> Real {
    x.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    #[test]
    fn default_projection_starts_at_initial_state() {
        let curve = simulate(&SimulationParameters::default());
        assert_eq!(curve.len(), 160);

        let first = curve.row(0).unwrap();
        assert_eq!(first.as_array(), [999.0, 1.0, 0.0]);

        let second = curve.row(1).unwrap();
        assert_eq!(second.day(), 1);
        assert_approx_eq!(second.susceptible(), 998.8002, 1e-9);
        assert_approx_eq!(second.infected(), 1.0998, 1e-9);
        assert_approx_eq!(second.recovered(), 0.1, 1e-9);
    }

    #[test]
    fn default_projection_rises_then_falls() {
        let infected = simulate(&SimulationParameters::default()).col(Compartment::Infected);
        let peak = infected
            .iter()
            .enumerate()
            .fold(0, |best, (i, &x)| if x > infected[best] { i } else { best });

        assert!(peak > 0 && peak < infected.len() - 1, "peak at {}", peak);
        for t in 0..peak {
            assert!(infected[t] < infected[t + 1], "not rising at day {}", t);
        }
        for t in peak..infected.len() - 1 {
            assert!(infected[t] >= infected[t + 1], "not falling at day {}", t);
        }
    }

    #[test]
    fn population_is_conserved_without_clamping() {
        for point in simulate(&SimulationParameters::default()).iter() {
            assert_approx_eq!(point.total(), 1000.0, 1e-6);
        }
    }

    #[test]
    fn empty_population_never_infects() {
        let params = SimulationParameters::new(0, 0, 0, 0.7, 0.1, 5);
        let curve = simulate(&params);
        assert_eq!(curve.len(), 5);
        for point in curve.iter() {
            assert_eq!(point.susceptible(), 0.0);
            assert_eq!(point.infected(), 0.0);
            assert_eq!(point.recovered(), 0.0);
        }
    }

    #[test]
    fn empty_population_only_recovers() {
        let params = SimulationParameters::new(0, 10, 0, 0.9, 0.5, 3);
        let curve = simulate(&params);
        assert_eq!(curve.col(Compartment::Susceptible), vec![0.0, 0.0, 0.0]);
        assert_eq!(curve.col(Compartment::Infected), vec![10.0, 5.0, 2.5]);
        assert_eq!(curve.col(Compartment::Recovered), vec![0.0, 5.0, 7.5]);
    }

    #[test]
    fn single_day_is_initial_state() {
        let params = SimulationParameters::default().with_days(1);
        let curve = simulate(&params);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.tip(), Some(TrajectoryPoint::initial(&params)));

        let params = SimulationParameters::new(10, 8, 5, 0.2, 0.1, 1);
        let point = simulate(&params).tip().unwrap();
        assert_eq!(point.as_array(), [0.0, 8.0, 5.0]);
    }

    #[test]
    fn zero_days_is_empty() {
        let params = SimulationParameters::default().with_days(0);
        assert!(simulate(&params).is_empty());
    }

    #[test]
    fn clamping_does_not_preserve_population() {
        // 10 * 5 * 5 / 10 = 25 new infections out of only 5 susceptibles.
        let params = SimulationParameters::new(10, 5, 0, 10.0, 0.1, 2);
        let point = simulate(&params).tip().unwrap();
        assert_eq!(point.susceptible(), 0.0);
        assert_approx_eq!(point.infected(), 29.5);
        assert_approx_eq!(point.recovered(), 0.5);
        assert!(point.total() > 10.0);
    }

    #[test]
    fn fast_recovery_clamps_infected() {
        let params = SimulationParameters::new(100, 10, 0, 0.0, 1.5, 2);
        let point = simulate(&params).tip().unwrap();
        assert_eq!(point.infected(), 0.0);
        assert_approx_eq!(point.recovered(), 15.0);
    }

    #[test]
    fn random_parameters_keep_length_and_signs() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let params = SimulationParameters::new(
                rng.gen_range(0..5_000),
                rng.gen_range(0..200),
                rng.gen_range(0..200),
                rng.gen_range(0.0..3.0),
                rng.gen_range(0.0..2.0),
                rng.gen_range(1..120),
            );
            let curve = simulate(&params);
            assert_eq!(curve.len(), params.days());
            for (day, point) in curve.iter().enumerate() {
                assert_eq!(point.day(), day);
                assert!(point.as_array().iter().all(|&x| x >= 0.0), "{:?}", point);
            }
        }
    }

    #[test]
    fn simulation_is_deterministic() {
        let params = SimulationParameters::default().with_beta(0.45).with_gamma(0.05);
        assert_eq!(simulate(&params), simulate(&params));
    }
}
