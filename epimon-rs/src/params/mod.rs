//! Parameters of the SIR projection.
//!
//! [`SimulationParameters`] is the typed, already validated parameter set
//! consumed by the simulator. [`SimulationRequest`] is its raw counterpart as
//! received from a caller: every field optional, signed, and only checked when
//! converted with [`SimulationRequest::into_params`].
#[macro_use]
mod macros;
mod constants;
mod request;

pub use constants::*;
pub use request::*;

use crate::prelude::{Day, Real, INF};
use getset::CopyGetters;
use paste::paste;
use serde::{Deserialize, Serialize};

/// Population parameters of a deterministic SIR run.
///
/// No combination of values is rejected here. Rates outside [0, 1] or initial
/// compartments larger than the population are accepted and handled by the
/// clamping rules of the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, CopyGetters)]
#[getset(get_copy = "pub")]
#[serde(default)]
pub struct SimulationParameters {
    /// Total population (N).
    population: u64,
    /// Infected individuals at day 0 (I0).
    initial_infected: u64,
    /// Recovered individuals at day 0 (R0).
    initial_recovered: u64,
    /// Transmission rate.
    beta: Real,
    /// Recovery rate.
    gamma: Real,
    /// Number of simulated days, including day 0.
    days: Day,
}

impl SimulationParameters {
    pub fn new(
        population: u64,
        initial_infected: u64,
        initial_recovered: u64,
        beta: Real,
        gamma: Real,
        days: Day,
    ) -> Self {
        SimulationParameters {
            population,
            initial_infected,
            initial_recovered,
            beta,
            gamma,
            days,
        }
    }

    with_builders! {
        population: u64,
        initial_infected: u64,
        initial_recovered: u64,
        beta: Real,
        gamma: Real,
        days: Day,
    }

    /// Susceptible individuals at day 0: N - I0 - R0, clamped at zero.
    pub fn initial_susceptible(&self) -> Real {
        let s0 = self.population as Real
            - self.initial_infected as Real
            - self.initial_recovered as Real;
        return s0.max(0.0);
    }

    /// True if I0 + R0 is larger than the population.
    pub fn exceeds_population(&self) -> bool {
        self.initial_infected.saturating_add(self.initial_recovered) > self.population
    }

    /// Basic reproduction number beta / gamma. Infinite if gamma is zero.
    pub fn reproduction_number(&self) -> Real {
        if self.gamma == 0.0 {
            return INF;
        }
        self.beta / self.gamma
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters::new(
            DEFAULT_POPULATION,
            DEFAULT_INITIAL_INFECTED,
            DEFAULT_INITIAL_RECOVERED,
            DEFAULT_BETA,
            DEFAULT_GAMMA,
            DEFAULT_DAYS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn defaults() {
        let p = SimulationParameters::default();
        assert_eq!(p.population(), 1000);
        assert_eq!(p.initial_infected(), 1);
        assert_eq!(p.initial_recovered(), 0);
        assert_eq!(p.beta(), 0.2);
        assert_eq!(p.gamma(), 0.1);
        assert_eq!(p.days(), 160);
        assert_eq!(p.initial_susceptible(), 999.0);
        assert_approx_eq!(p.reproduction_number(), 2.0);
    }

    #[test]
    fn initial_susceptible_is_clamped() {
        let p = SimulationParameters::default()
            .with_population(10)
            .with_initial_infected(8)
            .with_initial_recovered(5);
        assert!(p.exceeds_population());
        assert_eq!(p.initial_susceptible(), 0.0);
    }

    #[test]
    fn reproduction_number_without_recovery() {
        let p = SimulationParameters::default().with_gamma(0.0);
        assert!(p.reproduction_number().is_infinite());
    }

    #[test]
    fn toml_roundtrip() {
        let params = SimulationParameters::default().with_beta(0.35).with_days(30);
        let data = toml::to_string(&params).unwrap();
        let params_: SimulationParameters = toml::from_str(&data).unwrap();
        assert_eq!(params, params_);
    }
}
