use super::SimulationParameters;
use crate::error::{Error, Result};
use crate::prelude::{Day, Real};
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw simulation request as received from a caller.
///
/// Missing fields take the default values of the projection (N=1000, I0=1,
/// R0=0, beta=0.2, gamma=0.1, 160 days). Integer fields are signed so that a
/// negative count reaches validation and is reported as an invalid parameter
/// instead of a generic decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRequest {
    pub population: i64,
    pub initial_infected: i64,
    pub initial_recovered: i64,
    pub beta: Real,
    pub gamma: Real,
    pub days: i64,
}

impl SimulationRequest {
    /// Field names recognized by [`SimulationRequest::from_pairs`].
    pub const KEYS: [&'static str; 6] = [
        "population",
        "initial_infected",
        "initial_recovered",
        "beta",
        "gamma",
        "days",
    ];

    /// Build request from string key/value pairs, as in a form-encoded body or
    /// a query string. Unknown keys are ignored and later pairs override
    /// earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut req = SimulationRequest::default();
        req.apply_pairs(pairs)?;
        return Ok(req);
    }

    /// Override fields from string key/value pairs. Fields are updated in
    /// order, so on error the pairs before the faulty one are already applied.
    pub fn apply_pairs<I, K, V>(&mut self, pairs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "population" => self.population = parse_int("population", value)?,
                "initial_infected" => self.initial_infected = parse_int("initial_infected", value)?,
                "initial_recovered" => {
                    self.initial_recovered = parse_int("initial_recovered", value)?
                }
                "beta" => self.beta = parse_real("beta", value)?,
                "gamma" => self.gamma = parse_real("gamma", value)?,
                "days" => self.days = parse_int("days", value)?,
                other => debug!(target: "request", "ignoring unknown parameter {:?}", other),
            }
        }
        return Ok(self);
    }

    /// Decode request from a JSON object. Absent fields take default values.
    ///
    /// Fields may hold JSON numbers or numeric strings (`"500"`); both go
    /// through the same parsing as [`SimulationRequest::from_pairs`], so a
    /// value that is not a number is an invalid parameter. Only a payload that
    /// is not JSON at all is reported as a decoding error.
    pub fn from_json(data: &str) -> Result<Self> {
        let payload: Value = serde_json::from_str(data)?;
        let fields = payload
            .as_object()
            .ok_or_else(|| Error::invalid("request", &payload, "expected a JSON object"))?;

        let mut req = SimulationRequest::default();
        for (key, value) in fields {
            let Some(name) = Self::KEYS.iter().copied().find(|k| *k == key.as_str()) else {
                debug!(target: "request", "ignoring unknown parameter {:?}", key);
                continue;
            };
            let text = match value {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                other => return Err(Error::invalid(name, other, "expected a number")),
            };
            req.apply_pairs([(name, text)])?;
        }
        return Ok(req);
    }

    /// Split a `key=value` override, as given on a command line. The key must
    /// be one of [`SimulationRequest::KEYS`]; the value is only trimmed here and
    /// parsed later by [`SimulationRequest::apply_pairs`].
    pub fn parse_pair(s: &str) -> Result<(String, String)> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| Error::invalid("param", s, "expected key=value"))?;
        let key = key.trim();
        if !Self::KEYS.contains(&key) {
            return Err(Error::UnknownLabel {
                kind: "parameter",
                label: key.to_string(),
            });
        }
        Ok((key.to_string(), value.trim().to_string()))
    }

    /// Validate request and convert it to simulation parameters.
    ///
    /// Counts must be non-negative, at least one day must be simulated and
    /// rates must be finite. Initial compartments exceeding the population are
    /// accepted: the surplus is absorbed by clamping the susceptible count.
    pub fn into_params(self) -> Result<SimulationParameters> {
        let population = non_negative("population", self.population)?;
        let initial_infected = non_negative("initial_infected", self.initial_infected)?;
        let initial_recovered = non_negative("initial_recovered", self.initial_recovered)?;
        let beta = finite("beta", self.beta)?;
        let gamma = finite("gamma", self.gamma)?;
        if self.days < 1 {
            return Err(Error::invalid("days", self.days, "at least one day must be simulated"));
        }
        let days = Day::try_from(self.days)
            .map_err(|_| Error::invalid("days", self.days, "too many days"))?;

        let params = SimulationParameters::new(
            population,
            initial_infected,
            initial_recovered,
            beta,
            gamma,
            days,
        );
        if params.exceeds_population() {
            warn!(
                "initial infected ({}) and recovered ({}) exceed population ({}): no susceptibles",
                initial_infected, initial_recovered, population
            );
        }
        return Ok(params);
    }
}

impl Default for SimulationRequest {
    fn default() -> Self {
        SimulationRequest::from(SimulationParameters::default())
    }
}

impl From<SimulationParameters> for SimulationRequest {
    fn from(p: SimulationParameters) -> Self {
        SimulationRequest {
            population: clamp_i64(p.population()),
            initial_infected: clamp_i64(p.initial_infected()),
            initial_recovered: clamp_i64(p.initial_recovered()),
            beta: p.beta(),
            gamma: p.gamma(),
            days: clamp_i64(p.days() as u64),
        }
    }
}

impl TryFrom<SimulationRequest> for SimulationParameters {
    type Error = Error;

    fn try_from(req: SimulationRequest) -> Result<Self> {
        req.into_params()
    }
}

fn parse_int(name: &'static str, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|e| Error::invalid(name, value, format!("expected an integer ({})", e)))
}

fn parse_real(name: &'static str, value: &str) -> Result<Real> {
    value
        .parse::<Real>()
        .map_err(|e| Error::invalid(name, value, format!("expected a number ({})", e)))
}

fn non_negative(name: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::invalid(name, value, "must not be negative"))
}

fn finite(name: &'static str, value: Real) -> Result<Real> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid(name, value, "must be a finite number"))
    }
}

#[inline]
fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
