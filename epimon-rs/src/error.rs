use thiserror::Error;

/// Errors raised at the boundaries of the crate.
///
/// The numerical core itself never fails: out-of-range values are clamped and
/// empty inputs produce empty outputs. Errors only appear while turning raw
/// caller input (request payloads, CSV files, labels) into typed values.
#[derive(Debug, Error)]
pub enum Error {
    /// A request field could not be interpreted as the expected value.
    #[error("invalid parameter `{name}`: {reason} (got {value:?})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A label does not name any variant of a closed enumeration.
    #[error("unknown {kind}: {label:?}")]
    UnknownLabel { kind: &'static str, label: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
