//! Closed vocabularies shared by visits, institutions and users.
//!
//! Every enumeration is declared through `labeled_enum!`, which generates a
//! display label, case-insensitive parsing, a list of all variants and one
//! `is_*` predicate per variant.
use crate::error::{Error, Result};
use getset::{CopyGetters, Getters};
use paste::paste;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifier of a clinic or laboratory.
pub type InstitutionId = u64;

/// Declare a closed enumeration whose variants are addressed by a human label.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )*
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// Human readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }

            paste! {
                $(
                    pub fn [<is_ $variant:snake>](&self) -> bool {
                        matches!(self, Self::$variant)
                    }
                )*
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let key = s.trim();
                Self::ALL
                    .iter()
                    .find(|v| v.label().eq_ignore_ascii_case(key))
                    .copied()
                    .ok_or_else(|| Error::UnknownLabel {
                        kind: $kind,
                        label: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labeled_enum! {
    /// Category of a reported symptom. Statistics are grouped by category,
    /// never by individual symptom.
    SymptomCategory("symptom category") {
        Flu => "Flu",
        Chickenpox => "Chickenpox",
        MentalDifficulties => "Mental difficulties",
    }
}

labeled_enum! {
    InstitutionType("institution type") {
        Clinic => "Clinic",
        Laboratory => "Laboratory",
    }
}

labeled_enum! {
    /// Role of a user account. Admins and analysts see data from every
    /// institution, clinicians only from their own.
    Role("role") {
        Admin => "Admin",
        /// Doctor or lab technician attached to an institution.
        Clinician => "Clinician",
        Analyst => "Analyst",
    }
}

impl Role {
    /// True for roles allowed to see visits from every institution.
    pub fn sees_all_institutions(&self) -> bool {
        self.is_admin() || self.is_analyst()
    }
}

/// A clinic or laboratory that reports visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct Institution {
    #[getset(get_copy = "pub")]
    id: InstitutionId,
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    address: Option<String>,
    #[getset(get_copy = "pub")]
    kind: InstitutionType,
}

impl Institution {
    pub fn new(id: InstitutionId, name: impl Into<String>, kind: InstitutionType) -> Self {
        Institution {
            id,
            name: name.into(),
            address: None,
            kind,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}
