//! Supported site locales and the URL conventions built on top of them.
//!
//! Every public page lives under a locale prefix (`/es/...`, `/en/...`). The
//! helpers here read that prefix from a path and map the coarse country signal
//! supplied by the edge network onto a locale.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// ISO-3166 codes whose visitors are served Spanish by default.
pub const SPANISH_SPEAKING_COUNTRIES: [&str; 21] = [
    "ES", "MX", "AR", "CO", "PE", "VE", "CL", "EC", "GT", "CU", "BO", "DO", "HN", "PY", "SV", "NI",
    "CR", "PA", "UY", "PR", "GQ",
];

/// Sentinel reported by the edge network when the country is unknown.
pub const UNKNOWN_COUNTRY: &str = "XX";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Es, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Locale::Es => "Español",
            Locale::En => "English",
        }
    }

    /// BCP-47 tag used for date and number formatting on the client.
    pub fn bcp47(self) -> &'static str {
        match self {
            Locale::Es => "es-ES",
            Locale::En => "en-US",
        }
    }

    /// Exact match on the two-letter code; prefixes and cookies are lowercase.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.code() == code)
    }

    /// Map a two-letter country code onto a locale. Unknown or absent codes
    /// fall back to English.
    pub fn from_country(country: Option<&str>) -> Self {
        let country = country
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNKNOWN_COUNTRY);

        if SPANISH_SPEAKING_COUNTRIES
            .iter()
            .any(|code| code.eq_ignore_ascii_case(country))
        {
            Locale::Es
        } else {
            Locale::En
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_code(value).ok_or_else(|| DomainError::unsupported_locale(value))
    }
}

/// Locale named by the first path segment, if it is a supported code.
pub fn locale_prefix(path: &str) -> Option<Locale> {
    let first = path.trim_start_matches('/').split('/').next()?;
    Locale::from_code(first)
}
