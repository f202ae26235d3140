//! Coordinate reference system tags.
//!
//! A pyramid is stamped with exactly one `Crs` at construction. This crate never transforms coordinates between systems; the
//! tag only has to compare equal for mosaics that live in the same frame.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A coordinate reference system, identified by its authority code.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Crs {
    /// WGS84 geographic, degrees.
    Epsg4326,
    /// Web Mercator, meters.
    Epsg3857,
    /// NAD83 geographic, degrees.
    Epsg4269,
    /// Any other authority code, stored upper-cased (e.g. `"EPSG:32631"`).
    Other(String),
}

impl Crs {
    pub const WGS84: Crs = Crs::Epsg4326;

    /// Returns `true` for latitude/longitude systems.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Epsg4326 | Crs::Epsg4269)
    }

    /// The authority code, e.g. `"EPSG:4326"`.
    pub fn code(&self) -> &str {
        match self {
            Crs::Epsg4326 => "EPSG:4326",
            Crs::Epsg3857 => "EPSG:3857",
            Crs::Epsg4269 => "EPSG:4269",
            Crs::Other(code) => code,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Crs {
    type Err = CrsParseError;

    /// Accepts `"AUTHORITY:CODE"` in any case. `"CRS:84"` and `"WGS84"` are read as EPSG:4326.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" | "WGS84" => Ok(Crs::Epsg4326),
            "EPSG:3857" | "EPSG:900913" => Ok(Crs::Epsg3857),
            "EPSG:4269" => Ok(Crs::Epsg4269),
            _ => {
                let (authority, code) = normalized
                    .split_once(':')
                    .ok_or_else(|| CrsParseError::Malformed(s.to_string()))?;
                if authority.is_empty() || code.is_empty() || code.contains(':') {
                    return Err(CrsParseError::Malformed(s.to_string()));
                }
                Ok(Crs::Other(normalized))
            }
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CrsParseError {
    #[error("malformed CRS code: {0:?}, expected AUTHORITY:CODE")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_well_known_codes() {
        assert_eq!("EPSG:4326".parse::<Crs>(), Ok(Crs::Epsg4326));
        assert_eq!("epsg:3857".parse::<Crs>(), Ok(Crs::Epsg3857));
        assert_eq!("CRS:84".parse::<Crs>(), Ok(Crs::WGS84));
    }

    #[test]
    fn parse_other_codes_upper_cased() {
        let crs: Crs = "epsg:32631".parse().unwrap();
        assert_eq!(crs, Crs::Other("EPSG:32631".into()));
        assert_eq!(crs.to_string(), "EPSG:32631");
        assert!(!crs.is_geographic());
    }

    #[test]
    fn reject_malformed_codes() {
        assert!("4326".parse::<Crs>().is_err());
        assert!(":4326".parse::<Crs>().is_err());
        assert!("EPSG:".parse::<Crs>().is_err());
    }
}
