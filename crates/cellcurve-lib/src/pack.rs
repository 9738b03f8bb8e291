//! Multi-cell pack configuration (`NsMp`).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// Cells wired `series` deep and `parallel` wide.
///
/// Cells in series add their voltages, so pack terminal voltages are divided
/// by `series` to get a per-cell voltage. Cells in parallel add capacity, so
/// per-cell energy is multiplied by `parallel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackConfig {
    pub series: u32,
    pub parallel: u32,
}

impl PackConfig {
    /// Create a configuration; both counts must be at least one.
    pub fn new(series: u32, parallel: u32) -> Result<Self> {
        if series == 0 || parallel == 0 {
            return Err(Error::InvalidPackConfig {
                token: format!("{series}s{parallel}p"),
            });
        }
        Ok(Self { series, parallel })
    }

    /// A single cell (`1s1p`).
    pub fn single_cell() -> Self {
        Self {
            series: 1,
            parallel: 1,
        }
    }

    /// Convert a pack terminal voltage to the voltage of one cell.
    pub fn cell_voltage(&self, pack_voltage: f64) -> f64 {
        pack_voltage / f64::from(self.series)
    }
}

impl Default for PackConfig {
    fn default() -> Self {
        Self::single_cell()
    }
}

impl fmt::Display for PackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s{}p", self.series, self.parallel)
    }
}

impl FromStr for PackConfig {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        parse_pack_config(token)
    }
}

/// Parse a pack configuration token of the exact form `<digits>s<digits>p`.
///
/// Only lowercase `s` and `p` are accepted, nothing may surround the token,
/// and both counts must be at least one.
///
/// # Examples
///
/// ```
/// use cellcurve_lib::parse_pack_config;
///
/// let pack = parse_pack_config("2s3p").unwrap();
/// assert_eq!((pack.series, pack.parallel), (2, 3));
/// assert!(parse_pack_config("bad").is_err());
/// ```
pub fn parse_pack_config(token: &str) -> Result<PackConfig> {
    let invalid = || Error::InvalidPackConfig {
        token: token.to_string(),
    };

    let body = token.strip_suffix('p').ok_or_else(invalid)?;
    let (series, parallel) = body.split_once('s').ok_or_else(invalid)?;
    let series = parse_count(series).ok_or_else(invalid)?;
    let parallel = parse_count(parallel).ok_or_else(invalid)?;

    PackConfig::new(series, parallel).map_err(|_| invalid())
}

fn parse_count(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_series_and_parallel() {
        let pack = parse_pack_config("2s3p").expect("valid token");
        assert_eq!(pack, PackConfig::new(2, 3).unwrap());
        assert_eq!(
            "13s4p".parse::<PackConfig>().unwrap(),
            PackConfig {
                series: 13,
                parallel: 4
            }
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in [
            "bad", "", "2s", "3p", "s3p", "2sp", "2S3P", "2s3pp", " 2s3p", "2s3p ", "+2s3p",
            "2s-3p", "2x3p", "2s3s4p", "1.5s2p",
        ] {
            match parse_pack_config(token) {
                Err(Error::InvalidPackConfig { token: reported }) => assert_eq!(reported, token),
                other => panic!("{token:?} should be rejected, got {:?}", other),
            }
        }
    }

    #[test]
    fn rejects_zero_counts() {
        assert!(parse_pack_config("0s1p").is_err());
        assert!(parse_pack_config("1s0p").is_err());
        assert!(PackConfig::new(0, 2).is_err());
    }

    #[test]
    fn rejects_overflowing_counts() {
        assert!(parse_pack_config("99999999999s1p").is_err());
    }

    #[test]
    fn display_round_trips_token() {
        assert_eq!(PackConfig::new(4, 2).unwrap().to_string(), "4s2p");
    }

    #[test]
    fn cell_voltage_divides_by_series() {
        let pack = PackConfig::new(4, 1).unwrap();
        assert_eq!(pack.cell_voltage(16.8), 4.2);
    }
}
