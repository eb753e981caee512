//! Engine configuration
//!
//! Read from environment variables with local-development defaults:
//!
//! | variable        | default        |
//! |-----------------|----------------|
//! | `DATA_DIR`      | `data`         |
//! | `REGIONS_FILE`  | `regions.csv`  |
//! | `CROPS_FILE`    | `crops.csv`    |
//! | `BASELINE_FILE` | `baseline.csv` |
//! | `YEAR_POLICY`   | `clamp`        |
//! | `YEAR_MIN`      | `2025`         |
//! | `YEAR_MAX`      | `2035`         |

use crate::scenario::YearPolicy;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// First year of the supported range; also the savings reference year
pub const REFERENCE_YEAR: i32 = 2025;
pub const LAST_SUPPORTED_YEAR: i32 = 2035;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub regions_file: String,
    pub crops_file: String,
    pub baseline_file: String,
    pub year_policy: YearPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            data_dir: PathBuf::from("data"),
            regions_file: "regions.csv".to_string(),
            crops_file: "crops.csv".to_string(),
            baseline_file: "baseline.csv".to_string(),
            year_policy: YearPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from any key lookup (tests pass a map here)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let year = |key: &str, default: i32| -> Result<i32> {
            match lookup(key) {
                Some(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be an integer year, got '{}'", key, v)),
                None => Ok(default),
            }
        };

        let year_policy = match lookup("YEAR_POLICY").as_deref().map(str::trim) {
            None | Some("clamp") => {
                let min = year("YEAR_MIN", REFERENCE_YEAR)?;
                let max = year("YEAR_MAX", LAST_SUPPORTED_YEAR)?;
                if min > max {
                    bail!("YEAR_MIN ({}) is after YEAR_MAX ({})", min, max);
                }
                YearPolicy::Clamp { min, max }
            }
            Some("extrapolate") => YearPolicy::Extrapolate,
            Some(other) => bail!("YEAR_POLICY must be 'clamp' or 'extrapolate', got '{}'", other),
        };

        Ok(EngineConfig {
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            regions_file: lookup("REGIONS_FILE").unwrap_or(defaults.regions_file),
            crops_file: lookup("CROPS_FILE").unwrap_or(defaults.crops_file),
            baseline_file: lookup("BASELINE_FILE").unwrap_or(defaults.baseline_file),
            year_policy,
        })
    }

    /// Defaults rooted at another data directory
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        EngineConfig {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn regions_path(&self) -> PathBuf {
        self.data_dir.join(&self.regions_file)
    }

    pub fn crops_path(&self) -> PathBuf {
        self.data_dir.join(&self.crops_file)
    }

    pub fn baseline_path(&self) -> PathBuf {
        self.data_dir.join(&self.baseline_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<EngineConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.regions_path(), PathBuf::from("data/regions.csv"));
        assert_eq!(config.year_policy, YearPolicy::Clamp { min: 2025, max: 2035 });
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATA_DIR", "/opt/fruit"),
            ("CROPS_FILE", "crops_2024.csv"),
            ("YEAR_POLICY", "extrapolate"),
        ])
        .unwrap();

        assert_eq!(config.crops_path(), PathBuf::from("/opt/fruit/crops_2024.csv"));
        assert_eq!(config.year_policy, YearPolicy::Extrapolate);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_from(&[("YEAR_POLICY", "interpolate")]).is_err());
        assert!(config_from(&[("YEAR_MIN", "twenty")]).is_err());
        assert!(config_from(&[("YEAR_MIN", "2040"), ("YEAR_MAX", "2030")]).is_err());
    }
}
