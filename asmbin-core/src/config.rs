use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bin tree tunables.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BinConfig {
    /// Width of the root bin of a fresh contig.
    pub initial_size: i64,
    /// Bins at or below this width are never subdivided.
    pub min_size: i64,
}

impl Default for BinConfig {
    fn default() -> Self {
        BinConfig {
            initial_size: 4096,
            min_size: 1024,
        }
    }
}

/// Track cache tunables.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrackConfig {
    /// Values cached per bin track (before capping at the bin width).
    pub samples: usize,
    /// At or below this many bases per value, tracks are computed from raw item
    /// overlaps instead of from finer tracks.
    pub raw_bpv: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        TrackConfig {
            samples: 1024,
            raw_bpv: 2.0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Upper bound on records in the in-memory store. Unlimited when absent.
    pub max_records: Option<usize>,
}

///
/// Everything tunable in asmbin, as read from a TOML file:
///
/// ```toml
/// [bins]
/// initial_size = 4096
/// min_size = 1024
///
/// [tracks]
/// samples = 1024
/// raw_bpv = 2.0
///
/// [store]
/// max_records = 1000000
/// ```
///
/// Missing sections and keys fall back to their defaults.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub bins: BinConfig,
    pub tracks: TrackConfig,
    pub store: StoreConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Bin sizes must be positive (initial_size={initial_size}, min_size={min_size})")]
    InvalidBinSize { initial_size: i64, min_size: i64 },
    #[error("Root bins ({initial_size}) must not be narrower than the minimum bin size ({min_size})")]
    RootBelowMinimum { initial_size: i64, min_size: i64 },
    #[error("Track sample count must be an even number of at least 2, got {0}")]
    InvalidSampleCount(usize),
    #[error("Raw track threshold must be at least 1 base per value, got {0}")]
    InvalidRawThreshold(f64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl Config {
    /// Reject settings the index cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.bins.initial_size < 1 || self.bins.min_size < 1 {
            return Err(ConfigError::InvalidBinSize {
                initial_size: self.bins.initial_size,
                min_size: self.bins.min_size,
            });
        }
        if self.bins.initial_size < self.bins.min_size {
            return Err(ConfigError::RootBelowMinimum {
                initial_size: self.bins.initial_size,
                min_size: self.bins.min_size,
            });
        }
        if self.tracks.samples < 2 || self.tracks.samples % 2 != 0 {
            return Err(ConfigError::InvalidSampleCount(self.tracks.samples));
        }
        if !(self.tracks.raw_bpv >= 1.0) {
            return Err(ConfigError::InvalidRawThreshold(self.tracks.raw_bpv));
        }
        Ok(())
    }
}

impl TryFrom<&Path> for Config {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: Config = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.validate().is_ok(), true);
        assert_eq!(config.bins.initial_size, 4096);
        assert_eq!(config.tracks.samples, 1024);
        assert_eq!(config.store.max_records, None);
    }

    #[rstest]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[bins]\nmin_size = 128\n").unwrap();
        assert_eq!(config.bins.min_size, 128);
        assert_eq!(config.bins.initial_size, 4096);
        assert_eq!(config.tracks, TrackConfig::default());
    }

    #[rstest]
    fn test_try_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[bins]\ninitial_size = 1024\nmin_size = 128\n\n[tracks]\nsamples = 16\n\n[store]\nmax_records = 50"
        )
        .unwrap();

        let config = Config::try_from(file.path()).unwrap();
        assert_eq!(config.bins.initial_size, 1024);
        assert_eq!(config.tracks.samples, 16);
        assert_eq!(config.tracks.raw_bpv, 2.0);
        assert_eq!(config.store.max_records, Some(50));
    }

    #[rstest]
    #[case("[tracks]\nsamples = 7\n")]
    #[case("[tracks]\nsamples = 0\n")]
    #[case("[tracks]\nraw_bpv = 0.5\n")]
    #[case("[bins]\nmin_size = 0\n")]
    #[case("[bins]\ninitial_size = -4\n")]
    #[case("[bins]\ninitial_size = 512\nmin_size = 1024\n")]
    fn test_invalid_values_rejected(#[case] toml_str: &str) {
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.validate().is_err(), true);
    }

    #[rstest]
    fn test_missing_file() {
        let result = Config::try_from(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
