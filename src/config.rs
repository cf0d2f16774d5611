use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Scoring and projection defaults loaded from environment variables.
///
/// A .env file is loaded at startup via dotenvy, and CLI flags override
/// whatever is set here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Credibility smoothing strength (SCATTERSCORE_ETA, default 1.0)
    pub eta: f64,
    /// Log-dampen raw counts (SCATTERSCORE_SUBLINEAR, default true)
    pub use_sublinear: bool,
    /// Resamples for bootstrap scoring (SCATTERSCORE_NUM_BOOTSTRAPS, default 1000)
    pub num_bootstraps: usize,
    /// Bootstrap RNG seed (SCATTERSCORE_SEED). Unset means seeded from entropy.
    pub seed: Option<u64>,
    /// Terms per direction in axis labels and nearest-term output
    /// (SCATTERSCORE_NUM_TERMS, default 5)
    pub num_terms: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eta: 1.0,
            use_sublinear: true,
            num_bootstraps: 1000,
            seed: None,
            num_terms: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables take their defaults. A variable that is set but does
    /// not parse is an error rather than a silent fallback.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            eta: parse_var("SCATTERSCORE_ETA")?.unwrap_or(defaults.eta),
            use_sublinear: parse_var("SCATTERSCORE_SUBLINEAR")?
                .unwrap_or(defaults.use_sublinear),
            num_bootstraps: parse_var("SCATTERSCORE_NUM_BOOTSTRAPS")?
                .unwrap_or(defaults.num_bootstraps),
            seed: parse_var("SCATTERSCORE_SEED")?,
            num_terms: parse_var("SCATTERSCORE_NUM_TERMS")?.unwrap_or(defaults.num_terms),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the values make sense together.
    /// Call this again after applying CLI overrides.
    pub fn validate(&self) -> Result<()> {
        if !self.eta.is_finite() || self.eta < 0.0 {
            anyhow::bail!(
                "eta must be a finite, non-negative number (got {}).\n\
                 Check SCATTERSCORE_ETA or --eta.",
                self.eta
            );
        }
        if self.num_bootstraps == 0 {
            anyhow::bail!("SCATTERSCORE_NUM_BOOTSTRAPS must be at least 1 (got 0).");
        }
        Ok(())
    }

    /// Resolve the `--bootstrap` flag: absent means no bootstrap, a bare flag
    /// means the configured count, and an explicit count is taken as given.
    pub fn bootstrap_resamples(&self, requested: Option<Option<usize>>) -> Option<usize> {
        requested.map(|n| n.unwrap_or(self.num_bootstraps))
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Could not read {name}")),
    }
}
