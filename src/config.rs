//! Configuration.
//!
//! - [`PropagationMode`] / [`PropagationConfig`] — the validated, immutable input of
//!   [`crate::compute_propagator`]
//! - [`RunConfig`] — what the `propagator` binary runs on: data paths plus raw
//!   propagation parameters, layered as env var > YAML > default

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;

use crate::error::{PropagationError, Result};

/// Default teleport probability.
pub const DEFAULT_ALPHA: f32 = 0.1;

/// How the propagator is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropagationMode {
    /// `α · (I − (1 − α) · Â)^(−1)`, dense, cubic in the node count.
    #[default]
    Exact,
    /// `Â` itself, densified. `α` is ignored.
    Approximate,
}

impl fmt::Display for PropagationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Approximate => write!(f, "approximate"),
        }
    }
}

impl FromStr for PropagationMode {
    type Err = PropagationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "approximate" => Ok(Self::Approximate),
            other => Err(PropagationError::InvalidParameter {
                name: "mode",
                reason: format!("expected `exact` or `approximate`, got `{other}`"),
            }),
        }
    }
}

/// Validated propagation parameters: `alpha ∈ (0, 1]` and a mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropagationConfig {
    alpha: f32,
    mode: PropagationMode,
}

impl PropagationConfig {
    pub fn new(alpha: f32, mode: PropagationMode) -> Result<Self> {
        // Written so that NaN fails too
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(PropagationError::InvalidParameter {
                name: "alpha",
                reason: format!("must be in (0, 1], got {alpha}"),
            });
        }
        Ok(Self { alpha, mode })
    }

    pub fn exact(alpha: f32) -> Result<Self> {
        Self::new(alpha, PropagationMode::Exact)
    }

    pub fn approximate(alpha: f32) -> Result<Self> {
        Self::new(alpha, PropagationMode::Approximate)
    }

    /// Teleport (restart) probability.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn mode(&self) -> PropagationMode {
        self.mode
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            mode: PropagationMode::default(),
        }
    }
}

// ============================================================================
// Run configuration (YAML + env)
// ============================================================================

/// Default YAML file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "propagator.yaml";

/// Run configuration for the `propagator` binary.
///
/// `alpha` and `mode` are stored raw and validated by [`RunConfig::propagation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Two-column CSV edge list with a header row
    pub edge_path: PathBuf,
    /// JSON object of node id → feature indices
    pub features_path: Option<PathBuf>,
    /// CSV holding the target column
    pub target_path: Option<PathBuf>,
    /// Name of the target column
    pub target_column: String,
    pub alpha: f32,
    pub mode: PropagationMode,
    /// Read the edge list as undirected: both directions, each pair once
    pub undirected: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            edge_path: PathBuf::from("input/edges.csv"),
            features_path: None,
            target_path: None,
            target_column: "target".into(),
            alpha: DEFAULT_ALPHA,
            mode: PropagationMode::default(),
            undirected: true,
        }
    }
}

impl RunConfig {
    /// Load from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries [`DEFAULT_CONFIG_FILE`] in CWD. A missing or
    /// unparseable file falls back to defaults. An unparseable `PROPAGATOR_ALPHA`,
    /// `PROPAGATOR_MODE` or `PROPAGATOR_UNDIRECTED` is an error.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> anyhow::Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let alpha = env_or("PROPAGATOR_ALPHA", yaml.alpha)?;
        let mode = env_or("PROPAGATOR_MODE", yaml.mode)?;
        let undirected = env_or("PROPAGATOR_UNDIRECTED", yaml.undirected)?;

        Ok(Self {
            edge_path: std::env::var("PROPAGATOR_EDGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(yaml.edge_path),
            features_path: std::env::var("PROPAGATOR_FEATURES_PATH")
                .map(PathBuf::from)
                .ok()
                .or(yaml.features_path),
            target_path: std::env::var("PROPAGATOR_TARGET_PATH")
                .map(PathBuf::from)
                .ok()
                .or(yaml.target_path),
            target_column: std::env::var("PROPAGATOR_TARGET_COLUMN")
                .unwrap_or(yaml.target_column),
            alpha,
            mode,
            undirected,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> Self {
        let path = yaml_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_yaml_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn from_yaml_str(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Validated propagation parameters.
    pub fn propagation(&self) -> Result<PropagationConfig> {
        PropagationConfig::new(self.alpha, self.mode)
    }
}

/// Typed value of env var `name`, or `fallback` when it is unset.
fn env_or<T>(name: &str, fallback: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => parse_env_value(name, &raw),
        Err(_) => Ok(fallback),
    }
}

fn parse_env_value<T>(name: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{name} has an invalid value: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("exact".parse::<PropagationMode>().unwrap(), PropagationMode::Exact);
        assert_eq!(
            " Approximate ".parse::<PropagationMode>().unwrap(),
            PropagationMode::Approximate
        );
        let err = "fast".parse::<PropagationMode>().unwrap_err();
        assert!(matches!(
            err,
            PropagationError::InvalidParameter { name: "mode", .. }
        ));
    }

    #[test]
    fn test_mode_display_roundtrips_through_from_str() {
        for mode in [PropagationMode::Exact, PropagationMode::Approximate] {
            assert_eq!(mode.to_string().parse::<PropagationMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_alpha_bounds() {
        assert!(PropagationConfig::exact(1.0).is_ok());
        assert!(PropagationConfig::exact(1e-6).is_ok());
        for bad in [0.0, -0.1, 1.0001, f32::NAN, f32::INFINITY] {
            assert!(
                matches!(
                    PropagationConfig::exact(bad),
                    Err(PropagationError::InvalidParameter { name: "alpha", .. })
                ),
                "alpha {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_defaults() {
        let config = PropagationConfig::default();
        assert_eq!(config.alpha(), DEFAULT_ALPHA);
        assert_eq!(config.mode(), PropagationMode::Exact);

        let run = RunConfig::default();
        assert!(run.undirected);
        assert_eq!(run.target_column, "target");
        assert_eq!(run.propagation().unwrap(), config);
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let yaml = "alpha: 0.25\nmode: approximate\nfeatures_path: data/features.json\n";
        let run = RunConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(run.alpha, 0.25);
        assert_eq!(run.mode, PropagationMode::Approximate);
        assert_eq!(run.features_path, Some(PathBuf::from("data/features.json")));
        assert_eq!(run.edge_path, RunConfig::default().edge_path);
        assert!(run.undirected);
    }

    #[test]
    fn test_yaml_unknown_mode_rejected() {
        assert!(RunConfig::from_yaml_str("mode: fast\n").is_err());
    }

    #[test]
    fn test_env_values_parse_or_fail_loudly() {
        assert!(parse_env_value::<bool>("PROPAGATOR_UNDIRECTED", " false ").is_ok_and(|v| !v));
        assert_eq!(parse_env_value::<f32>("PROPAGATOR_ALPHA", "0.3").unwrap(), 0.3);
        assert_eq!(
            parse_env_value::<PropagationMode>("PROPAGATOR_MODE", "approximate").unwrap(),
            PropagationMode::Approximate
        );

        let err = parse_env_value::<bool>("PROPAGATOR_UNDIRECTED", "yes").unwrap_err();
        assert_eq!(err.to_string(), "PROPAGATOR_UNDIRECTED has an invalid value: yes");
        assert!(parse_env_value::<f32>("PROPAGATOR_ALPHA", "high").is_err());
        assert!(parse_env_value::<PropagationMode>("PROPAGATOR_MODE", "fast").is_err());
    }

    #[test]
    fn test_unset_env_var_falls_back() {
        let value = env_or("PROPAGATOR_TEST_UNSET_FLAG", true).unwrap();
        assert!(value);
    }

    #[test]
    fn test_invalid_alpha_surfaces_on_validation() {
        let run = RunConfig {
            alpha: 0.0,
            ..RunConfig::default()
        };
        assert!(run.propagation().is_err());
    }
}
