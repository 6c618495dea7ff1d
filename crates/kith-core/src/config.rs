//! Engine configuration.
//!
//! Every section is optional in TOML; missing fields take their defaults.
//!
//! ```toml
//! parallel = true
//!
//! [weights]
//! degree = 0.3
//! betweenness = 0.3
//! closeness = 0.2
//! page_rank = 0.2
//!
//! [estimator]
//! threshold = 25.0
//!
//! [inference]
//! mode = "always"
//!
//! [pagerank]
//! damping = 0.85
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Tolerance used when checking that weights sum to 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub weights: NetworkValueWeights,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub pagerank: PageRankConfig,
    /// Run per-source shortest paths and pair estimation on rayon.
    /// Results are identical either way.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: NetworkValueWeights::default(),
            estimator: EstimatorConfig::default(),
            inference: InferenceConfig::default(),
            pagerank: PageRankConfig::default(),
            parallel: default_true(),
        }
    }
}

impl EngineConfig {
    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidWeights`] for bad weights, otherwise
    /// [`EngineError::InvalidConfig`].
    pub fn validate(&self) -> Result<(), EngineError> {
        self.weights.validate()?;
        self.pagerank.validate()?;
        self.estimator.validate()?;

        let density = self.inference.sparse_density;
        if !density.is_finite() || !(0.0..=1.0).contains(&density) {
            return Err(EngineError::InvalidConfig(format!(
                "inference.sparse_density must be in [0, 1] (got {density})"
            )));
        }
        Ok(())
    }
}

/// Weights for the composite network value:
///
/// `NV(v) = degree*D + betweenness*B + closeness*C + page_rank*PR`
///
/// applied to min-max normalized metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkValueWeights {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub page_rank: f64,
}

impl Default for NetworkValueWeights {
    fn default() -> Self {
        Self {
            degree: 0.25,
            betweenness: 0.25,
            closeness: 0.25,
            page_rank: 0.25,
        }
    }
}

impl NetworkValueWeights {
    #[must_use]
    pub const fn as_array(&self) -> [f64; 4] {
        [self.degree, self.betweenness, self.closeness, self.page_rank]
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Weights must be finite, non-negative and sum to 1 within
    /// [`WEIGHT_SUM_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidWeights`] carrying the observed sum.
    pub fn validate(&self) -> Result<(), EngineError> {
        let sum = self.sum();
        let each_ok = self.as_array().iter().all(|w| w.is_finite() && *w >= 0.0);
        if each_ok && (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
            Ok(())
        } else {
            Err(EngineError::InvalidWeights { sum })
        }
    }
}

/// Scoring constants for the relationship strength estimator.
///
/// Scores live on a roughly 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    #[serde(default = "default_company_weight")]
    pub company_weight: f64,
    #[serde(default = "default_introduction_weight")]
    pub introduction_weight: f64,
    #[serde(default = "default_shared_introducer_weight")]
    pub shared_introducer_weight: f64,
    #[serde(default = "default_tag_weight")]
    pub tag_weight: f64,
    #[serde(default = "default_max_tag_bonus")]
    pub max_tag_bonus: f64,
    #[serde(default = "default_importance_weight")]
    pub importance_weight: f64,
    /// An edge is materialized only when the score is strictly above this.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Above this many contacts the O(n²) pair pass is skipped.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            company_weight: default_company_weight(),
            introduction_weight: default_introduction_weight(),
            shared_introducer_weight: default_shared_introducer_weight(),
            tag_weight: default_tag_weight(),
            max_tag_bonus: default_max_tag_bonus(),
            importance_weight: default_importance_weight(),
            threshold: default_threshold(),
            max_nodes: default_max_nodes(),
        }
    }
}

impl EstimatorConfig {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for negative or non-finite
    /// scoring constants.
    pub fn validate(&self) -> Result<(), EngineError> {
        let fields = [
            ("company_weight", self.company_weight),
            ("introduction_weight", self.introduction_weight),
            ("shared_introducer_weight", self.shared_introducer_weight),
            ("tag_weight", self.tag_weight),
            ("max_tag_bonus", self.max_tag_bonus),
            ("importance_weight", self.importance_weight),
            ("threshold", self.threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "estimator.{name} must be a non-negative number (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// When to run the estimator before analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceMode {
    /// Only when the explicit edge density is below `sparse_density`.
    Sparse,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_mode")]
    pub mode: InferenceMode,
    #[serde(default = "default_sparse_density")]
    pub sparse_density: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            mode: default_inference_mode(),
            sparse_density: default_sparse_density(),
        }
    }
}

/// Configuration for PageRank computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Default: 0.85.
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Convergence threshold: stop when L1 norm of rank delta < tolerance.
    /// Default: 1e-6.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Maximum number of iterations.
    /// Default: 100.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            tolerance: default_tolerance(),
            max_iter: default_max_iter(),
        }
    }
}

impl PageRankConfig {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when damping is outside
    /// `(0, 1)`, tolerance is not positive, or `max_iter` is zero.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "pagerank.damping must be in (0, 1) (got {})",
                self.damping
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "pagerank.tolerance must be positive (got {})",
                self.tolerance
            )));
        }
        if self.max_iter == 0 {
            return Err(EngineError::InvalidConfig(
                "pagerank.max_iter must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load an engine config from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<EngineConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Path of the per-user config file, if a config directory exists.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kith/config.toml"))
}

/// Load `<config_dir>/kith/config.toml`, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<EngineConfig> {
    let Some(path) = user_config_path() else {
        return Ok(EngineConfig::default());
    };

    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    load_config(&path)
}

/// Resolve the effective config: an explicit path wins, then the user
/// config, then defaults. The result is validated.
///
/// # Errors
///
/// Returns an error if loading fails or the config is out of range.
pub fn resolve_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    let config = match explicit {
        Some(path) => load_config(path)?,
        None => load_user_config()?,
    };
    config.validate().context("config validation failed")?;
    tracing::debug!(?config, "resolved engine config");
    Ok(config)
}

const fn default_true() -> bool {
    true
}

const fn default_company_weight() -> f64 {
    30.0
}

const fn default_introduction_weight() -> f64 {
    40.0
}

const fn default_shared_introducer_weight() -> f64 {
    15.0
}

const fn default_tag_weight() -> f64 {
    5.0
}

const fn default_max_tag_bonus() -> f64 {
    20.0
}

const fn default_importance_weight() -> f64 {
    10.0
}

const fn default_threshold() -> f64 {
    20.0
}

const fn default_max_nodes() -> usize {
    5000
}

const fn default_inference_mode() -> InferenceMode {
    InferenceMode::Sparse
}

const fn default_sparse_density() -> f64 {
    0.05
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_tolerance() -> f64 {
    1e-6
}

const fn default_max_iter() -> usize {
    100
}
