use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::EngineError;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub clustering: ClusteringSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scoring: ScoringSettings::default(),
            clustering: ClusteringSettings::default(),
            recommendation: RecommendationSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_salary_weight")]
    pub salary: f64,
    #[serde(default = "default_job_type_weight")]
    pub job_type: f64,
    #[serde(default = "default_freshness_weight")]
    pub freshness: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            location: default_location_weight(),
            skills: default_skills_weight(),
            salary: default_salary_weight(),
            job_type: default_job_type_weight(),
            freshness: default_freshness_weight(),
        }
    }
}

impl WeightsConfig {
    /// Convert to scoring weights, rejecting sets that do not sum to 1.0
    pub fn into_weights(self) -> Result<ScoringWeights, EngineError> {
        let weights = ScoringWeights {
            location: self.location,
            skills: self.skills,
            salary: self.salary,
            job_type: self.job_type,
            freshness: self.freshness,
        };

        let sum = weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(EngineError::InvalidWeights { sum });
        }

        Ok(weights)
    }
}

fn default_location_weight() -> f64 { 0.25 }
fn default_skills_weight() -> f64 { 0.30 }
fn default_salary_weight() -> f64 { 0.20 }
fn default_job_type_weight() -> f64 { 0.15 }
fn default_freshness_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct ClusteringSettings {
    #[serde(default = "default_n_clusters")]
    pub n_clusters: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ClusteringSettings {
    fn default() -> Self {
        Self {
            n_clusters: default_n_clusters(),
            max_iterations: default_max_iterations(),
            seed: default_seed(),
        }
    }
}

fn default_n_clusters() -> usize { 3 }
fn default_max_iterations() -> usize { 100 }
fn default_seed() -> u64 { 42 }

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    #[serde(default = "default_similar_top_n")]
    pub similar_top_n: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            similar_top_n: default_similar_top_n(),
        }
    }
}

fn default_top_n() -> usize { 10 }
fn default_similar_top_n() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with JOBMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with JOBMATCH_)
            // e.g., JOBMATCH_CLUSTERING__N_CLUSTERS -> clustering.n_clusters
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
