//! JobMatch Algo - job recommendation and user segmentation engine
//!
//! This library provides the core matching algorithms of the JobMatch
//! platform: a deterministic multi-factor scorer that ranks job postings for
//! a user profile, and a K-Means clustering engine that partitions the user
//! population into labeled behavioral segments and finds same-segment peers.
//!
//! The user store, job-search client and any transport layers are external
//! collaborators; this crate only defines the data shapes exchanged with
//! them and the pure computations over those shapes.

pub mod config;
pub mod core;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use crate::core::{
    find_similar_users, ClusterEngine, ClusterModel, ClusterStats, MatchScorer, Recommender,
};
pub use crate::error::{EngineError, Result};
pub use crate::models::{JobPosting, ScoreBreakdown, ScoredJob, ScoringWeights, UserProfile};
