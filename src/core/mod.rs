// Core algorithm exports
pub mod cluster;
pub mod distance;
pub mod features;
pub mod recommend;
pub mod scoring;
pub mod similar;

pub use cluster::{ClusterEngine, ClusterModel, ClusterStats};
pub use distance::{distance_between, haversine_distance};
pub use features::{extract_features, Scaler, FEATURE_DIM, FEATURE_NAMES};
pub use recommend::{Recommender, DEFAULT_TOP_N};
pub use scoring::MatchScorer;
pub use similar::{find_similar_users, DEFAULT_SIMILAR_TOP_N};
