// Model exports
pub mod domain;

pub use domain::{
    GeoPoint, JobPosting, RemotePreference, SalaryPeriod, ScoreBreakdown, ScoredJob,
    ScoringWeights, UserProfile,
};
