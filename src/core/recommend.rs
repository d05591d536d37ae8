use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::scoring::MatchScorer;
use crate::models::{JobPosting, ScoredJob, ScoringWeights, UserProfile};

/// Default number of recommendations returned
pub const DEFAULT_TOP_N: usize = 10;

/// Recommendation ranker
///
/// Scores every candidate posting for a user via the match scorer, sorts
/// descending by score and truncates to the requested count. Pure function
/// of its inputs; ties keep their original relative order.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    scorer: MatchScorer,
}

impl Recommender {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            scorer: MatchScorer::new(weights),
        }
    }

    pub fn with_default_weights() -> Self {
        Self {
            scorer: MatchScorer::with_default_weights(),
        }
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Recommend the best-matching jobs for a user
    pub fn recommend(
        &self,
        profile: &UserProfile,
        jobs: &[JobPosting],
        top_n: usize,
    ) -> Vec<ScoredJob> {
        self.recommend_at(profile, jobs, top_n, Utc::now())
    }

    /// Recommend at an explicit point in time (deterministic freshness)
    pub fn recommend_at(
        &self,
        profile: &UserProfile,
        jobs: &[JobPosting],
        top_n: usize,
        now: DateTime<Utc>,
    ) -> Vec<ScoredJob> {
        let mut scored: Vec<ScoredJob> = jobs
            .iter()
            .map(|job| {
                let (match_score, breakdown) = self.scorer.score_at(profile, job, now);
                ScoredJob {
                    job: job.clone(),
                    match_score,
                    score_breakdown: breakdown.scaled(),
                }
            })
            .collect();

        // Stable sort keeps the original order of equal scores
        scored.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_n);

        debug!(
            candidates = jobs.len(),
            returned = scored.len(),
            "recommendations ranked"
        );

        scored
    }
}
