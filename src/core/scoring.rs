use chrono::{DateTime, Utc};

use crate::core::distance::distance_between;
use crate::models::{JobPosting, RemotePreference, SalaryPeriod, ScoreBreakdown, ScoringWeights, UserProfile};

/// Max distance assumed when the profile does not specify one (km)
const DEFAULT_MAX_DISTANCE_KM: f64 = 20.0;

/// Hours worked per year / per month, used to normalize salaries to hourly
const HOURS_PER_YEAR: f64 = 52.0 * 40.0;
const HOURS_PER_MONTH: f64 = 4.0 * 40.0;

/// Employment-type synonym table: canonical preference key to the
/// employment-type strings the job-search API emits for it.
const TYPE_SYNONYMS: [(&str, &[&str]); 4] = [
    ("PART-TIME", &["PARTTIME", "PART_TIME", "PART-TIME"]),
    ("FULL-TIME", &["FULLTIME", "FULL_TIME", "FULL-TIME"]),
    ("FREELANCE", &["CONTRACTOR", "FREELANCE"]),
    ("INTERNSHIP", &["INTERN", "INTERNSHIP"]),
];

/// Multi-factor match scorer
///
/// Computes five independent sub-scores (location, skills, salary, job type,
/// freshness) for a (user, job) pair and combines them via fixed weights into
/// a single 0-100 score. Missing optional fields never fail; they resolve to
/// the neutral fallback values documented on each sub-score.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    weights: ScoringWeights,
}

impl MatchScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a (profile, job) pair against the current wall clock
    pub fn score(&self, profile: &UserProfile, job: &JobPosting) -> (f64, ScoreBreakdown) {
        self.score_at(profile, job, Utc::now())
    }

    /// Score a (profile, job) pair at an explicit point in time
    ///
    /// Freshness is the only time-dependent sub-score; passing `now` makes
    /// the whole computation a pure function of its inputs.
    pub fn score_at(
        &self,
        profile: &UserProfile,
        job: &JobPosting,
        now: DateTime<Utc>,
    ) -> (f64, ScoreBreakdown) {
        let breakdown = ScoreBreakdown {
            location: score_location(profile, job),
            skills: score_skills(profile, job),
            salary: score_salary(profile, job),
            job_type: score_job_type(profile, job),
            freshness: score_freshness(job, now),
        };

        let total = (breakdown.location * self.weights.location
            + breakdown.skills * self.weights.skills
            + breakdown.salary * self.weights.salary
            + breakdown.job_type * self.weights.job_type
            + breakdown.freshness * self.weights.freshness)
            * 100.0;

        // Round to 2 decimals, clamp to the documented range
        let total = (total * 100.0).round() / 100.0;

        (total.clamp(0.0, 100.0), breakdown)
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Location sub-score (0-1)
///
/// Remote jobs short-circuit: 1.0 when the user prefers remote or has no
/// preference, 0.7 otherwise. On-site jobs score by haversine distance
/// against the user's travel radius, with a decaying penalty beyond it.
#[inline]
fn score_location(profile: &UserProfile, job: &JobPosting) -> f64 {
    if job.is_remote {
        return match profile.remote_preference {
            RemotePreference::Remote | RemotePreference::NoPreference => 1.0,
            _ => 0.7,
        };
    }

    // Either side missing coordinates resolves to the neutral middle
    if profile.location.is_none() || job.location().is_none() {
        return 0.5;
    }

    let distance = distance_between(profile.location, job.location());
    let max_distance = profile.max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM);

    if distance <= max_distance {
        // Shorter distance = higher score
        (1.0 - distance / max_distance).max(0.0)
    } else {
        // Decaying penalty beyond the travel radius, never negative
        (0.3 - (distance - max_distance) / 100.0).max(0.0)
    }
}

/// Skills sub-score (0-1)
///
/// Counts how many of the user's skills appear (case-insensitively) in the
/// job title or description.
#[inline]
fn score_skills(profile: &UserProfile, job: &JobPosting) -> f64 {
    if profile.skills.is_empty() {
        return 0.5;
    }

    let title = job.title.to_lowercase();
    let description = job.description.to_lowercase();

    let matched = profile
        .skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|skill| title.contains(skill.as_str()) || description.contains(skill.as_str()))
        .count();

    let ratio = matched as f64 / profile.skills.len() as f64;

    if matched > 0 {
        (0.5 + ratio * 0.5).min(1.0)
    } else {
        0.3
    }
}

/// Salary sub-score (0-1)
///
/// Yearly and monthly figures are normalized to an approximate hourly wage
/// before comparison. Division by the user's wage only happens once it is
/// known to be present and nonzero.
#[inline]
fn score_salary(profile: &UserProfile, job: &JobPosting) -> f64 {
    let min_wage = match profile.min_hourly_wage.filter(|w| *w > 0.0) {
        Some(w) => w,
        None => return 0.7,
    };

    if job.min_salary.is_none() && job.max_salary.is_none() {
        return 0.6;
    }

    let job_min = job.min_salary.map(|min| match job.salary_period {
        Some(SalaryPeriod::Year) => min / HOURS_PER_YEAR,
        Some(SalaryPeriod::Month) => min / HOURS_PER_MONTH,
        _ => min,
    });

    match job_min {
        Some(job_min) if job_min >= min_wage => {
            (0.7 + (job_min - min_wage) / min_wage * 0.3).min(1.0)
        }
        _ => match job.max_salary {
            Some(job_max) if job_max >= min_wage => 0.8,
            _ => 0.4,
        },
    }
}

/// Job-type sub-score (0-1)
///
/// Both sides are uppercased and compared through the synonym table; any
/// preferred type matching the posting's employment type scores 1.0.
#[inline]
fn score_job_type(profile: &UserProfile, job: &JobPosting) -> f64 {
    if profile.preferred_job_types.is_empty() {
        return 0.7;
    }

    let job_type = job.employment_type.to_uppercase();

    for pref in &profile.preferred_job_types {
        let pref_upper = pref.to_uppercase();
        for (key, variations) in &TYPE_SYNONYMS {
            if key.contains(pref_upper.as_str()) && variations.contains(&job_type.as_str()) {
                return 1.0;
            }
        }
    }

    0.5
}

/// Freshness sub-score (0-1)
///
/// Piecewise decay over the posting age: 1.0 within a day, 0.9 -> 0.7 over
/// the first week, 0.7 -> 0.4 over the first month, flat 0.4 beyond.
#[inline]
fn score_freshness(job: &JobPosting, now: DateTime<Utc>) -> f64 {
    let posted_at = match job.posted_at {
        Some(ts) => ts,
        None => return 0.5,
    };

    let age_hours = (now - posted_at).num_seconds() as f64 / 3600.0;

    if age_hours <= 24.0 {
        1.0
    } else if age_hours <= 168.0 {
        0.9 - (age_hours - 24.0) / 168.0 * 0.2
    } else if age_hours <= 720.0 {
        0.7 - (age_hours - 168.0) / 720.0 * 0.3
    } else {
        0.4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::models::GeoPoint;

    fn create_test_profile() -> UserProfile {
        UserProfile {
            email: "test@university.edu".to_string(),
            name: "Test User".to_string(),
            age: 21,
            city: "Istanbul".to_string(),
            district: "Kadikoy".to_string(),
            skills: vec!["Python".to_string(), "React".to_string()],
            min_hourly_wage: Some(75.0),
            max_distance_km: Some(15.0),
            preferred_job_types: vec!["Part-time".to_string()],
            remote_preference: RemotePreference::Hybrid,
            experience_months: 6,
            gpa: Some(3.2),
            location: Some(GeoPoint { lat: 41.0082, lon: 28.9784 }),
        }
    }

    fn create_test_job() -> JobPosting {
        JobPosting {
            id: "job-1".to_string(),
            title: "Junior Python Developer".to_string(),
            company: "Acme".to_string(),
            description: "Looking for a Python developer with React experience".to_string(),
            latitude: Some(41.0150),
            longitude: Some(28.9800),
            is_remote: false,
            employment_type: "PARTTIME".to_string(),
            min_salary: Some(80.0),
            max_salary: None,
            salary_period: Some(SalaryPeriod::Hour),
            required_skills: vec![],
            posted_at: Some(Utc::now() - Duration::hours(1)),
            apply_link: String::new(),
        }
    }

    #[test]
    fn test_example_scenario_scores_high() {
        let scorer = MatchScorer::with_default_weights();
        let profile = create_test_profile();
        let job = create_test_job();

        let (total, breakdown) = scorer.score(&profile, &job);

        assert!(breakdown.skills > 0.5);
        assert_eq!(breakdown.freshness, 1.0);
        assert!(breakdown.salary > 0.7);
        assert!(breakdown.location > 0.9);
        assert_eq!(breakdown.job_type, 1.0);
        assert!(total > 80.0, "expected >80, got {}", total);
    }

    #[test]
    fn test_score_is_deterministic() {
        let scorer = MatchScorer::with_default_weights();
        let profile = create_test_profile();
        let job = create_test_job();
        let now = Utc::now();

        let first = scorer.score_at(&profile, &job, now);
        let second = scorer.score_at(&profile, &job, now);

        assert_eq!(first, second);
    }

    #[test]
    fn test_score_stays_in_range() {
        let scorer = MatchScorer::with_default_weights();
        let profile = UserProfile {
            skills: vec![],
            min_hourly_wage: None,
            max_distance_km: None,
            preferred_job_types: vec![],
            location: None,
            gpa: None,
            ..create_test_profile()
        };
        let job = JobPosting {
            latitude: None,
            longitude: None,
            min_salary: None,
            salary_period: None,
            posted_at: None,
            ..create_test_job()
        };

        let (total, breakdown) = scorer.score(&profile, &job);

        assert!((0.0..=100.0).contains(&total));
        for sub in [
            breakdown.location,
            breakdown.skills,
            breakdown.salary,
            breakdown.job_type,
            breakdown.freshness,
        ] {
            assert!((0.0..=1.0).contains(&sub));
        }
    }

    #[test]
    fn test_remote_job_shortcut() {
        let mut profile = create_test_profile();
        let job = JobPosting {
            is_remote: true,
            ..create_test_job()
        };

        profile.remote_preference = RemotePreference::Remote;
        assert_eq!(score_location(&profile, &job), 1.0);

        profile.remote_preference = RemotePreference::NoPreference;
        assert_eq!(score_location(&profile, &job), 1.0);

        profile.remote_preference = RemotePreference::OnSite;
        assert_eq!(score_location(&profile, &job), 0.7);

        profile.remote_preference = RemotePreference::Hybrid;
        assert_eq!(score_location(&profile, &job), 0.7);
    }

    #[test]
    fn test_location_missing_coordinates_is_neutral() {
        let profile = UserProfile {
            location: None,
            ..create_test_profile()
        };
        assert_eq!(score_location(&profile, &create_test_job()), 0.5);

        let job = JobPosting {
            latitude: None,
            longitude: None,
            ..create_test_job()
        };
        assert_eq!(score_location(&create_test_profile(), &job), 0.5);
    }

    #[test]
    fn test_location_beyond_radius_decays() {
        let profile = UserProfile {
            max_distance_km: Some(5.0),
            // ~90km from the job
            location: Some(GeoPoint { lat: 41.8, lon: 28.98 }),
            ..create_test_profile()
        };

        let score = score_location(&profile, &create_test_job());
        assert_eq!(score, 0.0);

        // Just past the radius keeps a small positive score
        let near = UserProfile {
            max_distance_km: Some(0.5),
            location: Some(GeoPoint { lat: 41.0082, lon: 28.9784 }),
            ..create_test_profile()
        };
        let score = score_location(&near, &create_test_job());
        assert!(score > 0.0 && score < 0.3);
    }

    #[test]
    fn test_skills_no_skills_is_neutral() {
        let profile = UserProfile {
            skills: vec![],
            ..create_test_profile()
        };
        assert_eq!(score_skills(&profile, &create_test_job()), 0.5);
    }

    #[test]
    fn test_skills_full_match() {
        // Both Python and React appear in the description
        let score = score_skills(&create_test_profile(), &create_test_job());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_skills_no_match_scores_low() {
        let profile = UserProfile {
            skills: vec!["Fortran".to_string()],
            ..create_test_profile()
        };
        assert_eq!(score_skills(&profile, &create_test_job()), 0.3);
    }

    #[test]
    fn test_skills_partial_match() {
        let profile = UserProfile {
            skills: vec!["Python".to_string(), "Cobol".to_string()],
            ..create_test_profile()
        };
        let score = score_skills(&profile, &create_test_job());
        assert_eq!(score, 0.75);
    }

    #[test]
    fn test_salary_no_preference_is_neutral() {
        let profile = UserProfile {
            min_hourly_wage: None,
            ..create_test_profile()
        };
        assert_eq!(score_salary(&profile, &create_test_job()), 0.7);

        let zero_wage = UserProfile {
            min_hourly_wage: Some(0.0),
            ..create_test_profile()
        };
        assert_eq!(score_salary(&zero_wage, &create_test_job()), 0.7);
    }

    #[test]
    fn test_salary_no_job_data() {
        let job = JobPosting {
            min_salary: None,
            max_salary: None,
            ..create_test_job()
        };
        assert_eq!(score_salary(&create_test_profile(), &job), 0.6);
    }

    #[test]
    fn test_salary_yearly_conversion() {
        // 166400/year = 80/hour, above the 75/hour expectation
        let job = JobPosting {
            min_salary: Some(166_400.0),
            salary_period: Some(SalaryPeriod::Year),
            ..create_test_job()
        };
        let score = score_salary(&create_test_profile(), &job);
        assert!(score > 0.7 && score <= 1.0);
    }

    #[test]
    fn test_salary_below_expectation() {
        let job = JobPosting {
            min_salary: Some(40.0),
            max_salary: Some(60.0),
            ..create_test_job()
        };
        assert_eq!(score_salary(&create_test_profile(), &job), 0.4);

        // Max reaches the expectation even though min does not
        let stretch = JobPosting {
            min_salary: Some(40.0),
            max_salary: Some(90.0),
            ..create_test_job()
        };
        assert_eq!(score_salary(&create_test_profile(), &stretch), 0.8);
    }

    #[test]
    fn test_job_type_synonyms() {
        for employment_type in ["PARTTIME", "PART_TIME", "PART-TIME"] {
            let job = JobPosting {
                employment_type: employment_type.to_string(),
                ..create_test_job()
            };
            assert_eq!(score_job_type(&create_test_profile(), &job), 1.0);
        }

        let job = JobPosting {
            employment_type: "FULLTIME".to_string(),
            ..create_test_job()
        };
        assert_eq!(score_job_type(&create_test_profile(), &job), 0.5);
    }

    #[test]
    fn test_job_type_no_preference_is_neutral() {
        let profile = UserProfile {
            preferred_job_types: vec![],
            ..create_test_profile()
        };
        assert_eq!(score_job_type(&profile, &create_test_job()), 0.7);
    }

    #[test]
    fn test_freshness_decay_buckets() {
        let now = Utc::now();
        let job_at = |hours: i64| JobPosting {
            posted_at: Some(now - Duration::hours(hours)),
            ..create_test_job()
        };

        assert_eq!(score_freshness(&job_at(1), now), 1.0);
        assert_eq!(score_freshness(&job_at(24), now), 1.0);

        let week_old = score_freshness(&job_at(100), now);
        assert!(week_old < 0.9 && week_old > 0.7);

        let month_old = score_freshness(&job_at(500), now);
        assert!(month_old < 0.7 && month_old > 0.4);

        assert_eq!(score_freshness(&job_at(2000), now), 0.4);
    }

    #[test]
    fn test_freshness_monotonic_in_age() {
        let now = Utc::now();
        let mut previous = f64::INFINITY;

        for hours in [0, 12, 24, 48, 168, 300, 720, 1000] {
            let job = JobPosting {
                posted_at: Some(now - Duration::hours(hours)),
                ..create_test_job()
            };
            let score = score_freshness(&job, now);
            assert!(score <= previous, "freshness must not increase with age");
            previous = score;
        }
    }

    #[test]
    fn test_freshness_missing_timestamp() {
        let job = JobPosting {
            posted_at: None,
            ..create_test_job()
        };
        assert_eq!(score_freshness(&job, Utc::now()), 0.5);
    }
}
