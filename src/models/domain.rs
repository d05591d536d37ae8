use serde::{Deserialize, Serialize};

/// Geographic coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// User's stated preference for remote work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RemotePreference {
    #[serde(rename = "On-site")]
    OnSite,
    Remote,
    Hybrid,
    #[default]
    #[serde(rename = "No Preference")]
    NoPreference,
}

/// Period a job salary figure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SalaryPeriod {
    Hour,
    Month,
    Year,
}

/// User profile with preferences and background data
///
/// All optional fields are tolerated as absent; the scoring and feature
/// extraction layers apply the documented neutral defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub age: u8,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub min_hourly_wage: Option<f64>,
    #[serde(default)]
    pub max_distance_km: Option<f64>,
    #[serde(default)]
    pub preferred_job_types: Vec<String>,
    #[serde(default)]
    pub remote_preference: RemotePreference,
    #[serde(default)]
    pub experience_months: u32,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl UserProfile {
    /// True when the user accepts remote or hybrid work
    pub fn accepts_remote(&self) -> bool {
        matches!(
            self.remote_preference,
            RemotePreference::Remote | RemotePreference::Hybrid
        )
    }
}

/// Job posting as delivered by the job-search client
///
/// Field renames follow the upstream search API payload (`job_title`,
/// `job_is_remote`, ...) so postings deserialize without a mapping layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(rename = "job_id")]
    pub id: String,
    #[serde(rename = "job_title")]
    pub title: String,
    #[serde(rename = "employer_name", default)]
    pub company: String,
    #[serde(rename = "job_description", default)]
    pub description: String,
    #[serde(rename = "job_latitude", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "job_longitude", default)]
    pub longitude: Option<f64>,
    #[serde(rename = "job_is_remote", default)]
    pub is_remote: bool,
    #[serde(rename = "job_employment_type", default)]
    pub employment_type: String,
    #[serde(rename = "job_min_salary", default)]
    pub min_salary: Option<f64>,
    #[serde(rename = "job_max_salary", default)]
    pub max_salary: Option<f64>,
    #[serde(rename = "job_salary_period", default)]
    pub salary_period: Option<SalaryPeriod>,
    #[serde(rename = "job_required_skills", default)]
    pub required_skills: Vec<String>,
    #[serde(
        rename = "job_posted_at_timestamp",
        with = "chrono::serde::ts_seconds_option",
        default
    )]
    pub posted_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "job_apply_link", default)]
    pub apply_link: String,
}

impl JobPosting {
    /// Helper to get the posting coordinates as a GeoPoint, if both are present
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
            _ => None,
        }
    }
}

/// Per-metric sub-scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub location: f64,
    pub skills: f64,
    pub salary: f64,
    pub job_type: f64,
    pub freshness: f64,
}

impl ScoreBreakdown {
    /// Scale each sub-score to 0-100, rounded to one decimal
    pub fn scaled(&self) -> ScoreBreakdown {
        let scale = |v: f64| (v * 1000.0).round() / 10.0;
        ScoreBreakdown {
            location: scale(self.location),
            skills: scale(self.skills),
            salary: scale(self.salary),
            job_type: scale(self.job_type),
            freshness: scale(self.freshness),
        }
    }
}

/// Scored recommendation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredJob {
    pub job: JobPosting,
    pub match_score: f64,
    pub score_breakdown: ScoreBreakdown,
}

/// Scoring weights
///
/// The five weights must sum to 1.0 so the combined score stays in [0, 100].
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub location: f64,
    pub skills: f64,
    pub salary: f64,
    pub job_type: f64,
    pub freshness: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.location + self.skills + self.salary + self.job_type + self.freshness
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            location: 0.25,
            skills: 0.30,
            salary: 0.20,
            job_type: 0.15,
            freshness: 0.10,
        }
    }
}
