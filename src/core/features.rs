use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

/// Number of numeric features extracted per user
pub const FEATURE_DIM: usize = 8;

/// Fixed feature vector for clustering
pub type FeatureVector = [f64; FEATURE_DIM];

/// Feature names in extraction order
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "age",
    "skill_count",
    "min_wage",
    "max_distance",
    "experience_months",
    "gpa",
    "prefers_remote",
    "prefers_parttime",
];

/// Defaults applied when a profile omits the corresponding field
const DEFAULT_MIN_WAGE: f64 = 75.0;
const DEFAULT_MAX_DISTANCE_KM: f64 = 15.0;
const DEFAULT_GPA: f64 = 3.0;

/// Map a user profile into the fixed 8-dimensional feature vector
pub fn extract_features(profile: &UserProfile) -> FeatureVector {
    let prefers_parttime = profile
        .preferred_job_types
        .iter()
        .any(|jt| jt.to_lowercase().contains("part"));

    [
        profile.age as f64,
        profile.skills.len() as f64,
        profile.min_hourly_wage.unwrap_or(DEFAULT_MIN_WAGE),
        profile.max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM),
        profile.experience_months as f64,
        profile.gpa.filter(|g| *g > 0.0).unwrap_or(DEFAULT_GPA),
        if profile.accepts_remote() { 1.0 } else { 0.0 },
        if prefers_parttime { 1.0 } else { 0.0 },
    ]
}

/// Extract features for a whole population snapshot
pub fn extract_feature_matrix(users: &[UserProfile]) -> Vec<FeatureVector> {
    users.iter().map(extract_features).collect()
}

/// Per-dimension standardization parameters (zero mean, unit variance)
///
/// A scaler is fit once over the population snapshot used to build a cluster
/// model and is retained inside that model, so any later single-user vector
/// is standardized with the exact same parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    mean: FeatureVector,
    std: FeatureVector,
}

impl Scaler {
    /// Fit mean and standard deviation over a batch of feature vectors
    ///
    /// Uses the population standard deviation; a constant dimension gets a
    /// standard deviation of 1.0 so transforming it yields zero instead of
    /// dividing by zero.
    pub fn fit(samples: &[FeatureVector]) -> Self {
        let n = samples.len().max(1) as f64;

        let mut mean = [0.0; FEATURE_DIM];
        for sample in samples {
            for (m, v) in mean.iter_mut().zip(sample.iter()) {
                *m += v;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }

        let mut std = [0.0; FEATURE_DIM];
        for sample in samples {
            for ((s, v), m) in std.iter_mut().zip(sample.iter()).zip(mean.iter()) {
                let diff = v - m;
                *s += diff * diff;
            }
        }
        for s in std.iter_mut() {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Self { mean, std }
    }

    /// Standardize a single feature vector with the fitted parameters
    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut scaled = [0.0; FEATURE_DIM];
        for i in 0..FEATURE_DIM {
            scaled[i] = (features[i] - self.mean[i]) / self.std[i];
        }
        scaled
    }

    /// Standardize a batch of feature vectors
    pub fn transform_batch(&self, samples: &[FeatureVector]) -> Vec<FeatureVector> {
        samples.iter().map(|s| self.transform(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, RemotePreference};

    fn create_test_profile() -> UserProfile {
        UserProfile {
            email: "test@university.edu".to_string(),
            name: "Test User".to_string(),
            age: 21,
            city: "Istanbul".to_string(),
            district: "Kadikoy".to_string(),
            skills: vec!["Python".to_string(), "Java".to_string()],
            min_hourly_wage: Some(60.0),
            max_distance_km: Some(10.0),
            preferred_job_types: vec!["Part-time".to_string()],
            remote_preference: RemotePreference::OnSite,
            experience_months: 3,
            gpa: Some(3.2),
            location: Some(GeoPoint { lat: 41.0082, lon: 28.9784 }),
        }
    }

    #[test]
    fn test_extract_features_order() {
        let features = extract_features(&create_test_profile());
        assert_eq!(features, [21.0, 2.0, 60.0, 10.0, 3.0, 3.2, 0.0, 1.0]);
    }

    #[test]
    fn test_extract_features_defaults() {
        let profile = UserProfile {
            skills: vec![],
            min_hourly_wage: None,
            max_distance_km: None,
            preferred_job_types: vec![],
            gpa: None,
            remote_preference: RemotePreference::Hybrid,
            ..create_test_profile()
        };

        let features = extract_features(&profile);
        assert_eq!(features[1], 0.0);
        assert_eq!(features[2], 75.0);
        assert_eq!(features[3], 15.0);
        assert_eq!(features[5], 3.0);
        // Hybrid counts as preferring remote
        assert_eq!(features[6], 1.0);
        assert_eq!(features[7], 0.0);
    }

    #[test]
    fn test_zero_gpa_falls_back_to_default() {
        let profile = UserProfile {
            gpa: Some(0.0),
            ..create_test_profile()
        };
        assert_eq!(extract_features(&profile)[5], 3.0);
    }

    #[test]
    fn test_scaler_standardizes_batch() {
        let samples = vec![
            [1.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [3.0, 20.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ];

        let scaler = Scaler::fit(&samples);
        let scaled = scaler.transform_batch(&samples);

        for dim in 0..2 {
            let mean: f64 = scaled.iter().map(|s| s[dim]).sum::<f64>() / 2.0;
            assert!(mean.abs() < 1e-9);
            let var: f64 = scaled.iter().map(|s| s[dim] * s[dim]).sum::<f64>() / 2.0;
            assert!((var - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_scaler_constant_dimension() {
        let samples = vec![
            [5.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [5.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ];

        let scaler = Scaler::fit(&samples);
        let scaled = scaler.transform(&samples[0]);
        assert_eq!(scaled[0], 0.0);
    }

    #[test]
    fn test_scaler_reuse_is_consistent() {
        let samples = vec![
            [20.0, 2.0, 60.0, 10.0, 3.0, 3.2, 0.0, 1.0],
            [24.0, 5.0, 120.0, 25.0, 18.0, 3.7, 1.0, 0.0],
            [21.0, 2.0, 50.0, 8.0, 0.0, 2.8, 0.0, 1.0],
        ];

        let scaler = Scaler::fit(&samples);
        let first = scaler.transform(&samples[0]);
        let second = scaler.transform(&samples[0]);
        assert_eq!(first, second);
    }
}
