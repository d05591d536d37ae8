use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::features::{
    extract_feature_matrix, extract_features, FeatureVector, Scaler, FEATURE_DIM, FEATURE_NAMES,
};
use crate::error::{EngineError, Result};
use crate::models::UserProfile;

/// Centroid movement below which the iteration stops
const CONVERGENCE_TOL: f64 = 1e-4;

/// K-Means user segmentation engine
///
/// Partitions a population snapshot into `n_clusters` behavioral segments
/// over standardized feature vectors. Initialization is fully deterministic
/// for a given seed: the seed selects the first centroid and the remaining
/// ones are chosen by farthest-point selection, so repeated fits over the
/// same snapshot produce the same model.
#[derive(Debug, Clone)]
pub struct ClusterEngine {
    n_clusters: usize,
    max_iterations: usize,
    seed: u64,
}

impl ClusterEngine {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iterations: 100,
            seed: 42,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Fit a cluster model over a population snapshot
    ///
    /// Fails with `EngineError::InsufficientData` when the population is
    /// smaller than the cluster count; no degraded fit is attempted. The
    /// returned model is immutable: it carries the scaling parameters of
    /// this snapshot, the final centroids, and a label per cluster.
    pub fn fit(&self, users: &[UserProfile]) -> Result<ClusterModel> {
        if users.len() < self.n_clusters {
            return Err(EngineError::InsufficientData {
                population: users.len(),
                required: self.n_clusters,
            });
        }

        let raw = extract_feature_matrix(users);
        let scaler = Scaler::fit(&raw);
        let scaled = scaler.transform_batch(&raw);

        let mut centroids = self.init_centroids(&scaled);
        let mut assignments = vec![0usize; scaled.len()];
        let mut iterations = 0;

        for iter in 0..self.max_iterations {
            assignments = assign_to_nearest(&scaled, &centroids);
            let new_centroids = update_centroids(&scaled, &assignments, &centroids);

            let converged = centroids_converged(&centroids, &new_centroids);
            centroids = new_centroids;
            iterations = iter + 1;

            if converged {
                break;
            }
        }

        // Label each cluster from its unstandardized average features
        let labels = (0..self.n_clusters)
            .map(|cluster_id| {
                let members: Vec<&FeatureVector> = raw
                    .iter()
                    .zip(assignments.iter())
                    .filter(|(_, a)| **a == cluster_id)
                    .map(|(f, _)| f)
                    .collect();

                if members.is_empty() {
                    return "General Group".to_string();
                }

                let summary = CentroidSummary::from_features(&mean_of(&members));
                label_for(&summary).to_string()
            })
            .collect();

        debug!(
            population = users.len(),
            clusters = self.n_clusters,
            iterations,
            "cluster fit converged"
        );

        Ok(ClusterModel {
            n_clusters: self.n_clusters,
            scaler,
            centroids,
            labels,
        })
    }
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ClusterEngine {
    /// Deterministic k-means++-style initialization
    ///
    /// The seed picks the first centroid; each remaining centroid is the
    /// point farthest from all centroids chosen so far.
    fn init_centroids(&self, scaled: &[FeatureVector]) -> Vec<FeatureVector> {
        let first = (self.seed as usize) % scaled.len();
        let mut centroids = vec![scaled[first]];

        while centroids.len() < self.n_clusters {
            let mut best_idx = 0;
            let mut best_dist = -1.0;

            for (i, point) in scaled.iter().enumerate() {
                let nearest = centroids
                    .iter()
                    .map(|c| squared_distance(point, c))
                    .fold(f64::INFINITY, f64::min);

                if nearest > best_dist {
                    best_dist = nearest;
                    best_idx = i;
                }
            }

            centroids.push(scaled[best_idx]);
        }

        centroids
    }
}

/// Immutable result of a cluster fit
///
/// Holds the scaling parameters of the snapshot it was fit on, the final
/// standardized centroids, and one human-readable label per cluster. A new
/// snapshot requires a new fit; models are never mutated after creation, so
/// concurrent readers can share one freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterModel {
    n_clusters: usize,
    scaler: Scaler,
    centroids: Vec<FeatureVector>,
    labels: Vec<String>,
}

impl ClusterModel {
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Label assigned to a cluster at fit time
    pub fn label(&self, cluster_id: usize) -> &str {
        &self.labels[cluster_id]
    }

    /// Predict the cluster id for a single user
    ///
    /// The user's feature vector is standardized with the scaler retained
    /// from the fit snapshot, then assigned to the nearest centroid.
    pub fn predict(&self, user: &UserProfile) -> usize {
        let features = extract_features(user);
        let scaled = self.scaler.transform(&features);
        nearest_centroid(&scaled, &self.centroids)
    }

    /// Per-cluster statistics for a population, using this fitted model
    ///
    /// Predictions, scaling, and labels all come from this model; the stats
    /// call never re-fits. Clusters with no members in `users` are omitted.
    pub fn stats(&self, users: &[UserProfile]) -> BTreeMap<usize, ClusterStats> {
        let mut grouped: BTreeMap<usize, Vec<FeatureVector>> = BTreeMap::new();
        for user in users {
            grouped
                .entry(self.predict(user))
                .or_default()
                .push(extract_features(user));
        }

        grouped
            .into_iter()
            .map(|(cluster_id, members)| {
                let refs: Vec<&FeatureVector> = members.iter().collect();
                let mean = mean_of(&refs);

                let average_features = FEATURE_NAMES
                    .iter()
                    .zip(mean.iter())
                    .map(|(name, value)| (name.to_string(), (value * 100.0).round() / 100.0))
                    .collect();

                let stats = ClusterStats {
                    count: members.len(),
                    average_features,
                    label: self.labels[cluster_id].clone(),
                };
                (cluster_id, stats)
            })
            .collect()
    }
}

/// Aggregated view of one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterStats {
    pub count: usize,
    pub average_features: BTreeMap<String, f64>,
    pub label: String,
}

/// Average (unstandardized) feature values of a cluster, by name
#[derive(Debug, Clone, Copy)]
pub struct CentroidSummary {
    pub age: f64,
    pub skill_count: f64,
    pub min_wage: f64,
    pub max_distance: f64,
    pub experience_months: f64,
    pub gpa: f64,
    pub prefers_remote: f64,
    pub prefers_parttime: f64,
}

impl CentroidSummary {
    pub fn from_features(features: &FeatureVector) -> Self {
        Self {
            age: features[0],
            skill_count: features[1],
            min_wage: features[2],
            max_distance: features[3],
            experience_months: features[4],
            gpa: features[5],
            prefers_remote: features[6],
            prefers_parttime: features[7],
        }
    }
}

/// Rule-based cluster labeling
///
/// Rules are evaluated in priority order against the cluster's average
/// feature values; the first matching rule wins.
pub fn label_for(summary: &CentroidSummary) -> &'static str {
    let rules: [(fn(&CentroidSummary) -> bool, &'static str); 5] = [
        (
            |s| s.experience_months < 6.0 && s.skill_count < 4.0,
            "Newcomers",
        ),
        (
            |s| s.prefers_remote > 0.5 && s.min_wage > 100.0,
            "Remote Professionals",
        ),
        (
            |s| s.prefers_parttime > 0.5 && s.max_distance < 10.0,
            "Part-time Students",
        ),
        (
            |s| s.skill_count >= 5.0 && s.experience_months >= 12.0,
            "Experienced",
        ),
        (
            |s| s.min_wage < 80.0 && s.max_distance > 15.0,
            "Flexible/Adaptable",
        ),
    ];

    rules
        .iter()
        .find(|(predicate, _)| predicate(summary))
        .map(|(_, label)| *label)
        .unwrap_or("General Group")
}

#[inline]
fn squared_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let mut sum = 0.0;
    for i in 0..FEATURE_DIM {
        let diff = a[i] - b[i];
        sum += diff * diff;
    }
    sum
}

#[inline]
fn nearest_centroid(point: &FeatureVector, centroids: &[FeatureVector]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;

    for (k, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = k;
        }
    }

    best
}

fn assign_to_nearest(points: &[FeatureVector], centroids: &[FeatureVector]) -> Vec<usize> {
    points
        .iter()
        .map(|point| nearest_centroid(point, centroids))
        .collect()
}

/// New centroids as cluster means; a cluster left empty keeps its centroid
fn update_centroids(
    points: &[FeatureVector],
    assignments: &[usize],
    previous: &[FeatureVector],
) -> Vec<FeatureVector> {
    let mut sums = vec![[0.0; FEATURE_DIM]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (point, &cluster) in points.iter().zip(assignments.iter()) {
        counts[cluster] += 1;
        for i in 0..FEATURE_DIM {
            sums[cluster][i] += point[i];
        }
    }

    sums.iter()
        .zip(counts.iter())
        .zip(previous.iter())
        .map(|((sum, &count), old)| {
            if count == 0 {
                return *old;
            }
            let mut mean = [0.0; FEATURE_DIM];
            for i in 0..FEATURE_DIM {
                mean[i] = sum[i] / count as f64;
            }
            mean
        })
        .collect()
}

fn centroids_converged(old: &[FeatureVector], new: &[FeatureVector]) -> bool {
    old.iter()
        .zip(new.iter())
        .all(|(a, b)| squared_distance(a, b) <= CONVERGENCE_TOL * CONVERGENCE_TOL)
}

fn mean_of(members: &[&FeatureVector]) -> FeatureVector {
    let mut mean = [0.0; FEATURE_DIM];
    for member in members {
        for i in 0..FEATURE_DIM {
            mean[i] += member[i];
        }
    }
    for value in mean.iter_mut() {
        *value /= members.len() as f64;
    }
    mean
}
