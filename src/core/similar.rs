use crate::core::cluster::ClusterModel;
use crate::models::UserProfile;

/// Default number of peers returned
pub const DEFAULT_SIMILAR_TOP_N: usize = 5;

/// Find same-segment peers for a user
///
/// Predicts the target's cluster with the fitted model, then scans the
/// population in iteration order collecting other users assigned to the same
/// cluster, stopping at `top_n`. The target is excluded by email; results
/// are not distance-ranked within the cluster.
pub fn find_similar_users<'a>(
    user: &UserProfile,
    population: &'a [UserProfile],
    model: &ClusterModel,
    top_n: usize,
) -> Vec<&'a UserProfile> {
    let target_cluster = model.predict(user);

    population
        .iter()
        .filter(|other| other.email != user.email)
        .filter(|other| model.predict(other) == target_cluster)
        .take(top_n)
        .collect()
}
