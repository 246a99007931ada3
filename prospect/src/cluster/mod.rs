//! Density-based topic clustering over article embeddings.
//!
//! Every pass is a full rebuild: DBSCAN runs over the whole embedding
//! corpus, per-cluster centroids and forecasted velocities are computed,
//! and only then is the stored cluster table replaced in one atomic write.
//! A pass that fails part-way leaves the previous clusters untouched, both
//! in storage and in the in-memory snapshot the engine hands to readers.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use linfa::traits::Transformer;
use linfa::DatasetBase;
use linfa_clustering::Dbscan;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ClusteringConfig;
use crate::forecast::CitationForecaster;
use crate::models::{ClusterAssignment, TopicCluster, NOISE_LABEL};
use crate::storage::{OpportunityStore, StorageError};

/// Error type for clustering passes
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// No embeddings exist to cluster
    #[error("No article embeddings available for clustering")]
    EmptyInput,

    /// Embedding vectors are unusable (zero-length or inconsistent dims)
    #[error("Degenerate embedding input: {0}")]
    DegenerateInput(String),

    /// The clustering algorithm itself failed
    #[error("Clustering algorithm failed: {0}")]
    Algorithm(String),

    /// A storage operation failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The complete output of one successful clustering pass.
///
/// Snapshots are immutable; the engine swaps a shared pointer to the
/// current one so readers never observe a partially rebuilt state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClusterSnapshot {
    /// All topic clusters (noise points form no cluster)
    pub clusters: Vec<TopicCluster>,

    /// Label assignment for every clustered article, noise included
    pub assignments: Vec<ClusterAssignment>,

    /// When the pass completed
    pub built_at: Option<DateTime<Utc>>,
}

impl ClusterSnapshot {
    /// A snapshot representing "no pass has run yet".
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Run DBSCAN over the given vectors and return one label per input.
///
/// Noise points get [`NOISE_LABEL`]; cluster labels are the dense
/// non-negative ids the algorithm assigns. Label numbers may permute
/// between runs, but the induced partition is stable for identical input.
pub fn dbscan_labels(vectors: &[Vec<f32>], config: &ClusteringConfig) -> Result<Vec<i32>, ClusterError> {
    if vectors.is_empty() {
        return Err(ClusterError::EmptyInput);
    }
    let dim = vectors[0].len();
    if dim == 0 {
        return Err(ClusterError::DegenerateInput("zero-dimensional vectors".into()));
    }
    if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
        return Err(ClusterError::DegenerateInput(format!(
            "inconsistent vector dimensions: expected {dim}, found {}",
            bad.len()
        )));
    }

    let mut data = Array2::zeros((vectors.len(), dim));
    for (i, vector) in vectors.iter().enumerate() {
        for (j, &value) in vector.iter().enumerate() {
            data[[i, j]] = f64::from(value);
        }
    }

    let dataset = DatasetBase::from(data);
    let clustered = Dbscan::params(config.min_cluster_size)
        .tolerance(config.tolerance)
        .transform(dataset)
        .map_err(|e| ClusterError::Algorithm(format!("{e:?}")))?;

    Ok(clustered
        .targets()
        .iter()
        .map(|label| match label {
            Some(id) => *id as i32,
            None => NOISE_LABEL,
        })
        .collect())
}

/// Mean vector of a set of member embeddings.
fn centroid(vectors: &[&Vec<f32>]) -> Vec<f32> {
    let dim = vectors.first().map_or(0, |v| v.len());
    let mut mean = vec![0.0f32; dim];
    for vector in vectors {
        for (slot, value) in mean.iter_mut().zip(vector.iter()) {
            *slot += value;
        }
    }
    let n = vectors.len() as f32;
    for slot in &mut mean {
        *slot /= n;
    }
    mean
}

/// Engine that performs full clustering rebuild passes.
#[derive(Debug, Clone)]
pub struct ClusterEngine {
    store: Arc<dyn OpportunityStore>,
    forecaster: CitationForecaster,
    config: ClusteringConfig,
}

impl ClusterEngine {
    /// Create an engine over the given store.
    pub fn new(
        store: Arc<dyn OpportunityStore>,
        forecaster: CitationForecaster,
        config: ClusteringConfig,
    ) -> Self {
        Self {
            store,
            forecaster,
            config,
        }
    }

    /// Run one full clustering pass and persist the result.
    ///
    /// The stored cluster table is replaced only after labels, centroids,
    /// and aggregate velocities have all been computed successfully, so an
    /// error anywhere leaves the previous pass's output in place.
    pub async fn rebuild(&self) -> Result<ClusterSnapshot, ClusterError> {
        let embeddings = self.store.list_embeddings().await?;
        if embeddings.is_empty() {
            return Err(ClusterError::EmptyInput);
        }

        let vectors: Vec<Vec<f32>> = embeddings.iter().map(|e| e.vector.clone()).collect();
        let labels = dbscan_labels(&vectors, &self.config)?;
        debug!(articles = embeddings.len(), "clustering labels computed");

        // Group member indices per non-noise label, deterministically.
        let mut members: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (index, &label) in labels.iter().enumerate() {
            if label != NOISE_LABEL {
                members.entry(label).or_default().push(index);
            }
        }

        let now = Utc::now();
        let mut clusters = Vec::with_capacity(members.len());
        for (label, indices) in &members {
            let member_vectors: Vec<&Vec<f32>> =
                indices.iter().map(|&i| &embeddings[i].vector).collect();

            let mut velocity_sum = 0.0;
            for &index in indices {
                let article_id = &embeddings[index].article_id;
                let history = self.store.citation_history(article_id).await?;
                let total = self.store.latest_citation_count(article_id).await?;
                velocity_sum += self
                    .forecaster
                    .forecast_velocity(&history, total)
                    .value_or_zero();
            }

            clusters.push(TopicCluster {
                label: *label,
                centroid: centroid(&member_vectors),
                member_count: indices.len(),
                aggregate_velocity: velocity_sum / indices.len() as f64,
                last_updated: now,
            });
        }

        let assignments: Vec<ClusterAssignment> = embeddings
            .iter()
            .zip(labels.iter())
            .map(|(embedding, &label)| ClusterAssignment {
                article_id: embedding.article_id.clone(),
                label,
            })
            .collect();

        self.store
            .replace_clusters(assignments.clone(), clusters.clone())
            .await?;

        info!(
            clusters = clusters.len(),
            noise = assignments.iter().filter(|a| a.label == NOISE_LABEL).count(),
            "clustering pass completed"
        );

        Ok(ClusterSnapshot {
            clusters,
            assignments,
            built_at: Some(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn tight_groups() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![0.05, 0.0],
            vec![0.0, 0.05],
            vec![5.0, 5.0],
            vec![5.05, 5.0],
            vec![5.0, 5.05],
            vec![40.0, -40.0], // isolated noise point
        ]
    }

    fn config() -> ClusteringConfig {
        ClusteringConfig {
            min_cluster_size: 2,
            tolerance: 0.5,
        }
    }

    #[test]
    fn every_input_gets_exactly_one_label() {
        let vectors = tight_groups();
        let labels = dbscan_labels(&vectors, &config()).unwrap();
        assert_eq!(labels.len(), vectors.len());
    }

    #[test]
    fn tight_groups_form_two_clusters_with_noise() {
        let labels = dbscan_labels(&tight_groups(), &config()).unwrap();
        let distinct: HashSet<i32> = labels.iter().copied().filter(|&l| l != NOISE_LABEL).collect();
        assert_eq!(distinct.len(), 2);
        assert_eq!(labels[6], NOISE_LABEL);
        // Points within one group share a label.
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn reruns_yield_the_same_partition() {
        let vectors = tight_groups();
        let first = dbscan_labels(&vectors, &config()).unwrap();
        let second = dbscan_labels(&vectors, &config()).unwrap();

        // Label numbers may permute; the induced partition must not.
        let mut mapping: HashMap<i32, i32> = HashMap::new();
        for (a, b) in first.iter().zip(second.iter()) {
            let expected = *mapping.entry(*a).or_insert(*b);
            assert_eq!(expected, *b);
        }
    }

    #[test]
    fn empty_and_degenerate_input_are_rejected() {
        assert!(matches!(
            dbscan_labels(&[], &config()),
            Err(ClusterError::EmptyInput)
        ));
        assert!(matches!(
            dbscan_labels(&[vec![]], &config()),
            Err(ClusterError::DegenerateInput(_))
        ));
        assert!(matches!(
            dbscan_labels(&[vec![1.0, 2.0], vec![1.0]], &config()),
            Err(ClusterError::DegenerateInput(_))
        ));
    }

    #[test]
    fn centroid_is_member_mean() {
        let a = vec![0.0, 2.0];
        let b = vec![2.0, 0.0];
        assert_eq!(centroid(&[&a, &b]), vec![1.0, 1.0]);
    }
}
