//! End-to-end topic clustering tests.
//!
//! These drive clustering through the engine over a store seeded directly
//! with low-dimensional embeddings, so cluster geometry is controlled by
//! the test rather than by an embedding provider.

use std::sync::Arc;

use prospect::config::ConfigBuilder;
use prospect::core::OpportunityEngine;
use prospect::embedding::deterministic::HashEmbedding;
use prospect::models::{ArticleEmbedding, CitationHistoryPoint, CitationSnapshot, NOISE_LABEL};
use prospect::storage::{ArticleStore, BaseStore, ClusterStore, MemoryStore};
use prospect::{cluster::ClusterError, ProspectError};

/// Engine sharing a store handle the test can seed directly.
fn engine_with_store() -> (Arc<OpportunityEngine>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let config = ConfigBuilder::defaults().build().unwrap();
    let embedder = Arc::new(HashEmbedding::new(config.embedding.dimension));
    let engine = Arc::new(OpportunityEngine::new(
        store.clone(),
        embedder,
        config,
    ));
    (engine, store)
}

/// Two tight groups of 2D points plus one isolated outlier.
async fn seed_embeddings(store: &MemoryStore) {
    let points: &[(&str, [f32; 2])] = &[
        ("art-a1", [0.0, 0.0]),
        ("art-a2", [0.05, 0.0]),
        ("art-a3", [0.0, 0.05]),
        ("art-b1", [5.0, 5.0]),
        ("art-b2", [5.05, 5.0]),
        ("art-out", [40.0, -40.0]),
    ];
    for (id, point) in points {
        store
            .upsert_embedding(ArticleEmbedding::new(id.to_string(), point.to_vec()))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn rebuild_groups_embeddings_and_flags_noise() {
    let (engine, store) = engine_with_store();
    seed_embeddings(&store).await;

    let snapshot = engine.cluster_and_forecast().await.unwrap();

    assert_eq!(snapshot.clusters.len(), 2);
    assert_eq!(snapshot.assignments.len(), 6);
    assert!(snapshot.built_at.is_some());

    let label_of = |id: &str| {
        snapshot
            .assignments
            .iter()
            .find(|a| a.article_id == id)
            .map(|a| a.label)
            .unwrap()
    };
    assert_eq!(label_of("art-a1"), label_of("art-a2"));
    assert_eq!(label_of("art-a1"), label_of("art-a3"));
    assert_eq!(label_of("art-b1"), label_of("art-b2"));
    assert_ne!(label_of("art-a1"), label_of("art-b1"));
    assert_eq!(label_of("art-out"), NOISE_LABEL);

    // Member counts per cluster match the geometry.
    let mut counts: Vec<usize> = snapshot.clusters.iter().map(|c| c.member_count).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![2, 3]);

    // The persisted table matches the returned snapshot.
    let stored = store.list_clusters().await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn aggregate_velocity_reflects_member_citation_trajectories() {
    let (engine, store) = engine_with_store();
    seed_embeddings(&store).await;

    // Give one member of the first group a growing citation record; the
    // others stay data-free and contribute a neutral 0.0.
    store
        .put_citation_history(
            "art-a1",
            vec![
                CitationHistoryPoint { year: 2020, count: 5 },
                CitationHistoryPoint { year: 2021, count: 7 },
                CitationHistoryPoint { year: 2022, count: 9 },
            ],
        )
        .await
        .unwrap();
    store
        .add_citation_snapshot(CitationSnapshot::now("art-a1", 30, "test"))
        .await
        .unwrap();

    let snapshot = engine.cluster_and_forecast().await.unwrap();

    let label_of = |id: &str| {
        snapshot
            .assignments
            .iter()
            .find(|a| a.article_id == id)
            .map(|a| a.label)
            .unwrap()
    };
    let velocity_of = |label: i32| {
        snapshot
            .clusters
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.aggregate_velocity)
            .unwrap()
    };

    assert!(velocity_of(label_of("art-a1")) > 0.0);
    assert_eq!(velocity_of(label_of("art-b1")), 0.0);
}

#[tokio::test]
async fn failed_pass_preserves_the_previous_snapshot() {
    let (engine, store) = engine_with_store();
    seed_embeddings(&store).await;

    let first = engine.cluster_and_forecast().await.unwrap();
    assert_eq!(first.clusters.len(), 2);

    // Wipe the embedding corpus; the next pass has nothing to cluster and
    // must fail without disturbing what readers currently see.
    store.clear().await.unwrap();
    let err = engine.cluster_and_forecast().await.unwrap_err();
    assert!(matches!(
        err,
        ProspectError::Clustering(ClusterError::EmptyInput)
    ));

    let current = engine.current_clusters();
    assert_eq!(current.clusters.len(), 2);
    assert_eq!(current.built_at, first.built_at);
}

#[tokio::test]
async fn engine_starts_with_an_empty_snapshot() {
    let (engine, _store) = engine_with_store();
    let snapshot = engine.current_clusters();
    assert!(snapshot.clusters.is_empty());
    assert!(snapshot.assignments.is_empty());
    assert!(snapshot.built_at.is_none());
}
