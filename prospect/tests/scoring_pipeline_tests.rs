//! End-to-end scoring pipeline tests.
//!
//! These exercise the full path through the engine: search creation,
//! ingestion, raw signal computation with the deterministic embedding
//! provider, history-relative normalization, and persisted score records.

use prospect::ingestion::ArticleMetadata;
use prospect::prelude::*;
use prospect::scoring::ScoreError;

async fn engine() -> std::sync::Arc<OpportunityEngine> {
    init_with_defaults().await.expect("engine init")
}

fn bare_articles(prefix: &str, titles: &[&str]) -> Vec<ArticleMetadata> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            ArticleMetadata::bare(ArticleBuilder::new(format!("{prefix}-{i}"), *title).build())
        })
        .collect()
}

#[tokio::test]
async fn first_search_scores_one_on_every_dimension() {
    let engine = engine().await;
    let search = engine
        .create_search("zeolite catalysis", "zeolite framework catalysis", 25)
        .await
        .unwrap();

    // No citation data at all: velocity degrades to a flat raw 0.0 but the
    // run still completes, and an empty history normalizes everything to 1.0.
    let articles = bare_articles(
        "pmid",
        &[
            "Hierarchical zeolite synthesis routes",
            "Acid site engineering in ZSM-5",
            "Methanol-to-olefins reaction pathways",
        ],
    );
    engine.ingest_results(search.id, articles).await.unwrap();

    let record = engine.score(search.id).await.unwrap();
    assert_eq!(record.search_id, search.id);
    assert_eq!(record.novelty_score, 1.0);
    assert_eq!(record.citation_velocity_score, 1.0);
    assert_eq!(record.recency_score, 1.0);
    assert_eq!(record.overall_score, 1.0);
    assert_eq!(
        Recommendation::from_overall(record.overall_score),
        Recommendation::VeryHigh
    );
}

#[tokio::test]
async fn rescoring_against_a_grown_history_shifts_the_score() {
    let engine = engine().await;

    // First search: three articles with no token overlap with the query,
    // so its raw novelty sits well below 0.5.
    let first = engine
        .create_search("perovskite stability", "perovskite solar degradation", 25)
        .await
        .unwrap();
    engine
        .ingest_results(
            first.id,
            bare_articles(
                "pm-a",
                &[
                    "Grain boundary passivation techniques",
                    "Encapsulation under humid conditions",
                    "Ion migration suppression strategies",
                ],
            ),
        )
        .await
        .unwrap();
    engine.score(first.id).await.unwrap();

    // Second search: its single article's text is the query itself, so the
    // cosine similarity is 1.0 and raw novelty lands at 1.0 / 2 = 0.5.
    let second = engine
        .create_search("battery anodes", "silicon nanowire battery anode", 25)
        .await
        .unwrap();
    engine
        .ingest_results(
            second.id,
            bare_articles("pm-b", &["silicon nanowire battery anode"]),
        )
        .await
        .unwrap();
    let second_record = engine.score(second.id).await.unwrap();
    assert_eq!(second_record.novelty_score, 1.0);

    // Re-scoring the first search now normalizes against the second's
    // entry: its raw novelty is the new minimum, so the dimension drops to
    // 0.0 while velocity and recency (identical raws on both sides) stay
    // at 1.0.
    let rescored = engine.rescore(first.id).await.unwrap();
    assert_eq!(rescored.novelty_score, 0.0);
    assert_eq!(rescored.citation_velocity_score, 1.0);
    assert_eq!(rescored.recency_score, 1.0);
    assert_eq!(rescored.overall_score, 0.667);
    assert_eq!(
        Recommendation::from_overall(rescored.overall_score),
        Recommendation::High
    );
}

#[tokio::test]
async fn score_returns_the_existing_record_without_recomputing() {
    let engine = engine().await;
    let search = engine
        .create_search("idea", "keyword query", 10)
        .await
        .unwrap();
    engine
        .ingest_results(search.id, bare_articles("pm", &["Some article"]))
        .await
        .unwrap();

    let first = engine.score(search.id).await.unwrap();
    let second = engine.score(search.id).await.unwrap();
    assert_eq!(first.computed_at, second.computed_at);

    // A forced rescore produces a fresh record.
    let third = engine.rescore(search.id).await.unwrap();
    assert!(third.computed_at >= first.computed_at);
}

#[tokio::test]
async fn unscored_search_has_no_latest_score() {
    let engine = engine().await;
    let search = engine
        .create_search("idea", "keyword query", 10)
        .await
        .unwrap();
    assert!(engine.latest_score(search.id).await.unwrap().is_none());
}

#[tokio::test]
async fn search_without_articles_cannot_be_scored() {
    let engine = engine().await;
    let search = engine
        .create_search("idea", "keyword query", 10)
        .await
        .unwrap();

    let err = engine.score(search.id).await.unwrap_err();
    assert!(matches!(
        err,
        ProspectError::Scoring(ScoreError::NoArticles(id)) if id == search.id
    ));
}

#[tokio::test]
async fn unknown_search_id_is_reported_as_not_found() {
    let engine = engine().await;
    let bogus = uuid::Uuid::new_v4();
    let err = engine.score(bogus).await.unwrap_err();
    assert!(matches!(
        err,
        ProspectError::Scoring(ScoreError::SearchNotFound(id)) if id == bogus
    ));
}

#[tokio::test]
async fn mixed_citation_coverage_still_scores() {
    let engine = engine().await;
    let search = engine
        .create_search("idea", "graphene oxide membranes", 10)
        .await
        .unwrap();

    let with_citations = ArticleMetadata {
        article: ArticleBuilder::new("pm-cited", "Graphene oxide water filtration")
            .publication_date(chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
            .build(),
        citation_count: Some(40),
        citation_history: vec![(2024, 15), (2025, 25)],
    };
    let without = ArticleMetadata::bare(
        ArticleBuilder::new("pm-uncited", "Membrane fouling mechanisms").build(),
    );
    engine
        .ingest_results(search.id, vec![with_citations, without])
        .await
        .unwrap();

    // First run against an empty history: whatever the raws, everything
    // normalizes to 1.0. The point is that partial citation coverage does
    // not abort the run.
    let record = engine.score(search.id).await.unwrap();
    assert_eq!(record.overall_score, 1.0);
}
