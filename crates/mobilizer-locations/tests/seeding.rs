//! Integration tests for duplicate-free seeding.

mod common;

use mobilizer_core::HierarchyLevel;
use mobilizer_locations::{
    location_id, read_csv_records, read_tuple_lines, DelimitationValidator, LocationStore,
    SeedMode,
};

use common::{TestContext, CSV_DUMP, TUPLE_DUMP};

#[tokio::test]
async fn test_dry_run_reports_without_writing() {
    let ctx = TestContext::new();
    let outcome = ctx
        .service
        .seed(&read_tuple_lines(TUPLE_DUMP), SeedMode::DryRun)
        .await
        .unwrap();

    assert_eq!(outcome.mode, SeedMode::DryRun);
    assert_eq!(outcome.inserted, 0);
    assert_eq!(ctx.store.count().await.unwrap(), 0);

    let levels = &outcome.summary.nodes_by_level;
    assert_eq!(levels[&HierarchyLevel::Country], 1);
    assert_eq!(levels[&HierarchyLevel::State], 2);
    assert_eq!(levels[&HierarchyLevel::Lga], 2);
    assert_eq!(levels[&HierarchyLevel::Ward], 3);
    // The repeated 'Oja Oba' row in ward 7 is skipped. 'Kofar Yamma' sits in
    // two different wards and is seeded twice.
    assert_eq!(levels[&HierarchyLevel::PollingUnit], 5);
    assert_eq!(outcome.summary.skipped_duplicates, 1);
    assert_eq!(outcome.summary.total_nodes(), 13);
}

#[tokio::test]
async fn test_commit_is_idempotent() {
    let ctx = TestContext::new();
    let records = read_tuple_lines(TUPLE_DUMP);

    let first = ctx.service.seed(&records, SeedMode::Commit).await.unwrap();
    assert_eq!(first.inserted, 13);

    let second = ctx.service.seed(&records, SeedMode::Commit).await.unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(ctx.store.count().await.unwrap(), 13);
}

#[tokio::test]
async fn test_committed_tree_is_navigable() {
    let ctx = TestContext::new();
    ctx.service
        .seed(&read_tuple_lines(TUPLE_DUMP), SeedMode::Commit)
        .await
        .unwrap();

    let country = ctx.store.get(location_id("1")).await.unwrap().unwrap();
    assert_eq!(country.level, HierarchyLevel::Country);
    assert!(country.parent_id.is_none());

    let ward = location_id("1/20/1/1");
    let units = ctx.store.children(ward).await.unwrap();
    let names: Vec<&str> = units.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Kofar Yamma Pri. Sch.", "Gidan Sarki"]);
    let codes: Vec<Option<&str>> = units.iter().map(|n| n.code.as_deref()).collect();
    assert_eq!(codes, vec![Some("001"), Some("002")]);
}

#[tokio::test]
async fn test_csv_and_tuple_sources_agree_on_ids() {
    let tuple_ctx = TestContext::new();
    let csv_ctx = TestContext::new();

    tuple_ctx
        .service
        .seed(&read_tuple_lines(TUPLE_DUMP), SeedMode::Commit)
        .await
        .unwrap();
    csv_ctx
        .service
        .seed(&read_csv_records(CSV_DUMP.as_bytes()).unwrap(), SeedMode::Commit)
        .await
        .unwrap();

    // Every node seeded from the CSV export exists in the tuple-seeded store.
    for key in ["1", "1/20", "1/20/1", "1/20/1/1", "1/20/1/2"] {
        assert!(tuple_ctx.store.get(location_id(key)).await.unwrap().is_some());
        assert!(csv_ctx.store.get(location_id(key)).await.unwrap().is_some());
    }
    let pu = location_id("1/20/1/2#Kofar Yamma Pri. Sch.");
    assert!(tuple_ctx.store.get(pu).await.unwrap().is_some());
    assert!(csv_ctx.store.get(pu).await.unwrap().is_some());
}

#[tokio::test]
async fn test_oversized_batch_writes_nothing() {
    let ctx = TestContext::with_validator(DelimitationValidator::with_max_rows(2));
    assert!(ctx
        .service
        .seed(&read_tuple_lines(TUPLE_DUMP), SeedMode::Commit)
        .await
        .is_err());
    assert_eq!(ctx.store.count().await.unwrap(), 0);
}
