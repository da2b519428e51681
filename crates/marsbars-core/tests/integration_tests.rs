//! Integration tests for marsbars-core
//!
//! These tests exercise the full submit → analyze → cache → export workflow
//! through the public API.

use std::sync::Arc;
use std::time::Duration;

use marsbars_core::{
    generate_fallback, total_quantity, AIClient, CacheKey, Error, ExportReport, MockBackend,
    MockReply, PromptLibrary, ReportSummary, ResultCache, ResultSource, WasteAnalyzer, WasteEntry,
    MAX_TOTAL_QUANTITY_KG,
};

fn mission_batch() -> Vec<WasteEntry> {
    vec![
        WasteEntry::new("1", "Plastics (PET)", 10.0, "Life Support Systems")
            .with_description("clean bottles"),
        WasteEntry::new("2", "Aluminum", 5.0, "Research Equipment").with_contamination(3.0),
        WasteEntry::new("3", "EVA Waste", 2.5, "Residence Renovations"),
    ]
}

fn analyzer(mock: &MockBackend) -> WasteAnalyzer {
    WasteAnalyzer::new(
        Some(AIClient::Mock(mock.clone())),
        Arc::new(ResultCache::new()),
        &mut PromptLibrary::embedded_only(),
        Duration::from_secs(5),
    )
    .expect("analyzer")
}

// =============================================================================
// Analysis Workflow
// =============================================================================

#[tokio::test]
async fn test_repeat_submission_makes_one_model_call() {
    let mock = MockBackend::new();
    let analyzer = analyzer(&mock);

    let first = analyzer.analyze(&mission_batch()).await.unwrap();
    let mut reordered = mission_batch();
    reordered.reverse();
    let second = analyzer.analyze(&reordered).await.unwrap();

    assert_eq!(first.source, ResultSource::Model);
    assert_eq!(second.source, ResultSource::Cache);
    assert_eq!(first.result, second.result);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_changed_field_forces_new_call() {
    let mock = MockBackend::new();
    let analyzer = analyzer(&mock);

    analyzer.analyze(&mission_batch()).await.unwrap();

    let mut changed = mission_batch();
    changed[1].contamination = Some(4.0);
    let analysis = analyzer.analyze(&changed).await.unwrap();

    assert_eq!(analysis.source, ResultSource::Model);
    assert_eq!(mock.calls(), 2);
    assert_eq!(analyzer.cache().len(), 2);
}

#[tokio::test]
async fn test_prose_reply_falls_back_to_deterministic_result() {
    let mock = MockBackend::with_reply(MockReply::Text("Mars is lovely this time of year.".into()));
    let analyzer = analyzer(&mock);
    let entries = mission_batch();

    let analysis = analyzer.analyze(&entries).await.unwrap();

    assert_eq!(analysis.source, ResultSource::Fallback);
    assert_eq!(
        analysis.result,
        generate_fallback(total_quantity(&entries), &entries)
    );
    assert_eq!(analysis.total_quantity, 17.5);
}

#[tokio::test]
async fn test_cache_shared_between_analyzers() {
    let cache = Arc::new(ResultCache::new());
    let mock = MockBackend::new();
    let mut prompts = PromptLibrary::embedded_only();

    let a = WasteAnalyzer::new(
        Some(AIClient::Mock(mock.clone())),
        cache.clone(),
        &mut prompts,
        Duration::from_secs(5),
    )
    .unwrap();
    let b = WasteAnalyzer::new(
        Some(AIClient::Mock(mock.clone())),
        cache.clone(),
        &mut prompts,
        Duration::from_secs(5),
    )
    .unwrap();

    a.analyze(&mission_batch()).await.unwrap();
    let analysis = b.analyze(&mission_batch()).await.unwrap();

    assert_eq!(analysis.source, ResultSource::Cache);
    assert!(cache.contains(&CacheKey::from_entries(&mission_batch())));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_unreachable_model_is_retried_on_resubmission() {
    let mock = MockBackend::with_reply(MockReply::Error("connection refused".into()));
    let analyzer = analyzer(&mock);

    let first = analyzer.analyze(&mission_batch()).await.unwrap();
    let second = analyzer.analyze(&mission_batch()).await.unwrap();

    assert_eq!(first.source, ResultSource::Fallback);
    assert_eq!(second.source, ResultSource::Fallback);
    assert_eq!(mock.calls(), 2);
    assert!(analyzer.cache().is_empty());
}

#[tokio::test]
async fn test_oversized_batch_is_rejected_before_the_model() {
    let mock = MockBackend::new();
    let analyzer = analyzer(&mock);
    let entries = vec![WasteEntry::new("1", "Aluminum", 1e308, "Research Equipment")];

    assert!(matches!(
        analyzer.analyze(&entries).await,
        Err(Error::InvalidEntries(_))
    ));
    assert_eq!(mock.calls(), 0);
}

// =============================================================================
// Export and Summary
// =============================================================================

#[tokio::test]
async fn test_export_round_trips_largest_batch() {
    let mock = MockBackend::with_reply(MockReply::Text("not json".into()));
    let analyzer = analyzer(&mock);
    let entries = vec![WasteEntry::new("1", "Aluminum", MAX_TOTAL_QUANTITY_KG, "Research Equipment")];
    let analysis = analyzer.analyze(&entries).await.unwrap();
    assert_eq!(analysis.source, ResultSource::Fallback);

    let dir = tempfile::tempdir().unwrap();
    let path = ExportReport::new(entries, analysis.result.clone())
        .write_to_dir(dir.path())
        .unwrap();

    let loaded = ExportReport::read_from_path(&path).unwrap();
    assert_eq!(loaded.results, analysis.result);
}

#[tokio::test]
async fn test_export_round_trips_displayed_result() {
    let analyzer = analyzer(&MockBackend::new());
    let entries = mission_batch();
    let analysis = analyzer.analyze(&entries).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let report = ExportReport::new(entries.clone(), analysis.result.clone());
    let path = report.write_to_dir(dir.path()).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("mars-recycling-report-"));
    assert!(name.ends_with(".json"));

    let loaded = ExportReport::read_from_path(&path).unwrap();
    assert_eq!(loaded.results, analysis.result);
    assert_eq!(loaded.waste_inputs, entries);
}

#[tokio::test]
async fn test_summary_for_analysis() {
    let analyzer = analyzer(&MockBackend::new());
    let entries = mission_batch();
    let analysis = analyzer.analyze(&entries).await.unwrap();

    let summary = ReportSummary::build(&entries, &analysis.result);
    assert_eq!(summary.by_material.len(), 3);
    assert_eq!(summary.by_source[0].label, "Life Support Systems");
    assert_eq!(summary.outputs.len(), analysis.result.outputs.len());
}
