//! End-to-end tests for the tech message matching pipeline

use std::io::Write;
use std::sync::Arc;
use tech_message_manager::catalog::service::{RecordDraft, TierDraft};
use tech_message_manager::catalog::{CatalogService, InMemoryCatalog};
use tech_message_manager::engine::{FuzzyRanker, PatternMatcher, SearchEngine};
use tech_message_manager::models::{MatchMode, MatchType, SearchQuery, Severity};

/// Helper to create a wired catalog service + search engine pair sharing
/// one store and one compiled-pattern cache
fn create_test_stack() -> (Arc<CatalogService>, SearchEngine) {
    let matcher = Arc::new(PatternMatcher::new());
    let store = Arc::new(InMemoryCatalog::new());

    let catalog = Arc::new(CatalogService::new(store.clone(), matcher.clone()));
    let engine = SearchEngine::new(store, matcher, FuzzyRanker::default());

    (catalog, engine)
}

fn database_draft() -> RecordDraft {
    RecordDraft {
        category: "Database".to_string(),
        severity: Severity::High,
        pattern: "connection timeout".to_string(),
        description: Some("Connection pool exhaustion on the primary".to_string()),
        action_tiers: vec![
            TierDraft {
                occurrence_min: 1,
                occurrence_max: Some(5),
                action_text: "check server".to_string(),
                priority: 1,
            },
            TierDraft {
                occurrence_min: 6,
                occurrence_max: None,
                action_text: "escalate".to_string(),
                priority: 2,
            },
        ],
    }
}

#[tokio::test]
async fn test_exact_match_with_tiered_recommendation() {
    let (catalog, engine) = create_test_stack();
    catalog.create_record(database_draft()).await.unwrap();

    let outcome = engine
        .search(&SearchQuery::new("connection timeout error on db1").with_occurrence_count(7))
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 1);
    assert!(!outcome.no_matches);

    let result = &outcome.matches[0];
    assert_eq!(result.match_type, MatchType::Exact);
    assert_eq!(result.match_score, 1.0);
    assert_eq!(
        result.recommended_action.as_ref().unwrap().action_text,
        "escalate"
    );
}

#[tokio::test]
async fn test_low_occurrence_count_selects_first_tier() {
    let (catalog, engine) = create_test_stack();
    catalog.create_record(database_draft()).await.unwrap();

    let outcome = engine
        .search(&SearchQuery::new("connection timeout error on db1").with_occurrence_count(3))
        .await
        .unwrap();

    assert_eq!(
        outcome.matches[0]
            .recommended_action
            .as_ref()
            .unwrap()
            .action_text,
        "check server"
    );
}

#[tokio::test]
async fn test_short_search_text_rejected_regardless_of_mode() {
    let (catalog, engine) = create_test_stack();
    catalog.create_record(database_draft()).await.unwrap();

    for mode in [MatchMode::Exact, MatchMode::Fuzzy, MatchMode::Both] {
        let err = engine
            .search(&SearchQuery::new("db").with_mode(mode))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_unmatched_query_reports_no_matches() {
    let (catalog, engine) = create_test_stack();
    catalog.create_record(database_draft()).await.unwrap();

    let outcome = engine
        .search(&SearchQuery::new("totally unrelated text"))
        .await
        .unwrap();

    assert!(outcome.matches.is_empty());
    assert!(outcome.no_matches);
}

#[tokio::test]
async fn test_record_hit_on_both_paths_appears_once_as_exact() {
    let (catalog, engine) = create_test_stack();
    catalog.create_record(database_draft()).await.unwrap();

    // Both keywords are pattern substrings, so the record also
    // qualifies on the fuzzy path alongside its regex hit
    let outcome = engine
        .search(&SearchQuery::new("connection timeout"))
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].match_type, MatchType::Exact);
}

#[tokio::test]
async fn test_fuzzy_results_ranked_below_exact_and_by_score() {
    let (catalog, engine) = create_test_stack();
    catalog.create_record(database_draft()).await.unwrap();
    catalog
        .create_record(RecordDraft {
            category: "Database Cluster".to_string(),
            severity: Severity::Critical,
            pattern: "replica lag exceeded".to_string(),
            description: Some("timeout applying redo log after connection loss".to_string()),
            action_tiers: vec![],
        })
        .await
        .unwrap();

    let outcome = engine
        .search(&SearchQuery::new("connection timeout"))
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(outcome.matches[0].match_type, MatchType::Exact);
    assert_eq!(outcome.matches[0].match_score, 1.0);
    assert_eq!(outcome.matches[1].match_type, MatchType::Fuzzy);
    assert!(outcome.matches[1].match_score < 1.0);
}

#[tokio::test]
async fn test_extracted_variables_surface_in_results() {
    let (catalog, engine) = create_test_stack();
    catalog
        .create_record(RecordDraft {
            category: "Storage".to_string(),
            severity: Severity::Critical,
            pattern: r"disk (?P<disk>\w+) at (?P<pct>\d+)% capacity".to_string(),
            description: None,
            action_tiers: vec![],
        })
        .await
        .unwrap();

    let outcome = engine
        .search(&SearchQuery::new("WARN disk sda1 at 97% capacity on host-3"))
        .await
        .unwrap();

    let result = &outcome.matches[0];
    let variables = result.extracted_variables.as_ref().unwrap();
    assert_eq!(variables.get("disk").unwrap(), "sda1");
    assert_eq!(variables.get("pct").unwrap(), "97");
    assert_eq!(
        result.matched_text.as_deref(),
        Some("disk sda1 at 97% capacity")
    );
}

#[tokio::test]
async fn test_identical_queries_return_identical_ordered_lists() {
    let (catalog, engine) = create_test_stack();
    for i in 0..6 {
        catalog
            .create_record(RecordDraft {
                category: format!("database-shard-{i}"),
                severity: Severity::Medium,
                pattern: format!("shard {i} unavailable"),
                description: Some("database shard health".to_string()),
                action_tiers: vec![],
            })
            .await
            .unwrap();
    }

    let query = SearchQuery::new("database").with_mode(MatchMode::Fuzzy);

    let first = engine.search(&query).await.unwrap();
    assert_eq!(first.matches.len(), 6);

    for _ in 0..5 {
        let again = engine.search(&query).await.unwrap();
        let ids: Vec<_> = first.matches.iter().map(|m| m.record.id).collect();
        let again_ids: Vec<_> = again.matches.iter().map(|m| m.record.id).collect();
        assert_eq!(ids, again_ids);
    }
}

#[tokio::test]
async fn test_edited_pattern_takes_effect_immediately() {
    let (catalog, engine) = create_test_stack();
    let record = catalog.create_record(database_draft()).await.unwrap();

    let outcome = engine
        .search(&SearchQuery::new("connection timeout on db1").with_mode(MatchMode::Exact))
        .await
        .unwrap();
    assert_eq!(outcome.matches.len(), 1);

    catalog
        .update_record(
            &record.id,
            tech_message_manager::catalog::service::RecordUpdate {
                pattern: Some("connection refused".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let outcome = engine
        .search(&SearchQuery::new("connection timeout on db1").with_mode(MatchMode::Exact))
        .await
        .unwrap();
    assert!(outcome.no_matches);

    let outcome = engine
        .search(&SearchQuery::new("connection refused by db1").with_mode(MatchMode::Exact))
        .await
        .unwrap();
    assert_eq!(outcome.matches.len(), 1);
}

#[tokio::test]
async fn test_seed_file_loads_and_skips_invalid_entries() {
    let (catalog, engine) = create_test_stack();

    let seed = serde_json::json!([
        {
            "category": "Database",
            "severity": "HIGH",
            "pattern": "connection timeout",
            "description": "Pool exhaustion",
            "actionTiers": [
                {"occurrenceMin": 1, "occurrenceMax": 5, "actionText": "check server", "priority": 1},
                {"occurrenceMin": 6, "actionText": "escalate", "priority": 2}
            ]
        },
        {
            "category": "Broken",
            "severity": "LOW",
            "pattern": "(unclosed",
            "actionTiers": []
        }
    ]);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", seed).unwrap();

    let loaded = catalog.seed_from_file(file.path()).await.unwrap();
    assert_eq!(loaded, 1);

    let outcome = engine
        .search(&SearchQuery::new("connection timeout seen").with_occurrence_count(2))
        .await
        .unwrap();
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(
        outcome.matches[0]
            .recommended_action
            .as_ref()
            .unwrap()
            .action_text,
        "check server"
    );
}
