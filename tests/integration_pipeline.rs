// tests/integration_pipeline.rs
//! End-to-end runs against an on-disk store.

use anyhow::Result;
use collabnet_core::config::AnalysisConfig;
use collabnet_core::dataset::Dataset;
use collabnet_core::events::{self, EventKind, EventLogger};
use collabnet_core::hypothesis::{HypothesisOutcome, BETWEENNESS, HETEROGENEITY};
use collabnet_core::pipeline::Pipeline;
use collabnet_core::store::SqliteStore;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TRIANGLE: &str = r#"{
    "artists": [
        {"id": "A", "name": "Alpha", "genres": "['pop', 'funk']"},
        {"id": "B", "name": "Beta", "genres": "['pop']"},
        {"id": "C", "name": "Gamma", "genres": "['axe']"}
    ],
    "songs": [
        {"id": "S1", "name": "one", "popularity": 70, "artist_ids": ["A", "B"]},
        {"id": "S2", "name": "two", "popularity": 50, "artist_ids": ["B", "C"]},
        {"id": "S3", "name": "three", "popularity": 90, "artist_ids": ["A", "B", "C"]}
    ]
}"#;

/// Ten artists on a chain, one duet per neighbouring pair and one solo hit
/// each. Genre counts cycle through 1, 2 and 3.
fn chain_dataset() -> String {
    let genres = ["['pop']", "['funk', 'pop']", "['axe', 'sertanejo', 'pop']"];
    let artists: Vec<_> = (0..10)
        .map(|i| json!({"id": format!("A{i}"), "name": format!("Artist {i}"), "genres": genres[i % 3]}))
        .collect();

    let mut songs = Vec::new();
    for i in 0..10u32 {
        songs.push(json!({
            "id": format!("solo{i:02}"),
            "name": format!("Solo {i}"),
            "popularity": 30 + (i * 7) % 40,
            "danceability": f64::from((i * 37) % 100) / 100.0 + 0.01,
            "energy": f64::from((i * 53 + 11) % 97) / 97.0,
            "artist_ids": [format!("A{i}")]
        }));
    }
    for i in 0..9u32 {
        songs.push(json!({
            "id": format!("duet{i:02}"),
            "name": format!("Duet {i}"),
            "popularity": 45 + (i * 11) % 50,
            "danceability": f64::from((i * 29 + 5) % 100) / 100.0,
            "energy": f64::from((i * 17 + 3) % 89) / 89.0,
            "artist_ids": [format!("A{i}"), format!("A{}", i + 1)]
        }));
    }
    json!({"artists": artists, "songs": songs}).to_string()
}

fn store_with(dir: &Path, name: &str, document: &str) -> Result<SqliteStore> {
    let file = dir.join(format!("{name}.json"));
    fs::write(&file, document)?;
    let mut store = SqliteStore::open(&dir.join(format!("{name}.db")))?;
    store.replace_dataset(&Dataset::load(&file)?)?;
    Ok(store)
}

#[test]
fn test_triangle_scenario() -> Result<()> {
    let dir = TempDir::new()?;
    let mut store = store_with(dir.path(), "triangle", TRIANGLE)?;
    let config = AnalysisConfig::default();

    let report = Pipeline::new(&mut store, &config, EventLogger::disabled()).analyze()?;
    assert_eq!(report.network.nodes, 3);
    assert_eq!(report.network.edges, 3);
    // A-B twice, B-C twice, A-C once.
    assert_eq!(report.network.total_weight, 5);

    let snap = store.snapshot()?;
    for id in ["A", "B", "C"] {
        assert_eq!(snap.artists[id].degree, Some(1.0), "{id}");
        assert_eq!(snap.artists[id].betweenness, Some(0.0), "{id}");
    }
    assert_eq!(snap.artists["B"].num_hits, Some(3));
    assert_eq!(snap.artists["C"].num_collab_hits, Some(2));

    let s3 = snap.songs.iter().find(|s| s.id == "S3").expect("S3 stored");
    assert_eq!(s3.genre_heterogeneity, Some(1.0));
    assert_eq!(s3.avg_artist_betweenness, Some(0.0));
    Ok(())
}

#[test]
fn test_repeated_runs_are_identical() -> Result<()> {
    let dir = TempDir::new()?;
    let document = chain_dataset();
    let config = AnalysisConfig::default();

    let mut first = store_with(dir.path(), "first", &document)?;
    let mut second = store_with(dir.path(), "second", &document)?;
    let a = Pipeline::new(&mut first, &config, EventLogger::disabled()).run()?;
    let b = Pipeline::new(&mut second, &config, EventLogger::disabled()).run()?;

    assert_eq!(a.communities, b.communities);
    assert_eq!(a.analysis.network, b.analysis.network);

    let (sa, sb) = (first.snapshot()?, second.snapshot()?);
    for (id, artist) in &sa.artists {
        let other = &sb.artists[id];
        assert_eq!(
            artist.betweenness.map(f64::to_bits),
            other.betweenness.map(f64::to_bits),
            "{id}"
        );
    }
    Ok(())
}

#[test]
fn test_chain_regression_is_fitted() -> Result<()> {
    let dir = TempDir::new()?;
    let mut store = store_with(dir.path(), "chain", &chain_dataset())?;
    let config = AnalysisConfig::default();

    let report = Pipeline::new(&mut store, &config, EventLogger::disabled()).run()?;
    assert_eq!(report.analysis.songs_written, 19);
    assert_eq!(report.analysis.network.nodes, 10);
    assert_eq!(report.analysis.network.edges, 9);

    let HypothesisOutcome::Fitted(fit) = &report.hypothesis else {
        panic!("expected a fitted regression, got {:?}", report.hypothesis);
    };
    assert_eq!(fit.complete_rows, 19);
    assert_eq!(fit.fit.terms.len(), 5);
    assert!(fit.fit.term(BETWEENNESS).is_some());
    assert!(fit.fit.term(HETEROGENEITY).is_some());
    assert!((0.0..=1.0).contains(&fit.fit.r_squared));
    Ok(())
}

#[test]
fn test_constant_betweenness_fails_fit() -> Result<()> {
    // Solo hits only: every song has betweenness 0.
    let songs: Vec<_> = (0..12u32)
        .map(|i| {
            json!({
                "id": format!("s{i:02}"),
                "popularity": 20 + i * 5,
                "danceability": f64::from(i) / 12.0,
                "energy": f64::from((i * 5) % 12) / 12.0,
                "artist_ids": [format!("a{}", i % 4)]
            })
        })
        .collect();
    let artists: Vec<_> = (0..4)
        .map(|i| json!({"id": format!("a{i}"), "name": format!("Solo {i}"), "genres": "['pop']"}))
        .collect();
    let document = json!({"artists": artists, "songs": songs}).to_string();

    let dir = TempDir::new()?;
    let mut store = store_with(dir.path(), "solo", &document)?;
    let config = AnalysisConfig::default();
    let report = Pipeline::new(&mut store, &config, EventLogger::disabled()).run()?;

    match &report.hypothesis {
        HypothesisOutcome::Failed { complete_rows, .. } => assert_eq!(*complete_rows, 12),
        other => panic!("expected a failed fit, got {other:?}"),
    }
    // Metrics are still persisted.
    assert_eq!(report.analysis.songs_written, 12);
    assert_eq!(report.communities.count, 0);
    Ok(())
}

#[test]
fn test_run_appends_events() -> Result<()> {
    let dir = TempDir::new()?;
    let mut store = store_with(dir.path(), "events", TRIANGLE)?;
    let config = AnalysisConfig::default();
    let logger = EventLogger::new(&dir.path().join(".collabnet"));
    let log = logger.path().expect("enabled logger").to_path_buf();

    Pipeline::new(&mut store, &config, logger).run()?;

    let kinds: Vec<EventKind> = events::read_events(&log)?
        .into_iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(kinds.first(), Some(&EventKind::RunStarted { seed: 42 }));
    assert!(kinds.contains(&EventKind::GraphBuilt { nodes: 3, edges: 3 }));
    assert!(kinds.contains(&EventKind::ArtistMetricsWritten { count: 3 }));
    assert!(kinds
        .iter()
        .any(|k| matches!(k, EventKind::RegressionFailed { .. })));
    Ok(())
}
