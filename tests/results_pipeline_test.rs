//! Results pipeline tests: summarize -> build -> store -> parse

use breeding_results::config::{ModelConfig, RunConfig};
use breeding_results::experiment::{
    CellValue, HistorySummarizer, Layout, MetricLog, ResultRowBuilder, ResultStore,
    ResultsParser, RunMetadata, CONFIG_COLUMN, LEADING_COLUMNS, TRAILING_COLUMNS,
};
use breeding_results::pipeline::RunRecorder;

/// Ten epochs, `val_pearson` rising linearly from 0.1 to 1.0.
fn linear_log() -> MetricLog {
    let epochs: Vec<f64> = (1..=10).map(|i| f64::from(i) / 10.0).collect();
    MetricLog::from_series([
        ("loss", epochs.iter().map(|v| 1.0 - v).collect()),
        ("pearson", epochs.clone()),
        ("rmse", epochs.iter().map(|v| 2.0 * v).collect()),
        ("val_loss", epochs.iter().map(|v| 1.1 - v).collect()),
        ("val_pearson", epochs),
        ("val_rmse", vec![0.5; 10]),
    ])
    .unwrap()
}

fn sample_config() -> RunConfig {
    RunConfig::new()
        .with("conv_layers", vec![32, 64])
        .with("learn_rate", 0.001)
}

// =============================================================================
// HistorySummarizer
// =============================================================================

#[test]
fn test_end_to_end_window_mean_and_max() {
    let log = linear_log();
    let summary = HistorySummarizer::new(6).summarize(&log);

    // epochs 3..=8 (0-indexed): mean(0.4, 0.5, 0.6, 0.7, 0.8, 0.9)
    assert!((summary.get("val_pearson").unwrap() - 0.65).abs() < 1e-12);

    let meta = RunMetadata::new("milk", 500).replicate(1);
    let row = ResultRowBuilder::new(Layout::Embedded)
        .build(&log, &summary, &sample_config(), &meta)
        .unwrap();

    let max = row.get("max_val_pearson").and_then(CellValue::as_f64).unwrap();
    assert!((max - 1.0).abs() < 1e-12);
    assert_eq!(row.get("n_epochs"), Some(&CellValue::Int(10)));
}

#[test]
fn test_window_clamp_single_epoch() {
    let log = MetricLog::from_series([("val_pearson", vec![0.42])]).unwrap();
    let summary = HistorySummarizer::new(6).summarize(&log);
    assert!(summary.get("val_pearson").unwrap().is_nan());

    let meta = RunMetadata::new("milk", 10);
    let row = ResultRowBuilder::default()
        .build(&log, &summary, &RunConfig::new(), &meta)
        .unwrap();
    // The full-log maximum is still defined
    assert_eq!(row.get("max_val_pearson"), Some(&CellValue::Float(0.42)));
}

// =============================================================================
// ResultRowBuilder
// =============================================================================

#[test]
fn test_embedded_column_order_is_canonical() {
    let log = linear_log();
    let summary = HistorySummarizer::default().summarize(&log);
    let meta = RunMetadata::new("milk", 500)
        .validation_split(0.2)
        .nparams(1234)
        .replicate("r1");

    let row = ResultRowBuilder::new(Layout::Embedded)
        .build(&log, &summary, &sample_config(), &meta)
        .unwrap();

    let expected: Vec<&str> = LEADING_COLUMNS
        .iter()
        .chain(TRAILING_COLUMNS.iter())
        .copied()
        .chain(std::iter::once(CONFIG_COLUMN))
        .collect();
    assert_eq!(row.column_names().collect::<Vec<_>>(), expected);
    assert_eq!(row.get("nparams"), Some(&CellValue::Int(1234)));
    assert_eq!(row.get("replicate"), Some(&CellValue::from("r1")));
}

#[test]
fn test_missing_metrics_become_missing_cells() {
    let log = MetricLog::from_series([("loss", vec![1.0, 0.5, 0.4])]).unwrap();
    let summary = HistorySummarizer::default().summarize(&log);
    let meta = RunMetadata::new("milk", 500);

    let row = ResultRowBuilder::new(Layout::Wide)
        .build(&log, &summary, &sample_config(), &meta)
        .unwrap();

    for column in ["pearson", "val_pearson", "max_val_pearson", "nparams", "replicate"] {
        assert!(row.has_column(column), "{column} should be present");
        assert_eq!(row.get(column), None, "{column} should be missing");
    }
}

// =============================================================================
// ResultStore
// =============================================================================

#[test]
fn test_create_then_append() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/results/milk.csv");
    let log = linear_log();
    let summary = HistorySummarizer::new(6).summarize(&log);
    let meta = RunMetadata::new("milk", 500).replicate(1);
    let row = ResultRowBuilder::default()
        .build(&log, &summary, &sample_config(), &meta)
        .unwrap();

    let store = ResultStore::new();
    let first = store.append_row(&row, &path).unwrap();
    assert!(first.is_created());
    assert!(first.message().starts_with("Creating file"));

    let second = store.append_row(&row, &path).unwrap();
    assert!(!second.is_created());
    assert!(second.message().contains("appending"));

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(",trait,sample_size,"));
    assert!(lines[1].starts_with("0,milk,500,"));
    assert!(lines[2].starts_with("0,milk,500,"));
    assert_eq!(text.matches("trait").count(), 1);
}

#[test]
fn test_batch_index_is_zero_based() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("milk.csv");
    let log = linear_log();
    let recorder = RunRecorder::default();
    let rows: Vec<_> = (0..3)
        .map(|r| {
            recorder
                .row(&log, &sample_config(), &RunMetadata::new("milk", 10).replicate(r))
                .unwrap()
        })
        .collect();

    ResultStore::new().append(&rows, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let indices: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(indices, vec!["0", "1", "2"]);
}

// =============================================================================
// ResultsParser
// =============================================================================

#[test]
fn test_store_then_parse_heterogeneous_configs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("milk.csv");
    let log = linear_log();
    let recorder = RunRecorder::new(
        HistorySummarizer::new(6),
        ResultRowBuilder::new(Layout::Embedded),
        ResultStore::new(),
    );

    let first = RunConfig::new().with("a", 1).with("b", 2);
    let second = RunConfig::new().with("a", 1).with("c", 3);
    recorder
        .record(&path, &log, &first, &RunMetadata::new("milk", 10).replicate(1))
        .unwrap();
    recorder
        .record(&path, &log, &second, &RunMetadata::new("milk", 10).replicate(2))
        .unwrap();

    let table = ResultsParser::new().parse(&path).unwrap();
    assert_eq!(table.num_rows(), 2);

    let columns = table.columns();
    assert_eq!(columns[0], "trait");
    assert!(!columns.iter().any(|c| c == CONFIG_COLUMN));
    assert_eq!(&columns[columns.len() - 3..], &["a", "b", "c"]);

    assert_eq!(table.value(0, "b"), Some("2"));
    assert_eq!(table.value(0, "c"), None);
    assert_eq!(table.value(1, "b"), None);
    assert_eq!(table.value(1, "c"), Some("3"));
    assert_eq!(table.value(1, "replicate"), Some("2"));

    let val_pearson: f64 = table.value(0, "val_pearson").unwrap().parse().unwrap();
    assert!((val_pearson - 0.65).abs() < 1e-12);
}

#[test]
fn test_model_config_recorded_and_expanded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("milk.csv");
    let model = ModelConfig::builder((10, 10, 1)).build().unwrap();
    let meta = RunMetadata::new("milk", 10).nparams(model.parameter_count().unwrap());

    RunRecorder::default()
        .record(&path, &linear_log(), &model.to_run_config(), &meta)
        .unwrap();

    let table = ResultsParser::new().parse(&path).unwrap();
    assert_eq!(table.value(0, "conv_layers"), Some("32_64"));
    assert_eq!(table.value(0, "conv_padding"), Some("same"));
    assert_eq!(table.value(0, "drop_rate"), Some("0.25"));
    assert_eq!(table.value(0, "nparams"), Some("223873"));
}

#[test]
fn test_parse_missing_file_propagates_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ResultsParser::new().parse(dir.path().join("absent.csv"));
    assert!(matches!(result, Err(breeding_results::Error::Io(_))));
}
