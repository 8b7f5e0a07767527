//! Results pipeline benchmarks
//!
//! - Summarizing metric logs of growing length
//! - Parsing accumulated results files with heterogeneous configs

use breeding_results::config::RunConfig;
use breeding_results::experiment::{
    HistorySummarizer, MetricLog, ResultStore, ResultsParser, RunMetadata,
};
use breeding_results::pipeline::RunRecorder;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Metric log with the six standard metrics
#[allow(clippy::cast_precision_loss)]
fn create_test_log(epochs: usize) -> MetricLog {
    let values: Vec<f64> = (0..epochs).map(|i| i as f64 / epochs as f64).collect();
    MetricLog::from_series(
        ["loss", "pearson", "rmse", "val_loss", "val_pearson", "val_rmse"]
            .into_iter()
            .map(|name| (name, values.clone())),
    )
    .unwrap()
}

/// Results file with `rows` runs; every tenth run adds a hyperparameter
fn create_test_results(path: &std::path::Path, rows: usize) {
    let recorder = RunRecorder::default();
    let log = create_test_log(50);
    let batch: Vec<_> = (0..rows)
        .map(|i| {
            let mut config = RunConfig::new()
                .with("conv_layers", vec![32, 64])
                .with("learn_rate", 0.001)
                .with("drop_rate", 0.25);
            if i % 10 == 0 {
                config.insert("regularizer_l2", 0.01);
            }
            recorder
                .row(&log, &config, &RunMetadata::new("milk", 1000).replicate(i))
                .unwrap()
        })
        .collect();
    ResultStore::new().append(&batch, path).unwrap();
}

/// Benchmark history summarization
fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for epochs in [10, 100, 1_000].iter() {
        let log = create_test_log(*epochs);
        let summarizer = HistorySummarizer::new(6);

        group.bench_with_input(BenchmarkId::from_parameter(epochs), epochs, |b, _| {
            b.iter(|| black_box(summarizer.summarize(&log)));
        });
    }

    group.finish();
}

/// Benchmark results file parsing
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_results");
    let dir = tempfile::tempdir().unwrap();

    for rows in [100, 1_000, 10_000].iter() {
        let path = dir.path().join(format!("results_{rows}.csv"));
        create_test_results(&path, *rows);
        let parser = ResultsParser::new();

        group.bench_with_input(BenchmarkId::from_parameter(rows), rows, |b, _| {
            b.iter(|| black_box(parser.parse(&path).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summarize, bench_parse);
criterion_main!(benches);
