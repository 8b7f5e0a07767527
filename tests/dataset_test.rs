//! Dataset tests: phenotypes + kinship -> split -> recorded run

use std::fs;
use std::path::Path;

use breeding_results::config::RunConfig;
use breeding_results::dataset::{KinshipStack, PhenotypeLoader, TrainValSplit};
use breeding_results::experiment::{MetricLog, ResultsParser};
use breeding_results::pipeline::RunRecorder;
use breeding_results::Error;

const SAMPLES: [&str; 5] = ["s1", "s2", "s3", "s4", "s5"];

fn write_kinship(dir: &Path, name: &str, diagonal: f64) {
    let mut text = String::from(",");
    text.push_str(&SAMPLES.join(","));
    text.push('\n');
    for (i, row) in SAMPLES.iter().enumerate() {
        text.push_str(row);
        for j in 0..SAMPLES.len() {
            let value = if i == j { diagonal } else { 0.1 };
            text.push_str(&format!(",{value}"));
        }
        text.push('\n');
    }
    fs::write(dir.join(name), text).unwrap();
}

fn write_phenotypes(dir: &Path) {
    fs::write(
        dir.join("phenotypes_sorted.csv"),
        ",milk,fat\ns1,30.0,4.0\ns2,31.5,\ns3,29.0,3.8\ns4,33.0,4.2\ns5,28.5,4.1\n",
    )
    .unwrap();
    fs::write(
        dir.join("phenotypes.csv"),
        ",milk,fat\ns3,29.0,3.8\ns1,30.0,4.0\ns2,31.5,\ns4,33.0,4.2\ns5,28.5,4.1\n",
    )
    .unwrap();
}

#[test]
fn test_sorted_phenotypes_align_with_kinship() {
    let dir = tempfile::tempdir().unwrap();
    let kinship_dir = dir.path().join("kinship");
    fs::create_dir(&kinship_dir).unwrap();
    write_kinship(&kinship_dir, "kinship_additive_minMAF0.01_maxMAF0.05.csv", 1.0);
    write_kinship(&kinship_dir, "kinship_dominance_minMAF0.01_maxMAF0.05.csv", 0.8);
    write_phenotypes(dir.path());

    let kinship = KinshipStack::load_dir(&kinship_dir).unwrap();
    assert_eq!(kinship.shape(), (2, 5, 5));

    let milk = PhenotypeLoader::new().load(dir.path(), "milk").unwrap();
    milk.check_alignment(&kinship).unwrap();

    let unsorted = PhenotypeLoader::new().unsorted().load(dir.path(), "milk").unwrap();
    let result = unsorted.check_alignment(&kinship);
    assert!(matches!(result, Err(Error::InvalidData { message, .. }) if message.contains("sorted")));
}

#[test]
fn test_split_and_record_sample_size() {
    let dir = tempfile::tempdir().unwrap();
    write_phenotypes(dir.path());
    let fat = PhenotypeLoader::new().load(dir.path(), "fat").unwrap();
    assert_eq!(fat.observed(), 4);

    let split = TrainValSplit::new(fat.len(), 0.4, 11).unwrap();
    let (train, validation) = split.apply(fat.values()).unwrap();
    assert_eq!((train.len(), validation.len()), (3, 2));

    let log = MetricLog::from_series([
        ("loss", vec![1.0, 0.6, 0.5]),
        ("val_pearson", vec![0.1, 0.3, 0.2]),
    ])
    .unwrap();
    let meta = fat.run_metadata().validation_split(0.4).replicate(1);
    let path = dir.path().join("results/fat.csv");
    RunRecorder::default()
        .record(&path, &log, &RunConfig::new().with("seed", 11), &meta)
        .unwrap();

    let table = ResultsParser::new().parse(&path).unwrap();
    assert_eq!(table.value(0, "trait"), Some("fat"));
    assert_eq!(table.value(0, "sample_size"), Some("5"));
    assert_eq!(table.value(0, "validation_split"), Some("0.4"));
    assert_eq!(table.value(0, "seed"), Some("11"));
}

#[test]
fn test_missing_trait_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write_phenotypes(dir.path());
    let result = PhenotypeLoader::new().load(dir.path(), "protein");
    assert!(matches!(
        result,
        Err(Error::InvalidData { file, .. }) if file.ends_with("phenotypes_sorted.csv")
    ));
}
