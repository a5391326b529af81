//! Round trips through the Parquet writer under each write mode.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use tempfile::TempDir;

use worldstat_model::WriteMode;
use worldstat_output::{OutputError, WriteOptions, WriteOutcome, read_merged, write_merged};

fn merged() -> DataFrame {
    DataFrame::new(vec![
        Series::new(
            "country_name".into(),
            vec![Some("Chile"), Some("Chile"), Some("Peru")],
        )
        .into_column(),
        Series::new(
            "country_code".into(),
            vec![Some("CHL"), Some("CHL"), Some("PER")],
        )
        .into_column(),
        Series::new("year".into(), vec![Some(2019i32), Some(2020), Some(2019)]).into_column(),
        Series::new("population".into(), vec![Some(18.9e6), Some(19.1e6), None]).into_column(),
        Series::new("gdp".into(), vec![Some(278.6e9), None, Some(228.3e9)]).into_column(),
    ])
    .expect("merged frame")
}

fn file_names(outcome: &WriteOutcome, root: &std::path::Path) -> Vec<String> {
    match outcome {
        WriteOutcome::Written { files, .. } => files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect(),
        WriteOutcome::Skipped => Vec::new(),
    }
}

#[test]
fn partitioned_write_round_trips() {
    let dir = TempDir::new().expect("temp dir");
    let target = dir.path().join("combined");

    let outcome = write_merged(&merged(), &target, &WriteOptions::default()).expect("write");
    assert_eq!(
        file_names(&outcome, &target),
        vec!["year=2019/part-00000.parquet", "year=2020/part-00000.parquet"]
    );

    let back = read_merged(&target).expect("read");
    assert_eq!(back.height(), 3);
    assert_eq!(
        back.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>(),
        vec!["country_name", "country_code", "year", "population", "gdp"]
    );
    let years = back.column("year").unwrap().i32().unwrap();
    assert_eq!(years.get(0), Some(2019));
    assert_eq!(years.get(2), Some(2020));
}

#[test]
fn unpartitioned_append_adds_part_files() {
    let dir = TempDir::new().expect("temp dir");
    let target = dir.path().join("combined");
    let options = WriteOptions {
        mode: WriteMode::Append,
        partition_by_year: false,
    };

    write_merged(&merged(), &target, &options).expect("first write");
    let second = write_merged(&merged(), &target, &options).expect("second write");
    assert_eq!(file_names(&second, &target), vec!["part-00001.parquet"]);

    let back = read_merged(&target).expect("read");
    assert_eq!(back.height(), 6);
}

#[test]
fn overwrite_replaces_previous_output() {
    let dir = TempDir::new().expect("temp dir");
    let target = dir.path().join("combined");
    std::fs::create_dir_all(target.join("year=1999")).unwrap();
    std::fs::write(target.join("year=1999/part-00000.parquet"), b"stale").unwrap();

    write_merged(&merged(), &target, &WriteOptions::default()).expect("write");
    assert!(!target.join("year=1999").exists());
    assert_eq!(read_merged(&target).expect("read").height(), 3);
}

#[test]
fn error_and_ignore_modes_respect_existing_target() {
    let dir = TempDir::new().expect("temp dir");
    let target = dir.path().join("combined");
    write_merged(&merged(), &target, &WriteOptions::default()).expect("write");

    let error = WriteOptions {
        mode: WriteMode::ErrorIfExists,
        ..WriteOptions::default()
    };
    let err = write_merged(&merged(), &target, &error).unwrap_err();
    assert!(matches!(err, OutputError::TargetExists { .. }));

    let ignore = WriteOptions {
        mode: WriteMode::Ignore,
        ..WriteOptions::default()
    };
    let outcome = write_merged(&merged(), &target, &ignore).expect("ignore");
    assert_eq!(outcome, WriteOutcome::Skipped);
    assert!(!outcome.is_written());

    let fresh = dir.path().join("fresh");
    assert!(write_merged(&merged(), &fresh, &error).expect("fresh").is_written());
}
