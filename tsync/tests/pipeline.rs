use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;
use tsync::{
    Aligner, FilterConfig, FormatHint, Output, RowPolicy, SyncSide, TimeTruncation, TsyncConfig,
    TsyncError, Value, WarmupPolicy,
};
use tsync_fixtures::{RenderOptions, Signal, gaps, ramp, sentinel, spike};

fn write(dir: &TempDir, name: &str, signal: &Signal, opts: &RenderOptions) -> PathBuf {
    let path = dir.path().join(name);
    signal.write_to(&path, opts).unwrap();
    path
}

fn numbers(series: &tsync::Series, pos: usize) -> Vec<f64> {
    series
        .rows()
        .iter()
        .map(|r| r[pos].as_f64().unwrap())
        .collect()
}

#[test]
fn single_file_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "a.csv", &ramp(0.0, 9.0, 1.0), &RenderOptions::default());
    let aligned = Aligner::builder().build().unwrap().run(&path).unwrap();

    assert!(aligned.secondary.is_none());
    assert!(aligned.sync.is_none());
    assert_eq!(aligned.primary.rows_read, 10);
    let Output::Single(series) = aligned.output else {
        panic!("expected a single series");
    };
    assert_eq!(series.columns(), ["Time[s]", "ramp"]);
    assert_eq!(numbers(&series, 1), (0..10).map(f64::from).collect::<Vec<_>>());
}

#[test]
fn two_files_are_resampled_and_joined() {
    let dir = tempfile::tempdir().unwrap();
    let opts = RenderOptions::default();
    let a = write(&dir, "a.csv", &ramp(0.0, 100.0, 1.0), &opts);
    let b = write(&dir, "b.csv", &ramp(50.0, 200.0, 0.5), &opts);

    let aligned = Aligner::builder()
        .sync_with(&b)
        .resample(true)
        .build()
        .unwrap()
        .run(&a)
        .unwrap();

    let report = aligned.sync.unwrap();
    assert_eq!((report.rows_a, report.rows_b), (51, 26));
    assert_eq!(report.resampled, Some(SyncSide::B));
    assert_eq!(aligned.secondary.unwrap().rows_read, 76);

    let Output::Joined(joined) = aligned.output else {
        panic!("expected a joined series");
    };
    assert_eq!(joined.len(), 51);
    assert_eq!(joined.columns(), ["ramp", "ramp.1"]);
    assert_eq!(numbers(&joined, 0), numbers(&joined, 1));
}

#[test]
fn two_files_without_resampling_stay_overlaid() {
    let dir = tempfile::tempdir().unwrap();
    let opts = RenderOptions::default();
    let a = write(&dir, "a.csv", &ramp(0.0, 100.0, 1.0), &opts);
    let b = write(&dir, "b.csv", &ramp(50.0, 200.0, 0.5), &opts);

    let aligned = Aligner::builder()
        .sync_with(&b)
        .build()
        .unwrap()
        .run(&a)
        .unwrap();
    let Output::Overlaid { a, b } = &aligned.output else {
        panic!("expected overlaid series");
    };
    assert_eq!((a.len(), b.len()), (51, 26));

    let err = aligned.export(&dir.path().join("out.csv")).unwrap_err();
    assert!(matches!(err, TsyncError::InvalidArg(_)));
}

#[test]
fn disjoint_files_fail_with_no_overlap() {
    let dir = tempfile::tempdir().unwrap();
    let opts = RenderOptions::default();
    let a = write(&dir, "a.csv", &ramp(0.0, 10.0, 1.0), &opts);
    let b = write(&dir, "b.csv", &ramp(20.0, 30.0, 1.0), &opts);
    let err = Aligner::builder()
        .sync_with(&b)
        .resample(true)
        .build()
        .unwrap()
        .run(&a)
        .unwrap_err();
    assert!(matches!(err, TsyncError::NoOverlap { .. }));
}

#[test]
fn placeholder_rows_are_removed_before_filtering() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "s.csv", &sentinel(9, -1.0), &RenderOptions::default());
    let aligned = Aligner::builder()
        .remove_equal_to(-1.0)
        .filter(FilterConfig {
            window: 1,
            ..FilterConfig::default()
        })
        .build()
        .unwrap()
        .run(&path)
        .unwrap();
    let Output::Single(series) = aligned.output else {
        panic!("expected a single series");
    };
    assert_eq!(numbers(&series, 1), [0.0, 1.0, 3.0, 4.0, 6.0, 7.0]);
}

#[test]
fn gross_error_is_filtered() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "spike.csv", &spike(6, 10.0, 4), &RenderOptions::default());
    let aligned = Aligner::builder()
        .filter(FilterConfig::default())
        .build()
        .unwrap()
        .run(&path)
        .unwrap();
    let Output::Single(series) = aligned.output else {
        panic!("expected a single series");
    };
    // [10, 10, 10, 10, 100] has mean 28. The last window has mean 28 as well, but 10
    // is within 100% of it.
    assert_eq!(numbers(&series, 1), [10.0, 10.0, 10.0, 10.0, 28.0, 10.0]);
}

#[test]
fn warmup_rows_can_be_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "spike.csv", &spike(6, 10.0, 4), &RenderOptions::default());
    let aligned = Aligner::builder()
        .filter(FilterConfig {
            window: 5,
            column: Some("level".into()),
            warmup: WarmupPolicy::Drop,
        })
        .build()
        .unwrap()
        .run(&path)
        .unwrap();
    let Output::Single(series) = aligned.output else {
        panic!("expected a single series");
    };
    assert_eq!(series.len(), 2);
}

#[test]
fn absolute_timestamps_with_decimal_comma() {
    let dir = tempfile::tempdir().unwrap();
    let base = NaiveDate::from_ymd_opt(2020, 7, 22)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let opts = RenderOptions::default().decimal_comma(true).absolute(base);
    let path = write(&dir, "abs.csv", &Signal::new("v", 2.0, 0.0, vec![1.5, 2.5]), &opts);

    let aligned = Aligner::builder()
        .separator(";")
        .decimal_point(',')
        .truncation(TimeTruncation::Subseconds)
        .build()
        .unwrap()
        .run(&path)
        .unwrap();
    assert_eq!(
        aligned.primary.layout.as_ref().map(|l| l.pattern()),
        Some("%Y-%m-%d %H:%M:%S.%f")
    );
    let Output::Single(series) = &aligned.output else {
        panic!("expected a single series");
    };
    assert_eq!(series.index()[0], series.index()[1]);
    assert_eq!(series.rows()[1][1], Value::Number(2.5));

    // Export moves the separator off the decimal mark only when they collide.
    let out = dir.path().join("out.csv");
    aligned.export(&out).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().nth(1), Some("2020-07-22 10:00:00.000000;1,5"));
}

#[test]
fn relative_seconds_use_the_base_date() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gaps.csv");
    std::fs::write(&path, gaps()).unwrap();
    let aligned = Aligner::builder()
        .base_date("2021-01-01")
        .build()
        .unwrap()
        .run(&path)
        .unwrap();
    let Output::Single(series) = aligned.output else {
        panic!("expected a single series");
    };
    assert_eq!(series.index()[0].to_string(), "2021-01-01 00:00:00.000000");
    assert_eq!(numbers(&series, 1), [0.0, 10.0, 20.0, 30.0]);
}

#[test]
fn malformed_rows_follow_the_row_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "t;v\n0;1\n1\n2;3\n").unwrap();

    let err = Aligner::builder().build().unwrap().run(&path).unwrap_err();
    assert!(matches!(err, TsyncError::MalformedRow { line: 3, .. }));

    let aligned = Aligner::builder()
        .row_policy(RowPolicy::Skip)
        .build()
        .unwrap()
        .run(&path)
        .unwrap();
    assert_eq!(aligned.primary.rows_skipped, 1);
}

#[test]
fn build_rejects_inconsistent_settings() {
    let zero_window = Aligner::builder()
        .filter(FilterConfig {
            window: 0,
            ..FilterConfig::default()
        })
        .build();
    assert!(matches!(zero_window, Err(TsyncError::InvalidArg(_))));

    let resample_alone = Aligner::builder().resample(true).build();
    assert!(matches!(resample_alone, Err(TsyncError::InvalidArg(_))));

    let bad_separator = Aligner::builder().separator("||").build();
    assert!(matches!(bad_separator, Err(TsyncError::InvalidArg(_))));

    let nan = Aligner::builder().remove_equal_to(f64::NAN).build();
    assert!(matches!(nan, Err(TsyncError::InvalidArg(_))));
}

#[test]
fn config_can_be_supplied_whole() {
    let cfg = TsyncConfig {
        hint: FormatHint::default().with_separator(";"),
        remove_equal_to: Some(-9999.0),
        ..TsyncConfig::default()
    };
    let aligner = Aligner::builder().config(cfg.clone()).build().unwrap();
    assert_eq!(aligner.config(), &cfg);
}

#[test]
fn missing_primary_is_an_io_error() {
    let err = Aligner::builder()
        .build()
        .unwrap()
        .run(Path::new("/definitely/not/here.csv"))
        .unwrap_err();
    assert!(matches!(err, TsyncError::Io { .. }));
}
