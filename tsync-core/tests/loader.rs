use std::io::Write;

use chrono::NaiveDate;
use tsync_core::{FormatHint, Instant, RowPolicy, TsyncError, Value, load, load_str};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, micro: u32) -> Instant {
    Instant::new(
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_micro_opt(h, mi, s, micro)
            .unwrap(),
    )
}

#[test]
fn loads_a_file_with_detected_format() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "time;temp;state\n\
         2020-07-22 10:00:01.5;21.5;on\n\
         2020-07-22 10:00:00.25;21.0;off\n"
    )
    .unwrap();

    let loaded = load(file.path(), &FormatHint::default(), RowPolicy::Abort).unwrap();
    let report = &loaded.report;
    assert_eq!(report.format.separator.as_str(), ";");
    assert_eq!(report.format.decimal_point, '.');
    assert_eq!(
        report.layout.as_ref().map(|l| l.pattern()),
        Some("%Y-%m-%d %H:%M:%S.%f")
    );
    assert_eq!(report.rows_read, 2);
    assert_eq!(report.source, file.path().display().to_string());

    let s = &loaded.series;
    assert!(s.is_keyed());
    assert_eq!(s.time_column(), Some("time"));
    assert_eq!(s.columns(), ["time", "temp", "state"]);
    // Sorted by time.
    assert_eq!(
        s.index(),
        [
            at(2020, 7, 22, 10, 0, 0, 250_000),
            at(2020, 7, 22, 10, 0, 1, 500_000)
        ]
    );
    assert_eq!(s.rows()[0][1], Value::Number(21.0));
    assert_eq!(s.rows()[0][2], Value::Text("off".into()));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(
        &dir.path().join("absent.csv"),
        &FormatHint::default(),
        RowPolicy::Abort,
    )
    .unwrap_err();
    assert!(matches!(err, TsyncError::Io { .. }));
}

#[test]
fn comma_space_separator_and_decimal_comma() {
    // A decimal comma would be detected as the separator, so name it explicitly.
    let text = "time;v\n2020.07.22 10:00:00,5;3,25\n2020.07.22 10:00:01,5;4,75\n";
    let hint = FormatHint::default()
        .with_separator(";")
        .with_decimal_point(',');
    let loaded = load_str(text, &hint, RowPolicy::Abort).unwrap();
    assert_eq!(
        loaded.report.layout.as_ref().map(|l| l.pattern()),
        Some("%Y.%m.%d %H:%M:%S,%f")
    );
    assert_eq!(loaded.series.rows()[0][1], Value::Number(3.25));
    assert_eq!(loaded.series.rows()[1][1], Value::Number(4.75));

    let text = "t, v\n2020-07-22 10:00, 1\n2020-07-22 10:01, 2\n";
    let loaded = load_str(text, &FormatHint::default(), RowPolicy::Abort).unwrap();
    assert_eq!(loaded.report.format.separator.as_str(), ", ");
    assert_eq!(loaded.series.columns(), ["t", "v"]);
    assert_eq!(loaded.series.rows()[1][1], Value::Number(2.0));
}

#[test]
fn hinted_separator_and_layout_win_over_detection() {
    let text = "time|v\n22/07/2020 10:00|1\n";
    let hint = FormatHint::default()
        .with_separator("|")
        .with_timestamp_layout("%d/%m/%Y %H:%M");
    let loaded = load_str(text, &hint, RowPolicy::Abort).unwrap();
    assert_eq!(loaded.series.index(), [at(2020, 7, 22, 10, 0, 0, 0)]);
}

#[test]
fn numeric_time_column_is_an_offset_from_the_base_date() {
    let text = "sec;v\n0;1\n0.5;2\n90;3\n";
    let hint = FormatHint::default().with_base_date("2021-03-04 05:06:07");
    let loaded = load_str(text, &hint, RowPolicy::Abort).unwrap();
    assert_eq!(loaded.report.layout, None);
    assert_eq!(
        loaded.report.offset_base,
        Some(at(2021, 3, 4, 5, 6, 7, 0))
    );
    assert_eq!(
        loaded.series.index(),
        [
            at(2021, 3, 4, 5, 6, 7, 0),
            at(2021, 3, 4, 5, 6, 7, 500_000),
            at(2021, 3, 4, 5, 7, 37, 0)
        ]
    );
}

#[test]
fn numeric_time_column_without_base_date_counts_from_the_epoch() {
    let loaded = load_str("sec;v\n60;1\n", &FormatHint::default(), RowPolicy::Abort).unwrap();
    assert_eq!(loaded.report.offset_base, Some(Instant::unix_epoch()));
    assert_eq!(loaded.series.index(), [at(1970, 1, 1, 0, 1, 0, 0)]);
}

#[test]
fn malformed_row_aborts_by_default() {
    let text = "t;a;b\n2020-01-01;1;2\n2020-01-02;3\n2020-01-03;4;5\n";
    let err = load_str(text, &FormatHint::default(), RowPolicy::Abort).unwrap_err();
    assert_eq!(
        err,
        TsyncError::MalformedRow {
            line: 3,
            expected: 3,
            found: 2
        }
    );
}

#[test]
fn malformed_row_is_skipped_on_request() {
    let text = "t;a;b\n2020-01-01;1;2\n2020-01-02;3\n2020-01-03;4;5\n";
    let loaded = load_str(text, &FormatHint::default(), RowPolicy::Skip).unwrap();
    assert_eq!(loaded.report.rows_read, 2);
    assert_eq!(loaded.report.rows_skipped, 1);
    assert_eq!(loaded.series.len(), 2);
}

#[test]
fn unknown_time_format_is_reported() {
    let text = "t;v\nyesterday;1\n";
    let err = load_str(text, &FormatHint::default(), RowPolicy::Abort).unwrap_err();
    assert!(matches!(err, TsyncError::UnknownTimestampFormat { .. }));
}

#[test]
fn later_value_in_another_layout_is_a_mismatch() {
    let text = "t;v\n2020-01-01 10:00:00;1\n2020.01.01 10:00:01;2\n";
    let err = load_str(text, &FormatHint::default(), RowPolicy::Abort).unwrap_err();
    match err {
        TsyncError::FormatMismatch { text, layout } => {
            assert!(text.contains("line 3"), "{text}");
            assert_eq!(layout, "%Y-%m-%d %H:%M:%S");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn equal_timestamps_keep_file_order() {
    let text = "t;v\n2020-01-01 00:00:01;1\n2020-01-01 00:00:00;2\n2020-01-01 00:00:01;3\n";
    let loaded = load_str(text, &FormatHint::default(), RowPolicy::Abort).unwrap();
    let values: Vec<&Value> = loaded.series.column(1).collect();
    assert_eq!(
        values,
        [&Value::Number(2.0), &Value::Number(1.0), &Value::Number(3.0)]
    );
}

#[test]
fn header_only_input_yields_an_empty_series() {
    let loaded = load_str("t;v\n", &FormatHint::default(), RowPolicy::Abort).unwrap();
    assert!(loaded.series.is_empty());
    assert_eq!(loaded.series.columns(), ["t", "v"]);
    assert_eq!(loaded.report.rows_read, 0);
}

#[test]
fn empty_input_has_no_header() {
    let err = load_str("", &FormatHint::default(), RowPolicy::Abort).unwrap_err();
    assert!(matches!(err, TsyncError::Data(_)));
}
