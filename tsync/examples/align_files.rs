//! Align two recordings and write the joined result.
//!
//! Usage: `cargo run -p tsync --example align_files --features tracing -- A.csv B.csv OUT.csv`
//!
//! Without arguments, two synthetic ramps are written to a temporary directory and
//! aligned instead. Suggested: `RUST_LOG=debug,tsync_core=trace`.

use std::path::PathBuf;

use tracing_subscriber::fmt::format::FmtSpan;
use tsync::{Aligner, FilterConfig, Output};
use tsync_fixtures::{RenderOptions, ramp};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let scratch = tempfile::tempdir()?;
    let (a, b, out) = match args.as_slice() {
        [a, b, out] => (a.clone(), b.clone(), out.clone()),
        _ => {
            let a = scratch.path().join("a.csv");
            let b = scratch.path().join("b.csv");
            ramp(0.0, 100.0, 1.0).write_to(&a, &RenderOptions::default())?;
            ramp(50.0, 200.0, 0.5).write_to(&b, &RenderOptions::default())?;
            (a, b, scratch.path().join("aligned.csv"))
        }
    };

    let aligner = Aligner::builder()
        .filter(FilterConfig::default())
        .sync_with(b)
        .resample(true)
        .build()?;
    let aligned = aligner.run(&a)?;

    if let Some(report) = &aligned.sync {
        println!(
            "overlap {}: {} rows of A, {} rows of B, resampled {:?}",
            report.range, report.rows_a, report.rows_b, report.resampled
        );
    }
    if let Output::Joined(series) = &aligned.output {
        println!("joined {} rows x {} columns", series.len(), series.columns().len());
    }
    aligned.export(&out)?;
    println!("wrote {}", out.display());
    Ok(())
}
