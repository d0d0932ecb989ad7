use crate::Signal;

/// Samples equal to their own time in seconds, from `start_s` to `end_s` inclusive.
///
/// `ramp(50.0, 200.0, 0.5)` has 76 samples: 50, 52, ..., 200.
#[must_use]
pub fn ramp(start_s: f64, end_s: f64, hz: f64) -> Signal {
    let step = 1.0 / hz;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = ((end_s - start_s) * hz).round() as usize + 1;
    #[allow(clippy::cast_precision_loss)]
    let samples = (0..n).map(|k| start_s + k as f64 * step).collect();
    Signal::new("ramp", hz, start_s, samples)
}

/// A constant `level` at 1 Hz with one gross error of `level * 10` at sample `at`.
#[must_use]
pub fn spike(len: usize, level: f64, at: usize) -> Signal {
    let samples = (0..len)
        .map(|k| if k == at { level * 10.0 } else { level })
        .collect();
    Signal::new("level", 1.0, 0.0, samples)
}

/// A 1 Hz ramp where every third sample carries the `value` placeholder.
#[must_use]
pub fn sentinel(len: usize, value: f64) -> Signal {
    #[allow(clippy::cast_precision_loss)]
    let samples = (0..len)
        .map(|k| if k % 3 == 2 { value } else { k as f64 })
        .collect();
    Signal::new("reading", 1.0, 0.0, samples)
}

/// Delimited text at 1 Hz whose rows are listed out of time order.
#[must_use]
pub fn gaps() -> &'static str {
    "Time[s];v\n3.0000;30.00\n1.0000;10.00\n2.0000;20.00\n0.0000;0.00\n"
}
