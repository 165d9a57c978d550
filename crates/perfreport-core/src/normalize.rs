//! Range scaling for overlay charts.

/// Divide every value by the series range (`max - min`).
///
/// The result is unit-less so two metrics can share one chart. It is not a
/// min-max normalization: values are not shifted and are not bounded to
/// `[0, 1]`. A constant series has no range and is returned unchanged.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if values.is_empty() || max == min {
        return values.to_vec();
    }

    let range = max - min;
    values.iter().map(|v| v / range).collect()
}
