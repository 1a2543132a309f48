//! Missing-aware reducers shared by the resampler and the aggregators.
//!
//! Every reducer skips `None` members. Reducers with no meaningful value for
//! an empty input return `None`; `sum` returns `0.0`.

use std::collections::BTreeMap;

/// Round to two decimal places, exact halves to the even neighbour
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

pub fn sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().sum()
}

pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (total, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

pub fn max<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().reduce(f64::max)
}

pub fn min<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().reduce(f64::min)
}

/// Sample standard deviation (n - 1); `None` with fewer than two values
pub fn sample_std<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.into_iter().flatten().collect();
    if present.len() < 2 {
        return None;
    }

    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Most frequent value; ties go to the smallest value.
///
/// Falls back to the first present value when no frequency can be computed.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Ord + Clone,
    I: IntoIterator<Item = Option<T>>,
{
    let present: Vec<T> = values.into_iter().flatten().collect();
    if present.is_empty() {
        return None;
    }

    let mut counts: BTreeMap<&T, usize> = BTreeMap::new();
    for value in &present {
        *counts.entry(value).or_insert(0) += 1;
    }

    // BTreeMap iterates in ascending value order, so keeping only strictly
    // greater counts leaves the smallest value among the most frequent.
    let mut best: Option<(&T, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.clone())
        .or_else(|| present.first().cloned())
}

/// Min-max scale to [0, 1] at two decimals.
///
/// A column without variation maps every row to `0.0`. Missing values stay
/// missing.
pub fn min_max_normalize(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let lo = min(values.iter().copied());
    let hi = max(values.iter().copied());

    match (lo, hi) {
        (Some(lo), Some(hi)) if hi == lo => vec![Some(0.0); values.len()],
        (Some(lo), Some(hi)) => values
            .iter()
            .map(|v| v.map(|x| round2((x - lo) / (hi - lo))))
            .collect(),
        _ => vec![None; values.len()],
    }
}
