//! Equal-frequency quantile bucketing of payment values.
//!
//! Segment membership is a per-refresh relative rank over the filtered set,
//! not a stable per-customer property.

use crate::models::CustomerSegment;

const BUCKETS: usize = CustomerSegment::ALL.len();

/// Assign each payment value a segment by stable rank. Values are sorted
/// stably, and rank `r` of `n` lands in bucket `r * 4 / n`; rows that share
/// a value at a bucket edge split by original order, so bucket populations
/// differ by at most one.
pub fn assign_segments(values: &[f64]) -> Vec<CustomerSegment> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut segments = vec![CustomerSegment::Bronze; n];
    for (rank, &index) in order.iter().enumerate() {
        let bucket = (rank * BUCKETS / n).min(BUCKETS - 1);
        segments[index] = CustomerSegment::ALL[bucket];
    }
    segments
}

/// Mean payment value per segment, Bronze first. Segments with no members
/// (filtered sets smaller than four) are omitted.
pub fn segment_means(values: &[f64]) -> Vec<(CustomerSegment, f64)> {
    let segments = assign_segments(values);

    let mut sums = [0.0f64; BUCKETS];
    let mut counts = [0usize; BUCKETS];
    for (value, segment) in values.iter().zip(&segments) {
        let index = CustomerSegment::ALL
            .iter()
            .position(|s| s == segment)
            .unwrap_or(0);
        sums[index] += value;
        counts[index] += 1;
    }

    CustomerSegment::ALL
        .iter()
        .enumerate()
        .filter(|(index, _)| counts[*index] > 0)
        .map(|(index, segment)| (*segment, sums[index] / counts[index] as f64))
        .collect()
}
