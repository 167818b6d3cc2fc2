//! The filtering-and-aggregation pipeline.
//!
//! Every view here is a pure function of (raw dataset, selected interval).
//! A filter change recomputes everything from the cached raw table; no view
//! keeps state of its own.

pub mod segmentation;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::dataset::Dataset;
use crate::models::{CustomerSegment, DateRange, DateSelection, Order};

/// The category ranking is capped to the ten most popular
pub const TOP_CATEGORY_LIMIT: usize = 10;

/// Bin count for the delivery-time histogram
pub const DELIVERY_HISTOGRAM_BINS: usize = 30;

/// Pipeline result: either a full set of views or a signal that the date
/// picker does not hold a usable interval yet. Never an error.
#[derive(Debug, Clone, Serialize)]
pub enum PipelineOutput {
    Ready(DashboardView),
    AwaitingValidInput,
}

impl PipelineOutput {
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            PipelineOutput::Ready(view) => Some(view),
            PipelineOutput::AwaitingValidInput => None,
        }
    }
}

/// Everything the dashboard renders, derived from one filtered order set
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub range: DateRange,
    pub orders: Vec<Order>,
    pub monthly_trend: Vec<(String, u64)>,
    pub top_categories: Vec<(String, u64)>,
    pub payment_mix: Vec<(String, u64)>,
    pub delivery_days: Vec<i64>,
    pub segment_means: Vec<(CustomerSegment, f64)>,
}

/// Run the whole pipeline for one selection. An incomplete selection halts
/// before any aggregation.
pub fn build_views(dataset: &Dataset, selection: &DateSelection) -> PipelineOutput {
    let Some(range) = selection.range() else {
        return PipelineOutput::AwaitingValidInput;
    };

    let orders = filter_orders(&dataset.orders, &range);

    let monthly_trend = monthly_trend(&orders);
    let top_categories = top_categories(&orders);
    let payment_mix = payment_mix(&orders);
    let delivery_days = delivery_days(&orders);
    let payment_values: Vec<f64> = orders.iter().map(|o| o.payment_value).collect();
    let segment_means = segmentation::segment_means(&payment_values);

    PipelineOutput::Ready(DashboardView {
        range,
        orders,
        monthly_trend,
        top_categories,
        payment_mix,
        delivery_days,
        segment_means,
    })
}

/// Orders whose purchase timestamp falls inside the range, both ends
/// inclusive at day granularity
pub fn filter_orders(orders: &[Order], range: &DateRange) -> Vec<Order> {
    orders
        .iter()
        .filter(|order| range.contains(order.purchased_at))
        .cloned()
        .collect()
}

/// Order count per calendar month, keyed `YYYY-MM`, chronological
pub fn monthly_trend(orders: &[Order]) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for order in orders {
        use chrono::Datelike;
        let key = (order.purchased_at.year(), order.purchased_at.month());
        *counts.entry(key).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((year, month), count)| (format!("{:04}-{:02}", year, month), count))
        .collect()
}

/// Order count per product category, ten largest, descending. Rows with no
/// category are not counted, matching the original's NaN handling.
pub fn top_categories(orders: &[Order]) -> Vec<(String, u64)> {
    let mut ranked = count_by(orders.iter().filter_map(|order| {
        if order.category.is_empty() {
            None
        } else {
            Some(order.category.as_str())
        }
    }));
    ranked.truncate(TOP_CATEGORY_LIMIT);
    ranked
}

/// Order count per payment type, descending
pub fn payment_mix(orders: &[Order]) -> Vec<(String, u64)> {
    count_by(orders.iter().filter_map(|order| {
        if order.payment_type.is_empty() {
            None
        } else {
            Some(order.payment_type.as_str())
        }
    }))
}

/// Whole-day delivery durations; undelivered rows are excluded here and
/// only here
pub fn delivery_days(orders: &[Order]) -> Vec<i64> {
    orders.iter().filter_map(Order::delivery_days).collect()
}

/// Equal-width binning of the delivery sample for histogram display
pub fn delivery_histogram(sample: &[i64], bins: usize) -> Vec<(String, u64)> {
    if bins == 0 {
        return Vec::new();
    }
    let (Some(&min), Some(&max)) = (sample.iter().min(), sample.iter().max()) else {
        return Vec::new();
    };
    let span = (max - min + 1).max(1) as usize;
    let bins = bins.min(span);
    let width = span.div_ceil(bins);

    let mut counts = vec![0u64; bins];
    for &value in sample {
        let offset = (value - min) as usize;
        let index = (offset / width).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = min + (i * width) as i64;
            let hi = lo + width as i64 - 1;
            let label = if lo == hi {
                format!("{}", lo)
            } else {
                format!("{}-{}", lo, hi)
            };
            (label, count)
        })
        .collect()
}

/// Count occurrences and rank descending, ties broken by name for a
/// deterministic display order
fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, u64)> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
