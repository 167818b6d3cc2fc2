//! End-to-end pipeline tests: filter + all five aggregation branches

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use orderscope::analysis::{self, PipelineOutput};
use orderscope::models::{CustomerSegment, DateRange, DateSelection};

use crate::common::test_data::{self, dataset, date, delivered_order, order};

fn complete(start: &str, end: &str) -> DateSelection {
    DateSelection::Complete(DateRange::new(date(start), date(end)))
}

#[test]
fn test_filtered_rows_all_inside_interval() {
    let data = dataset(vec![
        order("2023-01-09 23:59:59", "toys", "credit_card", 10.0),
        order("2023-01-10 00:00:00", "toys", "credit_card", 20.0),
        order("2023-01-20 23:59:59", "books", "boleto", 30.0),
        order("2023-01-21 00:00:00", "books", "boleto", 40.0),
    ]);

    let output = analysis::build_views(&data, &complete("2023-01-10", "2023-01-20"));
    let view = output.view().expect("complete selection is filterable");

    assert_eq!(view.orders.len(), 2);
    for kept in &view.orders {
        assert!(date("2023-01-10") <= kept.purchase_date());
        assert!(kept.purchase_date() <= date("2023-01-20"));
    }
}

#[test]
fn test_trend_counts_sum_to_filtered_size() {
    let data = dataset(vec![
        order("2023-01-05 08:00:00", "toys", "credit_card", 10.0),
        order("2023-02-06 08:00:00", "toys", "credit_card", 12.0),
        order("2023-02-07 08:00:00", "garden", "voucher", 14.0),
        order("2023-04-01 08:00:00", "garden", "voucher", 16.0),
    ]);

    let output = analysis::build_views(&data, &complete("2023-01-01", "2023-02-28"));
    let view = output.view().unwrap();

    let total: u64 = view.monthly_trend.iter().map(|(_, count)| count).sum();
    assert_eq!(total as usize, view.orders.len());
    assert_eq!(
        view.monthly_trend,
        vec![("2023-01".to_string(), 1), ("2023-02".to_string(), 2)]
    );
}

#[test]
fn test_scenario_three_orders_in_one_month() {
    let data = dataset(vec![
        order("2023-01-03 09:00:00", "toys", "credit_card", 10.0),
        order("2023-01-15 12:00:00", "toys", "boleto", 20.0),
        order("2023-01-28 20:00:00", "books", "credit_card", 30.0),
    ]);

    let output = analysis::build_views(&data, &complete("2023-01-01", "2023-01-31"));
    let view = output.view().unwrap();

    assert_eq!(view.monthly_trend, vec![("2023-01".to_string(), 3)]);
    assert_eq!(
        view.top_categories,
        vec![("toys".to_string(), 2), ("books".to_string(), 1)]
    );
}

#[test]
fn test_empty_filtered_set_yields_empty_views() {
    let data = dataset(vec![order(
        "2023-06-01 10:00:00",
        "toys",
        "credit_card",
        10.0,
    )]);

    let output = analysis::build_views(&data, &complete("2020-01-01", "2020-12-31"));
    let view = output.view().expect("empty range is still a valid range");

    assert!(view.orders.is_empty());
    assert!(view.monthly_trend.is_empty());
    assert!(view.top_categories.is_empty());
    assert!(view.payment_mix.is_empty());
    assert!(view.delivery_days.is_empty());
    assert!(view.segment_means.is_empty());
}

#[test]
fn test_incomplete_selection_halts_before_aggregation() {
    let data = dataset(vec![order(
        "2023-06-01 10:00:00",
        "toys",
        "credit_card",
        10.0,
    )]);

    assert_matches!(
        analysis::build_views(&data, &DateSelection::Empty),
        PipelineOutput::AwaitingValidInput
    );
    assert_matches!(
        analysis::build_views(&data, &DateSelection::Partial(date("2023-06-01"))),
        PipelineOutput::AwaitingValidInput
    );
}

#[test]
fn test_delivery_sample_excludes_exactly_the_undelivered() {
    let data = dataset(vec![
        delivered_order(
            "2023-01-02 10:00:00",
            "2023-01-09 16:00:00",
            "toys",
            "credit_card",
            10.0,
        ),
        delivered_order(
            "2023-01-03 10:00:00",
            "2023-01-05 09:00:00",
            "toys",
            "credit_card",
            11.0,
        ),
        order("2023-01-04 10:00:00", "toys", "credit_card", 12.0),
    ]);

    let output = analysis::build_views(&data, &complete("2023-01-01", "2023-01-31"));
    let view = output.view().unwrap();

    assert_eq!(view.delivery_days, vec![7, 1]);
    // the undelivered row still participates everywhere else
    assert_eq!(view.orders.len(), 3);
    assert_eq!(view.payment_mix, vec![("credit_card".to_string(), 3)]);
}

#[test]
fn test_segments_recomputed_per_filter_change() {
    let mut orders = Vec::new();
    for i in 1..=8 {
        orders.push(order(
            &format!("2023-01-{:02} 10:00:00", i),
            "toys",
            "credit_card",
            i as f64 * 10.0,
        ));
    }
    let data = dataset(orders);

    // Full range: 80.0 is the top quartile
    let full = analysis::build_views(&data, &complete("2023-01-01", "2023-01-08"));
    let full_view = full.view().unwrap();
    assert_eq!(full_view.segment_means.len(), 4);
    assert_eq!(
        full_view.segment_means.last().unwrap().0,
        CustomerSegment::Platinum
    );

    // Narrowed range: the same rows rank differently against fewer peers
    let narrow = analysis::build_views(&data, &complete("2023-01-01", "2023-01-04"));
    let narrow_view = narrow.view().unwrap();
    assert_eq!(narrow_view.segment_means.len(), 4);
    // 40.0 is now the Platinum mean instead of sitting mid-pack
    let (segment, mean) = narrow_view.segment_means.last().unwrap();
    assert_eq!(*segment, CustomerSegment::Platinum);
    assert_eq!(*mean, 40.0);

    // Means increase Bronze -> Platinum in both refreshes
    for view in [full_view, narrow_view] {
        for pair in view.segment_means.windows(2) {
            assert!(pair[0].1 < pair[1].1);
        }
    }
}

#[test]
fn test_top_categories_never_exceed_ten() {
    let mut orders = Vec::new();
    for i in 0..15 {
        for _ in 0..(i + 1) {
            orders.push(test_data::order(
                "2023-01-01 10:00:00",
                &format!("category_{:02}", i),
                "credit_card",
                5.0,
            ));
        }
    }
    let data = dataset(orders);

    let output = analysis::build_views(&data, &complete("2023-01-01", "2023-01-01"));
    let view = output.view().unwrap();

    assert_eq!(view.top_categories.len(), 10);
    for pair in view.top_categories.windows(2) {
        assert!(pair[0].1 >= pair[1].1);
    }
    assert_eq!(view.top_categories[0], ("category_14".to_string(), 15));
}
