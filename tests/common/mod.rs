//! Common test utilities and helpers

use chrono::{NaiveDate, NaiveDateTime};

/// Test data utilities
pub mod test_data {
    use super::*;
    use orderscope::dataset::Dataset;
    use orderscope::models::{DatasetStats, Order};

    pub fn timestamp(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").expect("valid test timestamp")
    }

    pub fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("valid test date")
    }

    /// Create an undelivered test order
    pub fn order(purchased: &str, category: &str, payment_type: &str, value: f64) -> Order {
        Order {
            purchased_at: timestamp(purchased),
            delivered_at: None,
            category: category.to_string(),
            payment_type: payment_type.to_string(),
            payment_value: value,
        }
    }

    /// Create a delivered test order
    pub fn delivered_order(
        purchased: &str,
        delivered: &str,
        category: &str,
        payment_type: &str,
        value: f64,
    ) -> Order {
        Order {
            delivered_at: Some(timestamp(delivered)),
            ..order(purchased, category, payment_type, value)
        }
    }

    /// Wrap orders in a Dataset the way the loader would
    pub fn dataset(orders: Vec<Order>) -> Dataset {
        let stats = DatasetStats {
            total_orders: orders.len(),
            delivered_orders: orders.iter().filter(|o| o.delivered_at.is_some()).count(),
            first_purchase: orders.iter().map(Order::purchase_date).min(),
            last_purchase: orders.iter().map(Order::purchase_date).max(),
        };
        Dataset { orders, stats }
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("orderscope=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }
}
