use std::path::Path;

use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::{DateRange, DatasetStats, Order};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors raised while loading the order dataset. All of them are fatal:
/// there is no recovery path for a missing or unparsable source file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {0}")]
    NotFound(String),
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("record {record}: invalid purchase timestamp '{value}'")]
    BadPurchaseTimestamp { record: u64, value: String },
}

/// Raw CSV row, header-name based. Extra columns in the source are ignored.
#[derive(Debug, Deserialize)]
struct OrderRow {
    #[serde(rename = "order_purchase_timestamp")]
    purchase_timestamp: String,
    #[serde(rename = "order_delivered_customer_date")]
    delivered_timestamp: Option<String>,
    #[serde(rename = "product_category_name_english")]
    category: Option<String>,
    #[serde(rename = "payment_type")]
    payment_type: Option<String>,
    #[serde(rename = "payment_value")]
    payment_value: Option<f64>,
}

/// The in-memory order table, read-only after load
#[derive(Debug)]
pub struct Dataset {
    pub orders: Vec<Order>,
    pub stats: DatasetStats,
}

impl Dataset {
    /// Full purchase-date span of the data, the default filter interval
    pub fn full_range(&self) -> Option<DateRange> {
        match (self.stats.first_purchase, self.stats.last_purchase) {
            (Some(first), Some(last)) => Some(DateRange::new(first, last)),
            _ => None,
        }
    }
}

static DATASET: OnceCell<Dataset> = OnceCell::new();

/// Load the dataset exactly once per process lifetime. Later calls return
/// the cached table; the source path is immutable for the process's life,
/// so there is no invalidation.
pub fn load(path: &Path) -> Result<&'static Dataset, DatasetError> {
    DATASET.get_or_try_init(|| read_dataset(path))
}

/// Read and parse the order CSV. Used directly by tests; production code
/// goes through the memoized [`load`].
pub fn read_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.display().to_string()));
    }

    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut orders = Vec::new();

    for (index, result) in reader.deserialize::<OrderRow>().enumerate() {
        let row = result?;
        let record = index as u64 + 1;

        let purchased_at = parse_timestamp(&row.purchase_timestamp).ok_or_else(|| {
            DatasetError::BadPurchaseTimestamp {
                record,
                value: row.purchase_timestamp.clone(),
            }
        })?;

        // An empty or unparsable delivery cell means the order is still in
        // transit; the row is kept and only the delivery view skips it.
        let delivered_at = row
            .delivered_timestamp
            .as_deref()
            .and_then(parse_timestamp);

        orders.push(Order {
            purchased_at,
            delivered_at,
            category: row.category.unwrap_or_default(),
            payment_type: row.payment_type.unwrap_or_default(),
            payment_value: row.payment_value.unwrap_or(0.0),
        });
    }

    let stats = DatasetStats {
        total_orders: orders.len(),
        delivered_orders: orders.iter().filter(|o| o.delivered_at.is_some()).count(),
        first_purchase: orders.iter().map(Order::purchase_date).min(),
        last_purchase: orders.iter().map(Order::purchase_date).max(),
    };

    info!(
        "Loaded {} orders ({} delivered) from {}",
        stats.total_orders,
        stats.delivered_orders,
        path.display()
    );

    Ok(Dataset { orders, stats })
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT).ok()
}
