use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One order line item from the source dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub purchased_at: NaiveDateTime,
    pub delivered_at: Option<NaiveDateTime>,
    pub category: String,
    pub payment_type: String,
    pub payment_value: f64,
}

impl Order {
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date()
    }

    /// Whole days between purchase and delivery, `None` while undelivered
    pub fn delivery_days(&self) -> Option<i64> {
        self.delivered_at
            .map(|delivered| (delivered - self.purchased_at).num_days())
    }
}

/// Inclusive date range for filtering orders by purchase date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn days_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Both bounds are compared at day granularity, so any timestamp on the
    /// end calendar day is inside the range.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        let day = timestamp.date();
        self.start <= day && day <= self.end
    }
}

/// Date-picker state: only a complete, ordered pair of dates is filterable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateSelection {
    Empty,
    Partial(NaiveDate),
    Complete(DateRange),
}

impl DateSelection {
    /// Collapse picked dates into a selection. An inverted pair is treated
    /// the same as an incomplete pick: not filterable.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) if s <= e => DateSelection::Complete(DateRange::new(s, e)),
            (Some(s), Some(_)) => DateSelection::Partial(s),
            (Some(s), None) | (None, Some(s)) => DateSelection::Partial(s),
            (None, None) => DateSelection::Empty,
        }
    }

    pub fn range(&self) -> Option<DateRange> {
        match self {
            DateSelection::Complete(range) => Some(*range),
            _ => None,
        }
    }
}

/// Customer value segments, ordered by payment-value quartile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CustomerSegment {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl CustomerSegment {
    pub const ALL: [CustomerSegment; 4] = [
        CustomerSegment::Bronze,
        CustomerSegment::Silver,
        CustomerSegment::Gold,
        CustomerSegment::Platinum,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CustomerSegment::Bronze => "Bronze",
            CustomerSegment::Silver => "Silver",
            CustomerSegment::Gold => "Gold",
            CustomerSegment::Platinum => "Platinum",
        }
    }
}

impl std::fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary statistics captured at load time
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub total_orders: usize,
    pub delivered_orders: usize,
    pub first_purchase: Option<NaiveDate>,
    pub last_purchase: Option<NaiveDate>,
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: String,
    pub preview_rows: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            data_path: std::env::var("DATA_PATH").unwrap_or_else(|_| "main_data.csv".to_string()),
            preview_rows: std::env::var("PREVIEW_ROWS")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .unwrap_or(200),
        })
    }
}
