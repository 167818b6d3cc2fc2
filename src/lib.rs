pub mod analysis;
pub mod dataset;
pub mod models;
pub mod ui;
