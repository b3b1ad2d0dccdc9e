//! Sensor Dashboard Common Library
//!
//! 土壌水分センサーとカメラ診断ログの集計・分類ロジック（I/Oなし）

pub mod types;
pub mod error;
pub mod taxonomy;
pub mod classifier;
pub mod summarizer;
pub mod views;
pub mod export;

pub use types::{Category, Detection, Metric, Reading};
pub use error::{Error, Result};
pub use taxonomy::{Taxonomy, TaxonomyEntry};
pub use classifier::{
    classify, summarize as summarize_categories, CategoryRow, CategorySummary, PercentageBasis,
    SummaryOptions,
};
pub use summarizer::{
    summarize as summarize_readings, DateRange, MetricStats, MetricSummary, VwcStatus,
    DEFAULT_VWC_THRESHOLD, DEFAULT_WINDOW_DAYS,
};
pub use views::{SeriesPoint, SummaryCard};
