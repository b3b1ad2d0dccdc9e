//! 土壌水分センサー・カメラ診断ダッシュボード
//!
//! CSVの読み込み・キャッシュ・設定・端末/ファイル出力を担当し、
//! 集計と分類は `sensor_dashboard_common` に委ねる。

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod loader;
pub mod selector;
