use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("CSV読み込みエラー ({path}): {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("列が不足しています ({path}): {missing:?}")]
    SchemaMismatch {
        path: PathBuf,
        missing: Vec<String>,
    },

    #[error(transparent)]
    Common(#[from] sensor_dashboard_common::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力選択エラー: {0}")]
    Selection(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
