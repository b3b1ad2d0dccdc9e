//! CSV読み込みモジュール
//!
//! センサーCSV・カメラCSVを読み込み、型付きのテーブルに変換する。
//! 必須列が欠けている場合はテーブル単位でエラー、
//! 値が解釈できない行はその行だけ除外して `RowError` に記録する。

pub mod cache;

pub use cache::TableCache;

use crate::error::{DashboardError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use sensor_dashboard_common::{Detection, Metric, Reading};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_COLUMN: &str = "gateway_timestamp";
pub const DETECTED_OBJECT_COLUMN: &str = "detected_object";

/// タイムゾーンなしの日時書式（順に試行）
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// オフセット付きの日時書式
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// 除外した行の情報
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    /// CSV上の行番号（見出し行が1）
    pub line: u64,
    pub column: String,
    pub value: String,
    pub reason: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}行目 {}='{}': {}",
            self.line, self.column, self.value, self.reason
        )
    }
}

/// センサーテーブル
#[derive(Debug, Clone)]
pub struct SensorTable {
    pub path: PathBuf,
    /// ファイル内容のSHA-256（hex）
    pub fingerprint: String,
    pub readings: Vec<Reading>,
    pub rejected: Vec<RowError>,
}

/// カメラテーブル
#[derive(Debug, Clone)]
pub struct CameraTable {
    pub path: PathBuf,
    pub fingerprint: String,
    pub detections: Vec<Detection>,
    pub rejected: Vec<RowError>,
}

/// センサーCSVの必須列
pub fn sensor_columns() -> Vec<&'static str> {
    std::iter::once(TIMESTAMP_COLUMN)
        .chain(Metric::ALL.iter().map(|m| m.column_name()))
        .collect()
}

/// バイト列のSHA-256（hex）
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// 日時文字列を解釈（オフセット付きは記載された現地時刻を採用）
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_local());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(DashboardError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read(path)?)
}

fn csv_error(path: &Path, source: csv::Error) -> DashboardError {
    DashboardError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// 見出し行から列名 → 位置のマップを作り、必須列を確認
fn header_index(
    headers: &StringRecord,
    required: &[&str],
    path: &Path,
) -> Result<HashMap<String, usize>> {
    let index: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|c| !index.contains_key(**c))
        .map(|c| c.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(DashboardError::SchemaMismatch {
            path: path.to_path_buf(),
            missing,
        });
    }

    Ok(index)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// 列名で値を取得（列不足の行は空文字）
fn field<'a>(record: &'a StringRecord, index: &HashMap<String, usize>, column: &str) -> &'a str {
    index
        .get(column)
        .and_then(|&i| record.get(i))
        .unwrap_or("")
}

fn parse_reading(
    record: &StringRecord,
    index: &HashMap<String, usize>,
) -> std::result::Result<Reading, RowError> {
    let line = line_of(record);
    let raw_ts = field(record, index, TIMESTAMP_COLUMN);
    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| RowError {
        line,
        column: TIMESTAMP_COLUMN.to_string(),
        value: raw_ts.to_string(),
        reason: "日時として解釈できません".into(),
    })?;

    let mut values = [0.0; 6];
    for (slot, metric) in values.iter_mut().zip(Metric::ALL) {
        let raw = field(record, index, metric.column_name());
        *slot = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RowError {
                line,
                column: metric.column_name().to_string(),
                value: raw.to_string(),
                reason: "数値として解釈できません".into(),
            })?;
    }

    let [raw_adc, vwc_percent, rssi_dbm, distance_m, battery_voltage, soc_percent] = values;
    Ok(Reading {
        timestamp,
        raw_adc,
        vwc_percent,
        rssi_dbm,
        distance_m,
        battery_voltage,
        soc_percent,
    })
}

fn csv_reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(bytes)
}

/// センサーCSVをバイト列から解釈
pub fn parse_sensor_csv(bytes: &[u8], path: &Path) -> Result<(Vec<Reading>, Vec<RowError>)> {
    let mut reader = csv_reader(bytes);
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let index = header_index(&headers, &sensor_columns(), path)?;

    let mut readings = Vec::new();
    let mut rejected = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rejected.push(RowError {
                    line: e.position().map(|p| p.line()).unwrap_or(i as u64 + 2),
                    column: String::new(),
                    value: String::new(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match parse_reading(&record, &index) {
            Ok(reading) => readings.push(reading),
            Err(row_error) => {
                log::debug!("{}: 行を除外 {}", path.display(), row_error);
                rejected.push(row_error);
            }
        }
    }

    Ok((readings, rejected))
}

/// カメラCSVをバイト列から解釈
///
/// `detected_object` 列がなければ `SchemaMismatch`。空欄は空ラベルとして残す。
pub fn parse_camera_csv(bytes: &[u8], path: &Path) -> Result<(Vec<Detection>, Vec<RowError>)> {
    let mut reader = csv_reader(bytes);
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let index = header_index(&headers, &[DETECTED_OBJECT_COLUMN], path)?;
    let column = index[DETECTED_OBJECT_COLUMN];

    let mut detections = Vec::new();
    let mut rejected = Vec::new();

    for (i, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let label = record.get(column).unwrap_or("");
                detections.push(Detection::new(label));
            }
            Err(e) => {
                rejected.push(RowError {
                    line: e.position().map(|p| p.line()).unwrap_or(i as u64 + 2),
                    column: DETECTED_OBJECT_COLUMN.to_string(),
                    value: String::new(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok((detections, rejected))
}

/// センサーCSVを読み込み
pub fn load_sensor_table(path: &Path) -> Result<SensorTable> {
    let bytes = read_file(path)?;
    let (readings, rejected) = parse_sensor_csv(&bytes, path)?;

    log::info!("{}: {}件読み込み", path.display(), readings.len());
    if !rejected.is_empty() {
        log::warn!("{}: {}行を除外しました", path.display(), rejected.len());
    }

    Ok(SensorTable {
        path: path.to_path_buf(),
        fingerprint: fingerprint(&bytes),
        readings,
        rejected,
    })
}

/// カメラCSVを読み込み
pub fn load_camera_table(path: &Path) -> Result<CameraTable> {
    let bytes = read_file(path)?;
    let (detections, rejected) = parse_camera_csv(&bytes, path)?;

    log::info!("{}: {}件読み込み", path.display(), detections.len());
    if !rejected.is_empty() {
        log::warn!("{}: {}行を除外しました", path.display(), rejected.len());
    }

    Ok(CameraTable {
        path: path.to_path_buf(),
        fingerprint: fingerprint(&bytes),
        detections,
        rejected,
    })
}
