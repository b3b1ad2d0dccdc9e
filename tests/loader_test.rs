//! CSV読み込みテスト
//!
//! 一時ファイルに書いたCSVでテーブル読み込みを検証

use sensor_dashboard::error::DashboardError;
use sensor_dashboard::loader::{self, load_camera_table, load_sensor_table};
use sensor_dashboard_common::Metric;
use std::path::Path;
use tempfile::tempdir;

const SENSOR_HEADER: &str =
    "gateway_timestamp,raw_adc,vwc_percent,rssi_dbm,distance_m,battery_voltage,soc_percent\n";

/// 正常なセンサーCSV
#[test]
fn test_load_sensor_table() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sensor.csv");
    let content = format!(
        "{}2025-08-01 10:00:00,1500,75.5,-90,30.2,3.9,80\n2025-08-02T11:30:00,1480,82.0,-88,30.1,3.8,78\n",
        SENSOR_HEADER
    );
    std::fs::write(&path, &content).unwrap();

    let table = load_sensor_table(&path).expect("読み込み失敗");

    assert_eq!(table.readings.len(), 2);
    assert!(table.rejected.is_empty());
    assert_eq!(table.readings[1].value(Metric::VwcPercent), 82.0);
    assert_eq!(table.fingerprint, loader::fingerprint(content.as_bytes()));
    assert_eq!(table.fingerprint.len(), 64);
}

/// 余分な列は無視される
#[test]
fn test_extra_columns_ignored() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sensor.csv");
    std::fs::write(
        &path,
        "device_id,soc_percent,gateway_timestamp,raw_adc,vwc_percent,rssi_dbm,distance_m,battery_voltage\n\
         node-01,64,2025-08-01 10:00:00,1500,75.5,-90,30.2,3.9\n",
    )
    .unwrap();

    let table = load_sensor_table(&path).unwrap();
    assert_eq!(table.readings.len(), 1);
    assert_eq!(table.readings[0].soc_percent, 64.0);
}

/// 解釈できない行は除外して記録
#[test]
fn test_bad_rows_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sensor.csv");
    let content = format!(
        "{}2025-08-01 10:00:00,1500,75.5,-90,30.2,3.9,80\nnot-a-date,1500,75.5,-90,30.2,3.9,80\n2025-08-03 10:00:00,1500,abc,-90,30.2,3.9,80\n",
        SENSOR_HEADER
    );
    std::fs::write(&path, content).unwrap();

    let table = load_sensor_table(&path).unwrap();

    assert_eq!(table.readings.len(), 1);
    assert_eq!(table.rejected.len(), 2);
    assert_eq!(table.rejected[0].line, 3);
    assert_eq!(table.rejected[0].column, "gateway_timestamp");
    assert_eq!(table.rejected[1].line, 4);
    assert_eq!(table.rejected[1].column, "vwc_percent");
    assert_eq!(table.rejected[1].value, "abc");
}

/// 必須列が欠けたセンサーCSV
#[test]
fn test_sensor_missing_column() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sensor.csv");
    std::fs::write(&path, "gateway_timestamp,raw_adc\n2025-08-01 10:00:00,1500\n").unwrap();

    let err = load_sensor_table(&path).unwrap_err();
    match err {
        DashboardError::SchemaMismatch { missing, .. } => {
            assert_eq!(missing.len(), 5);
            assert!(missing.contains(&"vwc_percent".to_string()));
        }
        other => panic!("SchemaMismatch expected, got {:?}", other),
    }
}

/// 見出しのみのCSVは0件
#[test]
fn test_header_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sensor.csv");
    std::fs::write(&path, SENSOR_HEADER).unwrap();

    let table = load_sensor_table(&path).unwrap();
    assert!(table.readings.is_empty());
    assert!(table.rejected.is_empty());
}

/// カメラCSV（空欄のラベルも1件として数える）
#[test]
fn test_load_camera_table() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("camera.csv");
    std::fs::write(
        &path,
        "captured_at,detected_object\n2025-08-01,Green Leaf\n2025-08-02,\n2025-08-03,snail\n",
    )
    .unwrap();

    let table = load_camera_table(&path).unwrap();
    let labels: Vec<&str> = table.detections.iter().map(|d| d.detected_object.as_str()).collect();
    assert_eq!(labels, vec!["Green Leaf", "", "snail"]);
}

/// detected_object 列のないカメラCSV
#[test]
fn test_camera_missing_column() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("camera.csv");
    std::fs::write(&path, "captured_at,label\n2025-08-01,leaf\n").unwrap();

    let err = load_camera_table(&path).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::SchemaMismatch { ref missing, .. } if missing == &vec!["detected_object".to_string()]
    ));
}

/// 存在しないファイル
#[test]
fn test_file_not_found() {
    let result = load_sensor_table(Path::new("/nonexistent/path/12345.csv"));
    assert!(matches!(result, Err(DashboardError::FileNotFound(_))));

    let result = load_camera_table(Path::new("/nonexistent/path/12345.csv"));
    assert!(matches!(result, Err(DashboardError::FileNotFound(_))));
}
