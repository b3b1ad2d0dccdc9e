//! Excel出力（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを作り、ファイルに書き出す。

use crate::dashboard::{CameraReport, SensorReport};
use crate::error::{DashboardError, Result};
use sensor_dashboard_common::export::excel_core;
use std::path::Path;

pub fn write_sensor_excel(report: &SensorReport, output_path: &Path) -> Result<()> {
    let buffer = excel_core::generate_sensor_workbook(&report.cards, &report.series)
        .map_err(DashboardError::ExcelGeneration)?;
    write_buffer(&buffer, output_path)
}

pub fn write_camera_excel(report: &CameraReport, output_path: &Path) -> Result<()> {
    let buffer = excel_core::generate_camera_workbook(&report.summary)
        .map_err(DashboardError::ExcelGeneration)?;
    write_buffer(&buffer, output_path)
}

fn write_buffer(buffer: &[u8], output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)
        .map_err(|e| DashboardError::ExcelGeneration(format!("保存エラー ({}): {}", output_path.display(), e)))
}
