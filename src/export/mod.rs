pub mod excel;
pub mod terminal;

use crate::dashboard::{CameraReport, SensorReport};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// 出力先の指定
#[derive(Debug, Clone, Default)]
pub struct ExportTargets<'a> {
    pub json: Option<&'a Path>,
    pub excel: Option<&'a Path>,
}

impl ExportTargets<'_> {
    pub fn is_empty(&self) -> bool {
        self.json.is_none() && self.excel.is_none()
    }
}

pub fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(output_path, json)?;
    Ok(())
}

pub fn export_sensor_report(report: &SensorReport, targets: &ExportTargets) -> Result<()> {
    if let Some(path) = targets.json {
        write_json(report, path)?;
        println!("✔ JSON出力: {}", path.display());
    }
    if let Some(path) = targets.excel {
        println!("- Excelを生成中...");
        excel::write_sensor_excel(report, path)?;
        println!("✔ Excel出力: {}", path.display());
    }
    Ok(())
}

pub fn export_camera_report(report: &CameraReport, targets: &ExportTargets) -> Result<()> {
    if let Some(path) = targets.json {
        write_json(report, path)?;
        println!("✔ JSON出力: {}", path.display());
    }
    if let Some(path) = targets.excel {
        println!("- Excelを生成中...");
        excel::write_camera_excel(report, path)?;
        println!("✔ Excel出力: {}", path.display());
    }
    Ok(())
}
