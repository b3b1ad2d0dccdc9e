use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use sensor_dashboard_common::{Taxonomy, DEFAULT_VWC_THRESHOLD, DEFAULT_WINDOW_DAYS};
use std::path::{Path, PathBuf};

/// データディレクトリを上書きする環境変数
pub const DATA_DIR_ENV: &str = "SENSOR_DASHBOARD_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub sensor1_file: String,
    pub sensor2_file: String,
    pub camera_file: String,
    pub vwc_threshold: f64,
    pub default_window_days: u32,
    pub series_preview_rows: usize,
    /// 省略時は組み込みタクソノミー
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<Taxonomy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            sensor1_file: "soil_moisture_sensor_data_1.csv".into(),
            sensor2_file: "soil_moisture_sensor_data_2.csv".into(),
            camera_file: "plant_health_status.csv".into(),
            vwc_threshold: DEFAULT_VWC_THRESHOLD,
            default_window_days: DEFAULT_WINDOW_DAYS,
            series_preview_rows: 10,
            taxonomy: None,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み（ファイルがなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<Config>(&content)?
        } else {
            log::debug!("設定ファイルなし、既定値を使用: {}", path.display());
            Config::default()
        };

        // 環境変数を優先
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DashboardError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sensor-dashboard").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.vwc_threshold.is_finite() {
            return Err(DashboardError::Config(format!(
                "vwc_threshold が不正です: {}",
                self.vwc_threshold
            )));
        }
        if self.default_window_days == 0 {
            return Err(DashboardError::Config(
                "default_window_days は1以上を指定してください".into(),
            ));
        }
        Ok(())
    }

    pub fn sensor1_path(&self) -> PathBuf {
        self.data_dir.join(&self.sensor1_file)
    }

    pub fn sensor2_path(&self) -> PathBuf {
        self.data_dir.join(&self.sensor2_file)
    }

    pub fn camera_path(&self) -> PathBuf {
        self.data_dir.join(&self.camera_file)
    }

    pub fn taxonomy(&self) -> Taxonomy {
        self.taxonomy.clone().unwrap_or_default()
    }
}
