//! データ型定義
//!
//! センサーCSVとカメラCSVから読み込まれる型:
//! - Reading: 土壌水分センサーの1レコード
//! - Detection: カメラ診断の1レコード
//! - Metric: センサーの数値列
//! - Category: 作物状態の分類

use crate::error::Error;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// センサー1レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub raw_adc: f64,
    pub vwc_percent: f64,
    pub rssi_dbm: f64,
    pub distance_m: f64,
    pub battery_voltage: f64,
    pub soc_percent: f64,
}

impl Reading {
    /// 指定した列の値
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::RawAdc => self.raw_adc,
            Metric::VwcPercent => self.vwc_percent,
            Metric::RssiDbm => self.rssi_dbm,
            Metric::DistanceM => self.distance_m,
            Metric::BatteryVoltage => self.battery_voltage,
            Metric::SocPercent => self.soc_percent,
        }
    }
}

/// カメラ診断1レコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub detected_object: String,
}

impl Detection {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            detected_object: label.into(),
        }
    }
}

/// センサーの数値列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    RawAdc,
    VwcPercent,
    RssiDbm,
    DistanceM,
    BatteryVoltage,
    SocPercent,
}

impl Metric {
    /// 表示・集計の順序
    pub const ALL: [Metric; 6] = [
        Metric::RawAdc,
        Metric::VwcPercent,
        Metric::RssiDbm,
        Metric::DistanceM,
        Metric::BatteryVoltage,
        Metric::SocPercent,
    ];

    /// 選択された列を固定順に並べ直す（重複は1つにまとめる）
    pub fn select(selected: &[Metric]) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| selected.contains(m))
            .collect()
    }

    /// CSVの列名
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::RawAdc => "raw_adc",
            Metric::VwcPercent => "vwc_percent",
            Metric::RssiDbm => "rssi_dbm",
            Metric::DistanceM => "distance_m",
            Metric::BatteryVoltage => "battery_voltage",
            Metric::SocPercent => "soc_percent",
        }
    }

    /// 単位（カード表示用）
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::RawAdc => "",
            Metric::VwcPercent | Metric::SocPercent => "%",
            Metric::RssiDbm => " dBm",
            Metric::DistanceM => " m",
            Metric::BatteryVoltage => " V",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Metric::ALL
            .into_iter()
            .find(|m| m.column_name() == key)
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// 作物状態の分類
///
/// `Unclassified` はどのキーワードにも一致しなかった場合の受け皿で、
/// タクソノミーには含めない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "snail-infested crops")]
    SnailInfested,
    #[serde(rename = "stressed crops")]
    Stressed,
    #[serde(rename = "healthy crops")]
    Healthy,
    #[serde(rename = "dead crops")]
    Dead,
    #[serde(rename = "unclassified")]
    Unclassified,
}

impl Category {
    /// 宣言順（Unclassifiedを除く）
    pub const DECLARED: [Category; 4] = [
        Category::SnailInfested,
        Category::Stressed,
        Category::Healthy,
        Category::Dead,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::SnailInfested => "snail-infested crops",
            Category::Stressed => "stressed crops",
            Category::Healthy => "healthy crops",
            Category::Dead => "dead crops",
            Category::Unclassified => "unclassified",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Category::DECLARED
            .into_iter()
            .chain(std::iter::once(Category::Unclassified))
            .find(|c| c.label() == key)
            .ok_or_else(|| Error::InvalidTaxonomy(format!("unknown category '{}'", s)))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
