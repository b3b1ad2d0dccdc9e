//! ページ単位の処理
//!
//! 選択されたデータソースを（キャッシュ経由で）読み込み、
//! 集計・分類を行って描画層向けのレポートを組み立てる。

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::loader::{CameraTable, SensorTable, TableCache};
use chrono::NaiveDate;
use sensor_dashboard_common::classifier::{self, CategorySummary, PercentageBasis, SummaryOptions};
use sensor_dashboard_common::summarizer::{self, DateRange, MetricStats};
use sensor_dashboard_common::views::{self, SeriesPoint, SummaryCard};
use sensor_dashboard_common::{Metric, Taxonomy};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// センサーの選択肢
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorSource {
    Sensor1,
    Sensor2,
}

impl SensorSource {
    pub fn title(&self) -> &'static str {
        match self {
            SensorSource::Sensor1 => "Soil Sensor 1 Data",
            SensorSource::Sensor2 => "Soil Sensor 2 Data",
        }
    }
}

impl std::str::FromStr for SensorSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sensor1" | "sensor-1" | "1" => Ok(SensorSource::Sensor1),
            "sensor2" | "sensor-2" | "2" => Ok(SensorSource::Sensor2),
            _ => Err(format!("Unknown sensor: {}. Use sensor1 or sensor2", s)),
        }
    }
}

impl std::fmt::Display for SensorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorSource::Sensor1 => write!(f, "sensor1"),
            SensorSource::Sensor2 => write!(f, "sensor2"),
        }
    }
}

/// センサーページへの入力
#[derive(Debug, Clone)]
pub struct SensorRequest {
    /// None なら既定の表示期間
    pub range: Option<DateRange>,
    pub metrics: Vec<Metric>,
}

impl Default for SensorRequest {
    fn default() -> Self {
        Self {
            range: None,
            metrics: Metric::ALL.to_vec(),
        }
    }
}

/// センサーページの出力
#[derive(Debug, Clone, Serialize)]
pub struct SensorReport {
    pub title: String,
    pub source: PathBuf,
    pub fingerprint: String,
    /// データの最古日・最新日（0件なら None）
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    pub range: Option<DateRange>,
    pub metrics: Vec<Metric>,
    pub cards: Vec<SummaryCard>,
    /// 範囲内が0件なら None
    pub stats: Option<Vec<MetricStats>>,
    pub series: Vec<SeriesPoint>,
    pub rows_in_range: usize,
    pub rejected_rows: usize,
}

impl SensorReport {
    pub fn has_data(&self) -> bool {
        self.stats.is_some()
    }
}

/// カメラページの出力
#[derive(Debug, Clone, Serialize)]
pub struct CameraReport {
    pub title: String,
    pub source: PathBuf,
    pub fingerprint: String,
    pub summary: CategorySummary,
    pub rejected_rows: usize,
}

/// データソースの状態（sourcesコマンド用）
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub name: String,
    pub path: PathBuf,
    pub exists: bool,
    pub rows: Option<usize>,
    pub rejected_rows: Option<usize>,
    pub fingerprint: Option<String>,
    pub error: Option<String>,
}

/// 開始日・終了日の指定から表示期間を決める
///
/// 片方だけ指定された場合、もう片方は既定の表示期間から補う。
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    default: Option<DateRange>,
) -> Result<Option<DateRange>> {
    let range = match (start, end) {
        (None, None) => return Ok(None),
        (Some(s), Some(e)) => DateRange::new(s, e)?,
        (Some(s), None) => {
            let e = default.map(|d| d.end.max(s)).unwrap_or(s);
            DateRange::new(s, e)?
        }
        (None, Some(e)) => {
            let s = default.map(|d| d.start.min(e)).unwrap_or(e);
            DateRange::new(s, e)?
        }
    };
    Ok(Some(range))
}

/// センサーテーブルからレポートを作成
pub fn sensor_report(
    table: &SensorTable,
    title: &str,
    request: &SensorRequest,
    config: &Config,
) -> SensorReport {
    let date_bounds = summarizer::date_bounds(&table.readings);
    let range = request
        .range
        .or_else(|| summarizer::default_range(&table.readings, config.default_window_days));

    let mut report = SensorReport {
        title: title.to_string(),
        source: table.path.clone(),
        fingerprint: table.fingerprint.clone(),
        date_bounds,
        range,
        metrics: Vec::new(),
        cards: Vec::new(),
        stats: None,
        series: Vec::new(),
        rows_in_range: 0,
        rejected_rows: table.rejected.len(),
    };

    let range = match range {
        Some(r) => r,
        None => {
            // 有効な行が1件もない
            report.metrics = Metric::select(&request.metrics);
            return report;
        }
    };

    let summary = summarizer::summarize(&table.readings, range, &request.metrics);
    report.cards = views::sensor_cards(&summary, config.vwc_threshold);
    report.series = views::melt(&summary.readings, &summary.metrics);
    report.rows_in_range = summary.readings.len();
    report.metrics = summary.metrics;
    report.stats = summary.stats;
    report
}

/// カメラテーブルからレポートを作成
pub fn camera_report(
    table: &CameraTable,
    taxonomy: &Taxonomy,
    options: SummaryOptions,
) -> CameraReport {
    let categories = classifier::classify(&table.detections, taxonomy);
    let summary = classifier::summarize(&categories, taxonomy, options);

    if summary.unclassified > 0
        && options.basis == PercentageBasis::Declared
        && !options.include_unclassified
    {
        log::warn!(
            "unclassified {}件は集計表と割合の分母から除外されています",
            summary.unclassified
        );
    }

    CameraReport {
        title: "Camera Sensor Data".to_string(),
        source: table.path.clone(),
        fingerprint: table.fingerprint.clone(),
        summary,
        rejected_rows: table.rejected.len(),
    }
}

/// 設定とテーブルキャッシュを保持するルーター
pub struct Dashboard {
    config: Config,
    cache: TableCache,
}

impl Dashboard {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache: TableCache::new(),
        }
    }

    pub fn sensor_path(&self, source: SensorSource) -> PathBuf {
        match source {
            SensorSource::Sensor1 => self.config.sensor1_path(),
            SensorSource::Sensor2 => self.config.sensor2_path(),
        }
    }

    /// センサーテーブルを取得（選択プロンプト用）
    pub fn sensor_table(&mut self, source: SensorSource) -> Result<std::rc::Rc<SensorTable>> {
        let path = self.sensor_path(source);
        self.cache.sensor(&path)
    }

    pub fn sensor_page(
        &mut self,
        source: SensorSource,
        request: &SensorRequest,
    ) -> Result<SensorReport> {
        let table = self.sensor_table(source)?;
        Ok(sensor_report(&table, source.title(), request, &self.config))
    }

    /// カメラページ
    ///
    /// `detected_object` 列がない場合は `SchemaMismatch` を返し、分類は行わない。
    pub fn camera_page(
        &mut self,
        taxonomy: Option<&Taxonomy>,
        options: SummaryOptions,
    ) -> Result<CameraReport> {
        let path = self.config.camera_path();
        let table = self.cache.camera(&path)?;
        let default_taxonomy;
        let taxonomy = match taxonomy {
            Some(t) => t,
            None => {
                default_taxonomy = self.config.taxonomy();
                &default_taxonomy
            }
        };
        Ok(camera_report(&table, taxonomy, options))
    }

    /// 設定済みデータソースの一覧
    pub fn sources(&mut self) -> Vec<SourceStatus> {
        let entries = [
            ("sensor1", self.config.sensor1_path(), false),
            ("sensor2", self.config.sensor2_path(), false),
            ("camera", self.config.camera_path(), true),
        ];

        entries
            .into_iter()
            .map(|(name, path, is_camera)| {
                let loaded = if is_camera {
                    self.cache
                        .camera(&path)
                        .map(|t| (t.detections.len(), t.rejected.len(), t.fingerprint.clone()))
                } else {
                    self.cache
                        .sensor(&path)
                        .map(|t| (t.readings.len(), t.rejected.len(), t.fingerprint.clone()))
                };
                source_status(name, &path, loaded)
            })
            .collect()
    }

    /// 読み込み済みテーブル数
    pub fn cached_tables(&self) -> usize {
        self.cache.len()
    }
}

fn source_status(
    name: &str,
    path: &Path,
    loaded: Result<(usize, usize, String)>,
) -> SourceStatus {
    let exists = path.exists();
    match loaded {
        Ok((rows, rejected, fingerprint)) => SourceStatus {
            name: name.to_string(),
            path: path.to_path_buf(),
            exists,
            rows: Some(rows),
            rejected_rows: Some(rejected),
            fingerprint: Some(fingerprint),
            error: None,
        },
        Err(e) => {
            if matches!(e, DashboardError::SchemaMismatch { .. }) {
                log::warn!("{}: {}", name, e);
            }
            SourceStatus {
                name: name.to_string(),
                path: path.to_path_buf(),
                exists,
                rows: None,
                rejected_rows: None,
                fingerprint: None,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sensor_dashboard_common::{Category, Detection, Reading, VwcStatus};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn table(readings: Vec<Reading>) -> SensorTable {
        SensorTable {
            path: PathBuf::from("sensor.csv"),
            fingerprint: "f".repeat(64),
            readings,
            rejected: Vec::new(),
        }
    }

    fn reading(day: u32, vwc: f64) -> Reading {
        Reading {
            timestamp: date(day).and_hms_opt(10, 0, 0).unwrap(),
            raw_adc: 1500.0,
            vwc_percent: vwc,
            rssi_dbm: -80.0,
            distance_m: 30.0,
            battery_voltage: 3.8,
            soc_percent: 70.0,
        }
    }

    #[test]
    fn test_sensor_source_from_str() {
        assert_eq!("sensor1".parse::<SensorSource>().unwrap(), SensorSource::Sensor1);
        assert_eq!("2".parse::<SensorSource>().unwrap(), SensorSource::Sensor2);
        assert!("camera".parse::<SensorSource>().is_err());
    }

    #[test]
    fn test_sensor_report_default_range() {
        let t = table(vec![reading(1, 70.0), reading(20, 85.0), reading(31, 90.0)]);
        let config = Config {
            default_window_days: 15,
            ..Default::default()
        };
        let report = sensor_report(&t, "title", &SensorRequest::default(), &config);

        assert_eq!(report.date_bounds, Some((date(1), date(31))));
        assert_eq!(report.range.unwrap().start, date(16));
        assert_eq!(report.rows_in_range, 2);
        assert_eq!(report.series.len(), 2 * Metric::ALL.len());
        assert_eq!(report.cards[2].status, Some(VwcStatus::Wet));
    }

    #[test]
    fn test_sensor_report_explicit_range_no_data() {
        let t = table(vec![reading(1, 70.0)]);
        let request = SensorRequest {
            range: Some(DateRange::new(date(10), date(12)).unwrap()),
            metrics: vec![Metric::VwcPercent],
        };
        let report = sensor_report(&t, "title", &request, &Config::default());

        assert!(!report.has_data());
        assert!(report.cards.is_empty());
        assert!(report.series.is_empty());
        assert_eq!(report.metrics, vec![Metric::VwcPercent]);
    }

    #[test]
    fn test_sensor_report_empty_table() {
        let t = table(Vec::new());
        let report = sensor_report(&t, "title", &SensorRequest::default(), &Config::default());
        assert!(report.range.is_none());
        assert!(report.date_bounds.is_none());
        assert!(!report.has_data());
        assert_eq!(report.metrics.len(), 6);

        let request = SensorRequest {
            range: None,
            metrics: vec![Metric::SocPercent, Metric::VwcPercent],
        };
        let report = sensor_report(&t, "title", &request, &Config::default());
        assert_eq!(report.metrics, vec![Metric::VwcPercent, Metric::SocPercent]);
    }

    #[test]
    fn test_resolve_range() {
        let default = DateRange::new(date(10), date(20)).ok();
        assert_eq!(resolve_range(None, None, default).unwrap(), None);

        let r = resolve_range(Some(date(12)), None, default).unwrap().unwrap();
        assert_eq!((r.start, r.end), (date(12), date(20)));

        let r = resolve_range(None, Some(date(5)), default).unwrap().unwrap();
        assert_eq!((r.start, r.end), (date(5), date(5)));

        let r = resolve_range(Some(date(25)), None, None).unwrap().unwrap();
        assert_eq!((r.start, r.end), (date(25), date(25)));

        assert!(resolve_range(Some(date(20)), Some(date(1)), default).is_err());
    }

    #[test]
    fn test_camera_report() {
        let t = CameraTable {
            path: PathBuf::from("camera.csv"),
            fingerprint: String::new(),
            detections: vec![Detection::new("Green leaf"), Detection::new("unknown")],
            rejected: Vec::new(),
        };
        let report = camera_report(&t, &Taxonomy::default(), SummaryOptions::default());
        assert_eq!(report.summary.count(Category::Healthy), 1);
        assert_eq!(report.summary.unclassified, 1);
        assert_eq!(report.summary.percentage(Category::Healthy), Some(100.0));
    }
}
