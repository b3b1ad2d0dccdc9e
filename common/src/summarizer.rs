//! センサー値の期間集計
//!
//! 日付範囲（両端を含む・日単位）で絞り込み、選択列ごとに最小・最大・平均を計算する。
//! 絞り込み後に0件なら集計値は `None`（NaNやエラーにはしない）。

use crate::error::{Error, Result};
use crate::types::{Metric, Reading};
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// vwc_percent の判定閾値（既定値）
pub const DEFAULT_VWC_THRESHOLD: f64 = 80.0;

/// 既定の表示期間（日）
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// 日付範囲（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// 時刻を切り捨てて日付で比較
    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        let date = timestamp.date();
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} 〜 {}", self.start, self.end)
    }
}

/// vwc_percent の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VwcStatus {
    Dry,
    Normal,
    Wet,
}

impl VwcStatus {
    /// 平均値から判定（閾値ちょうどはNORMAL）
    pub fn from_average(average: f64, threshold: f64) -> Self {
        if average < threshold {
            VwcStatus::Dry
        } else if average > threshold {
            VwcStatus::Wet
        } else {
            VwcStatus::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VwcStatus::Dry => "DRY",
            VwcStatus::Normal => "NORMAL",
            VwcStatus::Wet => "WET",
        }
    }
}

impl std::fmt::Display for VwcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 1列分の集計値
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricStats {
    pub metric: Metric,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

/// 期間集計の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub range: DateRange,
    /// 集計対象の列（Metric::ALL の順、重複なし）
    pub metrics: Vec<Metric>,
    /// 範囲内のレコード
    pub readings: Vec<Reading>,
    /// 範囲内が0件なら None
    pub stats: Option<Vec<MetricStats>>,
}

impl MetricSummary {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn stats_for(&self, metric: Metric) -> Option<&MetricStats> {
        self.stats.as_ref()?.iter().find(|s| s.metric == metric)
    }
}

/// 1列の最小・最大・平均（0件なら None）
pub fn compute_stats(readings: &[Reading], metric: Metric) -> Option<MetricStats> {
    if readings.is_empty() {
        return None;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;

    for reading in readings {
        let v = reading.value(metric);
        min = min.min(v);
        max = max.max(v);
        sum += v;
    }

    Some(MetricStats {
        metric,
        min,
        max,
        mean: sum / readings.len() as f64,
        count: readings.len(),
    })
}

/// 範囲内のレコードを抽出（入力順を保持）
pub fn filter_by_date(readings: &[Reading], range: &DateRange) -> Vec<Reading> {
    readings
        .iter()
        .filter(|r| range.contains(&r.timestamp))
        .cloned()
        .collect()
}

/// データの最古日・最新日
pub fn date_bounds(readings: &[Reading]) -> Option<(NaiveDate, NaiveDate)> {
    let min = readings.iter().map(|r| r.timestamp.date()).min()?;
    let max = readings.iter().map(|r| r.timestamp.date()).max()?;
    Some((min, max))
}

/// 既定の表示範囲: 最新日から `window_days` 日前まで（最古日より前にはしない）
pub fn default_range(readings: &[Reading], window_days: u32) -> Option<DateRange> {
    let (min, max) = date_bounds(readings)?;
    let start = max
        .checked_sub_days(Days::new(u64::from(window_days)))
        .map(|d| d.max(min))
        .unwrap_or(min);
    Some(DateRange { start, end: max })
}

/// 期間集計
pub fn summarize(readings: &[Reading], range: DateRange, metrics: &[Metric]) -> MetricSummary {
    let metrics = Metric::select(metrics);

    let filtered = filter_by_date(readings, &range);

    let stats = if filtered.is_empty() {
        None
    } else {
        Some(
            metrics
                .iter()
                .filter_map(|m| compute_stats(&filtered, *m))
                .collect(),
        )
    };

    MetricSummary {
        range,
        metrics,
        readings: filtered,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reading(day: u32, hour: u32, vwc: f64) -> Reading {
        Reading {
            timestamp: date(2025, 5, day).and_hms_opt(hour, 30, 0).unwrap(),
            raw_adc: 1000.0 + vwc,
            vwc_percent: vwc,
            rssi_dbm: -90.0,
            distance_m: 50.0,
            battery_voltage: 3.7,
            soc_percent: 80.0,
        }
    }

    fn sample() -> Vec<Reading> {
        vec![
            reading(1, 8, 70.0),
            reading(2, 23, 75.0),
            reading(3, 0, 85.0),
            reading(5, 12, 90.0),
        ]
    }

    #[test]
    fn test_range_rejects_inverted() {
        assert!(matches!(
            DateRange::new(date(2025, 5, 3), date(2025, 5, 1)),
            Err(Error::InvalidDateRange { .. })
        ));
        assert!(DateRange::new(date(2025, 5, 1), date(2025, 5, 1)).is_ok());
    }

    #[test]
    fn test_filter_inclusive_day_granularity() {
        let range = DateRange::new(date(2025, 5, 2), date(2025, 5, 3)).unwrap();
        let filtered = filter_by_date(&sample(), &range);
        // 2日23:30 と 3日00:30 の両方が含まれる
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| range.contains(&r.timestamp)));
    }

    #[test]
    fn test_summarize_stats() {
        let range = DateRange::new(date(2025, 5, 1), date(2025, 5, 3)).unwrap();
        let summary = summarize(&sample(), range, &[Metric::VwcPercent]);

        assert_eq!(summary.readings.len(), 3);
        let vwc = summary.stats_for(Metric::VwcPercent).unwrap();
        assert_eq!(vwc.min, 70.0);
        assert_eq!(vwc.max, 85.0);
        assert!((vwc.mean - 76.666_666).abs() < 1e-4);
        assert_eq!(vwc.count, 3);
        assert!(summary.stats_for(Metric::RawAdc).is_none());
    }

    #[test]
    fn test_summarize_metric_order_and_dedup() {
        let range = DateRange::new(date(2025, 5, 1), date(2025, 5, 5)).unwrap();
        let summary = summarize(
            &sample(),
            range,
            &[Metric::SocPercent, Metric::RawAdc, Metric::SocPercent],
        );
        assert_eq!(summary.metrics, vec![Metric::RawAdc, Metric::SocPercent]);
        assert_eq!(summary.stats.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_summarize_empty_range_no_data() {
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 30)).unwrap();
        let summary = summarize(&sample(), range, &Metric::ALL);
        assert!(summary.is_empty());
        assert!(summary.stats.is_none());
    }

    #[test]
    fn test_summarize_readings_reexport() {
        let range = DateRange::new(date(2025, 5, 1), date(2025, 5, 31)).unwrap();
        let summary = crate::summarize_readings(&sample(), range, &[Metric::VwcPercent]);
        assert_eq!(summary, summarize(&sample(), range, &[Metric::VwcPercent]));
    }

    #[test]
    fn test_summarize_empty_input_no_data() {
        let range = DateRange::new(date(2025, 5, 1), date(2025, 5, 1)).unwrap();
        let summary = summarize(&[], range, &Metric::ALL);
        assert!(summary.stats.is_none());
        assert!(compute_stats(&[], Metric::VwcPercent).is_none());
    }

    #[test]
    fn test_output_never_larger_than_input() {
        let data = sample();
        for (s, e) in [(1, 1), (1, 5), (2, 4), (4, 4), (5, 5)] {
            let range = DateRange::new(date(2025, 5, s), date(2025, 5, e)).unwrap();
            let summary = summarize(&data, range, &Metric::ALL);
            assert!(summary.readings.len() <= data.len());
            assert!(summary.readings.iter().all(|r| range.contains(&r.timestamp)));
        }
    }

    #[test]
    fn test_vwc_status_threshold() {
        assert_eq!(VwcStatus::from_average(80.0, DEFAULT_VWC_THRESHOLD), VwcStatus::Normal);
        assert_eq!(VwcStatus::from_average(79.99, DEFAULT_VWC_THRESHOLD), VwcStatus::Dry);
        assert_eq!(VwcStatus::from_average(80.01, DEFAULT_VWC_THRESHOLD), VwcStatus::Wet);
    }

    #[test]
    fn test_vwc_status_custom_threshold() {
        assert_eq!(VwcStatus::from_average(40.0, 35.0), VwcStatus::Wet);
        assert_eq!(VwcStatus::from_average(35.0, 35.0), VwcStatus::Normal);
    }

    #[test]
    fn test_date_bounds() {
        assert_eq!(date_bounds(&sample()), Some((date(2025, 5, 1), date(2025, 5, 5))));
        assert_eq!(date_bounds(&[]), None);
    }

    #[test]
    fn test_default_range_clamped_to_min() {
        let range = default_range(&sample(), DEFAULT_WINDOW_DAYS).unwrap();
        assert_eq!(range.start, date(2025, 5, 1));
        assert_eq!(range.end, date(2025, 5, 5));
    }

    #[test]
    fn test_default_range_window() {
        let range = default_range(&sample(), 2).unwrap();
        assert_eq!(range.start, date(2025, 5, 3));
        assert_eq!(range.end, date(2025, 5, 5));
    }
}
