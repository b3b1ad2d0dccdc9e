//! 描画層に渡すデータ整形
//!
//! - SummaryCard: 指標カード
//! - SeriesPoint: 時系列プロット用の縦持ちデータ
//!
//! 分類の円グラフ用データは `classifier::CategorySummary` をそのまま渡す。

use crate::summarizer::{compute_stats, MetricSummary, VwcStatus};
use crate::types::{Metric, Reading};
use chrono::NaiveDateTime;
use serde::Serialize;

/// 指標カード
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub label: String,
    pub value: f64,
    /// 表示用文字列（小数第2位 + 単位）
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VwcStatus>,
}

impl SummaryCard {
    fn new(label: String, metric: Metric, value: f64) -> Self {
        Self {
            label,
            value,
            display: format!("{:.2}{}", value, metric.unit()),
            status: None,
        }
    }
}

/// 縦持ちの時系列データ1点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub metric: Metric,
    pub value: f64,
}

/// vwc_percent のカード（最高・最低・平均+状態）
///
/// 範囲内が0件なら空。列の選択状態には依存しない。
pub fn sensor_cards(summary: &MetricSummary, vwc_threshold: f64) -> Vec<SummaryCard> {
    let metric = Metric::VwcPercent;
    let stats = match compute_stats(&summary.readings, metric) {
        Some(s) => s,
        None => return Vec::new(),
    };

    let mut average = SummaryCard::new(format!("Average {}", metric), metric, stats.mean);
    average.status = Some(VwcStatus::from_average(stats.mean, vwc_threshold));

    vec![
        SummaryCard::new(format!("Highest {}", metric), metric, stats.max),
        SummaryCard::new(format!("Lowest {}", metric), metric, stats.min),
        average,
    ]
}

/// 選択列ごとに縦持ちへ変換（列順 → レコード順）
pub fn melt(readings: &[Reading], metrics: &[Metric]) -> Vec<SeriesPoint> {
    metrics
        .iter()
        .flat_map(|metric| {
            readings.iter().map(move |r| SeriesPoint {
                timestamp: r.timestamp,
                metric: *metric,
                value: r.value(*metric),
            })
        })
        .collect()
}
