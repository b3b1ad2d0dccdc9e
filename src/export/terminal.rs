//! 端末表示

use crate::dashboard::{CameraReport, SensorReport, SourceStatus};
use sensor_dashboard_common::{PercentageBasis, SummaryCard};

fn print_cards(cards: &[SummaryCard]) {
    for card in cards {
        match card.status {
            Some(status) => println!("  {:<22} {:>10}  [{}]", card.label, card.display, status),
            None => println!("  {:<22} {:>10}", card.label, card.display),
        }
    }
}

pub fn print_sensor_report(report: &SensorReport, preview_rows: usize) {
    println!("🌱 {}", report.title);
    println!("  ソース: {}", report.source.display());

    if let Some((min, max)) = report.date_bounds {
        println!("  データ期間: {} 〜 {}", min, max);
    }
    if let Some(range) = report.range {
        println!("  表示期間: {}", range);
    }
    if report.rejected_rows > 0 {
        println!("  ⚠ 解釈できず除外した行: {}", report.rejected_rows);
    }
    println!();

    if !report.has_data() {
        println!("⚠ 選択した期間にデータがありません");
        return;
    }

    print_cards(&report.cards);
    println!();

    if let Some(stats) = &report.stats {
        println!("  {:<16} {:>12} {:>12} {:>12}", "metric", "min", "max", "mean");
        for s in stats {
            println!(
                "  {:<16} {:>12.2} {:>12.2} {:>12.2}",
                s.metric.column_name(),
                s.min,
                s.max,
                s.mean
            );
        }
        println!();
    }

    println!("  時系列 ({}件, {}行)", report.series.len(), report.rows_in_range);
    for point in report.series.iter().take(preview_rows) {
        println!(
            "  {}  {:<16} {:>10.2}",
            point.timestamp.format("%Y-%m-%d %H:%M:%S"),
            point.metric.column_name(),
            point.value
        );
    }
    if report.series.len() > preview_rows {
        println!("  ... 他 {}件", report.series.len() - preview_rows);
    }
}

pub fn print_camera_report(report: &CameraReport) {
    let summary = &report.summary;

    println!("📷 {}", report.title);
    println!("  ソース: {}", report.source.display());
    println!("  検出数: {}", summary.detections);
    if report.rejected_rows > 0 {
        println!("  ⚠ 解釈できず除外した行: {}", report.rejected_rows);
    }
    println!();

    println!("  {:<22} {:>6} {:>11}", "Category", "Count", "Percentage");
    for row in &summary.rows {
        println!("  {:<22} {:>6} {:>10.2}%", row.category.label(), row.count, row.percentage);
    }
    println!();

    let basis = match summary.basis {
        PercentageBasis::Declared => "分類済みの合計",
        PercentageBasis::AllDetections => "全検出数",
    };
    println!("  割合の分母: {} ({}件)", basis, summary.total);
    println!("  unclassified: {}件", summary.unclassified);
}

pub fn print_sources(sources: &[SourceStatus]) {
    println!("データソース:");
    for s in sources {
        let mark = if s.error.is_none() { "✔" } else { "✘" };
        println!("  {} {:<8} {}", mark, s.name, s.path.display());
        match (&s.rows, &s.error) {
            (Some(rows), _) => {
                println!("      件数: {}  除外: {}", rows, s.rejected_rows.unwrap_or(0));
                if let Some(fp) = &s.fingerprint {
                    println!("      SHA-256: {}", fp);
                }
            }
            (None, Some(err)) => println!("      {}", err),
            (None, None) => {}
        }
    }
}
