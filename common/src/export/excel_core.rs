//! Excel生成（共通ライブラリ）
//!
//! ダッシュボードの出力（カード・時系列・分類集計）をシートごとに書き出す。

use crate::classifier::CategorySummary;
use crate::views::{SeriesPoint, SummaryCard};
use rust_xlsxwriter::*;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA))
}

/// 見出し行を書き込み、列幅を設定
fn write_header(worksheet: &mut Worksheet, headers: &[(&str, f64)]) -> Result<(), String> {
    let format = header_format();
    for (col, (title, width)) in headers.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *title, &format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
        worksheet
            .set_column_width(col, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    Ok(())
}

fn write_cards(workbook: &mut Workbook, cards: &[SummaryCard]) -> Result<(), String> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Cards")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_header(worksheet, &[("Label", 28.0), ("Value", 14.0), ("Display", 14.0), ("Status", 10.0)])?;

    for (i, card) in cards.iter().enumerate() {
        let row = i as u32 + 1;
        let status = card.status.map(|s| s.label()).unwrap_or("");
        worksheet
            .write_string(row, 0, card.label.as_str())
            .and_then(|ws| ws.write_number(row, 1, card.value))
            .and_then(|ws| ws.write_string(row, 2, card.display.as_str()))
            .and_then(|ws| ws.write_string(row, 3, status))
            .map_err(|e| format!("カード書き込みエラー: {}", e))?;
    }
    Ok(())
}

fn write_series(workbook: &mut Workbook, series: &[SeriesPoint]) -> Result<(), String> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Series")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_header(worksheet, &[("gateway_timestamp", 22.0), ("Metric", 18.0), ("Value", 12.0)])?;

    for (i, point) in series.iter().enumerate() {
        let row = i as u32 + 1;
        let timestamp = point.timestamp.format(TIMESTAMP_FORMAT).to_string();
        worksheet
            .write_string(row, 0, timestamp.as_str())
            .and_then(|ws| ws.write_string(row, 1, point.metric.column_name()))
            .and_then(|ws| ws.write_number(row, 2, point.value))
            .map_err(|e| format!("時系列書き込みエラー: {}", e))?;
    }
    Ok(())
}

fn write_categories(workbook: &mut Workbook, summary: &CategorySummary) -> Result<(), String> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Categories")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_header(worksheet, &[("Category", 24.0), ("Count", 10.0), ("Percentage", 12.0)])?;

    for (i, row_data) in summary.rows.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet
            .write_string(row, 0, row_data.category.label())
            .and_then(|ws| ws.write_number(row, 1, row_data.count as f64))
            .and_then(|ws| ws.write_number(row, 2, row_data.percentage))
            .map_err(|e| format!("分類書き込みエラー: {}", e))?;
    }
    Ok(())
}

/// センサーページのExcelをバッファに生成（Cards / Series）
pub fn generate_sensor_workbook(
    cards: &[SummaryCard],
    series: &[SeriesPoint],
) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    write_cards(&mut workbook, cards)?;
    write_series(&mut workbook, series)?;

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

/// カメラページのExcelをバッファに生成（Categories）
pub fn generate_camera_workbook(summary: &CategorySummary) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    write_categories(&mut workbook, summary)?;

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
