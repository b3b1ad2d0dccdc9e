//! 対話式の表示条件選択モジュール
//!
//! 期間（開始日・終了日）と表示する列をプロンプトで選ぶ。

use crate::dashboard::SensorRequest;
use crate::error::{DashboardError, Result};
use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use sensor_dashboard_common::{DateRange, Metric};

/// 日付入力の解釈（YYYY-MM-DD、前後の空白は無視）
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// データ範囲内かを確認
pub fn check_within(date: NaiveDate, bounds: Option<(NaiveDate, NaiveDate)>) -> std::result::Result<(), String> {
    match bounds {
        Some((min, max)) if date < min || date > max => {
            Err(format!("{} 〜 {} の範囲で入力してください", min, max))
        }
        _ => Ok(()),
    }
}

/// 選択番号から列を復元（Metric::ALL の順）
pub fn metrics_from_selection(selection: &[usize]) -> Vec<Metric> {
    Metric::ALL
        .iter()
        .enumerate()
        .filter(|(i, _)| selection.contains(i))
        .map(|(_, m)| *m)
        .collect()
}

fn prompt_date(
    prompt: &str,
    default: NaiveDate,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> Result<NaiveDate> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default.to_string())
        .validate_with(|text: &String| -> std::result::Result<(), String> {
            let date = parse_date_input(text).ok_or_else(|| "YYYY-MM-DD 形式で入力してください".to_string())?;
            check_within(date, bounds)
        })
        .interact_text()
        .map_err(|e| DashboardError::Selection(e.to_string()))?;

    parse_date_input(&input).ok_or_else(|| DashboardError::Selection(format!("日付が不正です: {}", input)))
}

/// 期間を対話式で選択
pub fn select_range_interactive(
    default: DateRange,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> Result<DateRange> {
    let start = prompt_date("開始日", default.start, bounds)?;
    let end = prompt_date("終了日", default.end, bounds)?;
    Ok(DateRange::new(start, end)?)
}

/// 表示する列を対話式で選択
pub fn select_metrics_interactive(current: &[Metric]) -> Result<Vec<Metric>> {
    let items: Vec<&str> = Metric::ALL.iter().map(|m| m.column_name()).collect();
    let defaults: Vec<bool> = Metric::ALL.iter().map(|m| current.contains(m)).collect();

    let selection = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("表示する列を選択 (Space: 切替, Enter: 決定)")
        .items(&items)
        .defaults(&defaults)
        .interact()
        .map_err(|e| DashboardError::Selection(e.to_string()))?;

    let metrics = metrics_from_selection(&selection);
    if metrics.is_empty() {
        return Err(DashboardError::Selection("列を1つ以上選択してください".into()));
    }
    Ok(metrics)
}

/// センサーページの条件を対話式で決定
pub fn select_sensor_request(
    request: &SensorRequest,
    default_range: Option<DateRange>,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> Result<SensorRequest> {
    let range = match request.range.or(default_range) {
        Some(default) => Some(select_range_interactive(default, bounds)?),
        None => {
            println!("⚠ 有効なデータがないため期間選択をスキップします");
            None
        }
    };
    let metrics = select_metrics_interactive(&request.metrics)?;

    Ok(SensorRequest { range, metrics })
}
