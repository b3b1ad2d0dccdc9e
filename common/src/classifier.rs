//! カメラ診断ラベルの分類
//!
//! ラベルを小文字化し、タクソノミーの宣言順にキーワードの部分一致を調べる。
//! 複数の分類に一致する場合も最初に一致した分類を採用する（先勝ち）。

use crate::taxonomy::Taxonomy;
use crate::types::{Category, Detection};
use serde::{Deserialize, Serialize};

/// 割合の分母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageBasis {
    /// 宣言済み分類の合計（unclassifiedは分母に含めない）
    #[default]
    Declared,
    /// 全検出数（unclassifiedも分母に含める）
    AllDetections,
}

impl std::str::FromStr for PercentageBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "declared" => Ok(PercentageBasis::Declared),
            "all" | "all-detections" | "all_detections" => Ok(PercentageBasis::AllDetections),
            _ => Err(format!("Unknown basis: {}. Use declared or all", s)),
        }
    }
}

impl std::fmt::Display for PercentageBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PercentageBasis::Declared => write!(f, "declared"),
            PercentageBasis::AllDetections => write!(f, "all"),
        }
    }
}

/// 集計オプション
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryOptions {
    pub basis: PercentageBasis,
    /// unclassified行を宣言済み分類の後ろに追加する
    pub include_unclassified: bool,
}

/// 集計表の1行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: Category,
    pub count: usize,
    pub percentage: f64,
}

/// 分類集計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// 宣言順の行（件数0の分類も含む）
    pub rows: Vec<CategoryRow>,
    /// どの分類にも一致しなかった件数
    pub unclassified: usize,
    /// 割合の分母
    pub total: usize,
    /// 入力件数
    pub detections: usize,
    pub basis: PercentageBasis,
}

impl CategorySummary {
    pub fn count(&self, category: Category) -> usize {
        if category == Category::Unclassified {
            return self.unclassified;
        }
        self.rows
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.count)
            .unwrap_or(0)
    }

    pub fn percentage(&self, category: Category) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.percentage)
    }
}

/// ラベルの正規化（小文字化のみ）
pub fn normalize_label(raw: &str) -> String {
    raw.to_lowercase()
}

/// ラベル1件を分類
pub fn classify_label(raw: &str, taxonomy: &Taxonomy) -> Category {
    let label = normalize_label(raw);

    taxonomy
        .entries()
        .iter()
        .find(|entry| entry.keywords.iter().any(|k| label.contains(k.as_str())))
        .map(|entry| entry.category)
        .unwrap_or(Category::Unclassified)
}

/// 検出結果を分類（入力と同じ順序・件数）
pub fn classify(detections: &[Detection], taxonomy: &Taxonomy) -> Vec<Category> {
    detections
        .iter()
        .map(|d| classify_label(&d.detected_object, taxonomy))
        .collect()
}

/// 分類結果を集計
///
/// タクソノミーに宣言されていない分類はunclassifiedとして数える。
pub fn summarize(
    categories: &[Category],
    taxonomy: &Taxonomy,
    options: SummaryOptions,
) -> CategorySummary {
    let mut counts: Vec<(Category, usize)> = taxonomy.categories().map(|c| (c, 0)).collect();
    let mut unclassified = 0;

    for category in categories {
        match counts.iter_mut().find(|(c, _)| c == category) {
            Some((_, count)) => *count += 1,
            None => unclassified += 1,
        }
    }

    let declared_total: usize = counts.iter().map(|(_, n)| n).sum();
    let total = match options.basis {
        PercentageBasis::Declared => declared_total,
        PercentageBasis::AllDetections => declared_total + unclassified,
    };

    let mut rows: Vec<CategoryRow> = counts
        .into_iter()
        .map(|(category, count)| CategoryRow {
            category,
            count,
            percentage: percentage(count, total),
        })
        .collect();

    if options.include_unclassified {
        rows.push(CategoryRow {
            category: Category::Unclassified,
            count: unclassified,
            percentage: percentage(unclassified, total),
        });
    }

    CategorySummary {
        rows,
        unclassified,
        total,
        detections: categories.len(),
        basis: options.basis,
    }
}

/// 小数第2位で丸めた割合（分母0なら0）
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    // 0.5ちょうどは偶数側へ丸める
    (raw * 100.0).round_ties_even() / 100.0
}
