//! タクソノミー（分類 → キーワード）定義
//!
//! 判定順序は宣言順。設定ファイルやテストから差し替えられるよう、
//! モジュール定数ではなく値として分類器へ渡す。

use crate::error::{Error, Result};
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 1分類分のキーワード定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub category: Category,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl TaxonomyEntry {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// 順序付きタクソノミー
///
/// JSONでは `[{"category": "...", "keywords": [...]}, ...]` の配列で表現する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxonomyEntry>", into = "Vec<TaxonomyEntry>")]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    /// 検証してタクソノミーを作成
    ///
    /// キーワードは前後の空白を除去し小文字化して保持する。
    pub fn new(entries: Vec<TaxonomyEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::InvalidTaxonomy("no categories declared".into()));
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());

        for entry in entries {
            if entry.category == Category::Unclassified {
                return Err(Error::InvalidTaxonomy(
                    "'unclassified' is the fallback and cannot carry keywords".into(),
                ));
            }
            if !seen.insert(entry.category) {
                return Err(Error::InvalidTaxonomy(format!(
                    "category '{}' declared more than once",
                    entry.category
                )));
            }

            let mut keywords = Vec::with_capacity(entry.keywords.len());
            for keyword in &entry.keywords {
                let k = keyword.trim().to_lowercase();
                // 空文字は全ラベルに部分一致してしまう
                if k.is_empty() {
                    return Err(Error::InvalidTaxonomy(format!(
                        "empty keyword in category '{}'",
                        entry.category
                    )));
                }
                keywords.push(k);
            }

            normalized.push(TaxonomyEntry {
                category: entry.category,
                keywords,
            });
        }

        Ok(Self { entries: normalized })
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<TaxonomyEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    /// 宣言順の分類
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|e| e.category)
    }

    pub fn keywords(&self, category: Category) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.keywords.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            entries: vec![
                TaxonomyEntry::new(
                    Category::SnailInfested,
                    &["snail", "snail infestation", "infested", "snail-infested"],
                ),
                TaxonomyEntry::new(
                    Category::Stressed,
                    &["stressed", "wilting", "yellow", "dehydrated", "deficient"],
                ),
                TaxonomyEntry::new(Category::Healthy, &["healthy", "green", "good", "normal"]),
                TaxonomyEntry::new(Category::Dead, &["dead", "dry", "rotten", "destroyed"]),
            ],
        }
    }
}

impl TryFrom<Vec<TaxonomyEntry>> for Taxonomy {
    type Error = Error;

    fn try_from(entries: Vec<TaxonomyEntry>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<Taxonomy> for Vec<TaxonomyEntry> {
    fn from(taxonomy: Taxonomy) -> Self {
        taxonomy.entries
    }
}
