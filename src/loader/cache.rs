//! 読み込み済みテーブルのキャッシュ
//!
//! 同じパス（正規化後）は同じテーブルを返す。件数が少なく固定なので破棄はしない。

use super::{load_camera_table, load_sensor_table, CameraTable, SensorTable};
use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct TableCache {
    sensors: HashMap<PathBuf, Rc<SensorTable>>,
    cameras: HashMap<PathBuf, Rc<CameraTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャッシュキー（正規化できなければそのまま）
    fn key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// センサーテーブルを取得（未読み込みなら読み込む）
    pub fn sensor(&mut self, path: &Path) -> Result<Rc<SensorTable>> {
        let key = Self::key(path);
        if let Some(table) = self.sensors.get(&key) {
            log::debug!("キャッシュ使用: {}", path.display());
            return Ok(Rc::clone(table));
        }

        let table = Rc::new(load_sensor_table(path)?);
        self.sensors.insert(key, Rc::clone(&table));
        Ok(table)
    }

    /// カメラテーブルを取得（未読み込みなら読み込む）
    pub fn camera(&mut self, path: &Path) -> Result<Rc<CameraTable>> {
        let key = Self::key(path);
        if let Some(table) = self.cameras.get(&key) {
            log::debug!("キャッシュ使用: {}", path.display());
            return Ok(Rc::clone(table));
        }

        let table = Rc::new(load_camera_table(path)?);
        self.cameras.insert(key, Rc::clone(&table));
        Ok(table)
    }

    /// キャッシュ件数
    pub fn len(&self) -> usize {
        self.sensors.len() + self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
