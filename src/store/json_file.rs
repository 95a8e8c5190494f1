//! JSONファイルによる見積書ストア
//!
//! データディレクトリ直下の `invoices.json` に全件を保存する。
//! 書き込みは一時ファイルに書いてから rename するので、途中で落ちても
//! 前回の内容が残る。失敗した一時ファイルは消す。
//! 読み書きのエラーはすべて `GlassEstimateError::Store` で返す。

use super::{InvoiceBook, InvoiceRecord, InvoiceStore, InvoiceSummary, SCHEMA_VERSION};
use crate::error::{GlassEstimateError, Result};
use chrono::Utc;
use glass_estimate_common::Invoice;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const STORE_FILE_NAME: &str = "invoices.json";
const TEMP_FILE_NAME: &str = "invoices.json.tmp";

/// 本体を読む前にバージョンだけ確認する
#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    book: InvoiceBook,
}

impl JsonFileStore {
    /// データディレクトリを開く（なければ作る）
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            GlassEstimateError::Store(format!("{} を作成できません: {}", dir.display(), e))
        })?;

        let book = Self::load(&dir.join(STORE_FILE_NAME))?;
        tracing::debug!(dir = %dir.display(), count = book.len(), "store opened");

        Ok(Self {
            dir: dir.to_path_buf(),
            book,
        })
    }

    /// 保存ファイルのパス
    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE_NAME)
    }

    fn load(path: &Path) -> Result<InvoiceBook> {
        if !path.exists() {
            return Ok(InvoiceBook::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            GlassEstimateError::Store(format!("{} を読み込めません: {}", path.display(), e))
        })?;

        // 壊れたファイルは空扱いせずエラー
        let header: VersionHeader = serde_json::from_str(&content).map_err(|e| {
            GlassEstimateError::Store(format!("{} を解析できません: {}", path.display(), e))
        })?;
        if header.version != SCHEMA_VERSION {
            return Err(GlassEstimateError::UnsupportedSchema(header.version));
        }

        let book: InvoiceBook = serde_json::from_str(&content).map_err(|e| {
            GlassEstimateError::Store(format!("{} を解析できません: {}", path.display(), e))
        })?;
        Ok(book)
    }

    fn write_book(path: &Path, book: &InvoiceBook) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, book)?;
        writer.flush()
    }

    fn persist(&self, book: &InvoiceBook) -> Result<()> {
        let temp_path = self.dir.join(TEMP_FILE_NAME);
        let target = self.path();

        let written =
            Self::write_book(&temp_path, book).and_then(|()| fs::rename(&temp_path, &target));
        if let Err(e) = written {
            if temp_path.exists() {
                if let Err(cleanup) = fs::remove_file(&temp_path) {
                    tracing::warn!(path = %temp_path.display(), error = %cleanup, "temp file left behind");
                }
            }
            return Err(GlassEstimateError::Store(format!(
                "{} に保存できません: {}",
                target.display(),
                e
            )));
        }
        Ok(())
    }

    /// 写しを変更して保存し、成功したときだけ反映する
    fn commit<T>(&mut self, change: impl FnOnce(&mut InvoiceBook) -> Result<T>) -> Result<T> {
        let mut next = self.book.clone();
        let value = change(&mut next)?;
        self.persist(&next)?;
        self.book = next;
        Ok(value)
    }
}

impl InvoiceStore for JsonFileStore {
    fn create(&mut self, invoice: Invoice) -> Result<Uuid> {
        let id = self.commit(|book| Ok(book.insert(invoice, Utc::now())))?;
        tracing::info!(%id, "invoice created");
        Ok(id)
    }

    fn update(&mut self, id: Uuid, invoice: Invoice) -> Result<()> {
        self.commit(|book| book.replace(id, invoice))?;
        tracing::info!(%id, "invoice updated");
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<InvoiceRecord> {
        self.book.find(id).cloned()
    }

    fn list(&self) -> Result<Vec<InvoiceSummary>> {
        Ok(self.book.summaries())
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        self.commit(|book| book.remove(id).map(|_| ()))?;
        tracing::info!(%id, "invoice deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glass_estimate_common::{CustomItem, Customer, LineItem};
    use tempfile::tempdir;

    fn invoice() -> Invoice {
        Invoice::new(
            Customer {
                name: "Patil".into(),
                date: "2024-06-01".into(),
                mobile: String::new(),
            },
            vec![LineItem::Custom(CustomItem::new("Fitting", "350"))],
        )
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = JsonFileStore::open(dir.path()).expect("open失敗");
        assert!(store.list().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_create_writes_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut store = JsonFileStore::open(dir.path()).expect("open失敗");
        store.create(invoice()).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("\"version\": 1"));
        assert!(content.contains("Patil"));
        assert!(!dir.path().join(TEMP_FILE_NAME).exists());
    }

    #[test]
    fn test_failed_update_does_not_touch_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut store = JsonFileStore::open(dir.path()).expect("open失敗");
        store.create(invoice()).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let result = store.update(Uuid::new_v4(), invoice());
        assert!(matches!(result, Err(GlassEstimateError::NotFound(_))));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut store = JsonFileStore::open(dir.path()).expect("open失敗");
        // 保存先がディレクトリだと rename できない
        fs::create_dir(store.path()).unwrap();

        let result = store.create(invoice());
        let err = result.unwrap_err();
        assert!(matches!(err, GlassEstimateError::Store(_)));
        assert!(err.is_store_failure());
        assert!(!dir.path().join(TEMP_FILE_NAME).exists());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_file_is_store_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        // 読み込めない保存ファイル（ディレクトリ）
        fs::create_dir(dir.path().join(STORE_FILE_NAME)).unwrap();

        let err = JsonFileStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, GlassEstimateError::Store(_)));
    }
}
