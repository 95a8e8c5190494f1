//! 見積書の保存先
//!
//! 保存は1件まるごとの置き換えのみ。部分更新・版管理・競合検出は行わない
//! （同じIDへの保存は後勝ち）。

mod book;
pub mod json_file;
pub mod memory;

pub use book::{InvoiceBook, SCHEMA_VERSION};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::{GlassEstimateError, Result};
use chrono::{DateTime, Utc};
use glass_estimate_common::{Customer, Invoice};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 保存済みの見積書
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// 作成時に採番、以後変わらない
    pub id: Uuid,
    /// 作成時刻（更新しても変わらない）
    pub created_at: DateTime<Utc>,
    pub invoice: Invoice,
}

/// 一覧表示用の要約
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: Uuid,
    pub customer: Customer,
    pub grand_total: Decimal,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&InvoiceRecord> for InvoiceSummary {
    fn from(record: &InvoiceRecord) -> Self {
        Self {
            id: record.id,
            customer: record.invoice.customer.clone(),
            grand_total: record.invoice.totals.grand_total,
            item_count: record.invoice.line_items.len(),
            created_at: record.created_at,
        }
    }
}

/// 見積書ストア
pub trait InvoiceStore {
    /// 新規保存してIDを返す
    fn create(&mut self, invoice: Invoice) -> Result<Uuid>;

    /// 全体を置き換える
    fn update(&mut self, id: Uuid, invoice: Invoice) -> Result<()>;

    fn get(&self, id: Uuid) -> Result<InvoiceRecord>;

    /// 作成順の一覧
    fn list(&self) -> Result<Vec<InvoiceSummary>>;

    fn delete(&mut self, id: Uuid) -> Result<()>;
}

/// ID指定を解決する（完全なUUID、または4文字以上の一意な先頭部分）
pub fn resolve_id(store: &dyn InvoiceStore, raw: &str) -> Result<Uuid> {
    let raw = raw.trim();
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(id);
    }

    if raw.len() < 4 || !raw.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return Err(GlassEstimateError::InvalidId(raw.to_string()));
    }

    let prefix = raw.to_ascii_lowercase();
    let matches: Vec<Uuid> = store
        .list()?
        .into_iter()
        .map(|s| s.id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(GlassEstimateError::NotFound(raw.to_string())),
        _ => Err(GlassEstimateError::AmbiguousId(raw.to_string())),
    }
}
