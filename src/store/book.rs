//! 見積書の集合（ファイル・メモリ両方のストアが使う）

use super::{InvoiceRecord, InvoiceSummary};
use crate::error::{GlassEstimateError, Result};
use chrono::{DateTime, Utc};
use glass_estimate_common::Invoice;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 保存データのスキーマバージョン
pub const SCHEMA_VERSION: u32 = 1;

/// 保存ファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceBook {
    /// バージョン（互換性チェック用）
    pub version: u32,
    /// 作成順
    pub invoices: Vec<InvoiceRecord>,
}

impl Default for InvoiceBook {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            invoices: Vec::new(),
        }
    }
}

impl InvoiceBook {
    /// 新しいIDで追加
    pub fn insert(&mut self, mut invoice: Invoice, created_at: DateTime<Utc>) -> Uuid {
        invoice.recalculate();
        let id = Uuid::new_v4();
        self.invoices.push(InvoiceRecord {
            id,
            created_at,
            invoice,
        });
        id
    }

    /// 本文を置き換える（IDと作成時刻はそのまま）
    pub fn replace(&mut self, id: Uuid, mut invoice: Invoice) -> Result<()> {
        invoice.recalculate();
        let record = self
            .invoices
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| GlassEstimateError::NotFound(id.to_string()))?;
        record.invoice = invoice;
        Ok(())
    }

    pub fn find(&self, id: Uuid) -> Result<&InvoiceRecord> {
        self.invoices
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| GlassEstimateError::NotFound(id.to_string()))
    }

    pub fn remove(&mut self, id: Uuid) -> Result<InvoiceRecord> {
        let pos = self
            .invoices
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| GlassEstimateError::NotFound(id.to_string()))?;
        Ok(self.invoices.remove(pos))
    }

    pub fn summaries(&self) -> Vec<InvoiceSummary> {
        self.invoices.iter().map(InvoiceSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}
