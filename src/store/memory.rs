//! メモリ上のストア（テスト・一時利用）

use super::{InvoiceBook, InvoiceRecord, InvoiceStore, InvoiceSummary};
use crate::error::Result;
use chrono::Utc;
use glass_estimate_common::Invoice;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    book: InvoiceBook,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.book.len()
    }

    pub fn is_empty(&self) -> bool {
        self.book.is_empty()
    }
}

impl InvoiceStore for MemoryStore {
    fn create(&mut self, invoice: Invoice) -> Result<Uuid> {
        Ok(self.book.insert(invoice, Utc::now()))
    }

    fn update(&mut self, id: Uuid, invoice: Invoice) -> Result<()> {
        self.book.replace(id, invoice)
    }

    fn get(&self, id: Uuid) -> Result<InvoiceRecord> {
        self.book.find(id).cloned()
    }

    fn list(&self) -> Result<Vec<InvoiceSummary>> {
        Ok(self.book.summaries())
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        self.book.remove(id).map(|_| ())
    }
}
