//! Glass Estimate Common Library
//!
//! 見積書の型・単価計算・入力フォーム・出力レイアウト

pub mod error;
pub mod export;
pub mod form;
pub mod layout;
pub mod money;
pub mod pricing;
pub mod types;

pub use error::{Error, Result};
pub use form::{CustomerField, FormEvent, InvoiceForm, ItemField};
pub use money::{format_money, parse_or_zero, round_money};
pub use pricing::{aggregate, compute, compute_glass};
pub use types::{
    CustomItem, Customer, GlassItem, GlassPricing, Invoice, ItemKind, LineItem, Totals,
};
