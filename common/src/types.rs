//! 見積書（インボイス）の型定義
//!
//! - LineItem: 明細行（ガラス行 / 自由入力行）
//! - Customer: 顧客情報
//! - Totals: 合計欄
//! - Invoice: 保存単位となる1件の見積書

use crate::money::parse_or_zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 顧客情報（すべて入力されたままの文字列）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub name: String,
    pub date: String,
    pub mobile: String,
}

/// ガラス行の計算結果（小数2桁）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlassPricing {
    pub area_sq_ft: Decimal,
    pub glass_cost: Decimal,
    pub edge_length_ft: Decimal,
    pub edge_cost: Decimal,
    pub line_total: Decimal,
}

/// ガラス行: 寸法（インチ）・数量・単価から金額を算出する
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlassItem {
    pub particular: String,
    /// 長さ X(L)（インチ）
    pub x: String,
    /// 幅 Y(B)（インチ）
    pub y: String,
    pub quantity: String,
    /// ガラス単価（1平方フィートあたり）
    pub rate: String,
    /// 磨き単価（1ランニングフィートあたり）
    pub edge_rate: String,
    /// 入力値から導出される。単独で編集しない
    pub pricing: GlassPricing,
}

impl GlassItem {
    /// 入力値から行を作成（計算済み）
    pub fn new(
        particular: impl Into<String>,
        x: impl Into<String>,
        y: impl Into<String>,
        quantity: impl Into<String>,
        rate: impl Into<String>,
        edge_rate: impl Into<String>,
    ) -> Self {
        let mut item = Self {
            particular: particular.into(),
            x: x.into(),
            y: y.into(),
            quantity: quantity.into(),
            rate: rate.into(),
            edge_rate: edge_rate.into(),
            pricing: GlassPricing::default(),
        };
        item.pricing = crate::pricing::compute_glass(&item);
        item
    }
}

/// 自由入力行: すべての欄が文字列のまま。合計は手入力値をそのまま使う
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomItem {
    pub particular: String,
    pub x: String,
    pub y: String,
    pub quantity: String,
    pub rate: String,
    pub edge_rate: String,
    pub line_total: String,
}

impl CustomItem {
    pub fn new(particular: impl Into<String>, line_total: impl Into<String>) -> Self {
        Self {
            particular: particular.into(),
            line_total: line_total.into(),
            ..Default::default()
        }
    }
}

/// 明細行の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Glass,
    Custom,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Glass => write!(f, "glass"),
            ItemKind::Custom => write!(f, "custom"),
        }
    }
}

/// 明細行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LineItem {
    Glass(GlassItem),
    Custom(CustomItem),
}

impl LineItem {
    /// 空の行を作成
    pub fn empty(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Glass => LineItem::Glass(GlassItem::default()),
            ItemKind::Custom => LineItem::Custom(CustomItem::default()),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            LineItem::Glass(_) => ItemKind::Glass,
            LineItem::Custom(_) => ItemKind::Custom,
        }
    }

    pub fn particular(&self) -> &str {
        match self {
            LineItem::Glass(item) => &item.particular,
            LineItem::Custom(item) => &item.particular,
        }
    }

    /// 行合計（自由入力行は手入力値を数値化、解析できなければ0）
    pub fn line_total(&self) -> Decimal {
        match self {
            LineItem::Glass(item) => item.pricing.line_total,
            LineItem::Custom(item) => parse_or_zero(&item.line_total),
        }
    }
}

/// 合計欄
///
/// `glass_cost_sum` と `edge_cost_sum` はガラス行のみ、
/// `grand_total` は自由入力行も含めた全行の合計。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Totals {
    pub glass_cost_sum: Decimal,
    pub edge_cost_sum: Decimal,
    pub grand_total: Decimal,
}

/// 見積書1件（保存時はこの単位で丸ごと書き込む）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub customer: Customer,
    pub line_items: Vec<LineItem>,
    pub totals: Totals,
}

impl Invoice {
    /// ガラス行を再計算し、合計を付けて作成
    pub fn new(customer: Customer, line_items: Vec<LineItem>) -> Self {
        let mut invoice = Self {
            customer,
            line_items,
            totals: Totals::default(),
        };
        invoice.recalculate();
        invoice
    }

    /// 全ガラス行と合計を入力値から計算し直す
    pub fn recalculate(&mut self) {
        for item in &mut self.line_items {
            *item = crate::pricing::compute(item);
        }
        self.totals = crate::pricing::aggregate(&self.line_items);
    }
}
