//! 入力フォームの状態
//!
//! フォームは不変オブジェクトとして扱い、変更はすべて `InvoiceForm::apply` を通す。
//! 適用に失敗した場合は元の状態がそのまま残る。

use crate::error::{Error, Result};
use crate::pricing::{aggregate, compute};
use crate::types::{Customer, Invoice, ItemKind, LineItem, Totals};
use std::str::FromStr;

/// 顧客情報の欄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Name,
    Date,
    Mobile,
}

/// 明細行の欄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Particular,
    X,
    Y,
    Quantity,
    Rate,
    EdgeRate,
    /// 自由入力行の合計（ガラス行では計算値なので編集不可）
    LineTotal,
}

impl ItemField {
    /// ガラス行で編集できる欄
    pub const GLASS_FIELDS: &'static [ItemField] = &[
        ItemField::Particular,
        ItemField::X,
        ItemField::Y,
        ItemField::Quantity,
        ItemField::Rate,
        ItemField::EdgeRate,
    ];

    /// 自由入力行で編集できる欄
    pub const CUSTOM_FIELDS: &'static [ItemField] = &[
        ItemField::Particular,
        ItemField::X,
        ItemField::Y,
        ItemField::Quantity,
        ItemField::Rate,
        ItemField::EdgeRate,
        ItemField::LineTotal,
    ];

    pub fn fields_for(kind: ItemKind) -> &'static [ItemField] {
        match kind {
            ItemKind::Glass => Self::GLASS_FIELDS,
            ItemKind::Custom => Self::CUSTOM_FIELDS,
        }
    }

    /// 画面・PDFと同じ列見出し
    pub fn label(&self) -> &'static str {
        match self {
            ItemField::Particular => "Particular",
            ItemField::X => "X(L)",
            ItemField::Y => "Y(B)",
            ItemField::Quantity => "Qty",
            ItemField::Rate => "G.Rate",
            ItemField::EdgeRate => "P.Rate",
            ItemField::LineTotal => "Total",
        }
    }
}

impl FromStr for ItemField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "particular" | "p" => Ok(ItemField::Particular),
            "x" | "length" => Ok(ItemField::X),
            "y" | "breadth" => Ok(ItemField::Y),
            "qty" | "quantity" => Ok(ItemField::Quantity),
            "rate" | "grate" => Ok(ItemField::Rate),
            "edge" | "edge-rate" | "prate" => Ok(ItemField::EdgeRate),
            "total" => Ok(ItemField::LineTotal),
            _ => Err(format!("Unknown field: {}", s)),
        }
    }
}

/// フォームへの変更操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    SetCustomer(CustomerField, String),
    SetItemField {
        index: usize,
        field: ItemField,
        value: String,
    },
    AddItem(ItemKind),
    RemoveItem(usize),
}

/// 見積書の入力状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceForm {
    customer: Customer,
    items: Vec<LineItem>,
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceForm {
    /// 新規フォーム: 空のガラス行を1行持つ
    pub fn new() -> Self {
        Self {
            customer: Customer::default(),
            items: vec![LineItem::empty(ItemKind::Glass)],
        }
    }

    /// 保存済みの見積書を編集用に読み込む（ガラス行は再計算）
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            customer: invoice.customer.clone(),
            items: invoice.line_items.iter().map(compute).collect(),
        }
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> Totals {
        aggregate(&self.items)
    }

    /// 保存用のスナップショット
    pub fn to_invoice(&self) -> Invoice {
        Invoice {
            customer: self.customer.clone(),
            line_items: self.items.clone(),
            totals: self.totals(),
        }
    }

    /// 変更を適用した新しいフォームを返す
    pub fn apply(&self, event: FormEvent) -> Result<InvoiceForm> {
        let mut next = self.clone();

        match event {
            FormEvent::SetCustomer(field, value) => match field {
                CustomerField::Name => next.customer.name = value,
                CustomerField::Date => next.customer.date = value,
                CustomerField::Mobile => next.customer.mobile = value,
            },
            FormEvent::SetItemField { index, field, value } => {
                let item = next.items.get_mut(index).ok_or_else(|| {
                    Error::InvalidEdit(format!("row {} does not exist", index + 1))
                })?;
                set_item_field(item, field, value)?;
                *item = compute(item);
            }
            FormEvent::AddItem(kind) => next.items.push(LineItem::empty(kind)),
            FormEvent::RemoveItem(index) => {
                if index >= next.items.len() {
                    return Err(Error::InvalidEdit(format!(
                        "row {} does not exist",
                        index + 1
                    )));
                }
                next.items.remove(index);
            }
        }

        Ok(next)
    }
}

fn set_item_field(item: &mut LineItem, field: ItemField, value: String) -> Result<()> {
    match item {
        LineItem::Glass(glass) => {
            let slot = match field {
                ItemField::Particular => &mut glass.particular,
                ItemField::X => &mut glass.x,
                ItemField::Y => &mut glass.y,
                ItemField::Quantity => &mut glass.quantity,
                ItemField::Rate => &mut glass.rate,
                ItemField::EdgeRate => &mut glass.edge_rate,
                ItemField::LineTotal => {
                    return Err(Error::InvalidEdit(
                        "glass rows compute their total from the inputs".into(),
                    ))
                }
            };
            *slot = value;
        }
        LineItem::Custom(custom) => {
            let slot = match field {
                ItemField::Particular => &mut custom.particular,
                ItemField::X => &mut custom.x,
                ItemField::Y => &mut custom.y,
                ItemField::Quantity => &mut custom.quantity,
                ItemField::Rate => &mut custom.rate,
                ItemField::EdgeRate => &mut custom.edge_rate,
                ItemField::LineTotal => &mut custom.line_total,
            };
            *slot = value;
        }
    }
    Ok(())
}
