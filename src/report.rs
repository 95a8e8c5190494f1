//! 画面表示用の整形
//!
//! すべて文字列を返すだけで、出力は呼び出し側が行う。

use crate::store::{InvoiceRecord, InvoiceSummary};
use glass_estimate_common::{format_money, Customer, GlassItem, LineItem, Totals};
use std::fmt::Write;

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// 一覧表（ID先頭8文字・顧客名・日付・携帯・合計）
pub fn format_list(summaries: &[InvoiceSummary], currency: &str) -> String {
    if summaries.is_empty() {
        return "保存済みの見積書はありません\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8}  {:<24}  {:<12}  {:<12}  {:>14}",
        "ID", "Name", "Date", "Mobile", "Total"
    );
    for summary in summaries {
        let id = summary.id.to_string();
        let _ = writeln!(
            out,
            "{:<8}  {:<24}  {:<12}  {:<12}  {:>14}",
            &id[..8],
            or_dash(&summary.customer.name),
            or_dash(&summary.customer.date),
            or_dash(&summary.customer.mobile),
            format!("{}{}", currency, format_money(summary.grand_total)),
        );
    }
    let _ = writeln!(out, "{}件", summaries.len());
    out
}

/// 顧客欄
pub fn format_customer(customer: &Customer) -> String {
    format!(
        "Name: {}  Date: {}  Mobile: {}\n",
        or_dash(&customer.name),
        or_dash(&customer.date),
        or_dash(&customer.mobile)
    )
}

/// 明細行（行番号は1始まり）と合計欄
pub fn format_items(items: &[LineItem], totals: &Totals, currency: &str) -> String {
    let mut out = String::new();

    for (index, item) in items.iter().enumerate() {
        match item {
            LineItem::Glass(glass) => {
                let p = &glass.pricing;
                let _ = writeln!(
                    out,
                    "{:>3}. [glass]  {}  {} x {} in x {}",
                    index + 1,
                    or_dash(&glass.particular),
                    or_dash(&glass.x),
                    or_dash(&glass.y),
                    or_dash(&glass.quantity),
                );
                let _ = writeln!(
                    out,
                    "       {} sq.ft @ {} = {}{}   {} run.ft @ {} = {}{}   total {}{}",
                    format_money(p.area_sq_ft),
                    or_dash(&glass.rate),
                    currency,
                    format_money(p.glass_cost),
                    format_money(p.edge_length_ft),
                    or_dash(&glass.edge_rate),
                    currency,
                    format_money(p.edge_cost),
                    currency,
                    format_money(p.line_total),
                );
            }
            LineItem::Custom(custom) => {
                let _ = writeln!(
                    out,
                    "{:>3}. [custom] {}  total {}",
                    index + 1,
                    or_dash(&custom.particular),
                    or_dash(&custom.line_total),
                );
            }
        }
    }

    let _ = writeln!(out, "-----");
    let _ = writeln!(out, "Glass total : {}{}", currency, format_money(totals.glass_cost_sum));
    let _ = writeln!(out, "Edge total  : {}{}", currency, format_money(totals.edge_cost_sum));
    let _ = writeln!(out, "Grand total : {}{}", currency, format_money(totals.grand_total));
    out
}

/// 保存済み見積書の詳細
pub fn format_invoice(record: &InvoiceRecord, currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID: {}", record.id);
    let _ = writeln!(out, "Created: {}", record.created_at.format("%Y-%m-%d %H:%M UTC"));
    out.push_str(&format_customer(&record.invoice.customer));
    out.push('\n');
    out.push_str(&format_items(
        &record.invoice.line_items,
        &record.invoice.totals,
        currency,
    ));
    out
}

/// ガラス1行の計算結果
pub fn format_quote(item: &GlassItem, currency: &str) -> String {
    let p = &item.pricing;
    let mut out = String::new();
    let _ = writeln!(out, "Area        : {} sq.ft", format_money(p.area_sq_ft));
    let _ = writeln!(out, "Glass cost  : {}{}", currency, format_money(p.glass_cost));
    let _ = writeln!(out, "Edge length : {} run.ft", format_money(p.edge_length_ft));
    let _ = writeln!(out, "Edge cost   : {}{}", currency, format_money(p.edge_cost));
    let _ = writeln!(out, "Line total  : {}{}", currency, format_money(p.line_total));
    out
}
