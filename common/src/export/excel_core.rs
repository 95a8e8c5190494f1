//! Excel生成（共通ライブラリ）
//!
//! PDFと同じ見出し・顧客欄・明細表・合計行・約款を1シートに書き出す

use crate::export::pdf_core::{customer_lines, header_title};
use crate::layout::{
    COLUMN_COUNT, EDGE_TOTAL_COLUMN, GLASS_TOTAL_COLUMN, GRAND_TOTAL_COLUMN, TABLE_COLUMNS,
};
use crate::money::round_money;
use crate::types::{Invoice, LineItem};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::*;

const SHEET_NAME: &str = "Estimate";
const HEADER_ROW: u32 = 0;
const CUSTOMER_ROW: u32 = 2;
const TABLE_HEADER_ROW: u32 = 4;

/// 列幅（文字数）
const COLUMN_WIDTHS: [f64; COLUMN_COUNT] = [28.0, 8.0, 8.0, 6.0, 9.0, 9.0, 11.0, 9.0, 9.0, 11.0, 12.0];

/// 1セルの値
enum CellValue<'a> {
    Text(&'a str),
    Number(Decimal),
    Empty,
}

fn row_values(item: &LineItem) -> [CellValue<'_>; COLUMN_COUNT] {
    match item {
        LineItem::Glass(glass) => [
            CellValue::Text(&glass.particular),
            CellValue::Text(&glass.x),
            CellValue::Text(&glass.y),
            CellValue::Text(&glass.quantity),
            CellValue::Number(glass.pricing.area_sq_ft),
            CellValue::Text(&glass.rate),
            CellValue::Number(glass.pricing.glass_cost),
            CellValue::Number(glass.pricing.edge_length_ft),
            CellValue::Text(&glass.edge_rate),
            CellValue::Number(glass.pricing.edge_cost),
            CellValue::Number(glass.pricing.line_total),
        ],
        LineItem::Custom(custom) => [
            CellValue::Text(&custom.particular),
            CellValue::Text(&custom.x),
            CellValue::Text(&custom.y),
            CellValue::Text(&custom.quantity),
            CellValue::Empty,
            CellValue::Text(&custom.rate),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Text(&custom.edge_rate),
            CellValue::Empty,
            CellValue::Text(&custom.line_total),
        ],
    }
}

fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or(0.0)
}

/// 見積書をExcelバッファに生成
pub fn generate_excel_buffer(
    invoice: &Invoice,
    shop_name: &str,
    terms: &[String],
) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let title_format = Format::new()
        .set_bold()
        .set_font_size(14.0)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x1976D2))
        .set_align(FormatAlign::Center);

    let header_format = Format::new()
        .set_bold()
        .set_font_size(9.0)
        .set_background_color(Color::RGB(0xF0F0F0))
        .set_border(FormatBorder::Thin);

    let text_format = Format::new()
        .set_font_size(9.0)
        .set_border(FormatBorder::Thin);

    let money_format = Format::new()
        .set_font_size(9.0)
        .set_num_format("0.00")
        .set_border(FormatBorder::Thin);

    let totals_format = Format::new()
        .set_bold()
        .set_num_format("0.00")
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x1976D2))
        .set_border(FormatBorder::Thin);

    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    // 見出し
    worksheet
        .merge_range(
            HEADER_ROW,
            0,
            HEADER_ROW,
            (COLUMN_COUNT - 1) as u16,
            &header_title(shop_name),
            &title_format,
        )
        .map_err(|e| format!("見出し書き込みエラー: {}", e))?;

    // 顧客欄
    for (i, line) in customer_lines(&invoice.customer).iter().enumerate() {
        worksheet
            .write_string(CUSTOMER_ROW, (i * 4) as u16, line)
            .map_err(|e| format!("顧客欄書き込みエラー: {}", e))?;
    }

    // 明細表
    for (col, column) in TABLE_COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(TABLE_HEADER_ROW, col as u16, column.title, &header_format)
            .map_err(|e| format!("列見出し書き込みエラー: {}", e))?;
    }

    let mut row = TABLE_HEADER_ROW + 1;
    for item in &invoice.line_items {
        for (col, value) in row_values(item).iter().enumerate() {
            let col = col as u16;
            match value {
                CellValue::Text(text) => worksheet.write_string_with_format(row, col, *text, &text_format),
                CellValue::Number(n) => worksheet.write_number_with_format(row, col, to_f64(*n), &money_format),
                CellValue::Empty => worksheet.write_blank(row, col, &text_format),
            }
            .map_err(|e| format!("明細書き込みエラー: {}", e))?;
        }
        row += 1;
    }

    // 合計行
    for col in 0..COLUMN_COUNT {
        worksheet
            .write_blank(row, col as u16, &totals_format)
            .map_err(|e| format!("合計行書き込みエラー: {}", e))?;
    }
    let totals = [
        (GLASS_TOTAL_COLUMN, invoice.totals.glass_cost_sum),
        (EDGE_TOTAL_COLUMN, invoice.totals.edge_cost_sum),
        (GRAND_TOTAL_COLUMN, invoice.totals.grand_total),
    ];
    for (col, amount) in totals {
        worksheet
            .write_number_with_format(row, col as u16, to_f64(amount), &totals_format)
            .map_err(|e| format!("合計行書き込みエラー: {}", e))?;
    }
    worksheet
        .write_string_with_format(row, 0, "TOTAL", &totals_format)
        .map_err(|e| format!("合計行書き込みエラー: {}", e))?;

    // 約款
    row += 2;
    worksheet
        .write_string_with_format(row, 0, "Terms & Conditions:", &bold)
        .map_err(|e| format!("約款書き込みエラー: {}", e))?;
    for term in terms {
        row += 1;
        worksheet
            .write_string(row, 0, format!("- {}", term))
            .map_err(|e| format!("約款書き込みエラー: {}", e))?;
    }

    row += 3;
    worksheet
        .write_string_with_format(row, (COLUMN_COUNT - 3) as u16, "Authorized Signature:", &bold)
        .map_err(|e| format!("署名欄書き込みエラー: {}", e))?;

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
