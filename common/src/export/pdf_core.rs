//! PDF export core utilities.
//!
//! 描画ライブラリに依存しない部分（セル文字列・折り返し・改ページ計画）をここで決める。
//! Y座標はすべてページ上端からのmm。

use crate::layout::*;
use crate::money::format_money;
use crate::types::{Customer, Invoice, LineItem, Totals};

/// 明細表の1行分のセル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: [String; COLUMN_COUNT],
    /// 偶数行は薄く塗る
    pub shaded: bool,
}

impl TableRow {
    /// 列幅で折り返したときの最大行数
    pub fn line_count(&self) -> usize {
        self.cells
            .iter()
            .zip(TABLE_COLUMNS)
            .map(|(cell, column)| wrap_cell(cell, column.width_mm, TABLE_BODY_FONT_SIZE).len())
            .max()
            .unwrap_or(1)
    }
}

/// 明細行をセル文字列に変換
///
/// ガラス行は計算値を小数2桁で、自由入力行は入力された文字列をそのまま出す。
pub fn build_table_rows(items: &[LineItem]) -> Vec<TableRow> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| TableRow {
            cells: row_cells(item),
            shaded: index % 2 == 0,
        })
        .collect()
}

fn row_cells(item: &LineItem) -> [String; COLUMN_COUNT] {
    match item {
        LineItem::Glass(glass) => [
            glass.particular.clone(),
            glass.x.clone(),
            glass.y.clone(),
            glass.quantity.clone(),
            format_money(glass.pricing.area_sq_ft),
            glass.rate.clone(),
            format_money(glass.pricing.glass_cost),
            format_money(glass.pricing.edge_length_ft),
            glass.edge_rate.clone(),
            format_money(glass.pricing.edge_cost),
            format_money(glass.pricing.line_total),
        ],
        LineItem::Custom(custom) => [
            custom.particular.clone(),
            custom.x.clone(),
            custom.y.clone(),
            custom.quantity.clone(),
            String::new(),
            custom.rate.clone(),
            String::new(),
            String::new(),
            custom.edge_rate.clone(),
            String::new(),
            custom.line_total.clone(),
        ],
    }
}

/// 合計行: (列番号, 値)
pub fn build_totals_cells(totals: &Totals) -> Vec<(usize, String)> {
    vec![
        (0, "TOTAL".to_string()),
        (GLASS_TOTAL_COLUMN, format_money(totals.glass_cost_sum)),
        (EDGE_TOTAL_COLUMN, format_money(totals.edge_cost_sum)),
        (GRAND_TOTAL_COLUMN, format_money(totals.grand_total)),
    ]
}

/// 顧客欄の3項目（未入力は "N/A"）
pub fn customer_lines(customer: &Customer) -> [String; 3] {
    fn or_na(value: &str) -> &str {
        if value.trim().is_empty() { "N/A" } else { value }
    }
    [
        format!("Name: {}", or_na(&customer.name)),
        format!("Date: {}", or_na(&customer.date)),
        format!("Mobile: {}", or_na(&customer.mobile)),
    ]
}

/// 見出し: "ESTIMATE / ORDER OF <店名>"
pub fn header_title(shop_name: &str) -> String {
    format!("ESTIMATE / ORDER OF {}", shop_name.to_uppercase())
}

/// セルの折り返し
///
/// 閾値以下の長さならそのまま。それ以外は単語単位で列幅に収まるよう分割し、
/// 1語が長すぎる場合は文字単位で切る。文字は1つも捨てない。
pub fn wrap_cell(text: &str, width_mm: f32, font_size_pt: f32) -> Vec<String> {
    if text.chars().count() <= CELL_WRAP_THRESHOLD {
        return vec![text.to_string()];
    }

    let char_width = pt_to_mm(font_size_pt) * AVG_CHAR_WIDTH_EM;
    let max_chars = ((width_mm / char_width).floor() as usize).max(1);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let current_len = current.chars().count();
            let needed = if current.is_empty() { word.len() } else { current_len + 1 + word.len() };
            if needed <= max_chars {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.extend(word.iter());
                break;
            }
            if current.is_empty() {
                // 1語が列幅を超える: 文字単位で切る
                let rest = word.split_off(max_chars);
                lines.push(word.iter().collect());
                word = rest;
                if word.is_empty() {
                    break;
                }
            } else {
                lines.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// 描画位置（ページ番号は0始まり）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub y_mm: f32,
}

/// 1ページ内の表の縦範囲（罫線用）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSegment {
    pub page: usize,
    pub top_mm: f32,
    pub bottom_mm: f32,
}

/// ページ割付け計画
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPlan {
    pub rows: Vec<Placement>,
    pub totals: Placement,
    pub segments: Vec<TableSegment>,
    pub terms_heading: Placement,
    pub terms: Vec<Placement>,
    pub signature: Placement,
    pub page_count: usize,
}

/// 各行の折り返し行数と約款数から各要素の位置を決める
///
/// 3行以上に折り返す行はその分だけ行送りを広げる。
pub fn plan_layout(row_lines: &[usize], term_count: usize) -> PdfPlan {
    let mut page = 0;
    let mut y = TABLE_TOP_MM + ROW_PITCH_MM;
    let mut segments = Vec::new();
    let mut segment_top = TABLE_TOP_MM;
    let mut page_has_rows = false;

    let mut rows = Vec::with_capacity(row_lines.len());
    for &lines in row_lines {
        let extra = extra_row_height_mm(lines);
        if page_has_rows && y + extra > TABLE_BOTTOM_LIMIT_MM {
            segments.push(TableSegment { page, top_mm: segment_top, bottom_mm: y });
            page += 1;
            y = CONTINUATION_TOP_MM;
            segment_top = y;
        }
        rows.push(Placement { page, y_mm: y });
        page_has_rows = true;
        y += ROW_PITCH_MM + extra;
    }

    if y > TABLE_BOTTOM_LIMIT_MM {
        segments.push(TableSegment { page, top_mm: segment_top, bottom_mm: y });
        page += 1;
        y = CONTINUATION_TOP_MM;
        segment_top = y;
    }
    let totals = Placement { page, y_mm: y };
    y += TOTALS_ROW_HEIGHT_MM;
    segments.push(TableSegment { page, top_mm: segment_top, bottom_mm: y });

    y += TERMS_GAP_MM;
    if y > TERMS_BOTTOM_LIMIT_MM {
        page += 1;
        y = CONTINUATION_TOP_MM;
    }
    let terms_heading = Placement { page, y_mm: y };
    y += TERMS_HEADING_GAP_MM;

    let mut terms = Vec::with_capacity(term_count);
    for _ in 0..term_count {
        if y > TERMS_BOTTOM_LIMIT_MM {
            page += 1;
            y = CONTINUATION_TOP_MM;
        }
        terms.push(Placement { page, y_mm: y });
        y += TERMS_LINE_PITCH_MM;
    }

    let mut signature_y = (y + SIGNATURE_GAP_MM).max(SIGNATURE_Y_MM);
    if signature_y + SIGNATURE_LINE_OFFSET_MM > A4_HEIGHT_MM - MARGIN_MM / 2.0 {
        page += 1;
        signature_y = SIGNATURE_Y_MM;
    }
    let signature = Placement { page, y_mm: signature_y };

    PdfPlan {
        rows,
        totals,
        segments,
        terms_heading,
        terms,
        signature,
        page_count: page + 1,
    }
}

/// 出力ファイル名（拡張子なし）: "estimate-<顧客名>-<YYYY-MM-DD>"
///
/// 顧客名が空なら "unnamed"。パス区切り等はファイル名に使えないので置き換える。
pub fn estimate_file_stem(customer_name: &str, date: &str) -> String {
    let name = customer_name.trim();
    let name = if name.is_empty() { "unnamed" } else { name };
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("estimate-{}-{}", safe, date)
}

/// PDFに載せる内容一式
#[derive(Debug, Clone)]
pub struct EstimateDocument {
    pub title: String,
    pub customer: [String; 3],
    pub rows: Vec<TableRow>,
    pub totals: Vec<(usize, String)>,
    pub terms: Vec<String>,
    pub plan: PdfPlan,
}

impl EstimateDocument {
    pub fn build(invoice: &Invoice, shop_name: &str, terms: &[String]) -> Self {
        let rows = build_table_rows(&invoice.line_items);
        let row_lines: Vec<usize> = rows.iter().map(TableRow::line_count).collect();
        let plan = plan_layout(&row_lines, terms.len());
        Self {
            title: header_title(shop_name),
            customer: customer_lines(&invoice.customer),
            rows,
            totals: build_totals_cells(&invoice.totals),
            terms: terms.iter().map(|t| format!("- {}", t)).collect(),
            plan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomItem, GlassItem};

    fn sample_invoice() -> Invoice {
        Invoice::new(
            Customer {
                name: "Kumar".into(),
                date: "2024-05-10".into(),
                mobile: String::new(),
            },
            vec![
                LineItem::Glass(GlassItem::new("Clear 5mm", "24", "36", "2", "50", "20")),
                LineItem::Custom(CustomItem::new("Fitting", "150")),
            ],
        )
    }

    #[test]
    fn test_glass_row_cells() {
        let rows = build_table_rows(&sample_invoice().line_items);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells[0], "Clear 5mm");
        assert_eq!(rows[0].cells[4], "12.00");
        assert_eq!(rows[0].cells[6], "600.00");
        assert_eq!(rows[0].cells[7], "20.00");
        assert_eq!(rows[0].cells[9], "400.00");
        assert_eq!(rows[0].cells[10], "1000.00");
        assert!(rows[0].shaded);
        assert!(!rows[1].shaded);
    }

    #[test]
    fn test_custom_row_keeps_typed_values() {
        let rows = build_table_rows(&sample_invoice().line_items);
        assert_eq!(rows[1].cells[0], "Fitting");
        assert_eq!(rows[1].cells[4], "");
        assert_eq!(rows[1].cells[10], "150");
    }

    #[test]
    fn test_totals_cells() {
        let cells = build_totals_cells(&sample_invoice().totals);
        assert_eq!(cells[0], (0, "TOTAL".to_string()));
        assert_eq!(cells[1], (GLASS_TOTAL_COLUMN, "600.00".to_string()));
        assert_eq!(cells[2], (EDGE_TOTAL_COLUMN, "400.00".to_string()));
        assert_eq!(cells[3], (GRAND_TOTAL_COLUMN, "1150.00".to_string()));
    }

    #[test]
    fn test_customer_lines_default_na() {
        let lines = customer_lines(&sample_invoice().customer);
        assert_eq!(lines[0], "Name: Kumar");
        assert_eq!(lines[2], "Mobile: N/A");
    }

    #[test]
    fn test_wrap_short_text_untouched() {
        assert_eq!(wrap_cell("Clear 5mm", 28.0, 7.0), vec!["Clear 5mm"]);
    }

    #[test]
    fn test_wrap_keeps_every_word() {
        let text = "Frosted toughened glass with designer etching";
        let lines = wrap_cell(text, 28.0, 7.0);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Frosted"));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_keeps_custom_total_text() {
        let total = TABLE_COLUMNS[GRAND_TOTAL_COLUMN];
        let text = "1250.00 incl. handles and fitting charges";
        let lines = wrap_cell(text, total.width_mm, TABLE_BODY_FONT_SIZE);
        assert!(lines.len() > LINES_PER_ROW);
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_long_word() {
        let text = "1234567890123456789012345678901234567890";
        let lines = wrap_cell(text, 10.0, 7.0);
        let max_chars = (10.0 / (pt_to_mm(7.0) * AVG_CHAR_WIDTH_EM)).floor() as usize;
        assert_eq!(lines[0].chars().count(), max_chars);
        assert!(lines.len() > 2);
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn test_row_line_count() {
        let invoice = Invoice::new(
            Customer::default(),
            vec![
                LineItem::Glass(GlassItem::new("Clear", "24", "36", "2", "50", "20")),
                LineItem::Custom(CustomItem::new(
                    "Fitting",
                    "1250.00 incl. handles and fitting charges",
                )),
            ],
        );
        let rows = build_table_rows(&invoice.line_items);
        assert_eq!(rows[0].line_count(), 1);
        assert!(rows[1].line_count() > LINES_PER_ROW);
    }

    #[test]
    fn test_plan_single_page() {
        let plan = plan_layout(&[1, 1, 1], 5);
        assert_eq!(plan.page_count, 1);
        assert_eq!(plan.rows[0], Placement { page: 0, y_mm: 75.0 });
        assert_eq!(plan.rows[2].y_mm, 95.0);
        assert_eq!(plan.totals.y_mm, 105.0);
        assert_eq!(plan.terms_heading.y_mm, 130.0);
        assert_eq!(plan.terms[0].y_mm, 138.0);
        assert_eq!(plan.signature.y_mm, SIGNATURE_Y_MM);
        assert_eq!(plan.segments.len(), 1);
    }

    #[test]
    fn test_plan_breaks_pages_for_many_rows() {
        let plan = plan_layout(&[1; 40], 5);
        assert!(plan.page_count >= 2);
        let first_on_page2 = plan.rows.iter().find(|p| p.page == 1).expect("2ページ目がない");
        assert_eq!(first_on_page2.y_mm, CONTINUATION_TOP_MM);
        for row in &plan.rows {
            assert!(row.y_mm <= TABLE_BOTTOM_LIMIT_MM);
        }
        assert_eq!(plan.segments.len(), plan.totals.page + 1);
        assert!(plan.signature.page >= plan.totals.page);
    }

    #[test]
    fn test_plan_tall_row_widens_pitch() {
        let plan = plan_layout(&[1, 4, 2], 0);
        assert_eq!(plan.rows[0].y_mm, 75.0);
        assert_eq!(plan.rows[1].y_mm, 85.0);
        assert_eq!(plan.rows[2].y_mm, 95.0 + 2.0 * WRAPPED_LINE_PITCH_MM);
        assert_eq!(plan.totals.y_mm, 105.0 + 2.0 * WRAPPED_LINE_PITCH_MM);
    }

    #[test]
    fn test_plan_tall_row_moves_to_next_page() {
        // 通常行で下端近くまで埋め、最後に背の高い行を置く
        let mut lines = vec![1; 17];
        lines.push(10);
        let plan = plan_layout(&lines, 0);
        assert_eq!(plan.rows[16], Placement { page: 0, y_mm: 235.0 });
        assert_eq!(plan.rows[17], Placement { page: 1, y_mm: CONTINUATION_TOP_MM });
    }

    #[test]
    fn test_plan_empty_invoice() {
        let plan = plan_layout(&[], 0);
        assert!(plan.rows.is_empty());
        assert_eq!(plan.totals, Placement { page: 0, y_mm: 75.0 });
        assert_eq!(plan.page_count, 1);
    }

    #[test]
    fn test_estimate_file_stem() {
        assert_eq!(estimate_file_stem("Kumar", "2024-05-10"), "estimate-Kumar-2024-05-10");
        assert_eq!(estimate_file_stem("  ", "2024-05-10"), "estimate-unnamed-2024-05-10");
        assert_eq!(estimate_file_stem("A/B", "2024-05-10"), "estimate-A_B-2024-05-10");
    }

    #[test]
    fn test_estimate_document() {
        let terms = vec!["No Guarantee On Mirror".to_string()];
        let doc = EstimateDocument::build(&sample_invoice(), "Mahadev Glass", &terms);
        assert_eq!(doc.title, "ESTIMATE / ORDER OF MAHADEV GLASS");
        assert_eq!(doc.terms, vec!["- No Guarantee On Mirror"]);
        assert_eq!(doc.plan.rows.len(), 2);
    }

    #[test]
    fn test_estimate_document_spaces_wrapped_rows() {
        let invoice = Invoice::new(
            Customer::default(),
            vec![
                LineItem::Glass(GlassItem::new(
                    "Frosted toughened glass with designer etching and bevelled edges",
                    "24", "36", "1", "50", "20",
                )),
                LineItem::Custom(CustomItem::new("Fitting", "150")),
            ],
        );
        let doc = EstimateDocument::build(&invoice, "Mahadev Glass", &[]);
        let gap = doc.plan.rows[1].y_mm - doc.plan.rows[0].y_mm;
        assert!(gap > ROW_PITCH_MM);
    }
}
