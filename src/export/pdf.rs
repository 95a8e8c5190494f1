//! PDF生成（printpdf）
//!
//! 文字列・折り返し・改ページ位置は `EstimateDocument` で決まっているので、
//! ここでは計画どおりに描くだけ。

use crate::error::{GlassEstimateError, Result};
use glass_estimate_common::export::pdf_core::{wrap_cell, EstimateDocument};
use glass_estimate_common::layout::*;
use glass_estimate_common::Invoice;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
    Rgb,
};
use std::io::BufWriter;
use std::path::Path;

/// 文字のベースラインから塗りつぶし上端までの距離（mm）
const FILL_ASCENT_MM: f32 = 5.5;

const HEADER_BLUE: (f32, f32, f32) = (0.098, 0.463, 0.824);
const HEADER_GRAY: (f32, f32, f32) = (0.94, 0.94, 0.94);
const ROW_SHADE: (f32, f32, f32) = (0.97, 0.97, 0.97);
const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// ページごとのレイヤーとフォント
struct Painter {
    layers: Vec<PdfLayerReference>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Painter {
    fn layer(&self, page: usize) -> &PdfLayerReference {
        // 計画外のページ番号は最終ページに寄せる
        &self.layers[page.min(self.layers.len() - 1)]
    }

    /// 上端基準のY座標で文字を置く
    fn text(&self, page: usize, text: &str, size: f32, x_mm: f32, top_mm: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer(page)
            .use_text(text, size, Mm(x_mm), Mm(top_to_pdf_y(top_mm)), font);
    }

    fn fill(&self, page: usize, left_mm: f32, top_mm: f32, width_mm: f32, height_mm: f32, color: (f32, f32, f32)) {
        let layer = self.layer(page);
        layer.set_fill_color(rgb(color));
        layer.add_rect(Rect::new(
            Mm(left_mm),
            Mm(top_to_pdf_y(top_mm + height_mm)),
            Mm(left_mm + width_mm),
            Mm(top_to_pdf_y(top_mm)),
        ));
        layer.set_fill_color(rgb(BLACK));
    }

    fn line(&self, page: usize, x1_mm: f32, y1_mm: f32, x2_mm: f32, y2_mm: f32) {
        self.layer(page).add_line(Line {
            points: vec![
                (Point::new(Mm(x1_mm), Mm(top_to_pdf_y(y1_mm))), false),
                (Point::new(Mm(x2_mm), Mm(top_to_pdf_y(y2_mm))), false),
            ],
            is_closed: false,
        });
    }

    fn set_text_color(&self, page: usize, color: (f32, f32, f32)) {
        self.layer(page).set_fill_color(rgb(color));
    }
}

fn table_left() -> f32 {
    MARGIN_MM
}

fn table_width() -> f32 {
    A4_WIDTH_MM - MARGIN_MM * 2.0
}

fn draw_header(painter: &Painter, document: &EstimateDocument) {
    painter.fill(0, 0.0, 0.0, A4_WIDTH_MM, HEADER_BAND_HEIGHT_MM, HEADER_BLUE);

    let title_width = approx_text_width_mm(&document.title, HEADER_TITLE_SIZE);
    let title_x = ((A4_WIDTH_MM - title_width) / 2.0).max(MARGIN_MM);
    painter.set_text_color(0, WHITE);
    painter.text(0, &document.title, HEADER_TITLE_SIZE, title_x, HEADER_TITLE_Y_MM, true);
    painter.set_text_color(0, BLACK);

    painter.text(0, "Customer Details:", 12.0, MARGIN_MM, CUSTOMER_HEADING_Y_MM, true);
    let xs = [CUSTOMER_NAME_X_MM, CUSTOMER_DATE_X_MM, CUSTOMER_MOBILE_X_MM];
    for (line, x) in document.customer.iter().zip(xs) {
        painter.text(0, line, 10.0, x, CUSTOMER_LINE_Y_MM, false);
    }
    painter.line(
        0,
        MARGIN_MM,
        CUSTOMER_SEPARATOR_Y_MM,
        A4_WIDTH_MM - MARGIN_MM,
        CUSTOMER_SEPARATOR_Y_MM,
    );
}

fn draw_table(painter: &Painter, document: &EstimateDocument) {
    // 列見出し
    painter.fill(
        0,
        table_left(),
        TABLE_TOP_MM - FILL_ASCENT_MM,
        table_width(),
        TABLE_HEADER_HEIGHT_MM,
        HEADER_GRAY,
    );
    for column in TABLE_COLUMNS {
        painter.text(0, column.title, TABLE_HEADER_FONT_SIZE, column.x_mm, TABLE_TOP_MM, true);
    }

    for (row, placement) in document.rows.iter().zip(&document.plan.rows) {
        let wrapped: Vec<Vec<String>> = row
            .cells
            .iter()
            .zip(TABLE_COLUMNS)
            .map(|(cell, column)| wrap_cell(cell, column.width_mm, TABLE_BODY_FONT_SIZE))
            .collect();
        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1);

        if row.shaded {
            painter.fill(
                placement.page,
                table_left(),
                placement.y_mm - FILL_ASCENT_MM,
                table_width(),
                ROW_FILL_HEIGHT_MM + extra_row_height_mm(line_count),
                ROW_SHADE,
            );
        }
        for (lines, column) in wrapped.iter().zip(TABLE_COLUMNS) {
            // 折り返す場合は少し上から始め、3行目以降は広げた行送りに入る
            let first_y = if lines.len() > 1 {
                placement.y_mm - WRAPPED_LINE_PITCH_MM / 2.0
            } else {
                placement.y_mm
            };
            for (i, line) in lines.iter().enumerate() {
                painter.text(
                    placement.page,
                    line,
                    TABLE_BODY_FONT_SIZE,
                    column.x_mm,
                    first_y + i as f32 * WRAPPED_LINE_PITCH_MM,
                    false,
                );
            }
        }
    }

    // 合計行
    let totals = document.plan.totals;
    painter.fill(
        totals.page,
        table_left(),
        totals.y_mm - FILL_ASCENT_MM,
        table_width(),
        ROW_FILL_HEIGHT_MM,
        HEADER_BLUE,
    );
    painter.set_text_color(totals.page, WHITE);
    for (column, value) in &document.totals {
        if let Some(def) = TABLE_COLUMNS.get(*column) {
            painter.text(totals.page, value, TOTALS_FONT_SIZE, def.x_mm, totals.y_mm, true);
        }
    }
    painter.set_text_color(totals.page, BLACK);

    // ページごとの外枠
    for segment in &document.plan.segments {
        let left = table_left();
        let right = left + table_width();
        let top = segment.top_mm - FILL_ASCENT_MM;
        let bottom = segment.bottom_mm - FILL_ASCENT_MM;
        painter.line(segment.page, left, top, right, top);
        painter.line(segment.page, left, bottom, right, bottom);
        painter.line(segment.page, left, top, left, bottom);
        painter.line(segment.page, right, top, right, bottom);
    }
}

fn draw_footer(painter: &Painter, document: &EstimateDocument) {
    let heading = document.plan.terms_heading;
    painter.text(heading.page, "Terms & Conditions:", 11.0, MARGIN_MM, heading.y_mm, true);
    for (term, placement) in document.terms.iter().zip(&document.plan.terms) {
        painter.text(placement.page, term, 9.0, MARGIN_MM + 5.0, placement.y_mm, false);
    }

    let signature = document.plan.signature;
    painter.text(
        signature.page,
        "Authorized Signature:",
        10.0,
        SIGNATURE_LABEL_X_MM,
        signature.y_mm,
        true,
    );
    let line_y = signature.y_mm + SIGNATURE_LINE_OFFSET_MM;
    painter.line(
        signature.page,
        SIGNATURE_LINE_START_X_MM,
        line_y,
        A4_WIDTH_MM - MARGIN_MM,
        line_y,
    );
}

/// PDFをメモリ上に生成
pub fn render_pdf_bytes(document: &EstimateDocument) -> Result<Vec<u8>> {
    let (doc, page1, layer1) = PdfDocument::new(
        document.title.as_str(),
        Mm(A4_WIDTH_MM),
        Mm(A4_HEIGHT_MM),
        "Layer 1",
    );

    let mut layers = vec![doc.get_page(page1).get_layer(layer1)];
    for n in 1..document.plan.page_count {
        let (page, layer) = doc.add_page(
            Mm(A4_WIDTH_MM),
            Mm(A4_HEIGHT_MM),
            format!("Layer {}", n + 1),
        );
        layers.push(doc.get_page(page).get_layer(layer));
    }

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| GlassEstimateError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| GlassEstimateError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))?;

    let painter = Painter { layers, regular, bold };
    draw_header(&painter, document);
    draw_table(&painter, document);
    draw_footer(&painter, document);

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| GlassEstimateError::PdfGeneration(format!("PDF保存エラー: {:?}", e)))?;
    writer
        .into_inner()
        .map_err(|e| GlassEstimateError::PdfGeneration(format!("PDF保存エラー: {}", e)))
}

/// 見積書をPDFファイルに出力
pub fn generate_pdf(
    invoice: &Invoice,
    output_path: &Path,
    shop_name: &str,
    terms: &[String],
) -> Result<()> {
    let document = EstimateDocument::build(invoice, shop_name, terms);
    tracing::debug!(
        rows = document.rows.len(),
        pages = document.plan.page_count,
        "rendering pdf"
    );

    let bytes = render_pdf_bytes(&document)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}
