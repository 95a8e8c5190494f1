//! レイアウト設定モジュール
//!
//! mm基準（ページ左上原点・下向き正）の見積書レイアウト定義

// ============================================
// ページ
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 左右余白（mm）
pub const MARGIN_MM: f32 = 10.0;

/// 改ページ後の先頭Y座標（mm）
pub const CONTINUATION_TOP_MM: f32 = 20.0;

// ============================================
// ヘッダー・顧客欄
// ============================================

/// 上部の帯の高さ（mm）
pub const HEADER_BAND_HEIGHT_MM: f32 = 25.0;
pub const HEADER_TITLE_Y_MM: f32 = 17.0;
pub const HEADER_TITLE_SIZE: f32 = 16.0;

pub const CUSTOMER_HEADING_Y_MM: f32 = 40.0;
pub const CUSTOMER_LINE_Y_MM: f32 = 50.0;
pub const CUSTOMER_SEPARATOR_Y_MM: f32 = 55.0;

/// 顧客欄の列X座標（名前・日付・電話）
pub const CUSTOMER_NAME_X_MM: f32 = 10.0;
pub const CUSTOMER_DATE_X_MM: f32 = 70.0;
pub const CUSTOMER_MOBILE_X_MM: f32 = 130.0;

// ============================================
// 明細表
// ============================================

pub const TABLE_TOP_MM: f32 = 65.0;
pub const TABLE_HEADER_HEIGHT_MM: f32 = 8.0;
/// 行送り（mm）。塗りつぶしは8mm
pub const ROW_PITCH_MM: f32 = 10.0;
pub const ROW_FILL_HEIGHT_MM: f32 = 8.0;
pub const TOTALS_ROW_HEIGHT_MM: f32 = 10.0;
/// この位置を超えた行は次ページへ
pub const TABLE_BOTTOM_LIMIT_MM: f32 = A4_HEIGHT_MM - 50.0;

pub const TABLE_HEADER_FONT_SIZE: f32 = 8.0;
pub const TABLE_BODY_FONT_SIZE: f32 = 7.0;
pub const TOTALS_FONT_SIZE: f32 = 9.0;

/// これより長いセルは折り返す
pub const CELL_WRAP_THRESHOLD: usize = 10;
/// 折り返した行の送り（mm）
pub const WRAPPED_LINE_PITCH_MM: f32 = 3.0;
/// 標準の行送りに収まる折り返し行数
pub const LINES_PER_ROW: usize = 2;

/// 折り返し行数に応じて行送りに足す高さ（mm）
pub fn extra_row_height_mm(line_count: usize) -> f32 {
    line_count.saturating_sub(LINES_PER_ROW) as f32 * WRAPPED_LINE_PITCH_MM
}

/// 明細表の列定義
#[derive(Debug, Clone, Copy)]
pub struct ColumnDefinition {
    pub title: &'static str,
    /// 文字描画位置（mm）
    pub x_mm: f32,
    /// 折り返し幅（mm）
    pub width_mm: f32,
}

/// 明細表の列（左から）
pub const TABLE_COLUMNS: &[ColumnDefinition] = &[
    ColumnDefinition { title: "Particular", x_mm: 12.0, width_mm: 28.0 },
    ColumnDefinition { title: "X(L)", x_mm: 42.0, width_mm: 10.0 },
    ColumnDefinition { title: "Y(B)", x_mm: 54.0, width_mm: 10.0 },
    ColumnDefinition { title: "Qty", x_mm: 66.0, width_mm: 10.0 },
    ColumnDefinition { title: "SqFt", x_mm: 78.0, width_mm: 13.0 },
    ColumnDefinition { title: "G.Rate", x_mm: 93.0, width_mm: 13.0 },
    ColumnDefinition { title: "G.Total", x_mm: 108.0, width_mm: 13.0 },
    ColumnDefinition { title: "RunFt", x_mm: 123.0, width_mm: 13.0 },
    ColumnDefinition { title: "P.Rate", x_mm: 138.0, width_mm: 13.0 },
    ColumnDefinition { title: "RF.Total", x_mm: 153.0, width_mm: 13.0 },
    ColumnDefinition { title: "Total", x_mm: 168.0, width_mm: 18.0 },
];

pub const COLUMN_COUNT: usize = 11;

/// 合計行で値を置く列
pub const GLASS_TOTAL_COLUMN: usize = 6;
pub const EDGE_TOTAL_COLUMN: usize = 9;
pub const GRAND_TOTAL_COLUMN: usize = 10;

// ============================================
// 約款・署名
// ============================================

pub const TERMS_GAP_MM: f32 = 15.0;
pub const TERMS_HEADING_GAP_MM: f32 = 8.0;
pub const TERMS_LINE_PITCH_MM: f32 = 5.0;
/// 約款行がこの位置を超えたら次ページへ
pub const TERMS_BOTTOM_LIMIT_MM: f32 = A4_HEIGHT_MM - 20.0;

/// 署名欄の標準位置（mm）
pub const SIGNATURE_Y_MM: f32 = A4_HEIGHT_MM - 25.0;
pub const SIGNATURE_GAP_MM: f32 = 15.0;
pub const SIGNATURE_LINE_OFFSET_MM: f32 = 10.0;
pub const SIGNATURE_LABEL_X_MM: f32 = A4_WIDTH_MM - 60.0;
pub const SIGNATURE_LINE_START_X_MM: f32 = A4_WIDTH_MM - 45.0;

/// 既定の約款
pub const DEFAULT_TERMS: &[&str] = &[
    "Labour & Delivery Charge Will Be Extra",
    "50% Payment against Order and 50% Before delivery",
    "No Guarantee On Mirror",
    "We are not responsible for any loss or damage during transit [Scratches & chipping]",
    "This quote is Valid for 7 days Approval Rate.",
];

/// 既定の店名
pub const DEFAULT_SHOP_NAME: &str = "MAHADEV GLASS";

// ============================================
// 変換
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Helvetica の平均文字幅（em比）
pub const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

/// 上から測ったY座標をPDF座標（下から）に変換
#[inline]
pub fn top_to_pdf_y(top_mm: f32) -> f32 {
    A4_HEIGHT_MM - top_mm
}

/// 文字列のおおよその描画幅（mm）
pub fn approx_text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * pt_to_mm(font_size_pt) * AVG_CHAR_WIDTH_EM
}
