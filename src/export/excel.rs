//! Excel生成（CLI版）
//!
//! ブック生成は common の excel_core に任せ、ここではファイルへ書き出すだけ。

use crate::error::{GlassEstimateError, Result};
use glass_estimate_common::export::excel_core::generate_excel_buffer;
use glass_estimate_common::Invoice;
use std::path::Path;

pub fn generate_excel(
    invoice: &Invoice,
    output_path: &Path,
    shop_name: &str,
    terms: &[String],
) -> Result<()> {
    let buffer = generate_excel_buffer(invoice, shop_name, terms)
        .map_err(GlassEstimateError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
