pub mod pdf;
pub mod excel;

use crate::cli::ExportFormat;
use crate::config::Config;
use crate::error::Result;
use glass_estimate_common::export::pdf_core::estimate_file_stem;
use glass_estimate_common::Invoice;
use std::path::{Path, PathBuf};

/// 既定のファイル名（拡張子なし）。日付は出力した日
pub fn default_file_stem(invoice: &Invoice) -> String {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    estimate_file_stem(&invoice.customer.name, &today)
}

fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, stem: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        let pdf_path = output.join(format!("{}.pdf", stem));
        let excel_path = output.join(format!("{}.xlsx", stem));
        (pdf_path, excel_path)
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(stem);
        let pdf_path = parent.join(format!("{}.pdf", stem));
        let excel_path = parent.join(format!("{}.xlsx", stem));
        (pdf_path, excel_path)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// 見積書を出力し、書き出したファイルのパスを返す
///
/// `output` がディレクトリ（または拡張子なし）なら既定のファイル名で、その中に書く。
pub fn export_invoice(
    invoice: &Invoice,
    format: ExportFormat,
    output: &Path,
    stem: &str,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let targets: Vec<(PathBuf, bool)> = match format {
        ExportFormat::Pdf => vec![(output_path_for_format(output, stem, "pdf"), true)],
        ExportFormat::Excel => vec![(output_path_for_format(output, stem, "xlsx"), false)],
        ExportFormat::Both => {
            let (pdf_path, excel_path) = output_paths_for_both(output, stem);
            vec![(pdf_path, true), (excel_path, false)]
        }
    };

    for (path, is_pdf) in targets {
        ensure_parent(&path)?;
        if is_pdf {
            println!("- PDFを生成中...");
            pdf::generate_pdf(invoice, &path, &config.shop_name, &config.terms)?;
            println!("✔ PDF出力: {}", path.display());
        } else {
            println!("- Excelを生成中...");
            excel::generate_excel(invoice, &path, &config.shop_name, &config.terms)?;
            println!("✔ Excel出力: {}", path.display());
        }
        tracing::info!(path = %path.display(), "exported");
        written.push(path);
    }

    Ok(written)
}
