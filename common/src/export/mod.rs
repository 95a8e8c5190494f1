//! Export core modules shared by the PDF and spreadsheet writers.

pub mod pdf_core;

#[cfg(feature = "excel")]
pub mod excel_core;
