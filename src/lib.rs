//! ガラス店の見積・注文書管理
//!
//! 計算・フォーム状態・出力レイアウトは `glass_estimate_common`、
//! ここではCLI・設定・保存・ファイル出力を扱う。

pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod logging;
pub mod report;
pub mod store;
