use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glass-estimate")]
#[command(about = "ガラス店の見積書作成・保存・PDF出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// データ保存先（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Store(StoreCommand),

    /// ガラス1行分の金額を計算（保存しない）
    Quote {
        /// 長さ X(L)（インチ）
        #[arg(short, long)]
        x: String,

        /// 幅 Y(B)（インチ）
        #[arg(short, long)]
        y: String,

        /// 数量
        #[arg(short, long, default_value = "1")]
        quantity: String,

        /// ガラス単価（平方フィート）
        #[arg(short, long, default_value = "0")]
        rate: String,

        /// 磨き単価（ランニングフィート）
        #[arg(short, long, default_value = "0")]
        edge_rate: String,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 店名を設定
        #[arg(long)]
        set_shop_name: Option<String>,

        /// データ保存先を設定
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// 通貨記号を設定
        #[arg(long)]
        set_currency: Option<String>,

        /// 既定の出力形式を設定
        #[arg(long)]
        set_format: Option<ExportFormat>,
    },
}

/// 見積書ストアを開いて実行するコマンド
#[derive(Subcommand)]
pub enum StoreCommand {
    /// 保存済みの見積書を一覧表示
    List,

    /// 見積書を新規作成して保存
    New {
        /// 顧客名
        #[arg(long, default_value = "")]
        name: String,

        /// 日付（入力したまま保存）
        #[arg(long, default_value = "")]
        date: String,

        /// 携帯番号
        #[arg(long, default_value = "")]
        mobile: String,

        /// ガラス行 "品名,X,Y,数量,単価,磨き単価"（複数指定可）
        #[arg(short, long)]
        glass: Vec<GlassArg>,

        /// 自由入力行 "品名,合計"（複数指定可、値引きは負数）
        #[arg(short, long)]
        custom: Vec<CustomArg>,

        /// 対話式で入力する
        #[arg(short, long)]
        interactive: bool,
    },

    /// 見積書を対話式で編集して上書き保存
    Edit {
        /// 見積書ID（先頭4文字以上）
        id: String,
    },

    /// 見積書の内容を表示
    Show {
        /// 見積書ID（先頭4文字以上）
        id: String,
    },

    /// 見積書を削除
    Delete {
        /// 見積書ID（先頭4文字以上）
        id: String,

        /// 確認せずに削除
        #[arg(short, long)]
        yes: bool,
    },

    /// 見積書をPDF/Excelに出力
    Export {
        /// 見積書ID（先頭4文字以上）
        id: String,

        /// 出力形式 (pdf/excel/both)、省略時は設定値
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use pdf, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}

/// `--glass` の値: "品名,X,Y,数量,単価,磨き単価"
///
/// 品名にカンマを含められるよう、右から5つだけ切り出す。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlassArg {
    pub particular: String,
    pub x: String,
    pub y: String,
    pub quantity: String,
    pub rate: String,
    pub edge_rate: String,
}

impl std::str::FromStr for GlassArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.rsplitn(6, ',').map(str::trim).collect();
        if parts.len() != 6 {
            return Err(format!(
                "Invalid glass row: {}. Use particular,x,y,qty,rate,edge_rate",
                s
            ));
        }
        parts.reverse();
        Ok(GlassArg {
            particular: parts[0].to_string(),
            x: parts[1].to_string(),
            y: parts[2].to_string(),
            quantity: parts[3].to_string(),
            rate: parts[4].to_string(),
            edge_rate: parts[5].to_string(),
        })
    }
}

/// `--custom` の値: "品名,合計"
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomArg {
    pub particular: String,
    pub line_total: String,
}

impl std::str::FromStr for CustomArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(',') {
            Some((particular, total)) => Ok(CustomArg {
                particular: particular.trim().to_string(),
                line_total: total.trim().to_string(),
            }),
            None => Err(format!("Invalid custom row: {}. Use particular,total", s)),
        }
    }
}
