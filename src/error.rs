use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlassEstimateError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("見積書が見つかりません: {0}")]
    NotFound(String),

    #[error("IDが不正です: {0}")]
    InvalidId(String),

    #[error("IDが複数の見積書に一致します: {0}（もう少し長く指定してください）")]
    AmbiguousId(String),

    #[error("保存データの読み書きに失敗: {0}")]
    Store(String),

    #[error("保存データのバージョン {0} には対応していません")]
    UnsupportedSchema(u32),

    #[error("明細の指定が不正: {0}")]
    InvalidItem(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] glass_estimate_common::Error),
}

impl GlassEstimateError {
    /// 保存データの読み書きに起因するエラーか
    ///
    /// ストアは読み書きのエラーを `Store` に包むので、`Io` は出力や設定の失敗。
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            GlassEstimateError::Store(_) | GlassEstimateError::UnsupportedSchema(_)
        )
    }
}

impl From<dialoguer::Error> for GlassEstimateError {
    fn from(e: dialoguer::Error) -> Self {
        GlassEstimateError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GlassEstimateError>;
