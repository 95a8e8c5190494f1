//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_edit() {
        let error = Error::InvalidEdit("row 3 does not exist".to_string());
        assert_eq!(format!("{}", error), "Invalid edit: row 3 does not exist");
    }
}
