//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
