//! ユーザー向け通知（ブロッキングダイアログ相当）

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Notice {
    PermissionDenied,
    UnsupportedFormat,
    SubmissionFailed,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::PermissionDenied => "Izin Ditolak",
            Notice::UnsupportedFormat => "Format Tidak Didukung",
            Notice::SubmissionFailed => "Error",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::PermissionDenied => "Izin dibutuhkan untuk mengakses gambar!",
            Notice::UnsupportedFormat => "File harus JPG, JPEG, atau PNG.",
            Notice::SubmissionFailed => "Gagal mengirim gambar.",
        }
    }

    /// `{"error": {"title": .., "message": ..}}` 形式
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "kind": self,
                "title": self.title(),
                "message": self.message(),
            }
        })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}
