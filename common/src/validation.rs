//! 拡張子による画像形式チェック

use crate::error::{Error, Result};
use crate::types::{PickedAsset, StagedImage};

pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// URI末尾の拡張子を小文字で取り出す
///
/// 最後の `.` 以降にパス区切りが含まれる場合は拡張子なしとみなす。
pub fn extract_extension(uri: &str) -> Option<String> {
    let (_, ext) = uri.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') || ext.contains('\\') {
        return None;
    }
    Some(ext.to_lowercase())
}

pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// ピッカーの結果を検証して StagedImage に変換
pub fn validate_asset(asset: &PickedAsset) -> Result<StagedImage> {
    match extract_extension(&asset.uri) {
        Some(ext) if is_supported_extension(&ext) => Ok(StagedImage {
            uri: asset.uri.clone(),
            extension: ext,
        }),
        Some(ext) => Err(Error::UnsupportedFormat(ext)),
        None => Err(Error::UnsupportedFormat(asset.uri.clone())),
    }
}
