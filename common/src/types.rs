//! 画面状態とサービス応答の型定義
//!
//! - PickedAsset: ピッカー/カメラが返した未検証の画像
//! - StagedImage: 検証済みでプレビュー中の画像（常に最大1枚）
//! - ClassificationResult: /predict の応答

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// 画像の取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    MediaLibrary,
    Camera,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::MediaLibrary => "media-library",
            ImageSource::Camera => "camera",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ピッカーに渡す選択オプション
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerOptions {
    pub single: bool,
    pub allow_editing: bool,
    /// 0.0-1.0
    pub quality: f32,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            single: true,
            allow_editing: false,
            quality: 1.0,
        }
    }
}

/// ピッカーが返した画像（未検証）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickedAsset {
    pub uri: String,
}

impl PickedAsset {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// 検証済みの画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedImage {
    pub uri: String,
    /// 小文字の拡張子 (jpg/jpeg/png)
    pub extension: String,
}

impl StagedImage {
    /// ローカルファイルパス（`file://` を除去）
    pub fn local_path(&self) -> &str {
        self.uri.strip_prefix("file://").unwrap_or(&self.uri)
    }
}

/// クラスごとの確率（受信順を保持）
///
/// 同じキーが複数回現れた場合は最初の位置に最後の値が入る。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Probabilities(Vec<(String, f64)>);

impl Probabilities {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, label: impl Into<String>, value: f64) {
        let label = label.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = value,
            None => self.0.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, f64)> for Probabilities {
    fn from_iter<I: IntoIterator<Item = (L, f64)>>(iter: I) -> Self {
        let mut probabilities = Probabilities::new();
        for (label, value) in iter {
            probabilities.insert(label, value);
        }
        probabilities
    }
}

impl Serialize for Probabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Probabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ProbabilitiesVisitor;

        impl<'de> Visitor<'de> for ProbabilitiesVisitor {
            type Value = Probabilities;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of class label to percentage")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut probabilities = Probabilities::new();
                while let Some((label, value)) = access.next_entry::<String, f64>()? {
                    probabilities.insert(label, value);
                }
                Ok(probabilities)
            }
        }

        deserializer.deserialize_map(ProbabilitiesVisitor)
    }
}

/// /predict の応答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub predicted_class: String,
    /// 0-100
    pub confidence: f64,
    pub probabilities: Probabilities,
}

impl ClassificationResult {
    /// 応答本文をデコードしてスキーマを検証
    ///
    /// 型の不一致・必須フィールド欠落は `Error::InvalidResponse`。
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}
