use std::path::{Path, PathBuf};

use async_trait::async_trait;
use batikscan_common::{ImageSource, PickedAsset, PickerOptions};
use dialoguer::Input;

use super::ImagePicker;
use crate::error::{BatikScanError, Result};

fn asset_from_path(path: &Path) -> Result<PickedAsset> {
    if !path.is_file() {
        return Err(BatikScanError::FileNotFound(path.display().to_string()));
    }
    Ok(PickedAsset::new(path.display().to_string()))
}

/// あらかじめ渡されたパスを返すメディアライブラリ
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ImagePicker for PathPicker {
    async fn pick(&self, _source: ImageSource, _options: &PickerOptions) -> Result<Option<PickedAsset>> {
        match &self.path {
            Some(path) => asset_from_path(path).map(Some),
            None => Ok(None),
        }
    }
}

/// 端末でパスを入力させるメディアライブラリ（空入力でキャンセル）
#[derive(Debug, Clone, Default)]
pub struct PromptPicker;

#[async_trait]
impl ImagePicker for PromptPicker {
    async fn pick(&self, _source: ImageSource, _options: &PickerOptions) -> Result<Option<PickedAsset>> {
        let answer = tokio::task::spawn_blocking(|| {
            Input::<String>::new()
                .with_prompt("Path gambar (kosong = batal)")
                .allow_empty(true)
                .interact_text()
        })
        .await
        .map_err(|e| BatikScanError::Picker(e.to_string()))?
        .map_err(|e| BatikScanError::Picker(e.to_string()))?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }
        asset_from_path(Path::new(answer)).map(Some)
    }
}

/// 取得元ごとにピッカーを振り分ける
pub struct RoutedPicker {
    library: Box<dyn ImagePicker>,
    camera: Box<dyn ImagePicker>,
}

impl RoutedPicker {
    pub fn new(library: impl ImagePicker + 'static, camera: impl ImagePicker + 'static) -> Self {
        Self {
            library: Box::new(library),
            camera: Box::new(camera),
        }
    }
}

#[async_trait]
impl ImagePicker for RoutedPicker {
    async fn pick(&self, source: ImageSource, options: &PickerOptions) -> Result<Option<PickedAsset>> {
        match source {
            ImageSource::MediaLibrary => self.library.pick(source, options).await,
            ImageSource::Camera => self.camera.pick(source, options).await,
        }
    }
}
