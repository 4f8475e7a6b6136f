//! 画像取得（パーミッション確認 → ピッカー/カメラ）
//!
//! どちらも非同期の境界として trait で切り出す。

mod camera;
mod permissions;
mod picker;

pub use camera::CommandCamera;
pub use permissions::{PermissionStatus, PolicyPermissions, StaticPermissions};
pub use picker::{PathPicker, PromptPicker, RoutedPicker};

use async_trait::async_trait;
use batikscan_common::{ImageSource, PickedAsset, PickerOptions};

use crate::error::Result;

#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn request(&self, source: ImageSource) -> PermissionStatus;
}

#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// `Ok(None)` はユーザーによるキャンセル
    async fn pick(&self, source: ImageSource, options: &PickerOptions) -> Result<Option<PickedAsset>>;
}

#[async_trait]
impl<T: PermissionGate + ?Sized> PermissionGate for Box<T> {
    async fn request(&self, source: ImageSource) -> PermissionStatus {
        (**self).request(source).await
    }
}

#[async_trait]
impl<T: ImagePicker + ?Sized> ImagePicker for Box<T> {
    async fn pick(&self, source: ImageSource, options: &PickerOptions) -> Result<Option<PickedAsset>> {
        (**self).pick(source, options).await
    }
}
