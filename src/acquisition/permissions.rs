use async_trait::async_trait;
use batikscan_common::ImageSource;
use dialoguer::Confirm;

use super::PermissionGate;
use crate::config::{Config, PermissionPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

impl From<bool> for PermissionStatus {
    fn from(granted: bool) -> Self {
        if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

/// 設定ファイルのポリシーに従う。`ask` は端末で確認する
#[derive(Debug, Clone)]
pub struct PolicyPermissions {
    pub media_library: PermissionPolicy,
    pub camera: PermissionPolicy,
}

impl PolicyPermissions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            media_library: config.media_library_permission,
            camera: config.camera_permission,
        }
    }

    fn policy_for(&self, source: ImageSource) -> PermissionPolicy {
        match source {
            ImageSource::MediaLibrary => self.media_library,
            ImageSource::Camera => self.camera,
        }
    }
}

#[async_trait]
impl PermissionGate for PolicyPermissions {
    async fn request(&self, source: ImageSource) -> PermissionStatus {
        match self.policy_for(source) {
            PermissionPolicy::Allow => PermissionStatus::Granted,
            PermissionPolicy::Deny => PermissionStatus::Denied,
            PermissionPolicy::Ask => {
                let prompt = match source {
                    ImageSource::MediaLibrary => "Izinkan BatikScan mengakses galeri?",
                    ImageSource::Camera => "Izinkan BatikScan mengakses kamera?",
                };
                let answer = tokio::task::spawn_blocking(move || {
                    Confirm::new().with_prompt(prompt).default(false).interact()
                })
                .await;
                match answer {
                    Ok(Ok(granted)) => granted.into(),
                    Ok(Err(e)) => {
                        tracing::warn!(%source, error = %e, "permission prompt failed");
                        PermissionStatus::Denied
                    }
                    Err(e) => {
                        tracing::warn!(%source, error = %e, "permission prompt task failed");
                        PermissionStatus::Denied
                    }
                }
            }
        }
    }
}

/// 固定の結果を返す（JSONモード・テスト用）
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissions {
    pub media_library: PermissionStatus,
    pub camera: PermissionStatus,
}

impl StaticPermissions {
    pub fn granted() -> Self {
        Self {
            media_library: PermissionStatus::Granted,
            camera: PermissionStatus::Granted,
        }
    }
}

#[async_trait]
impl PermissionGate for StaticPermissions {
    async fn request(&self, source: ImageSource) -> PermissionStatus {
        match source {
            ImageSource::MediaLibrary => self.media_library,
            ImageSource::Camera => self.camera,
        }
    }
}
