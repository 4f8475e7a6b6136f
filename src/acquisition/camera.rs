//! 外部コマンドによるカメラ撮影
//!
//! 例: `fswebcam -r 1280x720 --no-banner {output}`

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use batikscan_common::{ImageSource, PickedAsset, PickerOptions};
use tokio::process::Command;

use super::ImagePicker;
use crate::error::{BatikScanError, Result};

const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Clone)]
pub struct CommandCamera {
    command: Option<String>,
    output_dir: PathBuf,
}

impl CommandCamera {
    pub fn new(command: Option<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            output_dir: output_dir.into(),
        }
    }

    fn capture_path(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.output_dir.join(format!("capture-{}.jpg", millis))
    }

    /// `{output}` を置換。なければ末尾に付与
    fn build_command_line(template: &str, output: &Path) -> String {
        let quoted = format!("\"{}\"", output.display());
        if template.contains(OUTPUT_PLACEHOLDER) {
            template.replace(OUTPUT_PLACEHOLDER, &quoted)
        } else {
            format!("{} {}", template, quoted)
        }
    }
}

#[async_trait]
impl ImagePicker for CommandCamera {
    async fn pick(&self, _source: ImageSource, options: &PickerOptions) -> Result<Option<PickedAsset>> {
        let template = self.command.as_deref().ok_or(BatikScanError::MissingCameraCommand)?;
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let output_path = self.capture_path();
        let command_line = Self::build_command_line(template, &output_path);
        tracing::debug!(command = %command_line, quality = options.quality, "running camera command");

        // Windowsではcmd /c経由
        #[cfg(windows)]
        let output = Command::new("cmd").args(["/C", &command_line]).output().await;

        #[cfg(not(windows))]
        let output = Command::new("sh").args(["-c", &command_line]).output().await;

        let output = output.map_err(|e| BatikScanError::CameraCommand(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BatikScanError::CameraCommand(format!(
                "exit code {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        // 成功したのにファイルがない → 撮影キャンセル扱い
        if !output_path.is_file() {
            tracing::info!("camera command produced no image; treating as cancel");
            return Ok(None);
        }

        Ok(Some(PickedAsset::new(output_path.display().to_string())))
    }
}
