use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use batikscan_common::{ClassificationResult, PickedAsset, StagedImage};
use image::ImageReader;

/// `batikscan classify <path> --json --yes`
pub fn classify_with_cli(cli: &Path, image: &StagedImage) -> Result<ClassificationResult> {
    let output = Command::new(cli)
        .args(["classify", image.local_path(), "--json", "--yes"])
        .output()
        .with_context(|| format!("run {}", cli.display()))?;

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("classify failed: {} {}", stdout.trim(), stderr.trim());
    }
    let result = ClassificationResult::from_json(&output.stdout)?;
    Ok(result)
}

/// `batikscan capture --no-classify --json --yes`
///
/// 撮影なし（キャンセル）は `Ok(None)`
pub fn capture_with_cli(cli: &Path) -> Result<Option<PickedAsset>> {
    let output = Command::new(cli)
        .args(["capture", "--no-classify", "--json", "--yes"])
        .output()
        .with_context(|| format!("run {}", cli.display()))?;

    if !output.status.success() {
        // キャンセル・カメラエラーは何も出力されない
        if output.stdout.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(None);
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        bail!("capture failed: {}", stdout.trim());
    }
    let staged: StagedImage = serde_json::from_slice(&output.stdout).context("parse capture output")?;
    Ok(Some(PickedAsset::new(staged.uri)))
}

pub fn load_preview_pixels(path: &str, max: u32) -> Result<([usize; 2], Vec<u8>)> {
    let image = ImageReader::open(path)
        .with_context(|| format!("open {path}"))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decode {path}"))?;
    let thumb = image.thumbnail(max, max);
    let size = [thumb.width() as usize, thumb.height() as usize];
    Ok((size, thumb.to_rgba8().into_raw()))
}

pub fn resolve_cli_binary() -> PathBuf {
    let name = if cfg!(windows) { "batikscan.exe" } else { "batikscan" };
    let exe = std::env::current_exe().ok();
    if let Some(base_dir) = exe.as_ref().and_then(|p| p.parent()) {
        let local = base_dir.join(name);
        if local.exists() {
            return local;
        }
        if let Some(target_dir) = base_dir.parent() {
            for profile in ["debug", "release"] {
                let sibling = target_dir.join(profile).join(name);
                if sibling.exists() {
                    return sibling;
                }
            }
        }
    }
    PathBuf::from(name)
}
