//! 1回で終わるサブコマンド (`classify` / `capture` / `config`)
//!
//! 出力先は引数で受け取る（main では stdout / stderr）

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use batikscan_common::{ImageSource, Notice};

use crate::acquisition::{ImagePicker, PermissionGate};
use crate::client::Classifier;
use crate::config::Config;
use crate::error::{BatikScanError, Result};
use crate::screen::{AcquireOutcome, ScreenController, SubmitReport};
use crate::terminal;

/// 終了ステータス。Notice・キャンセルは Failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Success => ExitCode::SUCCESS,
            RunStatus::Failure => ExitCode::FAILURE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub source: ImageSource,
    pub json: bool,
    /// false なら取得した画像のパスだけ出力
    pub classify: bool,
    pub bar_cells: usize,
}

/// JSON モードは stdout に `{"error":{...}}`、それ以外は stderr
pub fn report_notice(notice: &Notice, json: bool, out: &mut impl Write, err: &mut impl Write) -> Result<RunStatus> {
    if json {
        writeln!(out, "{}", notice.to_json())?;
    } else {
        writeln!(err, "{}", terminal::render_notice(notice))?;
    }
    Ok(RunStatus::Failure)
}

/// 取得 → (classify が true なら) 送信 を1回だけ実行
pub async fn run_once<G, P, C>(
    controller: &mut ScreenController<G, P, C>,
    options: RunOptions,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<RunStatus>
where
    G: PermissionGate,
    P: ImagePicker,
    C: Classifier,
{
    let json = options.json;
    let staged = match controller.acquire(options.source).await {
        AcquireOutcome::Staged(staged) => staged,
        AcquireOutcome::Cancelled => {
            if !json {
                writeln!(err, "Dibatalkan.")?;
            }
            return Ok(RunStatus::Failure);
        }
        AcquireOutcome::Notice(notice) => return report_notice(&notice, json, out, err),
    };

    if !options.classify {
        if json {
            writeln!(out, "{}", serde_json::to_string(&staged)?)?;
        } else {
            writeln!(out, "{}", staged.uri)?;
        }
        return Ok(RunStatus::Success);
    }

    if !json {
        writeln!(out, "{}", terminal::render_preview(&staged.uri))?;
    }

    match controller.submit().await {
        SubmitReport::Completed(view) => {
            if json {
                let result = controller.state().result().ok_or_else(|| {
                    BatikScanError::InvalidResponse("result missing after submission".into())
                })?;
                writeln!(out, "{}", serde_json::to_string(result)?)?;
            } else {
                write!(out, "{}", terminal::render_result(&view, options.bar_cells))?;
            }
            Ok(RunStatus::Success)
        }
        SubmitReport::Notice(notice) => report_notice(&notice, json, out, err),
        SubmitReport::Skipped | SubmitReport::Stale => Ok(RunStatus::Failure),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigEdit {
    pub set_endpoint: Option<String>,
    pub set_camera_command: Option<String>,
    pub show: bool,
}

/// 設定ファイルの値だけを編集する（--endpoint や環境変数は保存しない）
///
/// 壊れたファイルでも上書きできるように `load_for_edit` で読む
pub fn run_config(path: &Path, edit: ConfigEdit, out: &mut impl Write) -> Result<()> {
    let mut config = Config::load_for_edit(path)?;
    let mut changed = false;

    if let Some(endpoint) = edit.set_endpoint {
        config.set_endpoint(endpoint)?;
        changed = true;
        writeln!(out, "✔ エンドポイントを設定しました")?;
    }

    if let Some(command) = edit.set_camera_command {
        config.set_camera_command(command);
        changed = true;
        writeln!(out, "✔ カメラコマンドを設定しました")?;
    }

    if changed {
        config.save_to(path)?;
    }

    if edit.show {
        writeln!(out, "設定: {}", path.display())?;
        writeln!(out, "  エンドポイント: {}", config.endpoint)?;
        writeln!(
            out,
            "  タイムアウト: {}",
            config.timeout_seconds.map(|s| format!("{}秒", s)).unwrap_or_else(|| "なし".into())
        )?;
        writeln!(out, "  カメラコマンド: {}", config.camera_command.as_deref().unwrap_or("未設定"))?;
        writeln!(out, "  ギャラリー権限: {:?}", config.media_library_permission)?;
        writeln!(out, "  カメラ権限: {:?}", config.camera_permission)?;
    }
    Ok(())
}
