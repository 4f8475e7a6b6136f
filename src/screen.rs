//! 1画面分のコントローラ
//!
//! 取得 → 検証 → (ユーザー操作で) 送信 → 表示。
//! エラーはすべてこの層で Notice に変換し、外には出さない。

use batikscan_common::{
    validate_asset, ImageSource, Notice, PickerOptions, ResultView, ScreenState, StagedImage, SubmitOutcome,
};

use crate::acquisition::{ImagePicker, PermissionGate};
use crate::client::Classifier;

#[derive(Debug, Clone, PartialEq)]
pub enum AcquireOutcome {
    Staged(StagedImage),
    Cancelled,
    Notice(Notice),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitReport {
    /// 画像なし、または送信中
    Skipped,
    Completed(ResultView),
    /// 送信中に画像が差し替えられた
    Stale,
    Notice(Notice),
}

type BusyListener = Box<dyn Fn(bool) + Send + Sync>;

pub struct ScreenController<G, P, C> {
    state: ScreenState,
    permissions: G,
    picker: P,
    classifier: C,
    options: PickerOptions,
    busy_listener: Option<BusyListener>,
}

impl<G, P, C> ScreenController<G, P, C>
where
    G: PermissionGate,
    P: ImagePicker,
    C: Classifier,
{
    pub fn new(permissions: G, picker: P, classifier: C) -> Self {
        Self {
            state: ScreenState::new(),
            permissions,
            picker,
            classifier,
            options: PickerOptions::default(),
            busy_listener: None,
        }
    }

    /// busy 状態の変化を通知（スピナー表示用）
    pub fn with_busy_listener(mut self, listener: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.busy_listener = Some(Box::new(listener));
        self
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn result_view(&self) -> Option<ResultView> {
        self.state.result().map(ResultView::from_result)
    }

    pub async fn acquire(&mut self, source: ImageSource) -> AcquireOutcome {
        let permission = self.permissions.request(source).await;
        if !permission.is_granted() {
            tracing::info!(%source, "permission denied");
            return AcquireOutcome::Notice(Notice::PermissionDenied);
        }

        let asset = match self.picker.pick(source, &self.options).await {
            Ok(Some(asset)) => asset,
            Ok(None) => {
                tracing::debug!(%source, "picker cancelled");
                return AcquireOutcome::Cancelled;
            }
            Err(e) => {
                tracing::warn!(%source, error = %e, "picker failed");
                return AcquireOutcome::Cancelled;
            }
        };

        match validate_asset(&asset) {
            Ok(staged) => {
                tracing::info!(uri = %staged.uri, extension = %staged.extension, "image staged");
                self.state.stage_image(staged.clone());
                AcquireOutcome::Staged(staged)
            }
            Err(e) => {
                tracing::info!(uri = %asset.uri, error = %e, "unsupported image format");
                AcquireOutcome::Notice(Notice::UnsupportedFormat)
            }
        }
    }

    pub async fn submit(&mut self) -> SubmitReport {
        let Some(ticket) = self.state.begin_submit() else {
            return SubmitReport::Skipped;
        };
        self.notify_busy(true);

        let response = self.classifier.classify(&ticket.image).await;

        let report = match response {
            Ok(result) => match self.state.end_submit_success(&ticket, result) {
                SubmitOutcome::Stored => match self.result_view() {
                    Some(view) => SubmitReport::Completed(view),
                    None => SubmitReport::Stale,
                },
                SubmitOutcome::Stale => SubmitReport::Stale,
            },
            Err(e) => {
                tracing::warn!(error = %e, "classification request failed");
                match self.state.end_submit_failure(&ticket) {
                    SubmitOutcome::Stored => SubmitReport::Notice(Notice::SubmissionFailed),
                    SubmitOutcome::Stale => SubmitReport::Stale,
                }
            }
        };
        self.notify_busy(false);
        report
    }

    fn notify_busy(&self, busy: bool) {
        if let Some(listener) = &self.busy_listener {
            listener(busy);
        }
    }
}
