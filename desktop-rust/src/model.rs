use batikscan_common::{ClassificationResult, ImageSource, Notice, PickedAsset, ScreenState, SubmitOutcome, SubmitTicket};

/// セッション中のパーミッション判定（未確認は None）
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissions {
    pub media_library: Option<bool>,
    pub camera: Option<bool>,
}

impl Permissions {
    pub fn get(&self, source: ImageSource) -> Option<bool> {
        match source {
            ImageSource::MediaLibrary => self.media_library,
            ImageSource::Camera => self.camera,
        }
    }

    pub fn set(&mut self, source: ImageSource, granted: bool) {
        match source {
            ImageSource::MediaLibrary => self.media_library = Some(granted),
            ImageSource::Camera => self.camera = Some(granted),
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub screen: ScreenState,
    pub permissions: Permissions,
    /// 確認ダイアログ表示中の取得元
    pub pending_permission: Option<ImageSource>,
    pub notice: Option<Notice>,
    pub in_flight: Option<SubmitTicket>,
    pub capturing: bool,
}

impl AppState {
    /// 送信結果を反映してステータス文字列を返す。差し替え前の画像の結果は捨てる
    pub fn finish_classify(&mut self, result: Result<ClassificationResult, String>) -> String {
        let Some(ticket) = self.in_flight.take() else {
            return String::new();
        };
        match result {
            Ok(result) => match self.screen.end_submit_success(&ticket, result) {
                SubmitOutcome::Stored => "Classify done".to_string(),
                SubmitOutcome::Stale => "Discarded result for replaced image".to_string(),
            },
            Err(err) => match self.screen.end_submit_failure(&ticket) {
                SubmitOutcome::Stored => {
                    self.notice = Some(Notice::SubmissionFailed);
                    format!("Classify failed: {err}")
                }
                SubmitOutcome::Stale => format!("Classify failed for replaced image: {err}"),
            },
        }
    }
}

pub enum UiMessage {
    CaptureDone(Result<Option<PickedAsset>, String>),
    ClassifyDone(Result<ClassificationResult, String>),
    PreviewLoaded { uri: String, size: [usize; 2], pixels: Vec<u8> },
}
