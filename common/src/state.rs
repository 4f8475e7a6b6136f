//! 画面の一時状態
//!
//! 状態は名前付きの遷移でのみ変更する:
//! stage_image / clear_result / begin_submit / end_submit_success / end_submit_failure

use crate::types::{ClassificationResult, StagedImage};

/// 送信中の画像を識別するチケット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub image: StagedImage,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Stored,
    /// 送信中に別の画像が選ばれたため破棄
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    staged: Option<StagedImage>,
    result: Option<ClassificationResult>,
    busy: bool,
    generation: u64,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staged(&self) -> Option<&StagedImage> {
        self.staged.as_ref()
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// 送信ボタンを押せるか
    pub fn can_submit(&self) -> bool {
        self.staged.is_some() && !self.busy
    }

    /// 新しい画像をセットし、以前の結果を破棄
    pub fn stage_image(&mut self, image: StagedImage) {
        self.staged = Some(image);
        self.generation += 1;
        self.clear_result();
    }

    pub fn clear_result(&mut self) {
        self.result = None;
    }

    /// busy に入る。画像がない、または送信中なら None
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if self.busy {
            return None;
        }
        let image = self.staged.clone()?;
        self.busy = true;
        self.clear_result();
        Some(SubmitTicket {
            image,
            generation: self.generation,
        })
    }

    pub fn end_submit_success(&mut self, ticket: &SubmitTicket, result: ClassificationResult) -> SubmitOutcome {
        self.busy = false;
        if ticket.generation != self.generation {
            return SubmitOutcome::Stale;
        }
        self.result = Some(result);
        SubmitOutcome::Stored
    }

    /// 差し替え前の画像の失敗は Stale（通知しない）
    pub fn end_submit_failure(&mut self, ticket: &SubmitTicket) -> SubmitOutcome {
        self.busy = false;
        if ticket.generation != self.generation {
            return SubmitOutcome::Stale;
        }
        self.clear_result();
        SubmitOutcome::Stored
    }
}
