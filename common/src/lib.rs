//! BatikScan Common Library
//!
//! CLIとデスクトップで共有される型とユーティリティ

pub mod error;
pub mod notice;
pub mod render;
pub mod state;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use notice::Notice;
pub use render::{display_label, format_percent, ProbabilityRow, ResultView};
pub use state::{ScreenState, SubmitOutcome, SubmitTicket};
pub use types::{ClassificationResult, ImageSource, PickedAsset, PickerOptions, Probabilities, StagedImage};
pub use validation::{extract_extension, is_supported_extension, validate_asset, SUPPORTED_EXTENSIONS};
