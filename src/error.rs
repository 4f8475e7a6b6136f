use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatikScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP送信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("サーバーがエラーを返しました: HTTP {0}")]
    HttpStatus(u16),

    #[error("レスポンスのパースに失敗: {0}")]
    InvalidResponse(String),

    #[error("ピッカーエラー: {0}")]
    Picker(String),

    #[error("カメラコマンドが設定されていません。`batikscan config --set-camera-command CMD` で設定してください")]
    MissingCameraCommand,

    #[error("カメラコマンド実行エラー: {0}")]
    CameraCommand(String),

    #[error(transparent)]
    Common(#[from] batikscan_common::Error),
}

pub type Result<T> = std::result::Result<T, BatikScanError>;
