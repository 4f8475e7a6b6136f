use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "batikscan")]
#[command(about = "BatikScan - Klasifikasi Batik Nusantara", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 送信先エンドポイント（設定ファイルより優先）
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// パーミッション確認を省略して許可する
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ギャラリーから画像を選んで分類
    Classify {
        /// 画像ファイル (jpg/jpeg/png)
        #[arg(required = true)]
        image: PathBuf,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// カメラで撮影して分類
    Capture {
        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,

        /// 撮影のみ（分類しない）
        #[arg(long)]
        no_classify: bool,

        /// 撮影画像の保存先（省略時は一時ディレクトリ）
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// 対話モード（1画面）
    Screen,

    /// 設定を表示/編集
    Config {
        /// エンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// カメラコマンドを設定（`{output}` が撮影先に置換される）
        #[arg(long)]
        set_camera_command: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
