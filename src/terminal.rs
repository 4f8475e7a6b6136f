//! 端末向けの表示

use batikscan_common::{Notice, ResultView};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const LABEL_WIDTH: usize = 22;

pub fn render_result(view: &ResultView, bar_cells: usize) -> String {
    let mut out = String::new();
    out.push_str("✅ Hasil Klasifikasi:\n");
    out.push_str(&format!("   {}\n\n", view.headline));
    out.push_str("📊 Probabilitas Tiap Kelas:\n");
    for row in &view.rows {
        out.push_str(&format!(
            "   {:<width$} [{}] {:>8}\n",
            row.label,
            ResultView::text_bar(row, bar_cells),
            row.percent,
            width = LABEL_WIDTH,
        ));
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    format!("⚠ {}\n  {}", notice.title(), notice.message())
}

pub fn render_preview(uri: &str) -> String {
    let name = std::path::Path::new(uri)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| uri.to_string());
    format!("🖼  Preview Gambar: {}", name)
}

/// 送信中スピナー
pub fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.yellow} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message("Mengklasifikasi Gambar...");
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
