//! 分類結果の表示モデル
//!
//! バー幅は受信した値をそのまま使う（0-100、クランプしない）。

use serde::Serialize;

use crate::types::ClassificationResult;

/// アンダースコアを空白に置換（冪等）
pub fn display_label(label: &str) -> String {
    label.replace('_', " ")
}

/// 小数点以下2桁 + `%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityRow {
    pub label: String,
    /// 0-100 スケールの塗りつぶし幅
    pub bar_width: f64,
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    /// 例: "Batik Kawung (87.50%)"
    pub headline: String,
    pub rows: Vec<ProbabilityRow>,
}

impl ResultView {
    pub fn from_result(result: &ClassificationResult) -> Self {
        let headline = format!(
            "{} ({})",
            display_label(&result.predicted_class),
            format_percent(result.confidence)
        );
        let rows = result
            .probabilities
            .iter()
            .map(|(label, value)| ProbabilityRow {
                label: display_label(label),
                bar_width: value,
                percent: format_percent(value),
            })
            .collect();
        Self { headline, rows }
    }

    /// 端末表示用のバー（`cells` 文字幅）
    ///
    /// 描画できない範囲だけ 0..=cells に収める。モデル側の値は変更しない。
    pub fn text_bar(row: &ProbabilityRow, cells: usize) -> String {
        let filled = ((row.bar_width / 100.0) * cells as f64).round();
        let filled = if filled.is_nan() { 0 } else { filled.clamp(0.0, cells as f64) as usize };
        format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
    }
}
