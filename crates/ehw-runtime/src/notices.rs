//! One-off messages outside the regular change report.

pub fn initialized_notice(fund_code: &str) -> String {
    format!("🚀 {fund_code} holdings watcher initialized!")
}

pub fn reset_notice() -> String {
    "🔄 Legacy snapshot format detected; baseline reset to enable share tracking.".to_string()
}

/// Markup characters are stripped from `detail` so the notice always parses.
pub fn error_notice(fund_code: &str, detail: &str) -> String {
    format!("⚠️ {fund_code} watcher error: {}", detail.replace(['*', '_', '`', '['], ""))
}
