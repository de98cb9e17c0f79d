pub mod analyze;
pub mod explore;
pub mod feedback;
pub mod fundamentals;
pub mod setup;
pub mod tickers;
pub mod ui;

use crate::core::AnalysisError;

/// Text shown for `err`. Problems the user cannot fix by changing inputs get a
/// pointer to the debug log.
pub fn error_text(err: &AnalysisError) -> String {
    if err.is_user_correctable() {
        err.user_message()
    } else {
        format!("{}\nRun with --verbose for details.", err.user_message())
    }
}

/// Prints the user-facing message for `err` and logs the detail.
pub fn report_error(err: &AnalysisError) {
    tracing::debug!(error = ?err, "Analysis failed");
    eprintln!("{}", ui::style_text(&error_text(err), ui::StyleType::Error));
}
