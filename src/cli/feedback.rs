use super::{report_error, ui};
use crate::core::{Feedback, FeedbackSink};
use tracing::info;

/// Sends one feedback message. Failures are reported, never retried.
pub async fn run(sink: &dyn FeedbackSink, feedback: &Feedback) -> anyhow::Result<()> {
    info!("Submitting feedback from {}", feedback.email);
    let pb = ui::new_spinner("Sending feedback...");
    let result = sink.submit(feedback).await;
    pb.finish_and_clear();

    match result {
        Ok(()) => println!(
            "{}",
            ui::style_text("Thanks! Your feedback was sent.", ui::StyleType::TotalValue)
        ),
        Err(e) => report_error(&e),
    }
    Ok(())
}
