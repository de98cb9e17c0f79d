pub mod feedback;
pub mod util;
pub mod yahoo_finance;

pub use feedback::FormFeedbackSink;
pub use yahoo_finance::YahooFinanceProvider;
