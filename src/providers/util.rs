use crate::core::AnalysisError;
use chrono::{DateTime, NaiveDate, Utc};
use std::time::Duration;

const USER_AGENT: &str = concat!("tickerdash/", env!("CARGO_PKG_VERSION"));

/// Builds an HTTP client with the crate user agent and a bounded timeout.
///
/// Requests are made once; callers surface failures without retrying.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, AnalysisError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(AnalysisError::from)
}

/// Unix timestamp of midnight UTC on `date`.
pub fn date_to_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Calendar date (UTC) of a unix timestamp.
pub fn timestamp_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let ts = date_to_timestamp(date);
        assert_eq!(ts, 1718409600);
        assert_eq!(timestamp_to_date(ts), Some(date));
        // market open later in the day still maps to the same date
        assert_eq!(timestamp_to_date(ts + 14 * 3600 + 1800), Some(date));
    }

    #[test]
    fn test_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_timestamp(epoch), 0);
    }
}
