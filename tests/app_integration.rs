use tickerdash::cli::analyze::AnalyzeOptions;
use tickerdash::core::Feedback;
use tickerdash::{AppCommand, run_command};

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// One trading day per calendar day starting 2020-01-02 14:30 UTC, closes
    /// rising by one per day from 100.
    pub fn chart_response(symbol: &str, days: usize) -> String {
        let first_ts: i64 = 1_577_975_400;
        let timestamps: Vec<String> = (0..days)
            .map(|i| (first_ts + i as i64 * 86_400).to_string())
            .collect();
        let closes: Vec<String> = (0..days).map(|i| format!("{}.0", 100 + i)).collect();
        format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "meta": {{"currency": "USD", "symbol": "{symbol}", "gmtoffset": 0}},
                        "timestamp": [{}],
                        "indicators": {{"quote": [{{"close": [{}]}}]}}
                    }}],
                    "error": null
                }}
            }}"#,
            timestamps.join(","),
            closes.join(",")
        )
    }

    pub async fn create_mock_server(symbol: &str, status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v8/finance/chart/{symbol}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn mount_fundamentals(mock_server: &MockServer, symbol: &str) {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {"shortName": "Apple Inc."},
                    "summaryDetail": {"trailingPE": {"raw": 28.4}, "dividendYield": {"raw": 0.0055}},
                    "financialData": {"returnOnEquity": {"raw": 1.47}}
                }],
                "error": null
            }
        }"#;
        Mock::given(method("GET"))
            .and(path(format!("/v10/finance/quoteSummary/{symbol}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(mock_server)
            .await;
    }

    pub fn write_config(extra: &str, base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
providers:
  yahoo:
    base_url: {base_url}
    timeout_secs: 5
defaults:
  ticker: "AAPL"
  start_date: "2020-01-01"
  end_date: "2022-06-01"
{extra}
"#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_full_analyze_flow_with_mock() {
    let mock_response = test_utils::chart_response("AAPL", 700);
    let mock_server = test_utils::create_mock_server("AAPL", 200, &mock_response).await;
    test_utils::mount_fundamentals(&mock_server, "AAPL").await;
    let config_file = test_utils::write_config("", &mock_server.uri());

    for json in [false, true] {
        let options = AnalyzeOptions {
            rows: 10,
            json,
            ..Default::default()
        };
        let result = run_command(
            AppCommand::Analyze(options),
            Some(config_file.path().to_str().unwrap()),
        )
        .await;
        assert!(
            result.is_ok(),
            "Analyze failed with: {:?}",
            result.err()
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_analyze_survives_missing_fundamentals() {
    // no quoteSummary mock: wiremock answers 404
    let mock_response = test_utils::chart_response("MSFT", 500);
    let mock_server = test_utils::create_mock_server("MSFT", 200, &mock_response).await;
    let config_file = test_utils::write_config("", &mock_server.uri());

    let options = AnalyzeOptions {
        ticker: Some("msft".to_string()),
        rows: 5,
        ..Default::default()
    };
    let result = run_command(
        AppCommand::Analyze(options),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Analyze failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_unknown_ticker_is_reported_not_fatal() {
    use tickerdash::cli::analyze::build_dashboard;
    use tickerdash::cli::error_text;
    use tickerdash::core::AnalysisError;
    use tickerdash::core::catalog::TickerCatalog;
    use tickerdash::core::config::DefaultsConfig;
    use tickerdash::providers::YahooFinanceProvider;

    let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
    let mock_server = test_utils::create_mock_server("NOPE", 404, body).await;

    let options = AnalyzeOptions {
        ticker: Some("NOPE".to_string()),
        ..Default::default()
    };

    let provider = YahooFinanceProvider::new(&mock_server.uri(), 5).unwrap();
    let inputs = options.resolve(&DefaultsConfig::default()).unwrap();
    let err = build_dashboard(&inputs, &provider, &provider, &TickerCatalog::default())
        .await
        .unwrap_err();
    assert_eq!(err, AnalysisError::EmptyData("NOPE".to_string()));
    assert!(error_text(&err).contains("No data found for NOPE"));

    // the command itself reports the error and exits normally
    let config_file = test_utils::write_config("", &mock_server.uri());
    let result = run_command(
        AppCommand::Analyze(options),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok());
}

#[test_log::test(tokio::test)]
async fn test_fundamentals_command() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_fundamentals(&mock_server, "AAPL").await;
    let config_file = test_utils::write_config("", &mock_server.uri());

    let result = run_command(
        AppCommand::Fundamentals(None),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Fundamentals failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_tickers_command_uses_configured_catalog() {
    let config_file = test_utils::write_config(
        "tickers:\n  ibm:\n    name: \"IBM\"\n",
        "http://127.0.0.1:1",
    );
    let result = run_command(
        AppCommand::Tickers,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok());
}

#[test_log::test(tokio::test)]
async fn test_feedback_flow() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/f/form"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let extra = format!("feedback:\n  endpoint: {}/f/form\n", mock_server.uri());
    let config_file = test_utils::write_config(&extra, "http://127.0.0.1:1");

    let feedback = Feedback {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        contact: String::new(),
        feedback: "Nice charts".to_string(),
    };
    let result = run_command(
        AppCommand::Feedback(feedback),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Feedback failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_feedback_without_endpoint_fails() {
    let config_file = test_utils::write_config("", "http://127.0.0.1:1");
    let feedback = Feedback {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        contact: String::new(),
        feedback: "Nice charts".to_string(),
    };
    let result = run_command(
        AppCommand::Feedback(feedback),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("No feedback endpoint configured"));
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("absent.yaml");

    let result = run_command(AppCommand::Tickers, Some(missing.to_str().unwrap())).await;
    assert!(result.is_err());
}
