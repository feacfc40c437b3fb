//! Elasticsearch REST plugin
//!
//! Each record is POSTed as a JSON document to
//! `<host>:<port>/<index>/<doc_type>` from the plugin's worker thread.

use super::worker::Worker;
use crate::core::{
    default_reporter, with_stack_trace, Completer, Completion, ErrorReporter, LogLevel,
    LogRecord, LoggerError, Outcome, Plugin, Result, Timestamp,
};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Options for [`ElasticSearchPlugin`]
///
/// `index` has no default and must be non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ElasticSearchOptions {
    pub index: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_doc_type", alias = "type")]
    pub doc_type: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_host() -> String {
    "http://localhost".to_string()
}

fn default_port() -> u16 {
    9200
}

fn default_doc_type() -> String {
    "logs".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl ElasticSearchOptions {
    /// Options for `index` with every other field at its default
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            host: default_host(),
            port: default_port(),
            doc_type: default_doc_type(),
            timeout_ms: default_timeout_ms(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(LoggerError::config(
                "ElasticSearchPlugin",
                "The 'index' option is required",
            ));
        }
        if self.host.trim().is_empty() {
            return Err(LoggerError::config(
                "ElasticSearchPlugin",
                "The 'host' option must not be empty",
            ));
        }
        if self.doc_type.trim().is_empty() {
            return Err(LoggerError::config(
                "ElasticSearchPlugin",
                "The 'doc_type' option must not be empty",
            ));
        }
        Ok(())
    }
}

struct IndexJob {
    record: LogRecord,
    completer: Completer,
}

struct IndexSink {
    client: Client,
    url: String,
    reporter: Arc<dyn ErrorReporter>,
}

impl IndexSink {
    fn post(&self, record: &LogRecord) -> Result<()> {
        let response = self.client.post(&self.url).json(record).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let raw = response.text().unwrap_or_default();
        let body = serde_json::from_str::<serde_json::Value>(&raw)
            .unwrap_or_else(|_| serde_json::json!({ "detail": raw }));
        Err(LoggerError::index_rejected(status.as_u16(), body.to_string()))
    }

    fn run(&self, job: IndexJob) {
        let outcome = match self.post(&job.record) {
            Ok(()) => Outcome::Delivered,
            Err(e) => {
                self.handle_error(&e);
                Outcome::Failed
            }
        };
        job.completer.complete(outcome);
    }

    fn handle_error(&self, error: &LoggerError) {
        self.reporter.report("elasticsearch", error);
    }
}

/// Indexes every record into Elasticsearch over its REST API.
///
/// Trace records carry the caller's stack trace appended to the message.
///
/// Posts are sent one at a time from an unbounded queue. Against a slow or
/// unreachable index every post can take up to `timeout_ms`, so the queue
/// (and memory) grows with the call rate until the index catches up. Nothing
/// is dropped or retried; callers that need back-pressure can wait on the
/// returned completions.
///
/// # Example
///
/// ```no_run
/// use plugin_logger::plugins::{ElasticSearchOptions, ElasticSearchPlugin};
/// use plugin_logger::prelude::*;
///
/// let plugin = ElasticSearchPlugin::new(ElasticSearchOptions::new("app-logs"))?;
/// let logger = Logger::builder().plugin(plugin).build()?;
/// logger.error(["payment", "declined"]);
/// # Ok::<(), LoggerError>(())
/// ```
pub struct ElasticSearchPlugin {
    sink: Arc<IndexSink>,
    worker: Worker<IndexJob>,
}

impl ElasticSearchPlugin {
    /// # Errors
    ///
    /// Returns a configuration error for invalid options, or an error if
    /// the HTTP client or the worker thread cannot be created.
    pub fn new(options: ElasticSearchOptions) -> Result<Self> {
        Self::with_reporter(options, default_reporter())
    }

    pub fn with_reporter(
        options: ElasticSearchOptions,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self> {
        options.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_millis(options.timeout_ms))
            .build()?;
        let url = format!(
            "{}:{}/{}/{}",
            options.host.trim_end_matches('/'),
            options.port,
            options.index,
            options.doc_type
        );

        let sink = Arc::new(IndexSink {
            client,
            url,
            reporter,
        });

        let worker_sink = Arc::clone(&sink);
        let worker = Worker::spawn("elasticsearch", move |job: IndexJob| worker_sink.run(job))?;

        Ok(Self { sink, worker })
    }

    /// Endpoint documents are posted to
    pub fn url(&self) -> &str {
        &self.sink.url
    }

    fn enqueue(&self, record: LogRecord) -> Completion {
        let (completer, completion) = Completion::channel();
        match self.worker.submit(IndexJob { record, completer }) {
            Ok(()) => completion,
            Err(job) => {
                self.handle_error(&LoggerError::worker_stopped(self.name()));
                job.completer.complete(Outcome::Failed);
                completion
            }
        }
    }
}

impl Plugin for ElasticSearchPlugin {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    fn emit(&self, level: LogLevel, message: &str, timestamp: Timestamp) -> Completion {
        self.enqueue(LogRecord::new(level, message, timestamp))
    }

    fn handle_error(&self, error: &LoggerError) {
        self.sink.handle_error(error);
    }

    fn trace(&self, message: &str, timestamp: Timestamp) -> Completion {
        self.enqueue(LogRecord::new(
            LogLevel::Trace,
            with_stack_trace(message),
            timestamp,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryReporter;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options_for(server: &MockServer) -> ElasticSearchOptions {
        let address = server.address();
        ElasticSearchOptions {
            host: format!("http://{}", address.ip()),
            port: address.port(),
            timeout_ms: 2000,
            ..ElasticSearchOptions::new("app-logs")
        }
    }

    fn fixed_time() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().unwrap()
    }

    /// Build the plugin, send one record and wait for it, all off the async
    /// executor since the plugin's client blocks
    async fn send_one<F>(
        options: ElasticSearchOptions,
        reporter: Arc<MemoryReporter>,
        call: F,
    ) -> Outcome
    where
        F: FnOnce(&ElasticSearchPlugin) -> Completion + Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let plugin = ElasticSearchPlugin::with_reporter(options, reporter)
                .expect("Failed to create plugin");
            call(&plugin).wait()
        })
        .await
        .expect("Blocking task panicked")
    }

    async fn mount(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/app-logs/logs"))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    async fn posted_document(server: &MockServer) -> serde_json::Value {
        let requests = server
            .received_requests()
            .await
            .expect("Request recording is enabled");
        assert_eq!(requests.len(), 1);
        serde_json::from_slice(&requests[0].body).expect("Body is JSON")
    }

    #[test]
    fn test_missing_index_rejected() {
        let err = ElasticSearchPlugin::new(ElasticSearchOptions::new(" ")).err().unwrap();
        assert!(err.is_config());

        let parsed: std::result::Result<ElasticSearchOptions, _> =
            serde_json::from_str(r#"{"host": "http://es"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_options_defaults_and_url() {
        let options: ElasticSearchOptions =
            serde_json::from_str(r#"{"index": "audit", "type": "events"}"#).unwrap();
        assert_eq!(options.host, "http://localhost");
        assert_eq!(options.port, 9200);
        assert_eq!(options.doc_type, "events");

        let plugin = ElasticSearchPlugin::new(options).unwrap();
        assert_eq!(plugin.url(), "http://localhost:9200/audit/events");
    }

    #[tokio::test]
    async fn test_posts_record_as_json() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(201).set_body_json(json!({ "result": "created" })),
        )
        .await;
        let reporter = MemoryReporter::shared();

        let outcome = send_one(options_for(&server), reporter.clone(), |plugin| {
            plugin.warn("disk almost full", fixed_time())
        })
        .await;
        assert_eq!(outcome, Outcome::Delivered);

        let doc = posted_document(&server).await;
        assert_eq!(doc["level"], "WARN");
        assert_eq!(doc["message"], "disk almost full");
        assert_eq!(doc["timestamp"], "2025-01-08T10:30:45Z");
        assert!(reporter.is_empty());
    }

    #[tokio::test]
    async fn test_trace_carries_stack_trace() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

        let outcome = send_one(options_for(&server), MemoryReporter::shared(), |plugin| {
            plugin.trace("entering", fixed_time())
        })
        .await;
        assert_eq!(outcome, Outcome::Delivered);

        let doc = posted_document(&server).await;
        assert_eq!(doc["level"], "TRACE");
        let message = doc["message"].as_str().unwrap();
        assert!(message.starts_with("entering\n"));
        assert!(message.len() > "entering\n".len());
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(400).set_body_json(json!({ "error": "mapping" })),
        )
        .await;
        let reporter = MemoryReporter::shared();

        let outcome = send_one(options_for(&server), reporter.clone(), |plugin| {
            plugin.error("rejected", fixed_time())
        })
        .await;
        assert_eq!(outcome, Outcome::Failed);

        let entries = reporter.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("elasticsearch:"));
        assert!(entries[0].contains("400"));
        assert!(entries[0].contains(r#"{"error":"mapping"}"#));
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_wrapped() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(503).set_body_string("overloaded")).await;
        let reporter = MemoryReporter::shared();

        let outcome = send_one(options_for(&server), reporter.clone(), |plugin| {
            plugin.info("m", fixed_time())
        })
        .await;
        assert_eq!(outcome, Outcome::Failed);

        let entries = reporter.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("503"));
        assert!(entries[0].contains(r#"{"detail":"overloaded"}"#));
    }

    #[test]
    fn test_connection_failure_is_reported() {
        // Reserve a port, then close it so nothing is listening
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let options = ElasticSearchOptions {
            host: "http://127.0.0.1".to_string(),
            port,
            timeout_ms: 2000,
            ..ElasticSearchOptions::new("app-logs")
        };
        let reporter = MemoryReporter::shared();
        let plugin = ElasticSearchPlugin::with_reporter(options, reporter.clone()).unwrap();

        assert_eq!(plugin.fatal("unreachable", fixed_time()).wait(), Outcome::Failed);
        let entries = reporter.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("HTTP error"));
    }
}
