use std::time::Duration;

use futures::stream::{self, Stream};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::error::TransportError;
use crate::runner::{RequestPayload, RunEvent};

use super::response::RunReport;

/// Client for the compliance suite's test-execution endpoint.
#[derive(Debug, Clone)]
pub struct SuiteClient {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl SuiteClient {
    pub fn new(suite_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let url = reqwest::Url::parse(suite_url.trim()).map_err(|e| TransportError::InvalidUrl {
            url: suite_url.to_string(),
            message: e.to_string(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn send(&self, payload: &RequestPayload) -> Result<reqwest::Response, TransportError> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| TransportError::Request(format!("Failed to encode payload: {e}")))?;

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(response)
    }
}

enum Stage {
    Send(SuiteClient, RequestPayload),
    Receive {
        response: reqwest::Response,
        body: Vec<u8>,
        total: Option<u64>,
        last_percent: Option<u32>,
    },
    Done,
}

/// Posts the payload and streams the transfer: zero or more `Progress` events
/// followed by exactly one `Completed` or `Failed`. Progress is only reported
/// when the response carries a content length.
pub fn dispatch(client: SuiteClient, payload: RequestPayload) -> impl Stream<Item = RunEvent> + Send + 'static {
    stream::unfold(Stage::Send(client, payload), step)
}

async fn step(stage: Stage) -> Option<(RunEvent, Stage)> {
    let (mut response, mut body, total, mut last_percent) = match stage {
        Stage::Done => return None,
        Stage::Send(client, payload) => {
            log::info!("dispatching run to {}", client.url());
            match client.send(&payload).await {
                Ok(response) => {
                    let total = response.content_length().filter(|total| *total > 0);
                    (response, Vec::new(), total, None)
                }
                Err(err) => return Some((failed(err), Stage::Done)),
            }
        }
        Stage::Receive {
            response,
            body,
            total,
            last_percent,
        } => (response, body, total, last_percent),
    };

    loop {
        let next_chunk = response.chunk().await;
        match next_chunk {
            Ok(Some(chunk)) => {
                body.extend_from_slice(&chunk);
                let Some(total) = total else { continue };

                let percent = progress_percent(body.len() as u64, total);
                if last_percent != Some(percent) {
                    last_percent = Some(percent);
                    log::debug!("run transfer at {percent}%");
                    let next = Stage::Receive {
                        response,
                        body,
                        total: Some(total),
                        last_percent,
                    };
                    return Some((RunEvent::Progress { percent }, next));
                }
            }
            Ok(None) => return Some((finish(&body), Stage::Done)),
            Err(err) => return Some((failed(TransportError::Body(err.to_string())), Stage::Done)),
        }
    }
}

fn finish(body: &[u8]) -> RunEvent {
    match serde_json::from_slice::<RunReport>(body) {
        Ok(report) => {
            log::info!(
                "run completed with {} result(s)",
                report.results.as_ref().map_or(0, Vec::len)
            );
            RunEvent::Completed(report)
        }
        Err(err) => failed(TransportError::Decode(err.to_string())),
    }
}

fn failed(err: TransportError) -> RunEvent {
    log::error!("run failed: {err}");
    RunEvent::Failed {
        reason: err.user_message().to_string(),
    }
}

/// `floor(received * 100 / total)`, never above 100.
pub fn progress_percent(received: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let percent = received.saturating_mul(100) / total;
    percent.min(100) as u32
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::auth::AuthForm;
    use crate::catalog::CATALOG;
    use crate::runner::build_payload;
    use crate::selection::SelectionTree;

    /// Accepts one connection, captures the request and answers with `response`.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/ComplianceTestSuite", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        (url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let length = text[..split]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= split + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).to_string()
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn payload() -> RequestPayload {
        let tree = SelectionTree::from_catalog(CATALOG)
            .toggle_sub_test(4, 2)
            .unwrap();
        let form = AuthForm {
            endpoint: "https://localhost:9443/scim2".into(),
            user_name: "admin".into(),
            password: "admin".into(),
            ..AuthForm::default()
        };
        build_payload(&tree, &form)
    }

    #[test]
    fn percent_is_floored_and_capped() {
        assert_eq!(progress_percent(0, 10), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(10, 10), 100);
        assert_eq!(progress_percent(12, 10), 100);
        assert_eq!(progress_percent(5, 0), 0);
    }

    #[test]
    fn invalid_suite_url_is_rejected() {
        assert!(matches!(
            SuiteClient::new("not a url", None),
            Err(TransportError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn completed_run_streams_progress_then_report() {
        let body = r#"{"statistics":{"success":1,"failed":0},"results":[{"name":"POST /Users","status":1}]}"#;
        let (url, server) = serve_once(http_response("200 OK", body)).await;

        let client = SuiteClient::new(&url, None).unwrap();
        let events: Vec<RunEvent> = dispatch(client, payload()).collect().await;
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /ComplianceTestSuite"));
        assert!(request.contains("\"postUser\":true"));
        assert!(request.contains("\"getUsers\":false"));

        let (last, progress) = events.split_last().unwrap();
        assert!(progress.iter().all(|e| matches!(e, RunEvent::Progress { .. })));
        assert!(matches!(progress.last(), Some(RunEvent::Progress { percent: 100 })));

        let RunEvent::Completed(report) = last else {
            panic!("expected completion, got {last:?}");
        };
        assert_eq!(report.results.as_ref().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn unknown_length_skips_progress() {
        let body = r#"{"statistics":{"success":1},"results":[]}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{body}"
        );
        let (url, server) = serve_once(response).await;

        let client = SuiteClient::new(&url, None).unwrap();
        let events: Vec<RunEvent> = dispatch(client, payload()).collect().await;
        server.await.unwrap();

        assert_eq!(events.len(), 1);
        let RunEvent::Completed(report) = &events[0] else {
            panic!("expected completion, got {events:?}");
        };
        assert_eq!(report.results.as_ref().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn rejected_credentials_fail_with_generic_reason() {
        let (url, server) = serve_once(http_response("401 Unauthorized", "{}")).await;

        let client = SuiteClient::new(&url, None).unwrap();
        let events: Vec<RunEvent> = dispatch(client, payload()).collect().await;
        server.await.unwrap();

        assert_eq!(
            events,
            vec![RunEvent::Failed {
                reason: TransportError::Status(401).user_message().to_string()
            }]
        );
    }

    #[tokio::test]
    async fn undecodable_body_fails() {
        let (url, server) = serve_once(http_response("200 OK", "<html>")).await;

        let client = SuiteClient::new(&url, None).unwrap();
        let events: Vec<RunEvent> = dispatch(client, payload()).collect().await;
        server.await.unwrap();

        assert!(matches!(events.last(), Some(RunEvent::Failed { .. })));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[tokio::test]
    async fn unreachable_suite_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let client = SuiteClient::new(&url, Some(Duration::from_secs(5))).unwrap();
        let events: Vec<RunEvent> = dispatch(client, payload()).collect().await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RunEvent::Failed { .. }));
    }
}
