use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::api::{GenerateRequest, GenerationBackend, TurnError};
use crate::core::app::{App, SessionContext, UiState};
use crate::core::routing::GenerationResult;
use crate::ui::theme::Theme;
use crate::utils::logging::TranscriptLog;

pub const TEST_BASE_URL: &str = "http://127.0.0.1:8000";

/// Backend that answers from a table keyed by prompt and records every
/// request it sees. Unscripted prompts fail with a transport error.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<HashMap<String, Result<GenerationResult, TurnError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_to(&self, prompt: &str, outcome: Result<GenerationResult, TurnError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.to_string(), outcome);
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn local_result(text: &str) -> GenerationResult {
        GenerationResult {
            text: text.to_string(),
            routed_to: Some("local".to_string()),
            cost: 0.00002,
            latency: 0.15,
            cached: false,
        }
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerationResult, TurnError> {
        let outcome = self.responses.lock().unwrap().get(&request.prompt).cloned();
        self.requests.lock().unwrap().push(request);
        outcome.unwrap_or_else(|| Err(TurnError::transport("no scripted response")))
    }
}

pub fn create_test_app() -> App {
    create_test_app_with_backend(Arc::new(ScriptedBackend::new()))
}

pub fn create_test_app_with_backend(backend: Arc<ScriptedBackend>) -> App {
    let session = SessionContext::new(
        backend,
        TEST_BASE_URL.to_string(),
        TranscriptLog::disabled(),
    );
    App::new(session, UiState::new(Theme::dark_default()))
}

/// A request as seen by [`spawn_http_stub`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }
}

/// Builds a complete HTTP/1.1 response carrying a JSON body.
pub fn json_response(status: u16, body: &str) -> String {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    };
    format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Serves `response` to exactly one connection and hands back the request
/// it received.
pub async fn spawn_http_stub(
    response: String,
) -> (String, JoinHandle<Result<CapturedRequest, String>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");

    let server_task = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
        let captured = read_http_request(&mut stream).await?;
        stream
            .write_all(response.as_bytes())
            .await
            .map_err(|err| err.to_string())?;
        stream.shutdown().await.map_err(|err| err.to_string())?;
        Ok(captured)
    });

    (format!("http://{addr}"), server_task)
}

/// A base URL nobody is listening on.
pub async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    drop(listener);
    format!("http://{addr}")
}

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text =
        std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let mut parts = line.splitn(2, ':');
        let Some(name) = parts.next() else {
            continue;
        };
        let value = parts.next().unwrap_or_default().trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}
