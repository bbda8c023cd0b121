//! Minimal streaming HTTP/1.1 server for tests.
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub(crate) struct MockStream {
    pub(crate) status_line: &'static str,
    pub(crate) lines: Vec<String>,
    pub(crate) head_delay: Duration,
    pub(crate) line_delay: Duration,
}

impl MockStream {
    pub(crate) fn sse(tokens: usize) -> Self {
        let mut lines: Vec<String> = (0..tokens)
            .map(|idx| format!("data: {{\"choices\":[{{\"text\":\"tok{}\"}}]}}\n\n", idx))
            .collect();
        lines.push("data: [DONE]\n\n".to_owned());
        Self {
            status_line: "HTTP/1.1 200 OK",
            lines,
            head_delay: Duration::ZERO,
            line_delay: Duration::from_millis(2),
        }
    }

    pub(crate) fn status(status_line: &'static str) -> Self {
        Self {
            status_line,
            lines: vec!["{\"error\":\"nope\"}".to_owned()],
            head_delay: Duration::ZERO,
            line_delay: Duration::ZERO,
        }
    }
}

pub(crate) struct MockServer {
    pub(crate) base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub(crate) async fn spawn_stream_server(response: MockStream) -> Result<MockServer, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;

    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let response = response.clone();
            tokio::spawn(async move {
                drop(handle_client(stream, &response).await);
            });
        }
    });

    Ok(MockServer {
        base_url: format!("http://{}", addr),
        handle,
    })
}

/// Returns a URL whose port has nothing listening.
pub(crate) async fn closed_port_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("addr failed: {}", err))?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

async fn handle_client(mut stream: TcpStream, response: &MockStream) -> std::io::Result<()> {
    read_request(&mut stream).await?;
    tokio::time::sleep(response.head_delay).await;
    let head = format!(
        "{}\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n",
        response.status_line
    );
    stream.write_all(head.as_bytes()).await?;
    stream.flush().await?;
    for line in &response.lines {
        tokio::time::sleep(response.line_delay).await;
        stream.write_all(line.as_bytes()).await?;
        stream.flush().await?;
    }
    stream.shutdown().await
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(chunk.get(..read).unwrap_or_default());
        if let Some(header_end) = find_header_end(&buffer) {
            let expected = content_length(buffer.get(..header_end).unwrap_or_default());
            let body_len = buffer.len().saturating_sub(header_end);
            if body_len >= expected {
                return Ok(());
            }
        }
    }
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos.saturating_add(4))
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}
