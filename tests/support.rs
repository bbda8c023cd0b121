use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// How the mock endpoint answers every request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with one SSE line per token followed by `[DONE]`.
    Stream(Vec<&'static str>),
    /// Bare status line with an empty body.
    Status(&'static str),
}

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    requests: Arc<AtomicUsize>,
}

impl ServerHandle {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a streaming completions endpoint for tests.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_completion_server(reply: Reply) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let reply = reply.clone();
                    let counter = Arc::clone(&counter);
                    thread::spawn(move || handle_client(stream, &reply, &counter));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            requests,
        },
    ))
}

pub fn spawn_completion_server_or_skip(
    reply: Reply,
) -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_completion_server(reply) {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn handle_client(stream: TcpStream, reply: &Reply, counter: &AtomicUsize) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    if read_request(read_half).is_err() {
        return;
    }
    counter.fetch_add(1, Ordering::SeqCst);

    let mut stream = stream;
    let written = match reply {
        Reply::Stream(tokens) => write_stream(&mut stream, tokens),
        Reply::Status(status_line) => stream.write_all(
            format!(
                "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status_line
            )
            .as_bytes(),
        ),
    };
    if written.is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn read_request(stream: TcpStream) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;
    Ok(())
}

fn write_stream(stream: &mut TcpStream, tokens: &[&str]) -> std::io::Result<()> {
    stream.write_all(
        b"HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n",
    )?;
    stream.flush()?;
    for token in tokens.iter().copied().chain(std::iter::once("[DONE]")) {
        thread::sleep(Duration::from_millis(2));
        write!(stream, "data: {}\n\n", token)?;
        stream.flush()?;
    }
    Ok(())
}

/// Run the `llmsweep` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_llmsweep<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = llmsweep_bin()?;
    Command::new(bin)
        .args(args)
        .env("LLMSWEEP_LOG", "error")
        .output()
        .map_err(|err| format!("run llmsweep failed: {}", err))
}

fn llmsweep_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_llmsweep").map_or_else(
        || Err("CARGO_BIN_EXE_llmsweep missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
