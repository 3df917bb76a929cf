use crate::error::BridgeError;
use serde_json::{json, Value};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
pub const HOST_STDERR_TAG: &str = "[host]";

/// Base url the host resolves POST paths against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn for_resource(resource: &str) -> Self {
        Self::new(format!("https://{resource}"))
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostRequest {
    pub url: String,
    pub path: String,
    pub body: Value,
}

/// Outbound half of the host boundary.
pub trait HostBridge {
    /// Hands the request to the host without waiting for its answer and
    /// returns the id the host will echo back in its response.
    fn post(&mut self, request: &PostRequest) -> Result<String, BridgeError>;
}

/// Frames POSTs as JSON lines on the host's stdin.
pub struct StdioBridge<W: Write> {
    writer: W,
    next_id: u64,
}

impl<W: Write> StdioBridge<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, next_id: 0 }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn json_line(value: Value) -> String {
    value.to_string() + "\n"
}

impl<W: Write> HostBridge for StdioBridge<W> {
    fn post(&mut self, request: &PostRequest) -> Result<String, BridgeError> {
        self.next_id += 1;
        let id = self.next_id.to_string();
        let msg = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "nui.post",
            "params": {
                "url": request.url,
                "path": request.path,
                "content_type": JSON_CONTENT_TYPE,
                "body": request.body,
            }
        });
        let write = self
            .writer
            .write_all(json_line(msg).as_bytes())
            .and_then(|()| self.writer.flush());
        match write {
            Ok(()) => Ok(id),
            Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Err(BridgeError::Closed),
            Err(error) => Err(BridgeError::Io(error)),
        }
    }
}

fn spawn_reader<T: io::Read + Send + 'static>(
    reader: T,
    prefix: Option<&'static str>,
    tx: mpsc::Sender<String>,
) {
    thread::spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let trimmed = line.trim_end();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let output = match prefix {
                        Some(tag) if !trimmed.starts_with(tag) => format!("{tag} {trimmed}"),
                        _ => trimmed.to_string(),
                    };
                    if tx.send(output).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
}

pub struct HostProcess {
    pub child: Child,
    pub stdin: BufWriter<ChildStdin>,
    pub lines: Receiver<String>,
}

pub fn spawn_host(command: &str, args: &[String]) -> io::Result<HostProcess> {
    let mut child = Command::new(command)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let missing = |stream: &str| io::Error::other(format!("host {stream} not captured"));
    let stdin = BufWriter::new(child.stdin.take().ok_or_else(|| missing("stdin"))?);
    let stdout = child.stdout.take().ok_or_else(|| missing("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| missing("stderr"))?;
    let (tx, rx) = mpsc::channel::<String>();
    spawn_reader(stdout, None, tx.clone());
    spawn_reader(stderr, Some(HOST_STDERR_TAG), tx);

    Ok(HostProcess {
        child,
        stdin,
        lines: rx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoint_joins_paths() {
        let endpoint = Endpoint::for_resource("simple-dialogs");
        assert_eq!(
            endpoint.url("/selectOption"),
            "https://simple-dialogs/selectOption"
        );
        let endpoint = Endpoint::new("http://127.0.0.1:3000/");
        assert_eq!(endpoint.url("selectOption"), "http://127.0.0.1:3000/selectOption");
    }

    #[test]
    fn stdio_bridge_writes_one_framed_line_per_post() {
        let mut bridge = StdioBridge::new(Vec::new());
        let request = PostRequest {
            url: "https://simple-dialogs/selectOption".to_string(),
            path: "/selectOption".to_string(),
            body: json!({ "index": 1, "dialogId": "d1" }),
        };
        assert_eq!(bridge.post(&request).unwrap(), "1");
        assert_eq!(bridge.post(&request).unwrap(), "2");

        let written = String::from_utf8(bridge.into_inner()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(
            first,
            json!({
                "jsonrpc": "2.0",
                "id": "1",
                "method": "nui.post",
                "params": {
                    "url": "https://simple-dialogs/selectOption",
                    "path": "/selectOption",
                    "content_type": JSON_CONTENT_TYPE,
                    "body": { "index": 1, "dialogId": "d1" }
                }
            })
        );
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stdio_bridge_maps_broken_pipe_to_closed() {
        let mut bridge = StdioBridge::new(ClosedPipe);
        let request = PostRequest {
            url: String::new(),
            path: "/selectOption".to_string(),
            body: Value::Null,
        };
        assert!(matches!(bridge.post(&request), Err(BridgeError::Closed)));
    }
}
