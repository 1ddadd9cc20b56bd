//! TCP client for an external engine that owns the agent's camera.
//!
//! Wire format: one JSON object per line in each direction. Every request
//! carries a sequence number that the engine echoes back; answers for older
//! sequence numbers (late replies to a timed-out request) are skipped.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use boxnav_core::{Action, ActionSink, BridgeError, PositionSource, Pt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_ENGINE_HOST: &str = "127.0.0.1";
pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub host: String,
    pub port: u16,
    /// Per round trip (connect, write and read each get this long).
    pub timeout_ms: u64,
    /// Extra attempts after a retryable failure of an idempotent request.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl EngineConfig {
    pub fn new(port: u16) -> Self {
        Self {
            host: DEFAULT_ENGINE_HOST.to_string(),
            port,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request {
    GetPosition { seq: u64 },
    Apply { seq: u64, action: Action },
}

impl Request {
    fn name(&self) -> &'static str {
        match self {
            Request::GetPosition { .. } => "get_position",
            Request::Apply { .. } => "apply",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    seq: u64,
    ok: bool,
    #[serde(default)]
    position: Option<Pt>,
    #[serde(default)]
    error: Option<String>,
}

pub struct TcpEngineBridge {
    cfg: EngineConfig,
    writer: TcpStream,
    reader: BufReader<TcpStream>,
    /// Bytes of a reply line cut short by a read timeout. Kept so that the
    /// rest of the line, arriving later, is not parsed as a reply of its own.
    partial: Vec<u8>,
    next_seq: u64,
}

impl TcpEngineBridge {
    pub fn connect(cfg: EngineConfig) -> Result<Self, BridgeError> {
        let addr = resolve(&cfg.host, cfg.port)?;
        let stream = TcpStream::connect_timeout(&addr, cfg.timeout()).map_err(|e| match e.kind() {
            io::ErrorKind::TimedOut => BridgeError::Timeout { op: "connect", after_ms: cfg.timeout_ms },
            _ => BridgeError::Disconnected(format!("connecting to {addr}: {e}")),
        })?;
        stream.set_read_timeout(Some(cfg.timeout()))?;
        stream.set_write_timeout(Some(cfg.timeout()))?;
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        debug!(%addr, "connected to engine");
        Ok(Self { cfg, writer: stream, reader, partial: Vec::new(), next_seq: 1 })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Only idempotent requests are retried; a timed-out `apply` may already
    /// have moved the camera, so it is reported instead of being sent twice.
    fn call<F>(&mut self, idempotent: bool, make: F) -> Result<Response, BridgeError>
    where
        F: Fn(u64) -> Request,
    {
        let mut attempt = 0u32;
        loop {
            let req = make(self.next_seq);
            self.next_seq += 1;
            match self.round_trip(&req) {
                Ok(resp) => return Ok(resp),
                Err(e) if idempotent && e.is_retryable() && attempt < self.cfg.max_retries => {
                    attempt += 1;
                    warn!(op = req.name(), attempt, error = %e, "retrying engine request");
                    thread::sleep(Duration::from_millis(self.cfg.retry_backoff_ms));
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn round_trip(&mut self, req: &Request) -> Result<Response, BridgeError> {
        let seq = match req {
            Request::GetPosition { seq } | Request::Apply { seq, .. } => *seq,
        };
        let mut line = serde_json::to_vec(req).map_err(|e| BridgeError::Protocol(e.to_string()))?;
        line.push(b'\n');
        self.writer.write_all(&line).map_err(|e| self.classify(req.name(), e))?;
        self.writer.flush().map_err(|e| self.classify(req.name(), e))?;

        loop {
            let line = self.read_reply_line(req.name())?;
            let resp: Response = serde_json::from_str(line.trim_end())
                .map_err(|e| BridgeError::Protocol(format!("bad response {:?}: {e}", line.trim_end())))?;
            if resp.seq < seq {
                debug!(stale = resp.seq, expected = seq, "discarding late engine reply");
                continue;
            }
            if resp.seq > seq {
                return Err(BridgeError::Protocol(format!("reply for future request {} (expected {seq})", resp.seq)));
            }
            if !resp.ok {
                return Err(BridgeError::Protocol(resp.error.unwrap_or_else(|| "engine refused request".into())));
            }
            return Ok(resp);
        }
    }

    /// One complete `\n`-terminated line. On a timeout the bytes read so far
    /// stay in `partial` and the next call continues the same line.
    fn read_reply_line(&mut self, op: &'static str) -> Result<String, BridgeError> {
        let n = self.reader.read_until(b'\n', &mut self.partial).map_err(|e| self.classify(op, e))?;
        if n == 0 || self.partial.last() != Some(&b'\n') {
            return Err(BridgeError::Disconnected("engine closed the connection".into()));
        }
        let bytes = std::mem::take(&mut self.partial);
        String::from_utf8(bytes).map_err(|e| BridgeError::Protocol(format!("reply is not UTF-8: {e}")))
    }

    fn classify(&self, op: &'static str, e: io::Error) -> BridgeError {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => BridgeError::Timeout { op, after_ms: self.cfg.timeout_ms },
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted | io::ErrorKind::BrokenPipe => {
                BridgeError::Disconnected(e.to_string())
            }
            _ => BridgeError::Io(e),
        }
    }
}

impl PositionSource for TcpEngineBridge {
    fn position(&mut self) -> Result<Pt, BridgeError> {
        let resp = self.call(true, |seq| Request::GetPosition { seq })?;
        resp.position.ok_or_else(|| BridgeError::Protocol("position reply without position".into()))
    }
}

impl ActionSink for TcpEngineBridge {
    fn apply(&mut self, action: Action) -> Result<(), BridgeError> {
        self.call(false, |seq| Request::Apply { seq, action })?;
        Ok(())
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr, BridgeError> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| BridgeError::Disconnected(format!("{host}:{port} did not resolve")))
}
