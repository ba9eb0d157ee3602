//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! "Enable"
//! {"Select":{"x":2,"y":1}}
//! {"Select":"2 1"}
//! {"Press":{"hand":"right","x":0,"y":2}}
//! {"Click":"Left"}
//! "Relayout"
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// `$XDG_RUNTIME_DIR/gridpointer.sock`, or under `/tmp` without a runtime
/// dir.
pub fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("gridpointer.sock")
}

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl UnixSocketListener {
    /// Create a listener for `path`.  The socket is bound by
    /// [`run`](CommandSource::run), replacing any stale socket file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse one wire line.  Blank lines, malformed JSON and commands that
/// only the daemon itself may issue yield `None`.
fn parse_line(text: &str) -> Option<Command> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Command>(text) {
        Ok(Command::OverlayReady { .. }) => {
            warn!("ignoring client-sent OverlayReady");
            None
        }
        Ok(cmd) => Some(cmd),
        Err(e) => {
            error!("bad command {:?}: {}", text, e);
            None
        }
    }
}

/// Forward every command read from one client.  Returns `false` once the
/// sink has gone away.
fn forward_client<B: BufRead>(reader: B, sink: &mpsc::Sender<Command>) -> bool {
    for line in reader.lines() {
        let text = match line {
            Ok(text) => text,
            Err(e) => {
                error!("read error: {}", e);
                break;
            }
        };
        if let Some(cmd) = parse_line(&text) {
            debug!("received {:?}", cmd);
            if sink.send(cmd).is_err() {
                return false;
            }
        }
    }
    true
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the receiving end of `sink` is dropped.
    /// Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("accept error: {}", e);
                    continue;
                }
            };
            debug!("client connected");
            if !forward_client(BufReader::new(stream), &sink) {
                info!("command channel closed, shutting down listener");
                break;
            }
            debug!("client disconnected");
        }
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

//  Tests 
