//! Language-server subprocess
//!
//! A reader thread parses one frame at a time from the server's stdout and
//! pushes it into a stream channel; a writer thread owns stdin and writes
//! pre-encoded frames in order.

use std::io::{BufReader, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Sender};

use serde_json::Value;

use super::{framing, LspError};
use crate::messages::{stream_channel, StreamChannel};

/// Handle to a running server
#[derive(Debug)]
pub struct LspProcess {
    child: Child,
    outbound: Sender<Vec<u8>>,
}

impl LspProcess {
    /// Launch the server and start its I/O threads
    pub fn spawn(
        command: &str,
        args: &[String],
        root: &Path,
    ) -> Result<(Self, StreamChannel<Value>), LspError> {
        let mut child = Command::new(command)
            .args(args)
            .current_dir(root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LspError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| LspError::Protocol("server stdout unavailable".into()))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| LspError::Protocol("server stdin unavailable".into()))?;

        let (inbound_tx, inbound) = stream_channel();
        let server = command.to_string();
        std::thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            loop {
                match framing::read_frame(&mut reader) {
                    Ok(Some(value)) => {
                        if inbound_tx.send(value).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::info!(%server, "Language server closed its output");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(%server, error = %e, "Error reading from language server");
                        break;
                    }
                }
            }
            // dropping the sender closes the stream
        });

        let (outbound, outbound_rx) = mpsc::channel::<Vec<u8>>();
        std::thread::spawn(move || {
            for frame in outbound_rx {
                if let Err(e) = stdin.write_all(&frame).and_then(|_| stdin.flush()) {
                    tracing::error!(error = %e, "Write to language server failed");
                    break;
                }
            }
        });

        tracing::info!(command, "Language server started");
        Ok((Self { child, outbound }, inbound))
    }

    /// Queue a frame for the writer thread. False once the writer is gone.
    pub fn send(&self, frame: Vec<u8>) -> bool {
        self.outbound.send(frame).is_ok()
    }

    /// Kill the process; the reader thread then sees EOF
    pub fn shutdown(&mut self) {
        if let Err(e) = self.child.kill() {
            tracing::debug!(error = %e, "Language server already exited");
        }
        let _ = self.child.wait();
    }
}

impl Drop for LspProcess {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_missing_binary_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let result = LspProcess::spawn("kestrel-no-such-server", &[], dir.path());
        assert!(matches!(result, Err(LspError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_reader_forwards_frames_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"jsonrpc":"2.0","method":"hello"}"#;
        let script = format!("printf 'Content-Length: {}\\r\\n\\r\\n{}'", body.len(), body);
        let (_process, inbound) =
            LspProcess::spawn("sh", &["-c".to_string(), script], dir.path()).unwrap();

        let rx = inbound.lock().unwrap();
        let first = rx.recv().unwrap();
        assert_eq!(first["method"], "hello");
        assert!(rx.recv().is_err());
    }
}
