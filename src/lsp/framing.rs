//! `Content-Length` framing
//!
//! ```text
//! Content-Length: 52\r\n
//! \r\n
//! {"jsonrpc":"2.0","method":"initialized","params":{}}
//! ```

use std::io::{BufRead, Read};

use serde_json::Value;

use super::LspError;

/// Largest body accepted from a server
pub const MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// Serialize a message with its header
pub fn encode(message: &Value) -> Vec<u8> {
    let body = message.to_string();
    let mut frame = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    frame.extend_from_slice(body.as_bytes());
    frame
}

/// Read exactly one framed message.
///
/// Returns `Ok(None)` on a clean EOF between messages. Headers other than
/// `Content-Length` are ignored.
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Option<Value>, LspError> {
    let mut content_length: Option<usize> = None;
    let mut line = String::new();
    let mut saw_header = false;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            if saw_header {
                return Err(LspError::Protocol("eof inside header".into()));
            }
            return Ok(None);
        }

        let header = line.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            if saw_header {
                break;
            }
            // tolerate stray blank lines between frames
            continue;
        }
        saw_header = true;

        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = Some(value.trim().parse().map_err(|_| {
                    LspError::Protocol(format!("invalid Content-Length: {}", value.trim()))
                })?);
            }
        }
    }

    let length =
        content_length.ok_or_else(|| LspError::Protocol("missing Content-Length".into()))?;
    if length > MAX_FRAME_BYTES {
        return Err(LspError::Protocol(format!(
            "Content-Length {length} exceeds {MAX_FRAME_BYTES} bytes"
        )));
    }
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body)?;
    Ok(Some(serde_json::from_slice(&body)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_encode_counts_bytes_not_chars() {
        let frame = encode(&json!({"text": "日本"}));
        let text = String::from_utf8(frame).unwrap();
        let (header, body) = text.split_once("\r\n\r\n").unwrap();
        assert_eq!(header, format!("Content-Length: {}", body.len()));
        assert_eq!(body.len(), 17);
    }

    #[test]
    fn test_read_two_frames_back_to_back() {
        let mut bytes = encode(&json!({"id": 1, "result": null}));
        bytes.extend(encode(&json!({"method": "x"})));
        let mut reader = Cursor::new(bytes);

        assert_eq!(read_frame(&mut reader).unwrap(), Some(json!({"id": 1, "result": null})));
        assert_eq!(read_frame(&mut reader).unwrap(), Some(json!({"method": "x"})));
        assert!(read_frame(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_read_ignores_extra_headers_and_case() {
        let body = r#"{"ok":true}"#;
        let raw = format!(
            "content-length: {}\r\nContent-Type: application/vscode-jsonrpc; charset=utf-8\r\n\r\n{}",
            body.len(),
            body
        );
        let value = read_frame(&mut Cursor::new(raw.into_bytes())).unwrap();
        assert_eq!(value, Some(json!({"ok": true})));
    }

    #[test]
    fn test_missing_length_is_an_error() {
        let raw = b"Content-Type: x\r\n\r\n{}".to_vec();
        assert!(matches!(
            read_frame(&mut Cursor::new(raw)),
            Err(LspError::Protocol(_))
        ));
    }

    #[test]
    fn test_oversized_length_is_rejected_before_reading() {
        let raw = format!("Content-Length: {}\r\n\r\n{{}}", u64::MAX).into_bytes();
        assert!(matches!(
            read_frame(&mut Cursor::new(raw)),
            Err(LspError::Protocol(_))
        ));
        let raw = format!("Content-Length: {}\r\n\r\n{{}}", MAX_FRAME_BYTES + 1).into_bytes();
        assert!(matches!(
            read_frame(&mut Cursor::new(raw)),
            Err(LspError::Protocol(_))
        ));
    }

    #[test]
    fn test_truncated_body_is_an_error() {
        let raw = b"Content-Length: 10\r\n\r\n{}".to_vec();
        assert!(matches!(read_frame(&mut Cursor::new(raw)), Err(LspError::Io(_))));
    }
}
