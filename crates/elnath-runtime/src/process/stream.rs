//! Async stream line readers (non-UTF8-safe).
//!
//! Server binaries can emit non-UTF8 bytes (legacy code pages in chat logs,
//! map names). `BufReader::lines()` would end the reader task on the first
//! invalid sequence, so lines are read as bytes and decoded lossily.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::publisher::RolePublisher;

/// Forward every line of `stream` to the role's event stream until EOF.
pub fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    publisher: RolePublisher,
    is_stderr: bool,
) -> JoinHandle<()> {
    let stream_type = if is_stderr { "stderr" } else { "stdout" };
    let role = publisher.role();

    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    let line = decode_line(&buf);
                    trace!(%role, %stream_type, "{}", line);
                    publisher.line(line, is_stderr);
                }
                Err(e) => {
                    debug!(%role, %stream_type, error = %e, "stream reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(%role, %stream_type, "stream reader task exiting");
    })
}

/// Strip the line terminator and decode lossily.
fn decode_line(buf: &[u8]) -> String {
    let mut end = buf.len();
    if end > 0 && buf[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && buf[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::SupervisorEventBroadcaster;
    use elnath_core::{OutputSource, Role, SupervisorEvent};
    use std::sync::Arc;

    #[test]
    fn decode_strips_crlf() {
        assert_eq!(decode_line(b"ready\r\n"), "ready");
        assert_eq!(decode_line(b"ready\n"), "ready");
        assert_eq!(decode_line(b"tail"), "tail");
        assert_eq!(decode_line(b"\n"), "");
    }

    #[test]
    fn decode_replaces_invalid_utf8() {
        assert_eq!(decode_line(b"caf\xe9\n"), "caf\u{fffd}");
    }

    #[tokio::test]
    async fn reader_forwards_lines_in_order() {
        let events = Arc::new(SupervisorEventBroadcaster::default());
        let mut rx = events.subscribe();
        let publisher = RolePublisher::new(Role::Map, events);
        let input: &[u8] = b"one\ntwo\r\nthree";

        spawn_stream_reader(input, publisher, true).await.unwrap();

        let mut lines = Vec::new();
        while let Ok(SupervisorEvent::Output(out)) = rx.try_recv() {
            assert_eq!(out.source, OutputSource::Stderr);
            assert!(out.is_error);
            lines.push(out.text);
        }
        assert_eq!(lines, ["one", "two", "three"]);
    }
}
