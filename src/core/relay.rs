// sls-logs - core/relay.rs
//
// Turning raw child-process output into relayed lines.
//
// Pipe reads arrive in arbitrary chunks that may split or merge lines. The
// `LineSplitter` re-cuts them on true line boundaries: bytes after the last
// newline are carried into the next push, and a fragment that grows past
// `MAX_LINE_BYTES` without a newline is flushed as a line of its own so a
// newline-free stream cannot grow the buffer without bound.
//
// Decoding is lossy UTF-8 per completed line, so a multi-byte character
// split across two reads is reassembled before decoding.

use crate::core::model::{StreamKind, Tone};
use crate::util::constants::{ERROR_MARKER, MAX_LINE_BYTES};

/// Incremental splitter from byte chunks to complete text lines.
#[derive(Debug)]
pub struct LineSplitter {
    partial: Vec<u8>,
    max_line_bytes: usize,
}

impl Default for LineSplitter {
    fn default() -> Self {
        Self::new(MAX_LINE_BYTES)
    }
}

impl LineSplitter {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            partial: Vec::new(),
            max_line_bytes: max_line_bytes.max(1),
        }
    }

    /// Feed one chunk and return every line it completed, without the
    /// trailing `\n` (and without a `\r` before it).
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                lines.push(take_line(&mut self.partial));
            } else {
                self.partial.push(byte);
                if self.partial.len() >= self.max_line_bytes {
                    tracing::debug!(
                        bytes = self.partial.len(),
                        "Line exceeded buffer limit; flushing fragment"
                    );
                    lines.push(take_line(&mut self.partial));
                }
            }
        }
        lines
    }

    /// Flush whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            None
        } else {
            Some(take_line(&mut self.partial))
        }
    }
}

fn take_line(buf: &mut Vec<u8>) -> String {
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    let line = String::from_utf8_lossy(buf).into_owned();
    buf.clear();
    line
}

/// Colour role of a relayed line's text.
///
/// Everything on stderr is an error. On stdout a line is an error when it
/// contains `error` in any letter case; otherwise it keeps the default colour.
pub fn classify(stream: StreamKind, text: &str) -> Tone {
    match stream {
        StreamKind::Stderr => Tone::Error,
        StreamKind::Stdout if text.to_lowercase().contains(ERROR_MARKER) => Tone::Error,
        StreamKind::Stdout => Tone::Plain,
    }
}

/// Colour role of the function-name prefix for a stream.
pub fn name_tone(stream: StreamKind) -> Tone {
    match stream {
        StreamKind::Stdout => Tone::Success,
        StreamKind::Stderr => Tone::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_across_chunks() {
        let mut s = LineSplitter::default();
        assert_eq!(s.push(b"hel"), Vec::<String>::new());
        assert_eq!(s.push(b"lo\nwor"), vec!["hello"]);
        assert_eq!(s.push(b"ld\n"), vec!["world"]);
        assert_eq!(s.finish(), None);
    }

    #[test]
    fn test_merged_lines_in_one_chunk() {
        let mut s = LineSplitter::default();
        assert_eq!(s.push(b"a\nb\r\n\nc"), vec!["a", "b", ""]);
        assert_eq!(s.finish().as_deref(), Some("c"));
    }

    #[test]
    fn test_long_fragment_is_flushed() {
        let mut s = LineSplitter::new(4);
        assert_eq!(s.push(b"abcdef\n"), vec!["abcd", "ef"]);
    }

    #[test]
    fn test_multibyte_char_split_between_chunks() {
        let bytes = "héllo\n".as_bytes();
        let mut s = LineSplitter::default();
        assert!(s.push(&bytes[..2]).is_empty());
        assert_eq!(s.push(&bytes[2..]), vec!["héllo"]);
    }

    #[test]
    fn test_classify_stdout_error_any_case() {
        assert_eq!(classify(StreamKind::Stdout, "ERROR: boom"), Tone::Error);
        assert_eq!(classify(StreamKind::Stdout, "an Error occurred"), Tone::Error);
        assert_eq!(classify(StreamKind::Stdout, "all good"), Tone::Plain);
    }

    #[test]
    fn test_classify_stderr_always_error() {
        assert_eq!(classify(StreamKind::Stderr, "just a warning"), Tone::Error);
        assert_eq!(name_tone(StreamKind::Stderr), Tone::Error);
        assert_eq!(name_tone(StreamKind::Stdout), Tone::Success);
    }
}
