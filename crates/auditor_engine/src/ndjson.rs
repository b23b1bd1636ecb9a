//! Newline-delimited framing over an incremental byte stream.

/// Accumulates byte chunks and yields complete lines.
///
/// The trailing (possibly incomplete) segment is retained across chunks and
/// only released by [`LineBuffer::flush`] when the stream ends. Splitting on
/// bytes rather than decoded text keeps multi-byte characters that straddle
/// a chunk boundary intact.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line completed by it, in order.
    /// A trailing `\r` is stripped so CRLF servers parse the same.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(line);
        }
        lines
    }

    /// Release the remaining segment at end of stream, if any.
    pub(crate) fn flush(&mut self) -> Option<Vec<u8>> {
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }
}
