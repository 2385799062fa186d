//! Line framing over a raw byte stream.
//!
//! Serial reads arrive in chunks of arbitrary size with no relation to line
//! boundaries. The framer accumulates chunks and yields complete logical
//! lines: split on `\n`, carriage returns removed, non-ASCII bytes dropped,
//! whitespace trimmed. Blank lines are discarded. A partial line is retained
//! across chunks until its terminator arrives.
//!
//! The buffered partial line is capped: if the device emits garbage with no
//! newline, the oversized prefix is discarded (and counted) instead of
//! growing without bound.

use tracing::warn;

/// Upper bound on a buffered un-terminated line. Telemetry lines are tens of
/// bytes; anything approaching this is line noise or a dead framing state.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Accumulates raw bytes and yields complete, cleaned lines.
#[derive(Debug)]
pub struct LineFramer {
    buf: Vec<u8>,
    max_line_bytes: usize,
    oversize_dropped: u64,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    pub fn new() -> Self {
        Self::with_max_line(MAX_LINE_BYTES)
    }

    /// Framer with a custom partial-line cap (tests use small caps).
    pub fn with_max_line(max_line_bytes: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_line_bytes,
            oversize_dropped: 0,
        }
    }

    /// Append a chunk of raw bytes read from the device.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pop the next complete line, if one is buffered.
    ///
    /// Returns cleaned, non-empty lines only; blank lines are consumed
    /// silently. When no newline is buffered yet, enforces the partial-line
    /// cap and returns `None`.
    pub fn next_line(&mut self) -> Option<String> {
        loop {
            let Some(nl) = self.buf.iter().position(|&b| b == b'\n') else {
                if self.buf.len() > self.max_line_bytes {
                    warn!(
                        buffered = self.buf.len(),
                        cap = self.max_line_bytes,
                        "discarding oversized un-terminated line"
                    );
                    self.buf.clear();
                    self.oversize_dropped += 1;
                }
                return None;
            };

            let raw: Vec<u8> = self.buf.drain(..=nl).collect();
            let line: String = raw[..nl]
                .iter()
                .filter(|&&b| b != b'\r' && b.is_ascii())
                .map(|&b| b as char)
                .collect();
            let line = line.trim();
            if !line.is_empty() {
                return Some(line.to_string());
            }
        }
    }

    /// Number of oversized partial lines discarded so far.
    pub fn oversize_dropped(&self) -> u64 {
        self.oversize_dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(framer: &mut LineFramer) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = framer.next_line() {
            out.push(line);
        }
        out
    }

    #[test]
    fn splits_on_newline_and_strips_cr() {
        let mut f = LineFramer::new();
        f.feed(b"100,1,2,3,4,5,6,7\r\n#fw_target=stm32f405\r\n");
        assert_eq!(drain(&mut f), vec!["100,1,2,3,4,5,6,7", "#fw_target=stm32f405"]);
    }

    #[test]
    fn retains_partial_line_across_chunks() {
        let mut f = LineFramer::new();
        f.feed(b"100,1,2,3");
        assert_eq!(f.next_line(), None);
        f.feed(b",4,5,6,7\n20");
        assert_eq!(f.next_line(), Some("100,1,2,3,4,5,6,7".to_string()));
        assert_eq!(f.next_line(), None);
        f.feed(b"0,0,0,0,0,0,0,0\n");
        assert_eq!(f.next_line(), Some("200,0,0,0,0,0,0,0".to_string()));
    }

    #[test]
    fn chunk_boundary_invariance() {
        let stream = b"#mm_columns=a,b\r\n10,1,2,3,4,5,6,7\n\r\nhello world\n999,0,0,0,0,0,0,0\r\n";

        let mut whole = LineFramer::new();
        whole.feed(stream);
        let expected = drain(&mut whole);

        // Every chunk size from byte-at-a-time up to the whole buffer.
        for chunk_size in 1..=stream.len() {
            let mut f = LineFramer::new();
            let mut got = Vec::new();
            for chunk in stream.chunks(chunk_size) {
                f.feed(chunk);
                got.extend(drain(&mut f));
            }
            assert_eq!(got, expected, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn blank_lines_are_discarded() {
        let mut f = LineFramer::new();
        f.feed(b"\n\r\n   \n\t\nx\n");
        assert_eq!(drain(&mut f), vec!["x"]);
    }

    #[test]
    fn non_ascii_bytes_are_dropped() {
        let mut f = LineFramer::new();
        f.feed(b"10\xff0,1,2,3,4,5,6,7\n");
        assert_eq!(f.next_line(), Some("100,1,2,3,4,5,6,7".to_string()));
    }

    #[test]
    fn oversized_partial_line_is_discarded() {
        let mut f = LineFramer::with_max_line(8);
        f.feed(b"0123456789abcdef");
        assert_eq!(f.next_line(), None);
        assert_eq!(f.oversize_dropped(), 1);
        // Stream recovers once framing resumes.
        f.feed(b"55,1,2,3,4,5,6,7\n");
        assert_eq!(f.next_line(), Some("55,1,2,3,4,5,6,7".to_string()));
    }

    #[test]
    fn terminated_lines_are_not_subject_to_the_cap() {
        let mut f = LineFramer::with_max_line(4);
        f.feed(b"0123456789\n");
        assert_eq!(f.next_line(), Some("0123456789".to_string()));
        assert_eq!(f.oversize_dropped(), 0);
    }
}
