//! Line reassembly for chunked byte streams.
//!
//! Pipes deliver output in arbitrary chunks. [`LineReassembler`] buffers the
//! bytes of the current, unterminated line and emits each completed line once,
//! in order, without its `\n` (or `\r\n`) terminator.
//!
//! One instance serves exactly one producer. Its buffer is order-sensitive, so
//! two producers feeding the same instance would splice their lines together.

/// Partial-line accumulator for a single byte stream.
#[derive(Debug, Default)]
pub struct LineReassembler {
    partial: Vec<u8>,
}

impl LineReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, calling `emit` for every line it completes.
    pub fn feed(&mut self, chunk: &[u8], mut emit: impl FnMut(&[u8])) {
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(pos);
            if self.partial.is_empty() {
                emit(strip_cr(head));
            } else {
                self.partial.extend_from_slice(head);
                emit(strip_cr(&self.partial));
                self.partial.clear();
            }
            rest = &tail[1..];
        }
        self.partial.extend_from_slice(rest);
    }

    /// Emit the buffered fragment, if any, as a final line.
    ///
    /// Call once the stream has closed. A second call emits nothing.
    pub fn finish(&mut self, mut emit: impl FnMut(&[u8])) {
        if !self.partial.is_empty() {
            emit(strip_cr(&self.partial));
            self.partial.clear();
        }
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.partial.len()
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
