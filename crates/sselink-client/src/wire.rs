/// Incremental decoder for the SSE wire format: events are separated by a
/// blank line; the payload is the concatenation of `data:` field lines.
/// `event:`/`id:`/`retry:` fields and `:` comment lines are ignored — the
/// application payload here is self-describing JSON.
#[derive(Default)]
pub struct WireDecoder {
    buffer: String,
}

impl WireDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of stream text; returns the data payloads of every event
    /// completed by this chunk, in order.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.find("\n\n") {
            let block = self.buffer[..pos].to_string();
            self.buffer.drain(..pos + 2);
            if let Some(data) = parse_block(&block) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// Flush a trailing event that arrived without a final blank line.
    pub fn finish(&mut self) -> Option<String> {
        let remaining = std::mem::take(&mut self.buffer);
        parse_block(&remaining)
    }
}

/// Extract the data payload from one event block, or None if the block
/// carries no data lines (comments, keep-alives).
fn parse_block(block: &str) -> Option<String> {
    let mut data_lines = Vec::new();
    for line in block.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}
