use std::io::{self, BufRead};

/// Read one line from `reader`, without its newline.
///
/// At most `max_input - 1` characters are kept; the rest of an overlong
/// line is consumed and dropped without notice. Returns `Ok(None)` once the
/// input is exhausted.
pub fn read_line<R: BufRead>(reader: &mut R, max_input: usize) -> io::Result<Option<String>> {
    let keep = max_input.saturating_sub(1);
    // Enough bytes for `keep` characters of up to four bytes each, plus the
    // tail of a character cut at the byte limit.
    let byte_limit = keep.saturating_mul(4).saturating_add(3);

    let Some(raw) = read_bounded(reader, byte_limit)? else {
        return Ok(None);
    };

    let line = String::from_utf8_lossy(&raw);
    Ok(Some(line.chars().take(keep).collect()))
}

/// Read up to the next `\n`, storing at most `limit` bytes of it.
/// Bytes past the limit are consumed from `reader` but never buffered.
fn read_bounded<R: BufRead>(reader: &mut R, limit: usize) -> io::Result<Option<Vec<u8>>> {
    let mut raw = Vec::new();
    let mut seen_any = false;

    loop {
        let available = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(seen_any.then_some(raw));
        }
        seen_any = true;

        let newline = available.iter().position(|&b| b == b'\n');
        let chunk = &available[..newline.unwrap_or(available.len())];
        let room = limit.saturating_sub(raw.len());
        raw.extend_from_slice(&chunk[..chunk.len().min(room)]);

        match newline {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(Some(raw));
            }
            None => {
                let used = available.len();
                reader.consume(used);
            }
        }
    }
}
