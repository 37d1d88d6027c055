use csv::{ReaderBuilder, StringRecord};

use crate::error::IngestError;

/// Decode CSV bytes into a grid of records.
///
/// Text is decoded as UTF-8 (BOM stripped, invalid sequences replaced) and
/// trimmed as a whole before splitting. Records may have any length;
/// double-quoted fields can carry commas and line breaks. A blank line
/// between records is kept as a record with one empty field.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Vec<Option<String>>>, IngestError> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if had_errors {
        tracing::warn!("CSV contained invalid UTF-8, replaced with U+FFFD");
    }
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let bytes = text.as_bytes();
    let mut grid = Vec::new();
    let mut record = StringRecord::new();
    loop {
        // The reader skips blank lines silently; count them before it does
        let offset = reader.position().byte() as usize;
        let blanks = blank_lines_at(bytes, offset);
        if !reader.read_record(&mut record)? {
            break;
        }
        grid.extend(std::iter::repeat_n(vec![Some(String::new())], blanks));
        grid.push(record.iter().map(|field| Some(field.to_string())).collect());
    }
    Ok(grid)
}

/// Number of empty lines starting at `offset`, which sits at the start of a
/// line or on the `\n` of a `\r\n` the reader has not consumed yet.
fn blank_lines_at(bytes: &[u8], offset: usize) -> usize {
    let mut pos = offset;
    if pos > 0 && bytes.get(pos - 1) == Some(&b'\r') && bytes.get(pos) == Some(&b'\n') {
        pos += 1;
    }
    let mut count = 0;
    loop {
        match bytes.get(pos..) {
            Some([b'\r', b'\n', ..]) => pos += 2,
            Some([b'\n', ..]) => pos += 1,
            _ => return count,
        }
        count += 1;
    }
}
