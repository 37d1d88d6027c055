//! Office Open XML workbook reader (first sheet only).
//!
//! Reads just enough of the package to build a cell grid:
//! `xl/workbook.xml` → first `<sheet>` → its relationship target → the sheet
//! part, with `xl/sharedStrings.xml` for string cells.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};

use companymap_types::formatting::format_number;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::IngestError;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const FALLBACK_SHEET_PART: &str = "xl/worksheets/sheet1.xml";

// Sheet size limits (XFD1048576)
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

type Grid = Vec<Vec<Option<String>>>;

/// Decode the first worksheet of an XLSX/XLSM package into a grid.
///
/// Row 0 of the grid is the first used row; column 0 is the leftmost used
/// column. Rows inside the used range without any value come back empty.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Grid, IngestError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let workbook = read_part(&mut archive, WORKBOOK_PART)?
        .ok_or_else(|| IngestError::MissingPart(WORKBOOK_PART.to_string()))?;
    let sheet = first_sheet(&workbook)?;

    let sheet_part = match read_part(&mut archive, WORKBOOK_RELS_PART)? {
        Some(rels) => relationship_target(&rels, &sheet.rel_id)?,
        None => None,
    }
    .unwrap_or_else(|| FALLBACK_SHEET_PART.to_string());

    let shared = match read_part(&mut archive, SHARED_STRINGS_PART)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_xml = read_part(&mut archive, &sheet_part)?
        .ok_or_else(|| IngestError::MissingPart(sheet_part.clone()))?;
    let grid = parse_sheet(&sheet_xml, &sheet_part, &shared)?;

    tracing::debug!(
        sheet = %sheet.name,
        part = %sheet_part,
        shared_strings = shared.len(),
        rows = grid.len(),
        "Read first worksheet"
    );
    Ok(grid)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, IngestError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(IngestError::Zip(e)),
    };
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(|source| IngestError::Io {
        part: name.to_string(),
        source,
    })?;
    Ok(Some(buf))
}

fn xml_err(part: &str, source: quick_xml::Error) -> IngestError {
    IngestError::Xml {
        part: part.to_string(),
        source,
    }
}

/// Value of the attribute whose local name (prefix ignored) is `local`.
fn attr(e: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for a in e.attributes() {
        let a = a?;
        if a.key.local_name().as_ref() == local {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

// ─────────────────────────────────────────────────────────────────────────────
// Workbook + Relationships
// ─────────────────────────────────────────────────────────────────────────────

struct SheetRef {
    name: String,
    rel_id: String,
}

fn first_sheet(xml: &[u8]) -> Result<SheetRef, IngestError> {
    let to_err = |e: quick_xml::Error| xml_err(WORKBOOK_PART, e);
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(to_err)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let name = attr(&e, b"name").map_err(to_err)?.unwrap_or_default();
                // r:id, not sheetId
                let rel_id = attr(&e, b"id").map_err(to_err)?.unwrap_or_default();
                return Ok(SheetRef { name, rel_id });
            }
            Event::Eof => return Err(IngestError::NoSheets),
            _ => {}
        }
        buf.clear();
    }
}

/// Resolve a workbook relationship id to a package part name.
fn relationship_target(xml: &[u8], rel_id: &str) -> Result<Option<String>, IngestError> {
    let to_err = |e: quick_xml::Error| xml_err(WORKBOOK_RELS_PART, e);
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(to_err)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attr(&e, b"Id").map_err(to_err)?.as_deref() == Some(rel_id) {
                    return Ok(attr(&e, b"Target").map_err(to_err)?.map(|t| part_name(&t)));
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Targets are relative to `xl/` unless absolute within the package.
fn part_name(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared Strings
// ─────────────────────────────────────────────────────────────────────────────

/// Each `<si>` is one string: its `<t>` runs concatenated, phonetic runs
/// (`<rPh>`) skipped.
fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, IngestError> {
    let to_err = |e: quick_xml::Error| xml_err(SHARED_STRINGS_PART, e);
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(to_err)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(t) if in_text && !in_phonetic => {
                if let Some(s) = current.as_mut() {
                    s.push_str(&t.unescape().map_err(to_err)?);
                }
            }
            Event::CData(t) if in_text && !in_phonetic => {
                if let Some(s) = current.as_mut() {
                    s.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => strings.push(current.take().unwrap_or_default()),
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Worksheet
// ─────────────────────────────────────────────────────────────────────────────

/// Cell type attribute (`t`) of a `<c>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Number,
    SharedString,
    InlineString,
    Boolean,
    /// `str` (formula result), `e` (error) and `d` (ISO date) carry text as-is.
    Text,
}

impl CellType {
    fn from_attr(t: Option<&str>) -> Self {
        match t {
            Some("s") => Self::SharedString,
            Some("inlineStr") => Self::InlineString,
            Some("b") => Self::Boolean,
            Some("str" | "e" | "d") => Self::Text,
            _ => Self::Number,
        }
    }
}

struct PendingCell {
    row: usize,
    col: usize,
    kind: CellType,
    raw: Option<String>,
}

impl PendingCell {
    fn push_text(&mut self, text: &str) {
        self.raw.get_or_insert_with(String::new).push_str(text);
    }

    fn decode(self, shared: &[String]) -> Option<String> {
        let raw = self.raw?;
        match self.kind {
            CellType::SharedString => raw
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared.get(idx).cloned()),
            CellType::Boolean => Some(if raw.trim() == "1" { "true" } else { "false" }.to_string()),
            CellType::InlineString | CellType::Text => Some(raw),
            CellType::Number => Some(match raw.trim().parse::<f64>() {
                Ok(n) => format_number(n),
                Err(_) => raw,
            }),
        }
    }
}

/// Split an `A1`-style reference into zero-based (row, column). References
/// past `XFD1048576` are rejected.
fn parse_cell_ref(r: &str) -> Option<(usize, usize)> {
    let letters_end = r.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = r.split_at(letters_end);
    if letters.is_empty() {
        return None;
    }
    let col = letters
        .bytes()
        .try_fold(0usize, |acc, b| {
            acc.checked_mul(26)?
                .checked_add((b.to_ascii_uppercase() - b'A') as usize + 1)
        })?;
    let row: usize = digits.parse().ok()?;
    if col > MAX_COLUMNS || row > MAX_ROWS {
        return None;
    }
    Some((row.checked_sub(1)?, col - 1))
}

fn bad_reference(part: &str, reference: impl Into<String>) -> IngestError {
    IngestError::CellReference {
        part: part.to_string(),
        reference: reference.into(),
    }
}

fn parse_sheet(xml: &[u8], part: &str, shared: &[String]) -> Result<Grid, IngestError> {
    let to_err = |e: quick_xml::Error| xml_err(part, e);
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut cells: BTreeMap<usize, BTreeMap<usize, String>> = BTreeMap::new();
    let mut next_row = 0usize;
    let mut next_col = 0usize;
    let mut row_idx = 0usize;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline = false;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(to_err)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    row_idx = row_number(&e, part, next_row)?;
                    next_row = row_idx + 1;
                    next_col = 0;
                }
                b"c" => {
                    let (row, col) = cell_position(&e, part, row_idx, next_col)?;
                    next_col = col + 1;
                    let t = attr(&e, b"t").map_err(to_err)?;
                    cell = Some(PendingCell {
                        row,
                        col,
                        kind: CellType::from_attr(t.as_deref()),
                        raw: None,
                    });
                }
                b"v" => in_value = true,
                b"is" => in_inline = true,
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    row_idx = row_number(&e, part, next_row)?;
                    next_row = row_idx + 1;
                }
                b"c" => {
                    // Valueless cell: only advances the column cursor
                    let (_, col) = cell_position(&e, part, row_idx, next_col)?;
                    next_col = col + 1;
                }
                _ => {}
            },
            Event::Text(t) => {
                let collecting = in_value || (in_inline && in_text && !in_phonetic);
                if collecting && let Some(c) = cell.as_mut() {
                    c.push_text(&t.unescape().map_err(to_err)?);
                }
            }
            Event::CData(t) => {
                let collecting = in_value || (in_inline && in_text && !in_phonetic);
                if collecting && let Some(c) = cell.as_mut() {
                    c.push_text(&String::from_utf8_lossy(&t));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(c) = cell.take() {
                        let (row, col) = (c.row, c.col);
                        if let Some(value) = c.decode(shared) {
                            cells.entry(row).or_default().insert(col, value);
                        }
                    }
                }
                b"v" => in_value = false,
                b"is" => in_inline = false,
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(into_grid(cells))
}

/// Zero-based row index from `<row r="..">`, or `next_row` when absent.
fn row_number(e: &BytesStart<'_>, part: &str, next_row: usize) -> Result<usize, IngestError> {
    match attr(e, b"r").map_err(|err| xml_err(part, err))? {
        Some(r) => r
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_ROWS).contains(n))
            .map(|n| n - 1)
            .ok_or_else(|| bad_reference(part, r)),
        None if next_row < MAX_ROWS => Ok(next_row),
        None => Err(bad_reference(part, format!("row {}", next_row + 1))),
    }
}

/// Zero-based (row, column) from `<c r="..">`, or the next free column of
/// `row` when absent.
fn cell_position(
    e: &BytesStart<'_>,
    part: &str,
    row: usize,
    next_col: usize,
) -> Result<(usize, usize), IngestError> {
    match attr(e, b"r").map_err(|err| xml_err(part, err))? {
        Some(r) => parse_cell_ref(&r).ok_or_else(|| bad_reference(part, r)),
        None if next_col < MAX_COLUMNS => Ok((row, next_col)),
        None => Err(bad_reference(part, format!("row {} column {}", row + 1, next_col + 1))),
    }
}

/// Dense grid over the used range of `cells`.
fn into_grid(cells: BTreeMap<usize, BTreeMap<usize, String>>) -> Grid {
    let (Some(&first_row), Some(&last_row)) = (cells.keys().next(), cells.keys().next_back())
    else {
        return Vec::new();
    };
    let first_col = cells
        .values()
        .filter_map(|cols| cols.keys().next().copied())
        .min()
        .unwrap_or(0);

    let mut grid = Vec::with_capacity(last_row - first_row + 1);
    for row in first_row..=last_row {
        let record = match cells.get(&row) {
            Some(cols) => {
                let width = cols.keys().next_back().map_or(0, |last| last - first_col + 1);
                let mut record = vec![None; width];
                for (col, value) in cols {
                    record[col - first_col] = Some(value.clone());
                }
                record
            }
            None => Vec::new(),
        };
        grid.push(record);
    }
    grid
}
