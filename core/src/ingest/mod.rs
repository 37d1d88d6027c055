//! File ingestion: bytes of a user-chosen file → [`Dataset`].
//!
//! Two paths, chosen by file name:
//! - `.csv` → text decode, comma/newline split ([`delimited`])
//! - anything else → Office Open XML workbook, first sheet only ([`xlsx`])
//!
//! Both paths produce a grid of optional cells which
//! [`Dataset::from_grid`] turns into headers and rows.

mod delimited;
mod xlsx;

use std::fmt;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::IngestError;

pub use delimited::parse_csv;
pub use xlsx::read_first_sheet;

/// Extensions offered by the file chooser, in `accept` attribute form.
/// Only Office Open XML workbooks are readable; `.xls`/`.xlsb`/`.ods` are not.
pub const ACCEPTED_EXTENSIONS: &str = ".csv,.xlsx,.xlsm";

/// How a file's bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    /// `.csv` (any case) is CSV; every other name is treated as a workbook.
    pub fn from_name(name: &str) -> Self {
        let is_csv = name
            .len()
            .checked_sub(4)
            .and_then(|start| name.get(start..))
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".csv"));
        if is_csv { Self::Csv } else { Self::Spreadsheet }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

/// A file picked by the user, fully read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_name(&self.name)
    }
}

/// Decode a file into a dataset.
pub fn read_dataset(file: &SourceFile) -> Result<Dataset, IngestError> {
    let grid = match file.kind() {
        FileKind::Csv => parse_csv(&file.bytes)?,
        FileKind::Spreadsheet => read_first_sheet(&file.bytes)?,
    };
    tracing::debug!(
        file = %file.name,
        kind = %file.kind(),
        records = grid.len(),
        "Decoded file"
    );
    Ok(Dataset::from_grid(grid))
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Minimal workbook builder for tests.

    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    pub const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Aziende" sheetId="1" r:id="rId1"/>
    <sheet name="Other" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"#;

    pub const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

    /// Zip the given `(part name, content)` pairs into an in-memory archive.
    pub fn archive(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Workbook with `sheet1` as its first sheet and a decoy second sheet.
    pub fn workbook(shared_strings: &str, sheet1: &str) -> Vec<u8> {
        archive(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/sharedStrings.xml", shared_strings),
            ("xl/worksheets/sheet1.xml", sheet1),
            (
                "xl/worksheets/sheet2.xml",
                r#"<worksheet><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>decoy</t></is></c></row></sheetData></worksheet>"#,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_name() {
        assert_eq!(FileKind::from_name("aziende.csv"), FileKind::Csv);
        assert_eq!(FileKind::from_name("AZIENDE.CSV"), FileKind::Csv);
        assert_eq!(FileKind::from_name("aziende.xlsx"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_name("csv"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_name("data.csv.xlsx"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_name("città.csv"), FileKind::Csv);
    }

    #[test]
    fn test_read_dataset_csv() {
        let file = SourceFile::new("companies.csv", b"name,lat,lng\nAcme,45.0,9.0\nBeta,,\n".to_vec());
        let ds = read_dataset(&file).unwrap();
        assert_eq!(ds.headers().as_slice(), &["name", "lat", "lng"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[1].get("lat"), Some(""));
    }

    #[test]
    fn test_read_dataset_spreadsheet() {
        let shared = r#"<sst><si><t>name</t></si><si><t>Acme</t></si></sst>"#;
        let sheet = r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>lat</t></is></c></row>
<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2"><v>45</v></c></row>
</sheetData></worksheet>"#;
        let file = SourceFile::new("companies.xlsx", fixtures::workbook(shared, sheet));
        let ds = read_dataset(&file).unwrap();
        assert_eq!(ds.headers().as_slice(), &["name", "lat"]);
        assert_eq!(ds.rows()[0].get("name"), Some("Acme"));
        assert_eq!(ds.rows()[0].get("lat"), Some("45"));
    }

    #[test]
    fn test_accepted_extensions_are_readable_formats() {
        let extensions: Vec<&str> = ACCEPTED_EXTENSIONS.split(',').collect();
        assert_eq!(extensions, vec![".csv", ".xlsx", ".xlsm"]);
        assert_eq!(FileKind::from_name("a.csv"), FileKind::Csv);
    }

    #[test]
    fn test_legacy_xls_is_an_error() {
        // OLE2 compound document signature of a BIFF workbook
        let mut bytes = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        bytes.resize(512, 0);
        let file = SourceFile::new("legacy.xls", bytes);
        assert!(matches!(read_dataset(&file), Err(IngestError::Zip(_))));
    }

    #[test]
    fn test_non_csv_garbage_is_an_error() {
        let file = SourceFile::new("notes.txt", b"hello".to_vec());
        assert!(matches!(read_dataset(&file), Err(IngestError::Zip(_))));
    }
}
