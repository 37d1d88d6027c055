use thiserror::Error;

/// Errors that stop a file from becoming the current dataset.
///
/// Misaligned records, empty files and unparseable coordinates are not errors;
/// only containers that cannot be opened at all end up here.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("not a readable spreadsheet container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("spreadsheet is missing the `{0}` part")]
    MissingPart(String),

    #[error("failed to read `{part}`: {source}")]
    Io {
        part: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in `{part}`: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("invalid cell reference `{reference}` in `{part}`")]
    CellReference { part: String, reference: String },

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}
