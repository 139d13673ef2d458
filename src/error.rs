//! Error type shared by the loader, the selection layer and the server.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The upload carried no file. This is the one designed halt of the pipeline.
    #[error("no file uploaded")]
    NoFile,

    #[error("could not read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook contains no worksheet")]
    NoWorksheet,

    #[error("table has no rows")]
    NoRows,

    #[error("table has no columns")]
    NoColumns,

    #[error("row {row:?}, column {column:?}: {value:?} is not a number")]
    NonNumericCell {
        row: String,
        column: String,
        value: String,
    },

    #[error("row {row:?} has {found} values, expected {expected}")]
    RaggedRow {
        row: String,
        found: usize,
        expected: usize,
    },

    #[error("duplicate row label {0:?}")]
    DuplicateRow(String),

    #[error("duplicate column label {0:?}")]
    DuplicateColumn(String),

    #[error("unknown row {0:?}")]
    UnknownRow(String),

    #[error("unknown session {0:?}")]
    UnknownSession(String),

    #[error("label font size {0} is outside 6..=20")]
    FontSizeOutOfRange(u8),

    #[error("upload larger than {0} bytes")]
    UploadTooLarge(usize),

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status code the server answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::UnknownSession(_) => 404,
            Error::UploadTooLarge(_) => 413,
            Error::Io(_) => 500,
            _ => 400,
        }
    }
}
