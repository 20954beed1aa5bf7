//! Error types for pdfpress.
//!
//! Every engine operation either returns its complete output or one of these
//! errors; no partially assembled document is ever handed back.
//!
//! # Error Categories
//!
//! - **Document Errors**: unparsable, encrypted or empty source documents
//! - **Range Errors**: page range expressions that select nothing
//! - **Rendering Errors**: page rasterization or image encoding failures
//! - **I/O Errors**: reading inputs and writing outputs on behalf of the CLI

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pdfpress operations.
pub type Result<T> = std::result::Result<T, PdfPressError>;

/// Main error type for pdfpress operations.
#[derive(Debug, Error)]
pub enum PdfPressError {
    /// A source buffer could not be parsed as a PDF document.
    #[error("{}", corrupt_message(.source_index, .details))]
    CorruptDocument {
        /// Position of the failing source in a merge, if known.
        source_index: Option<usize>,
        /// Parser details.
        details: String,
    },

    /// The source document is encrypted.
    #[error(
        "PDF is encrypted and cannot be processed\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedDocument {
        /// Position of the failing source in a merge, if known.
        source_index: Option<usize>,
    },

    /// A page range expression selected no pages of the document.
    #[error(
        "Invalid page range '{range}'\n  \
         PDF has {total_pages} page(s). Page numbers must be between 1 and {total_pages}"
    )]
    InvalidRange {
        /// The expression as entered.
        range: String,
        /// Page count of the document the range was applied to.
        total_pages: usize,
    },

    /// A zero-based page index beyond the document's page count was requested.
    #[error("Page index {index} is out of range for a document with {page_count} page(s)")]
    IndexOutOfRange {
        /// Requested zero-based index.
        index: usize,
        /// Page count of the document.
        page_count: usize,
    },

    /// A page handle was appended to a document that does not own it.
    #[error("Page handle does not belong to this document or was already appended")]
    InvalidHandle,

    /// A page could not be rasterized.
    #[error("Failed to render page {page}\n  Reason: {reason}")]
    Render {
        /// One-based page number.
        page: u32,
        /// Backend failure details.
        reason: String,
    },

    /// A rendered page could not be encoded as an image.
    #[error("Failed to encode page image\n  Reason: {reason}")]
    Encode {
        /// Encoder failure details.
        reason: String,
    },

    /// The rendering backend could not be initialised.
    #[error(
        "PDF rasterizer is unavailable\n  Reason: {reason}\n  \
         Hint: Install the PDFium shared library or set PDFIUM_DYNAMIC_LIB_PATH"
    )]
    RasterizerUnavailable {
        /// Binding failure details.
        reason: String,
    },

    /// An output document could not be serialized.
    #[error("Failed to serialize PDF: {reason}")]
    Serialize {
        /// Writer failure details.
        reason: String,
    },

    /// Merge was called without any source documents.
    #[error("No input documents specified")]
    NoInput,

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input path is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

fn corrupt_message(source_index: &Option<usize>, details: &str) -> String {
    match source_index {
        Some(index) => format!(
            "Corrupted or invalid PDF (input #{})\n  Details: {details}",
            index + 1
        ),
        None => format!("Corrupted or invalid PDF\n  Details: {details}"),
    }
}

impl From<lopdf::Error> for PdfPressError {
    fn from(err: lopdf::Error) -> Self {
        Self::corrupt_document(err.to_string())
    }
}

impl PdfPressError {
    /// Create a CorruptDocument error without a source position.
    pub fn corrupt_document(details: impl Into<String>) -> Self {
        Self::CorruptDocument {
            source_index: None,
            details: details.into(),
        }
    }

    /// Create a Render error for a one-based page number.
    pub fn render(page: u32, reason: impl Into<String>) -> Self {
        Self::Render {
            page,
            reason: reason.into(),
        }
    }

    /// Create an Encode error.
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    /// Create a Serialize error.
    pub fn serialize(reason: impl Into<String>) -> Self {
        Self::Serialize {
            reason: reason.into(),
        }
    }

    /// Create a RasterizerUnavailable error.
    pub fn rasterizer_unavailable(reason: impl Into<String>) -> Self {
        Self::RasterizerUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Attach the position of the failing merge input to a document error.
    ///
    /// Errors that do not describe a source document are returned unchanged.
    pub fn at_source(self, index: usize) -> Self {
        match self {
            Self::CorruptDocument { details, .. } => Self::CorruptDocument {
                source_index: Some(index),
                details,
            },
            Self::EncryptedDocument { .. } => Self::EncryptedDocument {
                source_index: Some(index),
            },
            other => other,
        }
    }

    /// Check if this error should stop all processing immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoInput
                | Self::RasterizerUnavailable { .. }
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::Cancelled
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::CorruptDocument { .. } => 3,
            Self::EncryptedDocument { .. } => 3,
            Self::NoInput => 1,
            Self::InvalidRange { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::IndexOutOfRange { .. } => 6,
            Self::InvalidHandle => 6,
            Self::Render { .. } => 6,
            Self::Encode { .. } => 6,
            Self::RasterizerUnavailable { .. } => 6,
            Self::Serialize { .. } => 6,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Other { .. } => 1,
        }
    }
}
