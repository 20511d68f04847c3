use thiserror::Error;

/// Failure classes of the remote spreadsheet service.
///
/// `NotFound` is kept separate because the header write uses it to trigger
/// the one-shot tab repair; everything else propagates as-is.
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("sheet or range not found: {0}")]
    NotFound(String),

    #[error("google sheets api error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("credentials error: {0}")]
    Credentials(String),
}

impl SheetsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SheetsError::NotFound(_))
    }
}
