//! Error types

mod api;
mod auth;
mod window;

pub use api::*;
pub use auth::*;
pub use window::*;

/// Top-level error for operations that reach the spreadsheet backend.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The Google API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Credentials could not be loaded or exchanged for a token.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl Error {
    /// Returns `true` if the spreadsheet or worksheet does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api(e) => e.is_not_found(),
            Self::Auth(_) => false,
        }
    }
}
