//! Authentication against Google APIs

pub(crate) mod common;
mod credentials;
mod refresh;
mod service_account;
mod token;

pub use credentials::Credentials;
pub use credentials::DEFAULT_CREDENTIALS_ENV;
pub use credentials::DEFAULT_TOKEN_FILE;
pub use refresh::RefreshTokenProvider;
pub use service_account::SHEETS_SCOPES;
pub use service_account::ServiceAccountTokenProvider;
pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
