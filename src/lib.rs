// SafeComms: client SDK for the SafeComms content moderation API.
//
// This is the library root. `client` holds the HTTP client and its four
// operations; the other modules are the value types and helpers it uses.

pub mod client;
pub mod config;
pub mod error;
pub mod image;
pub mod output;
pub mod types;

pub use client::SafeCommsClient;
pub use config::ClientConfig;
pub use error::{ClientError, Error, Result};
pub use types::{
    ImageModerationRequest, ModerationResult, ProblemDetails, TextModerationRequest,
    UsageResponse,
};
