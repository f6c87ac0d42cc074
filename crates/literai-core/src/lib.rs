#![allow(clippy::must_use_candidate)]

mod context;
mod error;
mod payload;

pub use context::{Identity, RequestContext};
pub use error::{ErrorBody, HttpError};
pub use payload::ExtractPayload;
