mod request_error;
pub mod requests;
mod score;
mod store;

pub use request_error::*;
pub use score::{ScoreId, ScoreSubmission, ScoreView};
pub use store::{Store, StoreError, StoreSession};

#[cfg(test)]
pub use score::STORE_UTC_OFFSET_SECS;
