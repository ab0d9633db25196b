//! HTTP Response domain types

mod record;
mod status;

pub use record::ResponseRecord;
pub use status::StatusCode;
