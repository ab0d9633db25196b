//! HTTP Request domain types

mod header;
mod method;
mod query;
mod spec;

pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams, QueryValue};
pub use spec::{RequestBuilder, RequestSpec};
