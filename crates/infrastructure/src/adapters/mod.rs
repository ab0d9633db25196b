//! Port implementations.

mod random_token;
mod reqwest_client;
mod system_clock;

pub use random_token::{RandomTokenGenerator, TOKEN_LEN};
pub use reqwest_client::ReqwestHttpClient;
pub use system_clock::SystemClock;
