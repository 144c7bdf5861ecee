pub mod canned;
pub mod http;

pub use canned::CannedProvider;
pub use http::HttpProvider;
