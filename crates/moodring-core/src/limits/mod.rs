//! Rate-limit fetching: wire format, parsing, and the HTTP fetcher.

pub mod fetcher;
pub mod parser;
pub mod types;

pub use fetcher::{fetch_once, HttpFetcher, RateLimitSource};
pub use parser::parse_rate_limits;
pub use types::{FetchError, FetchErrorKind, RateLimitRequest, RateSnapshot};
