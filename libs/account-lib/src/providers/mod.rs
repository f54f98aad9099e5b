//! Account provider implementations

mod http;

pub use http::HttpAccountProvider;
