//! Talk to GitHub: build OAuth URLs, exchange codes, and fetch resources.

mod client;
pub use client::*;

mod errors;
pub use errors::*;

mod urls;
pub use urls::*;
