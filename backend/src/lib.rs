//! Server side of a “login with GitHub” OAuth flow.

pub mod api;
pub mod config;
pub mod github;
pub mod views;

#[cfg(test)]
pub mod test;
