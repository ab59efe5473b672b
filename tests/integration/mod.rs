// Integration tests, organized by endpoint - real HTTP tests via oneshot

#[path = "../common/mod.rs"]
mod common;

pub mod test_auth;
