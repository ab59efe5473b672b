// Unit tests exercising the public crate surface with shared mocks

#[path = "../common/mod.rs"]
mod common;
