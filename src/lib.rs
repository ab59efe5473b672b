//! Memory Gateway: a stateless MCP bridge for a memory backend.
//!
//! This library exposes a memory-storage and retrieval service to AI chat
//! clients over the Model Context Protocol (JSON-RPC 2.0 over HTTP). The
//! gateway authenticates a bearer credential, dispatches JSON-RPC messages
//! (single or batched) against a per-client tool profile, and translates
//! results into the MCP result envelope. Storage, search, and embedding live
//! in an external backend consumed through the `MemoryBackend` trait.

pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod core;
pub mod memory;
pub mod protocol;
