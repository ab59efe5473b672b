// Core domain types shared across the gateway

pub mod errors;
pub mod identity;
