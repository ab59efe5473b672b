// JSON-RPC protocol layer

pub mod dispatcher;
pub mod types;
