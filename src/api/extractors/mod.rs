//! Custom request extractors.

mod client_ip;
mod json_body;

pub use client_ip::ClientIp;
pub use json_body::JsonBody;
