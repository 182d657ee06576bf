mod client_ip;
pub mod cors;
mod response_shaper;

pub use client_ip::ClientIpResolver;
pub use cors::{CorsDecision, CorsPolicy};
pub use response_shaper::ResponseShaper;
