pub mod client;
pub mod futures;
pub mod types;
pub mod user;

pub use client::{LnMarketsClient, RequestDescriptor};
pub use types::*;
