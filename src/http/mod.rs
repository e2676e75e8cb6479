//! Outbound HTTP plumbing shared by every provider

mod client;

pub use client::{build_client, default_user_agent};
