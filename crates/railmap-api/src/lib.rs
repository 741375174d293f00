//! Data-provider boundary for the network map.
//!
//! Only the `/network` endpoint is consumed here; the other analytics
//! endpoints belong to views outside the topology map.

pub mod client;
pub mod config;
pub mod dto;

pub use client::{FileNetworkProvider, HttpNetworkProvider, NetworkProvider};
pub use config::ApiConfig;
pub use dto::{PayloadReport, RawLink, RawNetwork, RawStation};
