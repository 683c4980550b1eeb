//! Client for the third-party image-to-video generation service.
//!
//! [`api::GenerationService`] is the seam the tracker depends on;
//! [`http::HttpGenerationClient`] is the reqwest implementation that talks
//! to the vendor's REST API.

pub mod api;
pub mod config;
pub mod http;

pub use api::{GenerationService, RemoteError, SubmittedTask};
pub use config::RemoteConfig;
pub use http::HttpGenerationClient;
