//! Core of artedl: extract the direct video URL from a media-portal page
//! and download it.

pub mod config;
pub mod download;
pub mod error;
pub mod fetch;
pub mod locate;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod pipeline;

pub use error::ArtedlError;
