//! # Mixer Common Library
//!
//! Shared code for the mixer bot:
//! - Song database schema and queries
//! - YouTube link extraction
//! - Configuration files (bootstrap TOML, server-config.json)
//! - Data models passed between the ingestion pipeline and commands

pub mod config;
pub mod db;
pub mod error;
pub mod links;
pub mod models;

pub use error::{Error, Result};
pub use models::{NewSong, Song, SongFilter, Submitter, VideoMetadata};
