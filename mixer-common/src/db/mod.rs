//! Database schema and song queries

pub mod init;
pub mod songs;

pub use init::*;
pub use songs::*;
