pub mod audio;
pub mod config;
pub mod error;
pub mod payload;
pub mod report;
pub mod state;
