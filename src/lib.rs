pub mod assets;
pub mod compute;
pub mod config;
pub mod entities;
