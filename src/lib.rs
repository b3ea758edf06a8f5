pub mod asset;
pub mod commands;
pub mod download;
pub mod http;
pub mod render;
pub mod runtime;
pub mod source;
pub mod system;
