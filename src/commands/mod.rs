//! Entry points of the `ls` and `get` subcommands.

pub mod config;
mod get;
mod ls;
mod services;

pub use get::{GetOptions, get};
pub use ls::{LsOptions, ls};
pub use services::{Services, build_http_client};
