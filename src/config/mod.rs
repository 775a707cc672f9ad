//! Project configuration (`.mnemovault.toml`).

pub mod settings;

pub use settings::{Backend, Settings};
