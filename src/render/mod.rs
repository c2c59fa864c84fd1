//! Rendering module for writing result tables to output formats.

mod json;
mod options;
mod script;

pub use json::{from_json, to_json, JsonFormat};
pub use options::{ScriptOptions, DEFAULT_CONST_NAME};
pub use script::{from_script, split_script, to_script};
