//! Rendering options and configuration.

use chrono::{DateTime, Utc};

/// Default name of the constant holding the table in script output.
pub const DEFAULT_CONST_NAME: &str = "FISH_DATA";

/// Options for script output.
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    /// Name of the declared constant
    pub const_name: String,

    /// Spaces per indentation level in the embedded JSON
    pub indent: usize,

    /// When set, a `// Generated ...` comment line is written first
    pub generated_at: Option<DateTime<Utc>>,
}

impl ScriptOptions {
    /// Create new script options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the constant name.
    pub fn with_const_name(mut self, name: impl Into<String>) -> Self {
        self.const_name = name.into();
        self
    }

    /// Set the indentation width.
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent = spaces;
        self
    }

    /// Stamp the output with the current time.
    pub fn with_timestamp(self) -> Self {
        self.with_generated_at(Utc::now())
    }

    /// Stamp the output with a fixed time.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            const_name: DEFAULT_CONST_NAME.to_string(),
            indent: 4,
            generated_at: None,
        }
    }
}
