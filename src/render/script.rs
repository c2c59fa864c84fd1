//! Script rendering: the table as a single JavaScript constant.
//!
//! ```text
//! const FISH_DATA = {
//!     "Cod, Pacific": {
//!         "Round": {
//!             "yield": "81",
//!             "range": "72-90"
//!         }
//!     }
//! };
//! ```

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::ScriptOptions;
use crate::error::{Error, Result};
use crate::model::{ResultTable, YieldEntry};

/// Render a table as `const <NAME> = <json>;`.
pub fn to_script(table: &ResultTable, options: &ScriptOptions) -> Result<String> {
    let indent = vec![b' '; options.indent];
    let mut json = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut json, PrettyFormatter::with_indent(&indent));
    table
        .serialize(&mut serializer)
        .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
    let json = String::from_utf8(json).map_err(|e| Error::Render(e.to_string()))?;

    let mut out = String::with_capacity(json.len() + 64);
    if let Some(at) = options.generated_at {
        out.push_str(&format!("// Generated {}\n", at.to_rfc3339()));
    }
    out.push_str(&format!("const {} = {};\n", options.const_name, json));
    Ok(out)
}

/// Read a table back from script output.
///
/// Anything before the declaration and anything after its terminating `;`
/// is ignored, so files carrying further declarations can be read.
pub fn from_script(text: &str, const_name: &str) -> Result<ResultTable> {
    split_script(text, const_name).map(|(table, _)| table)
}

/// Read a table back from script output, also returning the text that
/// follows the declaration.
///
/// The returned tail starts after the terminating `;` and one line break, so
/// `to_script(..) + tail` rewrites the file with every other declaration kept
/// as it was.
pub fn split_script<'a>(text: &'a str, const_name: &str) -> Result<(ResultTable, &'a str)> {
    let declaration = Regex::new(&format!(r"\bconst\s+{}\s*=", regex::escape(const_name)))?;
    let found = declaration
        .find(text)
        .ok_or_else(|| Error::ScriptFormat(format!("no `const {} =` declaration", const_name)))?;

    let rest = &text[found.end()..];
    let mut stream = serde_json::Deserializer::from_str(rest)
        .into_iter::<BTreeMap<String, BTreeMap<String, YieldEntry>>>();
    let entries = stream
        .next()
        .ok_or_else(|| Error::ScriptFormat("missing table object".to_string()))??;

    let after = rest[stream.byte_offset()..].trim_start();
    let tail = after.strip_prefix(';').ok_or_else(|| {
        Error::ScriptFormat("table object is not terminated by `;`".to_string())
    })?;
    let tail = tail
        .strip_prefix("\r\n")
        .or_else(|| tail.strip_prefix('\n'))
        .unwrap_or(tail);

    Ok((ResultTable::from_entries(entries)?, tail))
}
