//! OCR misread correction.

use unicode_normalization::UnicodeNormalization;

/// Built-in substitutions, applied in this order.
pub const OCR_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("O/H", "D/H"),
    ("0/", "D/"),
    ("Ofi", "Off"),
    ("SI B", "S/B"),
];

/// Fixes known OCR misreads with a fixed table of global substring
/// replacements.
///
/// With the built-in table the result is idempotent: no replacement produces
/// text that another pattern would match again.
#[derive(Debug, Clone)]
pub struct OcrNormalizer {
    substitutions: Vec<(String, String)>,
    unicode_nfc: bool,
}

impl OcrNormalizer {
    /// Create a normalizer with the built-in table.
    pub fn new() -> Self {
        Self {
            substitutions: OCR_SUBSTITUTIONS
                .iter()
                .map(|(p, r)| (p.to_string(), r.to_string()))
                .collect(),
            unicode_nfc: true,
        }
    }

    /// Append substitutions after the built-in ones. Empty patterns are ignored.
    pub fn with_substitutions<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.substitutions
            .extend(extra.into_iter().filter(|(pattern, _)| !pattern.is_empty()));
        self
    }

    /// Enable or disable NFC normalization ahead of the substitutions.
    pub fn with_unicode_nfc(mut self, enabled: bool) -> Self {
        self.unicode_nfc = enabled;
        self
    }

    /// Normalize one line.
    pub fn normalize(&self, line: &str) -> String {
        let mut result = if self.unicode_nfc {
            line.nfc().collect()
        } else {
            line.to_string()
        };

        for (pattern, replacement) in &self.substitutions {
            if result.contains(pattern.as_str()) {
                log::trace!("OCR fix `{}` -> `{}` in {:?}", pattern, replacement, line);
                result = result.replace(pattern.as_str(), replacement);
            }
        }

        result
    }
}

impl Default for OcrNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
