//! Canonical query-string codec.
//!
//! Parsing keeps each parameter's original text next to its decoded form so
//! that stringifying an untouched query reproduces the caller's casing and
//! ordering. Serialization is canonical rather than byte-identical:
//!
//! - escapes of the always-safe characters `-_.!~*'()` are unescaped
//! - every other reserved or non-ASCII character is percent-encoded
//! - keys keep their original case, but lookups are case-insensitive
//!
//! ```
//! use storefront_runtime::QueryParameters;
//!
//! let query = QueryParameters::parse("CMP=1&xyz=2&a&b=&&c=%2e");
//! assert_eq!(query.to_string(), "CMP=1&xyz=2&a&b=&&c=.");
//! assert_eq!(query.value("cmp"), Some("1"));
//! ```

use std::fmt;
use std::str::FromStr;

/// Characters never percent-encoded on output.
const PRESERVED: &[char] = &['-', '_', '.', '!', '~', '*', '\'', '(', ')'];

/// Replace `%XX` escapes of [`PRESERVED`] characters with the characters
/// themselves. All other escapes stay as they are.
fn unescape_preserved(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('%') {
        out.push_str(&rest[..at]);
        let escape = &rest[at..];
        let preserved = escape
            .get(1..3)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .map(char::from)
            .filter(|ch| PRESERVED.contains(ch));
        match preserved {
            Some(ch) => {
                out.push(ch);
                rest = &escape[3..];
            }
            None => {
                out.push('%');
                rest = &escape[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Percent-decode, leaving malformed escapes as literal text.
fn decode(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        if PRESERVED.contains(&ch) {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

/// One `key[=value]` pair of a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    /// Decoded, lower-cased key.
    pub key: String,
    /// Key as it appeared on the wire.
    pub original_key: String,
    /// Decoded value; `None` when the chunk had no `=`.
    pub value: Option<String>,
    /// Value as it appeared on the wire.
    pub original_value: Option<String>,
}

impl QueryParameter {
    /// Parse a single `&`-separated chunk.
    pub fn parse(chunk: &str) -> Self {
        let (raw_key, raw_value) = match chunk.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (chunk, None),
        };
        let original_key = unescape_preserved(raw_key);
        let original_value = raw_value.map(unescape_preserved);
        Self {
            key: decode(&original_key).to_lowercase(),
            value: original_value.as_deref().map(decode),
            original_key,
            original_value,
        }
    }

    /// Build a parameter from decoded text.
    pub fn new(key: &str, value: Option<&str>) -> Self {
        Self {
            key: key.to_lowercase(),
            original_key: encode(key),
            value: value.map(str::to_string),
            original_value: value.map(encode),
        }
    }

    /// Replace the value, keeping the key.
    pub fn set_value(&mut self, value: Option<&str>) {
        self.value = value.map(str::to_string);
        self.original_value = value.map(encode);
    }

    /// Whether this parameter's key equals `key`, ignoring case.
    pub fn matches(&self, key: &str) -> bool {
        self.key == key.to_lowercase()
    }
}

impl fmt::Display for QueryParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&decode(&self.original_key)))?;
        if let Some(value) = &self.original_value {
            write!(f, "={}", encode(&decode(value)))?;
        }
        Ok(())
    }
}

/// Ordered list of query parameters. Duplicate keys are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    parameters: Vec<QueryParameter>,
}

impl QueryParameters {
    /// Parse an optional query string (without the leading `?`).
    pub fn new(raw: Option<&str>) -> Self {
        raw.map(Self::parse).unwrap_or_default()
    }

    /// Parse a query string. An empty string has no parameters.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        raw.split('&').map(QueryParameter::parse).collect()
    }

    pub fn from_parameters(parameters: Vec<QueryParameter>) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &[QueryParameter] {
        &self.parameters
    }

    pub fn into_parameters(self) -> Vec<QueryParameter> {
        self.parameters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryParameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Decoded keys in order, duplicates included.
    pub fn keys(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.key.as_str()).collect()
    }

    /// First parameter whose key matches, ignoring case.
    pub fn get(&self, key: &str) -> Option<&QueryParameter> {
        self.parameters.iter().find(|p| p.matches(key))
    }

    /// Every parameter whose key matches, ignoring case.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a QueryParameter> + 'a {
        self.parameters.iter().filter(move |p| p.matches(key))
    }

    /// Decoded value of the first matching parameter.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|p| p.value.as_deref())
    }

    /// Append a parameter built from decoded text.
    pub fn append_parameter(&mut self, key: &str, value: Option<&str>) {
        self.parameters.push(QueryParameter::new(key, value));
    }

    /// Remove every parameter whose key matches, ignoring case. Returns the
    /// number removed.
    pub fn delete_by_key(&mut self, key: &str) -> usize {
        let before = self.parameters.len();
        self.parameters.retain(|p| !p.matches(key));
        before - self.parameters.len()
    }
}

impl fmt::Display for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{parameter}")?;
        }
        Ok(())
    }
}

impl FromStr for QueryParameters {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Vec<QueryParameter>> for QueryParameters {
    fn from(parameters: Vec<QueryParameter>) -> Self {
        Self::from_parameters(parameters)
    }
}

impl FromIterator<QueryParameter> for QueryParameters {
    fn from_iter<I: IntoIterator<Item = QueryParameter>>(iter: I) -> Self {
        Self::from_parameters(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a QueryParameters {
    type Item = &'a QueryParameter;
    type IntoIter = std::slice::Iter<'a, QueryParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

impl IntoIterator for QueryParameters {
    type Item = QueryParameter;
    type IntoIter = std::vec::IntoIter<QueryParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.into_iter()
    }
}
