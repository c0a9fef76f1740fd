use crate::error::{PromptError, Result};
use url::Url;

/// Query parameter that carries the generated title.
pub const KEYWORD_PARAM: &str = "q";

/// Builds links to the external keyword checker page.
#[derive(Debug, Clone)]
pub struct KeywordChecker {
    base_url: Url,
}

impl KeywordChecker {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PromptError::ConfigError(format!("Invalid keyword checker URL: {}", e)))?;
        Ok(Self { base_url })
    }

    /// The bare base URL, or the base URL with the title percent-encoded as `?q=`.
    pub fn url_for(&self, title: Option<&str>) -> String {
        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => title,
            None => return self.base_url.to_string(),
        };

        let pair = format!("{}={}", KEYWORD_PARAM, component_encode(title));
        let query = match self.base_url.query() {
            Some(existing) if !existing.is_empty() => format!("{}&{}", existing, pair),
            _ => pair,
        };

        let mut url = self.base_url.to_string();
        if let Some(cut) = url.find(|c| c == '?' || c == '#') {
            url.truncate(cut);
        }
        url.push('?');
        url.push_str(&query);
        if let Some(fragment) = self.base_url.fragment() {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

/// Percent-encodes every UTF-8 byte except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
/// Spaces become `%20`, never `+`.
fn component_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
