// HTTPS access: version discovery against the GitHub API and release archive
// downloads. Wrapped in a trait so the resolver can be tested offline.

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::errors::FetchError;
use crate::log_debug;
use colored::Colorize;

const USER_AGENT: &str = concat!("setup-zsh/", env!("CARGO_PKG_VERSION"));

pub trait HttpClient {
    /// GETs `url` and decodes the body as JSON.
    fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;

    /// GETs `url` and streams the body into `dest`.
    fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Blocking client backed by a shared `ureq::Agent`.
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout_connect(Duration::from_secs(15))
            .timeout_read(Duration::from_secs(120))
            .build();
        Self { agent }
    }

    fn get(&self, url: &str) -> Result<ureq::Response, FetchError> {
        log_debug!("[HTTP] GET {}", url.cyan());
        self.agent
            .get(url)
            .set("Accept", "application/vnd.github+json, application/octet-stream")
            .call()
            .map_err(|e| FetchError::Http {
                url: url.to_string(),
                reason: match e {
                    ureq::Error::Status(code, response) => {
                        format!("HTTP {} {}", code, response.status_text())
                    }
                    ureq::Error::Transport(t) => t.to_string(),
                },
            })
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for UreqClient {
    fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        self.get(url)?
            .into_json::<serde_json::Value>()
            .map_err(|e| FetchError::Http {
                url: url.to_string(),
                reason: format!("invalid JSON body: {e}"),
            })
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = self.get(url)?;
        let mut file = File::create(dest)?;
        let bytes = io::copy(&mut response.into_reader(), &mut file)?;
        log_debug!(
            "[HTTP] Downloaded {} bytes to {}",
            bytes,
            dest.display().to_string().yellow()
        );
        Ok(())
    }
}

/// Extracts a non-empty string field from a JSON object.
///
/// Absent, `null`, non-string and empty values are all discovery failures.
pub fn string_field(value: &serde_json::Value, url: &str, field: &str) -> Result<String, FetchError> {
    match value.get(field).and_then(|v| v.as_str()).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(FetchError::MissingField {
            url: url.to_string(),
            field: field.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_field_reads_tag_name() {
        let body = json!({ "tag_name": "v0.18.0", "name": "eza v0.18.0" });
        assert_eq!(string_field(&body, "u", "tag_name").unwrap(), "v0.18.0");
    }

    #[test]
    fn string_field_rejects_null_absent_and_empty() {
        for body in [json!({ "tag_name": null }), json!({}), json!({ "tag_name": "  " }), json!({ "tag_name": 3 })] {
            assert!(matches!(
                string_field(&body, "u", "tag_name"),
                Err(FetchError::MissingField { .. })
            ));
        }
    }
}
