//! # User Configuration Schema (`config.yaml`)
//!
//! The only user-editable input of `setup-zsh`. It is parsed once per run and
//! passed by reference to every component; nothing else reads it.
//!
//! ## Example
//! ```yaml
//! theme: agnoster
//! external_plugins:
//!   - zsh-users/zsh-autosuggestions
//!   - zsh-users/zsh-syntax-highlighting
//! builtin_plugins:
//!   - git
//!   - z
//! tool_version: latest
//! ```
//!
//! All four keys are required. `builtin_plugins` only ends up in the rendered
//! `plugins=(...)` line; nothing is installed for them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal that selects "whatever was released last" for the auxiliary tool.
pub const LATEST: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Builtin theme name (`agnoster`) or an external theme repository (`romkatv/powerlevel10k`).
    pub theme: String,
    /// `owner/repo` identifiers fetched into the custom plugins directory, in order.
    pub external_plugins: Vec<String>,
    /// Plugins bundled with the framework. Documentation only.
    pub builtin_plugins: Vec<String>,
    pub tool_version: ToolVersion,
}

/// Requested version of the auxiliary tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolVersion {
    Latest,
    /// A concrete release tag such as `v0.18.0`.
    Pinned(String),
}

impl ToolVersion {
    pub fn is_latest(&self) -> bool {
        matches!(self, ToolVersion::Latest)
    }

    pub fn pinned(&self) -> Option<&str> {
        match self {
            ToolVersion::Latest => None,
            ToolVersion::Pinned(tag) => Some(tag),
        }
    }
}

impl From<String> for ToolVersion {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(LATEST) {
            ToolVersion::Latest
        } else {
            ToolVersion::Pinned(trimmed.to_string())
        }
    }
}

impl From<ToolVersion> for String {
    fn from(value: ToolVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolVersion::Latest => f.write_str(LATEST),
            ToolVersion::Pinned(tag) => f.write_str(tag),
        }
    }
}

/// How the configured theme is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    /// Ships with the framework; nothing to fetch.
    Builtin(String),
    /// Fetched from `https://github.com/<identifier>.git`.
    External { identifier: String },
}

impl Configuration {
    pub fn theme_source(&self) -> ThemeSource {
        let theme = self.theme.trim();
        if theme.contains('/') {
            ThemeSource::External {
                identifier: theme.to_string(),
            }
        } else {
            ThemeSource::Builtin(theme.to_string())
        }
    }

    /// Value written to `ZSH_THEME` in the rendered resource file.
    pub fn theme_setting(&self) -> String {
        match self.theme_source() {
            ThemeSource::Builtin(name) => name,
            ThemeSource::External { identifier } => {
                let repo = repo_name(&identifier);
                format!("{repo}/{repo}")
            }
        }
    }

    /// Names for the `plugins=(...)` line: builtin first, then external, duplicates kept.
    pub fn plugin_names(&self) -> Vec<String> {
        self.builtin_plugins
            .iter()
            .map(|p| p.trim().to_string())
            .chain(self.external_plugins.iter().map(|id| repo_name(id).to_string()))
            .collect()
    }

    /// Checks what serde cannot: identifiers must end in a usable directory name.
    pub fn validate(&self) -> Result<(), String> {
        if self.theme.trim().is_empty() {
            return Err("`theme` must not be empty".to_string());
        }
        check_shell_word("theme", self.theme.trim())?;
        for name in &self.builtin_plugins {
            check_shell_word("builtin_plugins", name.trim())?;
        }
        if let ThemeSource::External { identifier } = self.theme_source() {
            check_identifier("theme", &identifier)?;
        }
        for identifier in &self.external_plugins {
            check_identifier("external_plugins", identifier)?;
        }
        if let ToolVersion::Pinned(tag) = &self.tool_version
            && tag.is_empty()
        {
            return Err("`tool_version` must be \"latest\" or a version tag".to_string());
        }
        Ok(())
    }
}

/// Last path segment of an `owner/repo` identifier.
pub fn repo_name(identifier: &str) -> &str {
    identifier
        .trim()
        .trim_end_matches(".git")
        .rsplit('/')
        .next()
        .unwrap_or(identifier)
}

/// Names end up unquoted in `plugins=(...)` or inside `ZSH_THEME="..."`.
fn check_shell_word(field: &str, value: &str) -> Result<(), String> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || "-_.+@/".contains(c);
    if value.is_empty() || !value.chars().all(allowed) {
        return Err(format!(
            "`{field}` entry '{}' may only contain letters, digits and -_.+@/",
            value.escape_debug()
        ));
    }
    Ok(())
}

fn check_identifier(field: &str, identifier: &str) -> Result<(), String> {
    check_shell_word(field, identifier.trim())?;
    let name = repo_name(identifier);
    if name.is_empty() || name == "." || name == ".." || identifier.contains(char::is_whitespace) {
        return Err(format!(
            "`{field}` entry '{identifier}' is not an \"owner/repo\" identifier"
        ));
    }
    Ok(())
}
