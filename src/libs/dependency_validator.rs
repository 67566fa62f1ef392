// Checks that the external capabilities an install run relies on exist before
// anything is mutated. Purely read-only: a lookup on the search path per
// capability, nothing is executed.

use std::collections::BTreeSet;
use std::fmt;

use colored::Colorize;

use crate::errors::SetupError;
use crate::libs::host::Host;
use crate::libs::state_prober::find_program;
use crate::schemas::configuration::Configuration;
use crate::{log_debug, log_error, log_info};

/// An external capability the install sequence depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// `git`, for plugin and theme fetches.
    SourceControl,
    /// `curl`, which feeds the framework's install script to `sh`.
    HttpsFetch,
    /// `sudo`, unless the run already is root.
    PrivilegeElevation,
    /// Reading `tag_name` from the version-discovery response.
    JsonExtractor,
}

impl Capability {
    /// The program providing this capability, `None` when it is built in.
    pub fn program(self) -> Option<&'static str> {
        match self {
            Capability::SourceControl => Some("git"),
            Capability::HttpsFetch => Some("curl"),
            Capability::PrivilegeElevation => Some("sudo"),
            // Decoded in-process with serde_json.
            Capability::JsonExtractor => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::SourceControl => "source-control fetch",
            Capability::HttpsFetch => "HTTPS fetch",
            Capability::PrivilegeElevation => "privilege elevation",
            Capability::JsonExtractor => "JSON field extractor",
        };
        match self.program() {
            Some(program) => write!(f, "{name} (`{program}`)"),
            None => f.write_str(name),
        }
    }
}

/// Capabilities every install run needs, checked before the configuration is read.
pub fn base_capabilities() -> BTreeSet<Capability> {
    BTreeSet::from([
        Capability::SourceControl,
        Capability::HttpsFetch,
        Capability::PrivilegeElevation,
    ])
}

/// Extra capabilities implied by the loaded configuration.
pub fn config_capabilities(config: &Configuration) -> BTreeSet<Capability> {
    let mut required = BTreeSet::new();
    if config.tool_version.is_latest() {
        required.insert(Capability::JsonExtractor);
    }
    required
}

fn is_available(host: &Host, capability: Capability) -> bool {
    match capability {
        Capability::PrivilegeElevation if host.is_root() => true,
        other => match other.program() {
            Some(program) => find_program(host, program).is_some(),
            None => true,
        },
    }
}

/// Fails with every missing capability (not just the first) so one run reports them all.
pub fn check(host: &Host, required: &BTreeSet<Capability>) -> Result<(), SetupError> {
    log_info!("[Deps] Checking {} required capabilities...", required.len());
    let missing: Vec<Capability> = required
        .iter()
        .copied()
        .filter(|c| {
            let available = is_available(host, *c);
            log_debug!("[Deps] {} available: {}", c, available);
            !available
        })
        .collect();

    if missing.is_empty() {
        log_info!("[Deps] {}", "All required capabilities are available.".green());
        return Ok(());
    }
    for capability in &missing {
        log_error!("[Deps] Missing: {}", capability.to_string().red());
    }
    Err(SetupError::MissingDependencies(missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::testing::{FakeHttp, FakeRunner};
    use crate::libs::utilities::file_operations::memory::MemoryFs;
    use crate::schemas::configuration::ToolVersion;
    use std::ffi::OsString;

    fn host<'a>(fs: &'a MemoryFs, runner: &'a FakeRunner, http: &'a FakeHttp, user: &str) -> Host<'a> {
        Host {
            fs,
            runner,
            http,
            search_path: OsString::from("/usr/bin"),
            user: user.to_string(),
        }
    }

    #[test]
    fn reports_every_missing_capability() {
        let (fs, runner, http) = (MemoryFs::new(), FakeRunner::new(), FakeHttp::new());
        fs.add_file("/usr/bin/curl", "");
        let host = host(&fs, &runner, &http, "ada");

        match check(&host, &base_capabilities()) {
            Err(SetupError::MissingDependencies(missing)) => assert_eq!(
                missing,
                vec![Capability::SourceControl, Capability::PrivilegeElevation]
            ),
            other => panic!("expected missing dependencies, got {other:?}"),
        }
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn root_needs_no_sudo() {
        let (fs, runner, http) = (MemoryFs::new(), FakeRunner::new(), FakeHttp::new());
        fs.add_file("/usr/bin/git", "");
        fs.add_file("/usr/bin/curl", "");
        let host = host(&fs, &runner, &http, "root");

        assert!(check(&host, &base_capabilities()).is_ok());
    }

    #[test]
    fn json_extractor_only_for_latest() {
        let mut config = Configuration {
            theme: "agnoster".into(),
            external_plugins: vec![],
            builtin_plugins: vec![],
            tool_version: ToolVersion::Latest,
        };
        assert!(config_capabilities(&config).contains(&Capability::JsonExtractor));

        config.tool_version = ToolVersion::Pinned("v0.18.0".into());
        assert!(config_capabilities(&config).is_empty());
    }
}
