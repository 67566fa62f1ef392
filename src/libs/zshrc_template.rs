// Renders the shipped `~/.zshrc` template from the configuration. The rendered
// bytes are what the resource-file step compares against and writes.

use std::path::Path;

use crate::schemas::configuration::Configuration;

const TEMPLATE: &str = include_str!("../../templates/zshrc.template");

/// Renders the resource file for `config`, with `framework_root` as `$ZSH`.
pub fn render(config: &Configuration, framework_root: &Path) -> String {
    TEMPLATE
        .replace("{{ZSH}}", &framework_root.display().to_string())
        .replace("{{THEME}}", &config.theme_setting())
        .replace("{{PLUGINS}}", &config.plugin_names().join(" "))
}
