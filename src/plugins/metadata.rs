use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{PluginError, SDK_VERSION, namespace};
use crate::version::{VersionType, compare_version};

/// What a plugin declares about itself to the host CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,
    pub version: VersionType,
    /// Oldest host CLI the plugin runs on.
    #[serde(default)]
    pub min_cli_version: VersionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<Namespace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    /// SDK the plugin was built against. Set by the framework, not the author;
    /// the host uses it to keep older plugins on the behaviour they were built for.
    #[serde(default)]
    pub sdk_version: VersionType,
}

impl PluginMetadata {
    /// Metadata stamped with this SDK's version.
    pub fn new(name: impl Into<String>, version: VersionType) -> Self {
        Self {
            name: name.into(),
            version,
            min_cli_version: VersionType::default(),
            namespaces: Vec::new(),
            commands: Vec::new(),
            sdk_version: SDK_VERSION,
        }
    }

    pub fn min_cli_version(mut self, version: VersionType) -> Self {
        self.min_cli_version = version;
        self
    }

    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn sdk_version(mut self, version: VersionType) -> Self {
        self.sdk_version = version;
        self
    }

    /// Command whose full name or aliased full name is `name`.
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.full_names().iter().any(|n| n == name))
    }

    /// Declared namespaces nested directly under `parent` (`""` for top level).
    pub fn child_namespaces<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Namespace> {
        self.namespaces
            .iter()
            .filter(move |ns| ns.parent_name() == parent)
    }

    /// Reject an empty or whitespace-containing plugin name and commands that
    /// collide on a full name or alias.
    pub fn validate(&self) -> Result<(), PluginError> {
        if self.name.trim().is_empty() {
            return Err(PluginError::InvalidName {
                name: self.name.clone(),
                reason: "name is empty".into(),
            });
        }
        if self.name.contains(char::is_whitespace) {
            return Err(PluginError::InvalidName {
                name: self.name.clone(),
                reason: "name contains whitespace".into(),
            });
        }

        let mut seen = HashSet::new();
        for name in self.commands.iter().flat_map(Command::full_names) {
            if !seen.insert(name.clone()) {
                return Err(PluginError::DuplicateCommand {
                    plugin: self.name.clone(),
                    name,
                });
            }
        }
        Ok(())
    }

    /// Fail when `cli_version` is older than the plugin's minimum.
    pub fn check_cli_version(&self, cli_version: VersionType) -> Result<(), PluginError> {
        if cli_version < self.min_cli_version {
            return Err(PluginError::IncompatibleCli {
                plugin: self.name.clone(),
                required: self.min_cli_version,
                found: cli_version,
            });
        }
        Ok(())
    }

    /// Whether a host built with SDK `host_sdk` understands this plugin, i.e.
    /// the plugin was not built against a newer SDK.
    pub fn is_sdk_compatible(&self, host_sdk: &str) -> bool {
        compare_version(&self.sdk_version.to_string(), host_sdk).is_le()
    }
}

/// A group of related commands, run as `<cli> <namespace> <command>`.
///
/// Namespaces may be predefined by the host and shared, or declared by the
/// plugin. A name with spaces is nested: `"A B"` is `B` under `A`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Fully qualified name.
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Namespace {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn parent_name(&self) -> &str {
        namespace::parent(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Fully qualified name of the owning namespace, empty for the root.
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    /// Usually the command's short name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Usage detail shown in command help.
    #[serde(default)]
    pub usage: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,
    #[serde(default)]
    pub hidden: bool,
}

impl Command {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Name prefixed with the namespace.
    pub fn full_name(&self) -> String {
        namespace::qualified(&self.namespace, &self.name)
    }

    /// Full name followed by the aliased full name, when an alias is set.
    pub fn full_names(&self) -> Vec<String> {
        let mut names = vec![self.full_name()];
        if let Some(alias) = self.alias.as_deref().filter(|a| !a.is_empty()) {
            names.push(namespace::qualified(&self.namespace, alias));
        }
        names
    }
}

/// A command option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whether the option takes a value.
    #[serde(default)]
    pub has_value: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl Flag {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self) -> Self {
        self.has_value = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}
