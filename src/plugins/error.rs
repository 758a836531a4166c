use crate::version::VersionType;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Duplicate command '{name}' in plugin '{plugin}'")]
    DuplicateCommand { plugin: String, name: String },

    #[error("Plugin '{plugin}' requires CLI {required} or later, found {found}")]
    IncompatibleCli {
        plugin: String,
        required: VersionType,
        found: VersionType,
    },
}
