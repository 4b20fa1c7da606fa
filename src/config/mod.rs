mod settings;

pub use settings::{DebugConfig, TomlConfig, TomlDebugConfig, ENV_DEBUG, ENV_DEBUG_DIR};
