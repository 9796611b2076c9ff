use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default task file name, relative to the working directory
pub const DEFAULT_TASK_FILE: &str = "tasks.txt";

/// Configuration from tickoff.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Task file path, relative to the working directory
    #[serde(default = "default_task_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_task_file(),
        }
    }
}

fn default_task_file() -> String {
    DEFAULT_TASK_FILE.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    /// Capture mouse clicks and drags
    #[serde(default = "default_true")]
    pub mouse: bool,
    /// Hex overrides keyed by theme slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: false,
            mouse: true,
            colors: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.file, "tasks.txt");
        assert!(config.ui.mouse);
        assert!(!config.ui.show_key_hints);
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config: Config = toml::from_str(
            r##"
[ui]
show_key_hints = true

[ui.colors]
highlight = "#FF0000"
"##,
        )
        .unwrap();
        assert_eq!(config.store.file, "tasks.txt");
        assert!(config.ui.show_key_hints);
        assert!(config.ui.mouse);
        assert_eq!(config.ui.colors["highlight"], "#FF0000");
    }
}
