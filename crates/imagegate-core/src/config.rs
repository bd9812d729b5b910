use std::path::Path;

use serde::{Deserialize, Serialize};

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "imagegate.toml";

/// imagegate.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub builder: BuilderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// git executable (resolved through PATH when not absolute)
    #[serde(default = "default_git_program")]
    pub program: String,
    /// Name of the single remote added to the clone
    #[serde(default = "default_remote")]
    pub remote: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Path to the image builder executable
    #[serde(default = "default_builder_path")]
    pub path: String,
    /// argv[0] passed to the builder
    #[serde(default = "default_builder_name")]
    pub name: String,
    /// Flags appended after the generated dockerfile/context/destination flags
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: default_git_program(),
            remote: default_remote(),
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            path: default_builder_path(),
            name: default_builder_name(),
            extra_args: Vec::new(),
        }
    }
}

impl GateConfig {
    /// Load from imagegate.toml in the given directory, or return defaults if not found.
    pub fn load(dir: &Path) -> crate::Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from an explicit config file. A missing file is an error here.
    pub fn load_from(config_path: &Path) -> crate::Result<Self> {
        let content =
            std::fs::read_to_string(config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.to_path_buf(),
                source: e,
            })?;
        toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }
}

fn default_git_program() -> String {
    "git".to_owned()
}

fn default_remote() -> String {
    "origin".to_owned()
}

// See https://github.com/GoogleContainerTools/kaniko/blob/main/deploy/Dockerfile
fn default_builder_path() -> String {
    "/kaniko/executor".to_owned()
}

fn default_builder_name() -> String {
    "executor".to_owned()
}
