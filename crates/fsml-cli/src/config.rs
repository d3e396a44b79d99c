use anyhow::{Context, Result};
use fsml_engine::EngineConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".fsmlrc";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub colored: bool,

    #[serde(default)]
    pub verbose: bool,

    #[serde(flatten)]
    pub engine: EngineConfig,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `.fsmlrc` in the working directory, then `~/.fsmlrc`.
    pub fn load() -> Result<Self> {
        let mut config_paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            config_paths.push(home.join(CONFIG_FILE));
        }

        for path in config_paths {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config in {:?}", path))?;
        Ok(config)
    }

    /// Command-line flags only ever switch behaviour on or off relative to the file.
    pub fn merge_cli_args(&mut self, strict: bool, no_fallback: bool, verbose: bool, no_color: bool) {
        if strict {
            self.engine.strict = true;
        }

        if no_fallback {
            self.engine.fallback = false;
        }

        if verbose {
            self.verbose = true;
        }

        if no_color {
            self.colored = false;
        }
    }
}
