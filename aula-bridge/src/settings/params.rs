// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use aula_base::{
    config::{
        Config as AulaConfig, DbConfig, Logging, LoggingOutput,
        LoggingRotation,
    },
    error::Error,
};
use serde::Deserialize;
use tracing::error;

use crate::config::Config;

const TARGET_PARAMS: &str = "Aula-Bridge-Params";

#[derive(Debug, Deserialize, Default)]
pub struct Params {
    #[serde(default)]
    aula: AulaParams,
}

impl Params {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            aula: AulaParams::from_env("AULA")?,
        })
    }

    pub fn mix_config(&self, other_config: Params) -> Self {
        Self {
            aula: self.aula.mix_config(other_config.aula),
        }
    }
}

impl TryFrom<Params> for Config {
    type Error = Error;

    fn try_from(params: Params) -> Result<Self, Self::Error> {
        let logging = params.aula.logging;
        let rotation =
            LoggingRotation::parse(&logging.rotation).ok_or_else(|| {
                Error::Config(format!(
                    "Unknown logging rotation '{}'",
                    logging.rotation
                ))
            })?;

        Ok(Self {
            aula_config: AulaConfig {
                database: DbConfig::build(&params.aula.database_path),
            },
            prometheus: params.aula.prometheus,
            logging: Logging {
                output: LoggingOutput::parse(&logging.output),
                file_path: logging.file_path,
                rotation,
                max_size: logging.max_size,
                max_files: logging.max_files,
                level: logging.level,
            },
            test_hooks: params.aula.test_hooks,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AulaParams {
    #[serde(default = "default_database_path")]
    database_path: String,
    #[serde(default = "default_prometheus")]
    prometheus: String,
    #[serde(default)]
    test_hooks: bool,
    #[serde(default)]
    logging: LoggingParams,
}

impl AulaParams {
    fn from_env(parent: &str) -> Result<Self, Error> {
        let mut config = config::Config::builder();
        config = config.add_source(
            config::Environment::with_prefix(parent).try_parsing(true),
        );

        let config = config.build().map_err(|e| {
            error!(TARGET_PARAMS, "Error building config: {}", e);
            Error::Config(format!("Error building config: {}", e))
        })?;

        let aula_params: AulaParams = config.try_deserialize().map_err(|e| {
            error!(TARGET_PARAMS, "Error try deserialize config: {}", e);
            Error::Config(format!("Error try deserialize config: {}", e))
        })?;

        Ok(Self {
            database_path: aula_params.database_path,
            prometheus: aula_params.prometheus,
            test_hooks: aula_params.test_hooks,
            logging: LoggingParams::from_env(&format!("{parent}_"))?,
        })
    }

    fn mix_config(&self, other_config: AulaParams) -> Self {
        let database_path =
            if other_config.database_path != default_database_path() {
                other_config.database_path
            } else {
                self.database_path.clone()
            };

        let prometheus = if other_config.prometheus != default_prometheus() {
            other_config.prometheus
        } else {
            self.prometheus.clone()
        };

        Self {
            database_path,
            prometheus,
            test_hooks: self.test_hooks || other_config.test_hooks,
            logging: self.logging.mix_config(other_config.logging),
        }
    }
}

impl Default for AulaParams {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            prometheus: default_prometheus(),
            test_hooks: false,
            logging: LoggingParams::default(),
        }
    }
}

fn default_prometheus() -> String {
    "0.0.0.0:3050".to_owned()
}

fn default_database_path() -> String {
    "data/aula.db".to_owned()
}

#[derive(Debug, Deserialize, Clone)]
struct LoggingParams {
    #[serde(default = "default_log_output")]
    pub output: String, // "stdout" | "file" | "stdout,file"
    #[serde(default = "default_log_file_path")]
    pub file_path: String,
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
    #[serde(default = "default_log_max_size")]
    pub max_size: usize, // bytes
    #[serde(default = "default_log_max_files")]
    pub max_files: usize,
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_output() -> String {
    "stdout".into()
}
fn default_log_file_path() -> String {
    "logs".into()
}
fn default_log_rotation() -> String {
    "size".into()
}
fn default_log_max_size() -> usize {
    100 * 1024 * 1024
}
fn default_log_max_files() -> usize {
    3
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingParams {
    fn default() -> Self {
        LoggingParams {
            output: default_log_output(),
            file_path: default_log_file_path(),
            rotation: default_log_rotation(),
            max_size: default_log_max_size(),
            max_files: default_log_max_files(),
            level: default_log_level(),
        }
    }
}

impl LoggingParams {
    /// Reads `AULA_LOGGING_*` variables.
    fn from_env(parent: &str) -> Result<Self, Error> {
        let mut cfg = config::Config::builder();
        cfg = cfg.add_source(
            config::Environment::with_prefix(&format!("{parent}LOGGING"))
                .try_parsing(true),
        );
        let built = cfg.build().map_err(|e| {
            Error::Config(format!("Error building logging config: {}", e))
        })?;
        built.try_deserialize().map_err(|e| {
            Error::Config(format!("Error try deserialize logging config: {}", e))
        })
    }

    /// Values of `other` win when they differ from the defaults.
    fn mix_config(&self, other: LoggingParams) -> LoggingParams {
        LoggingParams {
            output: if other.output != default_log_output() {
                other.output
            } else {
                self.output.clone()
            },
            file_path: if other.file_path != default_log_file_path() {
                other.file_path
            } else {
                self.file_path.clone()
            },
            rotation: if other.rotation != default_log_rotation() {
                other.rotation
            } else {
                self.rotation.clone()
            },
            max_size: if other.max_size != default_log_max_size() {
                other.max_size
            } else {
                self.max_size
            },
            max_files: if other.max_files != default_log_max_files() {
                other.max_files
            } else {
                self.max_files
            },
            level: if other.level != default_log_level() {
                other.level
            } else {
                self.level.clone()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env, io::Write};

    use serial_test::serial;

    use super::*;
    use crate::settings::build_config;

    const VARS: [&str; 6] = [
        "AULA_DATABASE_PATH",
        "AULA_PROMETHEUS",
        "AULA_TEST_HOOKS",
        "AULA_LOGGING_OUTPUT",
        "AULA_LOGGING_ROTATION",
        "AULA_LOGGING_MAX_FILES",
    ];

    fn clear_env() {
        for var in VARS {
            // Tests touching the environment run serially.
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = build_config(true, "").unwrap();
        assert_eq!(
            config.aula_config.database,
            DbConfig::SQLite {
                path: "data/aula.db".to_owned()
            }
        );
        assert_eq!(config.prometheus, "0.0.0.0:3050");
        assert!(!config.test_hooks);
        assert_eq!(config.logging, Logging::default());
    }

    #[test]
    #[serial]
    fn test_env_params() {
        clear_env();
        unsafe {
            env::set_var("AULA_DATABASE_PATH", ":memory:");
            env::set_var("AULA_PROMETHEUS", "");
            env::set_var("AULA_TEST_HOOKS", "true");
            env::set_var("AULA_LOGGING_OUTPUT", "stdout,file");
            env::set_var("AULA_LOGGING_ROTATION", "daily");
            env::set_var("AULA_LOGGING_MAX_FILES", "7");
        }

        let config = build_config(true, "").unwrap();
        clear_env();

        assert_eq!(config.aula_config.database, DbConfig::Memory);
        assert_eq!(config.prometheus, "");
        assert!(config.test_hooks);
        assert!(config.logging.output.stdout && config.logging.output.file);
        assert_eq!(config.logging.rotation, LoggingRotation::Daily);
        assert_eq!(config.logging.max_files, 7);
    }

    #[test]
    #[serial]
    fn test_file_overrides_env() {
        clear_env();
        unsafe {
            env::set_var("AULA_DATABASE_PATH", "env.db");
            env::set_var("AULA_LOGGING_MAX_FILES", "7");
        }

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[aula]\ndatabase_path = \"file.db\"\n\n[aula.logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config =
            build_config(true, file.path().to_str().unwrap()).unwrap();
        clear_env();

        assert_eq!(
            config.aula_config.database,
            DbConfig::SQLite {
                path: "file.db".to_owned()
            }
        );
        assert_eq!(config.logging.level, "debug");
        // Left at its default in the file, so the env value stays.
        assert_eq!(config.logging.max_files, 7);
    }

    #[test]
    #[serial]
    fn test_unknown_rotation_is_config_error() {
        clear_env();
        unsafe { env::set_var("AULA_LOGGING_ROTATION", "fortnightly") };
        let result = build_config(true, "");
        clear_env();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    #[serial]
    fn test_missing_file_is_config_error() {
        clear_env();
        assert!(matches!(
            build_config(false, "/nonexistent/aula.toml"),
            Err(Error::Config(_))
        ));
    }
}
