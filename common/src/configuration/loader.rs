// Copyright 2024. The Tari Project
//
// Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
// following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
// disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
// following disclaimer in the documentation and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
// products derived from this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
// INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
// SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
// WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
// USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! # Application configuration
//!
//! The `config` crate is used to merge the configuration file with environment overrides. Any struct that
//! implements [`Deserialize`][serde::Deserialize], [`Default`] and [`SubConfigPath`] can be extracted from the
//! merged configuration via [`ConfigLoader::load_from`]. Missing sections fall back to the struct's `Default`, and
//! missing keys inside a section fall back to serde defaults.

use config::Config;
use log::*;
use serde::de::DeserializeOwned;

use crate::ConfigurationError;

const LOG_TARGET: &str = "common::configuration::loader";

/// Names the configuration table a struct is loaded from.
pub trait SubConfigPath {
    /// Main configuration section, e.g. `registry` for a `[registry]` table.
    fn main_key_prefix() -> &'static str;
}

/// Configuration loader based on [`SubConfigPath`] selectors
pub trait ConfigLoader: SubConfigPath + DeserializeOwned + Default {
    /// Try to load the configuration from the supplied `Config` using `main_key_prefix()`.
    fn load_from(config: &Config) -> Result<Self, ConfigurationError> {
        match config.get::<Self>(Self::main_key_prefix()) {
            Ok(loaded) => Ok(loaded),
            Err(config::ConfigError::NotFound(key)) => {
                debug!(
                    target: LOG_TARGET,
                    "Configuration section '{}' not present, using defaults", key
                );
                Ok(Self::default())
            },
            Err(err) => Err(err.into()),
        }
    }
}

impl<C> ConfigLoader for C where C: SubConfigPath + DeserializeOwned + Default {}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct SubTestConfig {
        name: String,
        count: u32,
    }

    impl Default for SubTestConfig {
        fn default() -> Self {
            Self {
                name: "default".to_string(),
                count: 7,
            }
        }
    }

    impl SubConfigPath for SubTestConfig {
        fn main_key_prefix() -> &'static str {
            "sub"
        }
    }

    #[test]
    fn it_falls_back_to_defaults_when_the_section_is_missing() {
        let config = Config::builder().build().unwrap();
        let loaded = SubTestConfig::load_from(&config).unwrap();
        assert_eq!(loaded, SubTestConfig::default());
    }

    #[test]
    fn it_merges_partial_sections_with_serde_defaults() {
        let config = Config::builder()
            .set_override("sub.name", "registry")
            .unwrap()
            .build()
            .unwrap();
        let loaded = SubTestConfig::load_from(&config).unwrap();
        assert_eq!(loaded.name, "registry");
        assert_eq!(loaded.count, 7);
    }

    #[test]
    fn it_rejects_values_of_the_wrong_type() {
        let config = Config::builder()
            .set_override("sub.count", "not a number")
            .unwrap()
            .build()
            .unwrap();
        assert!(SubTestConfig::load_from(&config).is_err());
    }
}
