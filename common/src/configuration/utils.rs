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

use std::{
    fs,
    fs::File,
    io::Write,
    path::Path,
};

use config::{Config, Environment};
use log::*;

use crate::ConfigurationError;

const LOG_TARGET: &str = "common::configuration::utils";

/// Loads the configuration file at `path`, installing the default template first when `create_if_not_exists` is
/// set and no file is present. Environment variables prefixed with `env_prefix` (for example
/// `BITCANN_REGISTRY__TLD`) override file values.
pub fn load_configuration<P: AsRef<Path>>(
    path: P,
    create_if_not_exists: bool,
    env_prefix: &str,
) -> Result<Config, ConfigurationError> {
    let path = path.as_ref();
    if !path.exists() && create_if_not_exists {
        info!(
            target: LOG_TARGET,
            "Installing new configuration file at {}",
            path.display()
        );
        install_default_config_file(path)?;
    }

    let config = Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(Environment::with_prefix(env_prefix).prefix_separator("_").separator("__"))
        .build()?;
    info!(target: LOG_TARGET, "Configuration file loaded.");
    Ok(config)
}

/// Installs a new configuration file template, copied from `registry_sample.toml` to the given path.
pub fn install_default_config_file(path: &Path) -> Result<(), std::io::Error> {
    let source = include_str!("../../config/presets/registry_sample.toml");
    if let Some(d) = path.parent() {
        fs::create_dir_all(d)?
    };
    let mut file = File::create(path)?;
    file.write_all(source.as_ref())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_installs_and_loads_the_sample_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("config.toml");
        let config = load_configuration(&path, true, "BITCANN_TEST_INSTALL").unwrap();
        assert!(path.exists());
        assert_eq!(config.get_string("registry.network").unwrap(), "chipnet");
    }

    #[test]
    fn it_loads_nothing_from_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_configuration(&path, false, "BITCANN_TEST_MISSING").unwrap();
        assert!(!path.exists());
        assert!(config.get_string("registry.network").is_err());
    }
}
