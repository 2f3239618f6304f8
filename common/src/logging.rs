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
    env,
    fs,
    path::{Path, PathBuf},
};

use crate::{dir_utils, ConfigurationError, DEFAULT_LOG_CONFIG};

/// Determine the path to a log configuration file using the following precedence rules:
/// 1. Use the provided path (usually pulled from a CLI argument)
/// 2. Use the value in the `BITCANN_LOG_CONFIGURATION` envar
/// 3. The default path (OS-dependent), `~/.bitcann/log4rs.yml`
pub fn get_log_configuration_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path
        .or_else(|| {
            env::var_os("BITCANN_LOG_CONFIGURATION")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| dir_utils::default_path(DEFAULT_LOG_CONFIG))
}

/// Set up application-level logging using the Log4rs configuration file at `config_file`. The bundled default
/// configuration is installed first if the file does not exist.
pub fn initialize_logging(config_file: &Path) -> Result<(), ConfigurationError> {
    if !config_file.exists() {
        install_default_logfile_config(config_file)?;
    }
    log4rs::init_file(config_file, Default::default()).map_err(|e| {
        ConfigurationError::new(
            "log_config",
            Some(config_file.display().to_string()),
            format!("Could not load the logging configuration: {}", e),
        )
    })?;
    Ok(())
}

/// Installs the default logfile configuration, copied from `log4rs_sample.yml`, to the given path.
pub fn install_default_logfile_config(path: &Path) -> Result<(), std::io::Error> {
    let source = include_str!("../logging/log4rs_sample.yml");
    if let Some(d) = path.parent() {
        fs::create_dir_all(d)?;
    }
    fs::write(path, source)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn get_log_configuration_path_cli() {
        let path = get_log_configuration_path(Some(PathBuf::from("~/my-registry")));
        assert_eq!(path.to_str().unwrap(), "~/my-registry");
    }

    #[test]
    fn it_installs_the_sample_log_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("log4rs.yml");
        install_default_logfile_config(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("appenders"));
    }
}
