//! Mana Client Configuration
//!
//! Loads client options from a `key = value` text file. Lines starting with
//! `#` and blank lines are skipped; unknown keys are ignored.

use mana_core::{ManaError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Width of the credential token on the wire
const TOKEN_LENGTH: usize = 32;

/// Client options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Game server host (from "serverhost" option)
    pub server_host: String,
    /// Game server port (from "serverport" option, default: 9604)
    pub server_port: u16,
    /// Character to play (from "playername" option)
    pub player_name: String,
    /// Credential token handed out by the account server (from "token" option)
    pub token: String,
    /// Data root (from "datadir" option)
    pub data_dir: PathBuf,
    /// Collision maps (from "mapsdir" option)
    pub maps_dir: PathBuf,
    /// Ability definitions (from "abilities" option)
    pub abilities_file: PathBuf,
    /// Milliseconds between two ticks (from "tickrate" option)
    pub tick_interval_ms: u64,
    /// Default tracing filter (from "loglevel" option)
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".into(),
            server_port: 9604,
            player_name: String::new(),
            token: String::new(),
            data_dir: "data".into(),
            maps_dir: "data/maps".into(),
            abilities_file: "data/abilities.json".into(),
            tick_interval_ms: 16,
            log_level: "info".into(),
        }
    }
}

impl ClientConfig {
    /// Load and validate an options file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ManaError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content);
        config.validate()?;
        Ok(config)
    }

    /// Parse options text on top of the defaults
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => config.parse_option(key.trim(), value.trim()),
                None => tracing::debug!("Ignoring config line without '=': {}", line),
            }
        }

        config
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key {
            "serverhost" => self.server_host = value.into(),
            "serverport" => parse_number(key, value, &mut self.server_port),
            "playername" => self.player_name = value.into(),
            "token" => self.token = value.into(),
            "datadir" => self.data_dir = value.into(),
            "mapsdir" => self.maps_dir = value.into(),
            "abilities" => self.abilities_file = value.into(),
            "tickrate" => parse_number(key, value, &mut self.tick_interval_ms),
            "loglevel" => self.log_level = value.into(),
            _ => tracing::debug!("Unknown config option: {}", key),
        }
    }

    /// Check values that would only fail later, on the wire
    pub fn validate(&self) -> Result<()> {
        if self.token.len() > TOKEN_LENGTH {
            return Err(ManaError::Config(format!(
                "token is {} bytes, at most {} allowed",
                self.token.len(),
                TOKEN_LENGTH
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(ManaError::Config("tickrate must be positive".into()));
        }
        Ok(())
    }

    /// Address to connect to, as `host:port`
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Display configuration summary
    pub fn display(&self) {
        tracing::info!("Client configuration:");
        tracing::info!("  Server: {}", self.server_address());
        if self.player_name.is_empty() {
            tracing::info!("  Player: (not set)");
        } else {
            tracing::info!("  Player: {}", self.player_name);
        }
        tracing::info!("  Token: {}", if self.token.is_empty() { "(empty)" } else { "(set)" });
        tracing::info!("  Data: {}", self.data_dir.display());
        tracing::info!("  Maps: {}", self.maps_dir.display());
        tracing::info!("  Abilities: {}", self.abilities_file.display());
        tracing::info!("  Tick: {} ms", self.tick_interval_ms);
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str, target: &mut T) {
    match value.parse() {
        Ok(parsed) => *target = parsed,
        Err(_) => tracing::warn!("Invalid value '{}' for {}, keeping default", value, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server_port, 9604);
        assert_eq!(config.server_address(), "127.0.0.1:9604");
        assert_eq!(config.tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_parse_simple_config() {
        let config_text = r#"
# local test server
serverhost = play.example.org
serverport = 9999
playername = Hero
mapsdir = /srv/maps
tickrate = 20
"#;
        let config = ClientConfig::parse(config_text);
        assert_eq!(config.server_address(), "play.example.org:9999");
        assert_eq!(config.player_name, "Hero");
        assert_eq!(config.maps_dir, PathBuf::from("/srv/maps"));
        assert_eq!(config.tick_interval_ms, 20);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_bad_numbers_keep_defaults() {
        let config = ClientConfig::parse("serverport = lots\ncolour = blue\nnoequals\n");
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "playername = Hero").unwrap();
        writeln!(file, "token = 0123456789abcdef").unwrap();
        let config = ClientConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.token, "0123456789abcdef");
    }

    #[test]
    fn test_load_rejects_long_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "token = {}", "x".repeat(33)).unwrap();
        let err = ClientConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ManaError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ClientConfig::load_from_file(dir.path().join("client.cfg")).unwrap_err();
        assert!(matches!(err, ManaError::Config(_)));
    }
}
