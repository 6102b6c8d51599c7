/// Player configuration
use crate::error::{AppError, Result};
use reliva_playback::{CoordinatorConfig, ResolutionPolicy, DEFAULT_FALLBACK_PLAYBACK_ID};
use reliva_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerAppConfig {
    #[serde(default = "default_resolver")]
    pub resolver: ResolverSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default)]
    pub policy: PolicyKind,

    #[serde(default = "default_fallback_playback_id")]
    pub fallback_playback_id: String,

    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Fallback,
    Strict,
}

impl PlayerAppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; without one, `reliva.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("reliva.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (e.g. RELIVA_RESOLVER__BASE_URL)
        settings = settings.add_source(
            config::Environment::with_prefix("RELIVA")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.resolver.base_url.trim().is_empty() {
            return Err(AppError::Config(
                "Resolver base URL is required (set RELIVA_RESOLVER__BASE_URL)".to_string(),
            ));
        }

        if self.resolver.platform.trim().is_empty() {
            return Err(AppError::Config("Resolver platform is required".to_string()));
        }

        if self.resolver.timeout_secs == 0 {
            return Err(AppError::Config(
                "Resolver timeout must be at least one second".to_string(),
            ));
        }

        if self.playback.policy == PolicyKind::Fallback
            && self.playback.fallback_playback_id.trim().is_empty()
        {
            return Err(AppError::Config(
                "Fallback policy needs a fallback_playback_id".to_string(),
            ));
        }

        Ok(())
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new(self.resolver.base_url.clone())
            .with_platform(self.resolver.platform.clone())
            .with_timeout(Duration::from_secs(self.resolver.timeout_secs))
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        let policy = match self.playback.policy {
            PolicyKind::Fallback => ResolutionPolicy::Fallback {
                playback_id: self.playback.fallback_playback_id.clone(),
            },
            PolicyKind::Strict => ResolutionPolicy::Strict,
        };

        CoordinatorConfig {
            policy,
            resolve_timeout: Duration::from_secs(self.resolver.timeout_secs),
            event_capacity: self.playback.event_capacity,
        }
    }
}

// Default values
fn default_resolver() -> ResolverSettings {
    ResolverSettings {
        base_url: default_base_url(),
        platform: default_platform(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_platform() -> String {
    "youtube".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        policy: PolicyKind::default(),
        fallback_playback_id: default_fallback_playback_id(),
        event_capacity: default_event_capacity(),
    }
}

fn default_fallback_playback_id() -> String {
    DEFAULT_FALLBACK_PLAYBACK_ID.to_string()
}

fn default_event_capacity() -> usize {
    64
}

impl Default for PlayerAppConfig {
    fn default() -> Self {
        Self {
            resolver: default_resolver(),
            playback: default_playback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = PlayerAppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolver.platform, "youtube");
        assert_eq!(config.playback.policy, PolicyKind::Fallback);
    }

    #[test]
    fn loads_partial_file_with_defaults() {
        let file = write_config(
            r#"
            [resolver]
            base_url = "https://reliva.example.com"

            [playback]
            policy = "strict"
            "#,
        );

        let config = PlayerAppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.resolver.base_url, "https://reliva.example.com");
        assert_eq!(config.resolver.timeout_secs, 10);
        assert_eq!(config.playback.policy, PolicyKind::Strict);
        assert_eq!(config.coordinator_config().policy, ResolutionPolicy::Strict);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = PlayerAppConfig::load(Some(Path::new("/nonexistent/reliva.toml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn fallback_policy_requires_id() {
        let mut config = PlayerAppConfig::default();
        config.playback.fallback_playback_id = "  ".to_string();
        assert!(config.validate().is_err());

        config.playback.policy = PolicyKind::Strict;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = PlayerAppConfig::default();
        config.resolver.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn coordinator_config_uses_fallback_id() {
        let mut config = PlayerAppConfig::default();
        config.playback.fallback_playback_id = "placeholder".to_string();

        let coordinator = config.coordinator_config();
        assert_eq!(
            coordinator.policy,
            ResolutionPolicy::Fallback {
                playback_id: "placeholder".to_string()
            }
        );
        assert_eq!(coordinator.resolve_timeout, Duration::from_secs(10));
    }
}
