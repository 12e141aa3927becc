//! Layered credential resolution.
//!
//! The secret comes from the environment when the configured variable is
//! set, otherwise from a JSON credentials file in one of two shapes:
//! `{"api_key": "..."}` or `{"installed": {"client_secret": "..."}}`.
//! With the variable set, a missing, unreadable or malformed file does not
//! fail resolution; the environment secret is used on its own as an OAuth
//! access token.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{ConfigError, CredentialSource, Credentials, CredentialsConfig, Secret};

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    installed: Option<InstalledClient>,
}

#[derive(Debug, Deserialize)]
struct InstalledClient {
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
}

/// Resolves [`Credentials`] from environment and file. Does nothing until
/// [`ConfigLoader::load`] is called and never retries.
pub struct ConfigLoader {
    path: PathBuf,
    secret_env: String,
    require_env: bool,
    env: EnvLookup,
}

impl ConfigLoader {
    /// Loader reading `path` with `secret_env` as the override variable.
    pub fn new(path: impl Into<PathBuf>, secret_env: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            secret_env: secret_env.into(),
            require_env: false,
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    #[must_use]
    pub fn from_settings(config: &CredentialsConfig) -> Self {
        Self::new(config.file.clone(), config.secret_env.clone()).require_env(config.require_env)
    }

    /// Fail with `MissingSecret` if the environment variable is unset.
    #[must_use]
    pub const fn require_env(mut self, required: bool) -> Self {
        self.require_env = required;
        self
    }

    /// Replace the process environment lookup.
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn secret_env(&self) -> &str {
        &self.secret_env
    }

    /// Resolve credentials.
    ///
    /// # Errors
    /// Returns the matching [`ConfigError`] kind; all are terminal.
    pub fn load(&self) -> Result<Credentials, ConfigError> {
        self.load_with_source().map(|(credentials, _)| credentials)
    }

    /// Resolve credentials and report where the secret came from.
    ///
    /// # Errors
    /// Same as [`ConfigLoader::load`].
    pub fn load_with_source(&self) -> Result<(Credentials, CredentialSource), ConfigError> {
        let env_secret = (self.env)(&self.secret_env)
            .map(Secret::new)
            .filter(|secret| !secret.is_blank());

        if self.require_env && env_secret.is_none() {
            return Err(ConfigError::MissingSecret {
                name: self.secret_env.clone(),
            });
        }

        match (self.read_file(), env_secret) {
            (Ok(credentials), Some(secret)) => Ok((
                with_secret(credentials, secret),
                CredentialSource::EnvironmentOverride,
            )),
            (Ok(credentials), None) => {
                if credentials.secret().is_blank() {
                    return Err(ConfigError::MissingSecret {
                        name: secret_field_name(&credentials).to_string(),
                    });
                }
                Ok((credentials, CredentialSource::File))
            }
            (Err(err), Some(secret)) => {
                let source = match err {
                    ConfigError::FileNotFound { .. } => CredentialSource::Environment,
                    other => CredentialSource::EnvironmentFallback {
                        file_error: other.kind(),
                    },
                };
                Ok((
                    Credentials::OAuth {
                        client_id: None,
                        client_secret: secret,
                    },
                    source,
                ))
            }
            (Err(err), None) => Err(err),
        }
    }

    fn read_file(&self) -> Result<Credentials, ConfigError> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| map_read_error(&self.path, &e))?;

        let file: CredentialsFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::MalformedConfig {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        if let Some(key) = file.api_key {
            return Ok(Credentials::ApiKey(Secret::new(key)));
        }

        if let Some(installed) = file.installed {
            return Ok(Credentials::OAuth {
                client_id: installed.client_id,
                client_secret: Secret::new(installed.client_secret.unwrap_or_default()),
            });
        }

        Err(ConfigError::MalformedConfig {
            path: self.path.clone(),
            message: "expected `api_key` or `installed.client_secret`".into(),
        })
    }
}

fn map_read_error(path: &Path, err: &std::io::Error) -> ConfigError {
    match err.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => ConfigError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ConfigError::MalformedConfig {
            path: path.to_path_buf(),
            message: format!("unreadable: {err}"),
        },
    }
}

fn with_secret(credentials: Credentials, secret: Secret) -> Credentials {
    match credentials {
        Credentials::ApiKey(_) => Credentials::ApiKey(secret),
        Credentials::OAuth { client_id, .. } => Credentials::OAuth {
            client_id,
            client_secret: secret,
        },
    }
}

const fn secret_field_name(credentials: &Credentials) -> &'static str {
    match credentials {
        Credentials::ApiKey(_) => "api_key",
        Credentials::OAuth { .. } => "installed.client_secret",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ENV: &str = "SUBS_EXPORT_SECRET";

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn loader_for(path: &Path) -> ConfigLoader {
        ConfigLoader::new(path, ENV).with_env(no_env)
    }

    #[test]
    fn test_api_key_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_key": "AIza-123"}"#).unwrap();

        let (creds, source) = loader_for(&path).load_with_source().unwrap();
        assert_eq!(creds, Credentials::ApiKey(Secret::new("AIza-123")));
        assert_eq!(source, CredentialSource::File);
    }

    #[test]
    fn test_installed_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"installed": {"client_id": "abc.apps", "client_secret": "s3cr3t", "redirect_uris": []}}"#,
        )
        .unwrap();

        let creds = loader_for(&path).load().unwrap();
        assert_eq!(creds.kind(), "oauth");
        assert_eq!(creds.secret().expose(), "s3cr3t");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_key": "from-file"}"#).unwrap();

        let (creds, source) = ConfigLoader::new(&path, ENV)
            .with_env(|name| (name == ENV).then(|| "from-env".to_string()))
            .load_with_source()
            .unwrap();
        assert_eq!(creds, Credentials::ApiKey(Secret::new("from-env")));
        assert_eq!(source, CredentialSource::EnvironmentOverride);
    }

    #[test]
    fn test_env_alone_without_file() {
        let dir = tempdir().unwrap();
        let (creds, source) = ConfigLoader::new(dir.path().join("absent.json"), ENV)
            .with_env(|_| Some("token".to_string()))
            .load_with_source()
            .unwrap();
        assert_eq!(creds.kind(), "oauth");
        assert_eq!(source, CredentialSource::Environment);
    }

    #[test]
    fn test_env_wins_over_unusable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        for content in ["not json", r#"{"foo": 1}"#] {
            fs::write(&path, content).unwrap();
            let (creds, source) = ConfigLoader::new(&path, ENV)
                .with_env(|_| Some("token".to_string()))
                .load_with_source()
                .unwrap();
            assert_eq!(creds.secret().expose(), "token", "content: {content}");
            assert_eq!(creds.kind(), "oauth");
            assert_eq!(
                source,
                CredentialSource::EnvironmentFallback {
                    file_error: "MalformedConfig"
                }
            );
        }
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_key": "from-file"}"#).unwrap();

        let creds = ConfigLoader::new(&path, ENV)
            .with_env(|_| Some("   ".to_string()))
            .load()
            .unwrap();
        assert_eq!(creds.secret().expose(), "from-file");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = loader_for(&dir.path().join("absent.json")).load().unwrap_err();
        assert_eq!(err.kind(), "FileNotFound");
    }

    #[test]
    fn test_malformed_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        for content in ["not json", "[]", r#"{"foo": 1}"#, r#"{"installed": "x"}"#] {
            fs::write(&path, content).unwrap();
            let err = loader_for(&path).load().unwrap_err();
            assert_eq!(err.kind(), "MalformedConfig", "content: {content}");
        }
    }

    #[test]
    fn test_empty_secret_is_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"installed": {"client_id": "abc"}}"#).unwrap();

        let err = loader_for(&path).load().unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingSecret {
                name: "installed.client_secret".into()
            }
        );
    }

    #[test]
    fn test_required_env_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_key": "from-file"}"#).unwrap();

        let err = loader_for(&path).require_env(true).load().unwrap_err();
        assert_eq!(err, ConfigError::MissingSecret { name: ENV.into() });
    }

    #[test]
    fn test_permission_denied_mapping() {
        let err = map_read_error(
            Path::new("config.json"),
            &std::io::Error::from(ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), "PermissionDenied");
    }
}
