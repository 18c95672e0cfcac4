//! Server configuration loaded via OrthoConfig.
//!
//! Every value may be given as a `PULSE_*` environment variable, a CLI flag
//! or a configuration file entry. Unset values fall back to the defaults
//! below.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use cap_std::{ambient_authority, fs::Dir};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::outbound::persistence::{DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Shortest signing secret accepted from a file.
pub const TOKEN_SECRET_MIN_BYTES: usize = 32;

/// Configuration values for the HTTP server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PULSE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; the in-process store is used when unset.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_timeout_secs: Option<u64>,
    /// File holding the token signing secret.
    pub token_secret_file: Option<PathBuf>,
    /// Lifetime of issued bearer tokens in seconds.
    #[ortho_config(default = 3600)]
    pub token_ttl_secs: u64,
    /// Origin allowed to call the API from a browser.
    pub allowed_origin: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            pool_max_size: None,
            pool_timeout_secs: None,
            token_secret_file: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            allowed_origin: None,
        }
    }
}

impl ServerSettings {
    /// Configured bind address, falling back to `0.0.0.0:5000`.
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::InvalidInput`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw:?}: {err}"),
            )
        })
    }

    /// Database URL with blank values treated as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_MAX_SIZE)
    }

    pub fn pool_timeout(&self) -> Duration {
        self.pool_timeout_secs
            .map_or(DEFAULT_CONNECTION_TIMEOUT, Duration::from_secs)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.token_ttl_secs).unwrap_or(i64::MAX / 1000))
    }

    pub fn allowed_origin(&self) -> &str {
        self.allowed_origin
            .as_deref()
            .unwrap_or(DEFAULT_ALLOWED_ORIGIN)
    }
}

/// Read a token signing secret through `cap_std`.
///
/// # Errors
/// Fails when the file cannot be read or holds fewer than
/// [`TOKEN_SECRET_MIN_BYTES`] bytes after trimming trailing whitespace.
pub fn read_token_secret(path: &Path) -> io::Result<Zeroizing<Vec<u8>>> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("token secret path has no file name: {}", path.display()),
        )
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    let mut secret = Zeroizing::new(directory.read(Path::new(file_name))?);
    while secret.last().is_some_and(u8::is_ascii_whitespace) {
        secret.pop();
    }
    if secret.len() < TOKEN_SECRET_MIN_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "token secret at {} must be at least {TOKEN_SECRET_MIN_BYTES} bytes",
                path.display()
            ),
        ));
    }
    Ok(secret)
}

/// Random signing secret for development runs; tokens die with the process.
pub fn ephemeral_token_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0_u8; 64]);
    OsRng.fill_bytes(&mut secret);
    secret
}

#[cfg(test)]
mod tests {
    //! Unit tests for server configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "PULSE_BIND_ADDR",
        "PULSE_DATABASE_URL",
        "PULSE_POOL_MAX_SIZE",
        "PULSE_POOL_TIMEOUT_SECS",
        "PULSE_TOKEN_SECRET_FILE",
        "PULSE_TOKEN_TTL_SECS",
        "PULSE_ALLOWED_ORIGIN",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("pulse-backend")])
            .expect("config should load")
    }

    fn write_secret(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("{name}-{}", uuid::Uuid::new_v4()));
        Dir::open_ambient_dir(&dir, ambient_authority())
            .expect("open temp dir")
            .write(path.file_name().expect("file name"), contents)
            .expect("write secret");
        path
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|var| (var, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:5000".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.pool_max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(settings.pool_timeout(), DEFAULT_CONNECTION_TIMEOUT);
        assert_eq!(settings.token_ttl(), chrono::Duration::hours(1));
        assert_eq!(settings.allowed_origin(), DEFAULT_ALLOWED_ORIGIN);
    }

    #[rstest]
    fn default_settings_match_an_unconfigured_load() {
        let _guard = lock_env(VARS.map(|var| (var, None::<String>)));

        let loaded = load_from_empty_args();
        let defaults = ServerSettings::default();
        assert_eq!(loaded.token_ttl_secs, defaults.token_ttl_secs);
        assert_eq!(loaded.token_ttl(), defaults.token_ttl());
        assert_eq!(loaded.allowed_origin(), defaults.allowed_origin());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PULSE_BIND_ADDR", Some("127.0.0.1:8080".to_owned())),
            (
                "PULSE_DATABASE_URL",
                Some("postgres://localhost/pulse".to_owned()),
            ),
            ("PULSE_POOL_MAX_SIZE", Some("4".to_owned())),
            ("PULSE_POOL_TIMEOUT_SECS", Some("5".to_owned())),
            ("PULSE_TOKEN_SECRET_FILE", None),
            ("PULSE_TOKEN_TTL_SECS", Some("60".to_owned())),
            (
                "PULSE_ALLOWED_ORIGIN",
                Some("https://pulse.example".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("parses"),
            "127.0.0.1:8080".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/pulse"));
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(settings.pool_timeout(), Duration::from_secs(5));
        assert_eq!(settings.token_ttl(), chrono::Duration::seconds(60));
        assert_eq!(settings.allowed_origin(), "https://pulse.example");
    }

    #[rstest]
    #[case(Some("   "))]
    #[case(None)]
    fn blank_database_url_selects_memory_store(#[case] url: Option<&str>) {
        let settings = ServerSettings {
            database_url: url.map(str::to_owned),
            ..ServerSettings::default()
        };
        assert!(settings.database_url().is_none());
    }

    #[rstest]
    fn invalid_bind_address_is_rejected() {
        let settings = ServerSettings {
            bind_addr: Some("localhost".to_owned()),
            ..ServerSettings::default()
        };
        let err = settings.bind_addr().expect_err("not a socket address");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn secret_file_is_trimmed() {
        let path = write_secret("pulse-secret", b"0123456789abcdef0123456789abcdef\n");
        let secret = read_token_secret(&path).expect("secret loads");
        assert_eq!(secret.as_slice(), b"0123456789abcdef0123456789abcdef");
    }

    #[rstest]
    fn short_secret_is_rejected() {
        let path = write_secret("pulse-short-secret", b"too short");
        let err = read_token_secret(&path).expect_err("short secret");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[rstest]
    fn ephemeral_secrets_differ() {
        assert_ne!(
            ephemeral_token_secret().as_slice(),
            ephemeral_token_secret().as_slice()
        );
    }
}
