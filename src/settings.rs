use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading settings at startup
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: basic_toml::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SchedeulerSettings {
    pub application: ApplicationSettings,
    pub supabase: SupabaseSettings,
    pub cookies: CookieSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Public origin of the web app. Empty means redirects stay relative.
    pub site_url: String,
    pub cors_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseSettings {
    /// Project base URL, e.g. `https://abcd.supabase.co`
    pub url: String,
    pub anon_key: String,
    /// Key used for profile reads. Falls back to `anon_key` when empty.
    pub service_role_key: String,
    pub profiles_table: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    pub secure: bool,
    pub access_token_name: String,
    pub refresh_token_name: String,
    pub code_verifier_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter, used only when `RUST_LOG` is unset
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            site_url: String::new(),
            cors_origins: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for SupabaseSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            service_role_key: String::new(),
            profiles_table: "profiles".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: true,
            access_token_name: "sb-access-token".to_string(),
            refresh_token_name: "sb-refresh-token".to_string(),
            code_verifier_name: "sb-auth-token-code-verifier".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SchedeulerSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - A settings file exists but cannot be read
    /// - TOML parsing fails
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_env_file(Path::new(".env"));

        let (mut settings, sources) = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(settings.logging.level.as_str()),
        )
        .try_init()?;
        for source in &sources {
            log::info!("Loaded settings from {}", source.display());
        }

        Ok(settings)
    }

    /// Load base settings with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `SCHEDEULER_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// Also returns the files that were read, in load order.
    fn load_base_settings() -> Result<(Self, Vec<PathBuf>), SettingsError> {
        let mut settings = Self::default();
        let mut sources = Vec::new();

        let default_config_path = PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(&default_config_path)?;
            sources.push(default_config_path);
        }

        if let Ok(secrets_dir) = std::env::var("SCHEDEULER_SECRETS_DIR") {
            let secrets_path = Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                settings = Self::from_file(&secrets_path)?;
                sources.push(secrets_path);
            }
        }

        Ok((settings, sources))
    }

    /// Parse a single TOML settings file; missing sections take defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        basic_toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_supabase_env_overrides(&mut settings.supabase);
        Self::apply_cookie_env_overrides(&mut settings.cookies);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        Self::apply_string_env_override("HOST", &mut app_settings.host);
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        Self::apply_string_env_override("SITE_URL", &mut app_settings.site_url);
        Self::apply_string_env_override("CORS_ORIGINS", &mut app_settings.cors_origins);
    }

    fn apply_supabase_env_overrides(supabase_settings: &mut SupabaseSettings) {
        Self::apply_string_env_override("SUPABASE_URL", &mut supabase_settings.url);
        Self::apply_string_env_override("SUPABASE_ANON_KEY", &mut supabase_settings.anon_key);
        Self::apply_string_env_override(
            "SUPABASE_SERVICE_ROLE_KEY",
            &mut supabase_settings.service_role_key,
        );
        Self::apply_string_env_override("PROFILES_TABLE", &mut supabase_settings.profiles_table);
        if let Ok(value_str) = std::env::var("SUPABASE_TIMEOUT_SECS") {
            if let Ok(value) = value_str.parse::<u64>() {
                supabase_settings.request_timeout_secs = value;
            }
        }
    }

    fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        if let Ok(cookie_secure_str) = std::env::var("COOKIE_SECURE") {
            if let Ok(cookie_secure) = cookie_secure_str.parse::<bool>() {
                cookie_settings.secure = cookie_secure;
            }
        }
    }

    /// Empty variables are ignored so a blank `.env` entry cannot wipe a value
    fn apply_string_env_override(env_var: &str, target: &mut String) {
        if let Ok(value) = std::env::var(env_var) {
            if !value.is_empty() {
                *target = value;
            }
        }
    }

    /// Load environment variables from a dotenv-style file
    fn load_env_file(path: &Path) {
        if let Ok(contents) = fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Get CORS origins as a vector of strings
    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Site origin used to make redirects absolute, if configured
    #[must_use]
    pub fn site_url(&self) -> Option<&str> {
        let site_url = self.application.site_url.trim();
        (!site_url.is_empty()).then_some(site_url)
    }
}

impl SupabaseSettings {
    /// GoTrue endpoint root, e.g. `https://abcd.supabase.co/auth/v1`
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url.trim_end_matches('/'))
    }

    /// PostgREST endpoint root, e.g. `https://abcd.supabase.co/rest/v1`
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }

    /// Key sent with profile reads
    #[must_use]
    pub fn profile_read_key(&self) -> &str {
        if self.service_role_key.is_empty() {
            &self.anon_key
        } else {
            &self.service_role_key
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clean_env_vars() {
        for var in [
            "HOST",
            "PORT",
            "SITE_URL",
            "CORS_ORIGINS",
            "SUPABASE_URL",
            "SUPABASE_ANON_KEY",
            "SUPABASE_SERVICE_ROLE_KEY",
            "PROFILES_TABLE",
            "SUPABASE_TIMEOUT_SECS",
            "COOKIE_SECURE",
            "SCHEDEULER_SECRETS_DIR",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = SchedeulerSettings::default();
        assert_eq!(settings.get_bind_address(), "0.0.0.0:8080");
        assert_eq!(settings.supabase.profiles_table, "profiles");
        assert_eq!(settings.supabase.request_timeout_secs, 10);
        assert!(settings.cookies.secure);
        assert!(settings.site_url().is_none());
    }

    #[test]
    fn test_supabase_urls() {
        let supabase = SupabaseSettings {
            url: "https://abcd.supabase.co/".to_string(),
            ..SupabaseSettings::default()
        };
        assert_eq!(supabase.auth_url(), "https://abcd.supabase.co/auth/v1");
        assert_eq!(supabase.rest_url(), "https://abcd.supabase.co/rest/v1");
    }

    #[test]
    fn test_profile_read_key_falls_back_to_anon_key() {
        let mut supabase = SupabaseSettings {
            anon_key: "anon".to_string(),
            ..SupabaseSettings::default()
        };
        assert_eq!(supabase.profile_read_key(), "anon");

        supabase.service_role_key = "service".to_string();
        assert_eq!(supabase.profile_read_key(), "service");
    }

    #[test]
    fn test_cors_origins_split() {
        let mut settings = SchedeulerSettings::default();
        settings.application.cors_origins =
            "http://localhost:3000, https://schedeuler.app,".to_string();
        assert_eq!(
            settings.get_cors_origins(),
            vec!["http://localhost:3000", "https://schedeuler.app"]
        );
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clean_env_vars();
        std::env::set_var("PORT", "9090");
        std::env::set_var("SITE_URL", "https://schedeuler.app");
        std::env::set_var("SUPABASE_URL", "https://proj.supabase.co");
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");
        std::env::set_var("SUPABASE_TIMEOUT_SECS", "3");
        std::env::set_var("COOKIE_SECURE", "false");

        let mut settings = SchedeulerSettings::default();
        SchedeulerSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.application.port, 9090);
        assert_eq!(settings.site_url(), Some("https://schedeuler.app"));
        assert_eq!(settings.supabase.url, "https://proj.supabase.co");
        assert_eq!(settings.supabase.anon_key, "anon-key");
        assert_eq!(settings.supabase.request_timeout_secs, 3);
        assert!(!settings.cookies.secure);

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_rust_log_does_not_overwrite_configured_level() {
        clean_env_vars();
        std::env::set_var("RUST_LOG", "debug");

        let mut settings = SchedeulerSettings::default();
        settings.logging.level = "warn".to_string();
        SchedeulerSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.logging.level, "warn");
        std::env::remove_var("RUST_LOG");
    }

    #[test]
    #[serial]
    fn test_invalid_numeric_env_override_is_ignored() {
        clean_env_vars();
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("SUPABASE_TIMEOUT_SECS", "soon");

        let mut settings = SchedeulerSettings::default();
        SchedeulerSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.application.port, 8080);
        assert_eq!(settings.supabase.request_timeout_secs, 10);

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_empty_env_value_does_not_override() {
        clean_env_vars();
        std::env::set_var("PROFILES_TABLE", "");

        let mut settings = SchedeulerSettings::default();
        SchedeulerSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.supabase.profiles_table, "profiles");
        clean_env_vars();
    }

    #[test]
    fn test_from_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[application]
port = 3001
site_url = "https://schedeuler.app"

[supabase]
url = "https://proj.supabase.co"
anon_key = "anon"
"#
        )
        .unwrap();

        let settings = SchedeulerSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.application.port, 3001);
        assert_eq!(settings.application.host, "0.0.0.0");
        assert_eq!(settings.supabase.anon_key, "anon");
        assert_eq!(settings.supabase.profiles_table, "profiles");
        assert_eq!(settings.cookies.access_token_name, "sb-access-token");
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[application\nport = ").unwrap();

        let err = SchedeulerSettings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    #[serial]
    fn test_load_env_file() {
        clean_env_vars();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment\n\nSUPABASE_ANON_KEY = from-dotenv").unwrap();

        SchedeulerSettings::load_env_file(file.path());
        assert_eq!(std::env::var("SUPABASE_ANON_KEY").unwrap(), "from-dotenv");

        clean_env_vars();
    }
}
