use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Base URL advertised in the generated API documentation
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub path: String,
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window_secs: u64,
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub enabled: bool,
    pub run_on_startup: bool,
    /// Minute of every hour at which the population job fires
    pub minute: u32,
    pub iterations: u32,
    pub posts_per_autobot: u32,
    pub comments_per_post: u32,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Job {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub rate_limit: RateLimit,
    pub job: Job,
}

/// Environment variables and the setting each one overrides
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("PUBLIC_URL", "server.public_url"),
    ("DATABASE_PATH", "database.path"),
    ("SEED_DEMO_DATA", "database.seed_demo_data"),
    ("RATE_LIMIT_MAX_REQUESTS", "rate_limit.max_requests"),
    ("RATE_LIMIT_WINDOW_SECS", "rate_limit.window_secs"),
    ("TRUST_FORWARDED_FOR", "rate_limit.trust_forwarded_for"),
    ("JOB_ENABLED", "job.enabled"),
    ("JOB_RUN_ON_STARTUP", "job.run_on_startup"),
    ("JOB_MINUTE", "job.minute"),
    ("JOB_ITERATIONS", "job.iterations"),
    ("PLACEHOLDER_BASE_URL", "job.base_url"),
];

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_file_name = "settings.toml";

        // settings.toml in the current directory, or in tweetai-server/ during development
        let candidates = [
            PathBuf::from(config_file_name),
            PathBuf::from("tweetai-server").join(config_file_name),
        ];

        Self::load(&candidates, |key| std::env::var(key).ok())
    }

    /// Build settings from the given optional files, then defaults, then
    /// environment overrides looked up through `env`
    pub fn load<F>(config_files: &[PathBuf], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder();

        for path in config_files {
            if path.exists() {
                builder = builder.add_source(File::from(path.clone()).required(false));
            }
        }

        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.public_url", "http://localhost:3000")?
            .set_default("database.path", "tweetai.db")?
            .set_default("database.seed_demo_data", false)?
            .set_default("rate_limit.max_requests", 5)?
            .set_default("rate_limit.window_secs", 60)?
            .set_default("rate_limit.trust_forwarded_for", false)?
            .set_default("job.enabled", true)?
            .set_default("job.run_on_startup", false)?
            .set_default("job.minute", 0)?
            .set_default("job.iterations", 500)?
            .set_default("job.posts_per_autobot", 10)?
            .set_default("job.comments_per_post", 10)?
            .set_default("job.base_url", "https://jsonplaceholder.typicode.com")?
            .set_default("job.request_timeout_secs", 10)?;

        // Environment variables have the highest priority
        for (var, key) in ENV_OVERRIDES {
            if let Some(value) = env(*var) {
                builder = builder.set_override(*key, value)?;
            }
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.job.minute > 59 {
            return Err(ConfigError::Message(format!(
                "job.minute must be between 0 and 59 (got {})",
                self.job.minute
            )));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Message(
                "rate_limit.max_requests must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Message(
                "rate_limit.window_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::load(&[], |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load_with(&[]).expect("Failed to load default settings");

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.database.path, "tweetai.db");
        assert!(!settings.database.seed_demo_data);
        assert_eq!(settings.rate_limit.max_requests, 5);
        assert_eq!(settings.rate_limit.window_secs, 60);
        assert!(settings.job.enabled);
        assert_eq!(settings.job.minute, 0);
        assert_eq!(settings.job.iterations, 500);
        assert_eq!(settings.job.posts_per_autobot, 10);
        assert_eq!(settings.job.comments_per_post, 10);
        assert_eq!(settings.job.base_url, "https://jsonplaceholder.typicode.com");
    }

    #[test]
    fn test_environment_overrides() {
        let settings = load_with(&[
            ("PORT", "8080"),
            ("DATABASE_PATH", ":memory:"),
            ("JOB_ENABLED", "false"),
            ("RATE_LIMIT_MAX_REQUESTS", "20"),
        ])
        .expect("Failed to load settings");

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.path, ":memory:");
        assert!(!settings.job.enabled);
        assert_eq!(settings.rate_limit.max_requests, 20);
    }

    #[test]
    fn test_invalid_minute_rejected() {
        let result = load_with(&[("JOB_MINUTE", "75")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = load_with(&[("PORT", "not-a-port")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_rate_limit_window_rejected() {
        let result = load_with(&[("RATE_LIMIT_WINDOW_SECS", "0")]);
        assert!(result.is_err());
    }
}
