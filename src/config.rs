use std::{env, time::Duration};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_PATH: &str = "races.json";

/// Where the races document lives and how to authenticate against it.
#[derive(Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub token: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub port: u16,
    /// `None` when owner, repo or token is missing; signups then report a
    /// misconfigured server instead of failing at startup.
    pub github: Option<GitHubConfig>,
    pub conflict_retries: u32,
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = get("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        let github = match (get("GITHUB_OWNER"), get("GITHUB_REPO"), get("GITHUB_TOKEN")) {
            (Some(owner), Some(repo), Some(token)) => Some(GitHubConfig {
                api_url: get("GITHUB_API_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                owner,
                repo,
                path: get("GITHUB_PATH").unwrap_or_else(|| DEFAULT_PATH.to_string()),
                token,
                timeout: get("GITHUB_TIMEOUT_SECS")
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs),
            }),
            _ => None,
        };

        let conflict_retries = get("SIGNUP_CONFLICT_RETRIES")
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(0);

        Self {
            port,
            github,
            conflict_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> SiteConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        SiteConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let config = config_from(&[
            ("GITHUB_OWNER", "club"),
            ("GITHUB_REPO", "site"),
            ("GITHUB_TOKEN", "secret"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.conflict_retries, 0);
        let github = config.github.expect("github config");
        assert_eq!(github.path, "races.json");
        assert_eq!(github.api_url, DEFAULT_API_URL);
        assert!(github.timeout.is_none());
    }

    #[test]
    fn empty_token_means_misconfigured() {
        let config = config_from(&[
            ("GITHUB_OWNER", "club"),
            ("GITHUB_REPO", "site"),
            ("GITHUB_TOKEN", "  "),
        ]);
        assert!(config.github.is_none());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let config = config_from(&[
            ("GITHUB_OWNER", "club"),
            ("GITHUB_REPO", "site"),
            ("GITHUB_TOKEN", "secret"),
            ("GITHUB_API_URL", "http://127.0.0.1:9000/"),
        ]);
        let github = config.github.unwrap();
        assert_eq!(github.api_url, "http://127.0.0.1:9000");
        assert!(!format!("{github:?}").contains("secret"));
    }
}
