use std::time::Duration;

use crate::common::ConfigError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CONTACT_TO: &str = "info@jglobalproperties.com";
const DEFAULT_CONTACT_FROM: &str = "JGlobal Properties <noreply@jglobalproperties.com>";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub backend_url: String,
    pub admin_key: String,
    pub wordpress: Option<WordpressConfig>,
    pub resend_api_key: Option<String>,
    pub contact_to: String,
    pub contact_from: String,
    pub bind_addr: String,
    pub backend_timeout: Option<Duration>,
    pub secure_cookies: bool,
}

#[derive(Debug, Clone)]
pub struct WordpressConfig {
    pub api_url: String,
    pub credentials: Option<(String, String)>,
}

impl SiteConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| -> Option<String> {
            keys.iter()
                .filter_map(|k| lookup(k))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        let backend_url = get(&["BACKEND_URL", "NEXT_PUBLIC_BACKEND_URL"])
            .ok_or(ConfigError::Missing("BACKEND_URL"))?;
        let backend_url = backend_url.trim_end_matches('/').to_string();
        if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "BACKEND_URL",
                value: backend_url,
            });
        }

        let admin_key = get(&["ADMIN_KEY", "NEXT_PUBLIC_ADMIN_KEY"])
            .ok_or(ConfigError::Missing("ADMIN_KEY"))?;

        let wordpress = get(&["WORDPRESS_API_URL", "NEXT_PUBLIC_WORDPRESS_API_URL"]).map(|url| {
            WordpressConfig {
                api_url: url.trim_end_matches('/').to_string(),
                credentials: get(&["WORDPRESS_USERNAME"]).zip(get(&["WORDPRESS_PASSWORD"])),
            }
        });

        let backend_timeout = match get(&["BACKEND_TIMEOUT_SECS"]) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    return Err(ConfigError::Invalid {
                        key: "BACKEND_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => None,
        };

        let secure_cookies = match get(&["SECURE_COOKIES"]) {
            Some(raw) => match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SECURE_COOKIES",
                        value: raw,
                    })
                }
            },
            None => true,
        };

        Ok(Self {
            backend_url,
            admin_key,
            wordpress,
            resend_api_key: get(&["RESEND_API_KEY"]),
            contact_to: get(&["CONTACT_TO"]).unwrap_or_else(|| DEFAULT_CONTACT_TO.to_string()),
            contact_from: get(&["CONTACT_FROM"])
                .unwrap_or_else(|| DEFAULT_CONTACT_FROM.to_string()),
            bind_addr: get(&["BIND_ADDR"]).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            backend_timeout,
            secure_cookies,
        })
    }
}
