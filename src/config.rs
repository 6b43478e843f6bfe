use std::{env, time::Duration};

pub const DEFAULT_API_URL: &str = "https://api.gofile.io/";
pub const DEFAULT_UPLOAD_DOMAIN: &str = "gofile.io";

/// Endpoint and transport settings shared by every call of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub upload_domain: String,
    /// Forwarded to the HTTP client. This crate imposes no timeout itself.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_owned(),
            upload_domain: DEFAULT_UPLOAD_DOMAIN.to_owned(),
            timeout: None,
            user_agent: concat!("gofile-rs/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl Config {
    /// Reads `GOFILE_API_URL`, `GOFILE_UPLOAD_DOMAIN` and `GOFILE_TIMEOUT_SECS`,
    /// falling back to the defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(url) = lookup("GOFILE_API_URL") {
            config = config.api_url(url);
        }
        if let Some(domain) = lookup("GOFILE_UPLOAD_DOMAIN") {
            config = config.upload_domain(domain);
        }
        if let Some(secs) = lookup("GOFILE_TIMEOUT_SECS").and_then(|x| x.trim().parse::<u64>().ok()) {
            config = config.timeout(Duration::from_secs(secs));
        }
        config
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.api_url = url;
        self
    }

    pub fn upload_domain(mut self, domain: impl Into<String>) -> Self {
        self.upload_domain = domain.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn endpoint(&self, name: &str) -> String {
        format!("{}{}", self.api_url, name)
    }

    /// `https://{server}.{upload_domain}/uploadFile`
    pub fn upload_url(&self, server: &str) -> String {
        format!(
            "https://{}.{}/{}",
            server,
            self.upload_domain,
            crate::api::UPLOAD_FILE
        )
    }
}
