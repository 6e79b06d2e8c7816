//! Configuration loading

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use terminal::ShellConfig;
use vault_index::ListingFilter;

/// Site configuration, read from `config.json`. Every field has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub contact: ContactConfig,

    /// Terminal easter egg: user, extra files, pages for `open`
    #[serde(default)]
    pub terminal: ShellConfig,
}

/// Landing page content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    #[serde(default = "default_tagline")]
    pub tagline: String,

    #[serde(default = "default_about")]
    pub about: Vec<String>,

    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub links: Vec<SiteLink>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            owner_name: default_owner_name(),
            tagline: default_tagline(),
            about: default_about(),
            projects: Vec::new(),
            links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteLink {
    pub label: String,
    pub url: String,
}

fn default_owner_name() -> String {
    "Guest Gardener".to_string()
}

fn default_tagline() -> String {
    "Notes, projects and a small garden of linked ideas.".to_string()
}

fn default_about() -> Vec<String> {
    vec!["I build things and write down what I learn along the way.".to_string()]
}

/// Where the vault lives and how it is listed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Repository owner on the source host
    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub repo: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_raw_base")]
    pub raw_base: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Note shown at `/garden`, resolved like a wiki link
    #[serde(default = "default_index_note")]
    pub index_note: String,

    #[serde(default = "default_excluded_folders")]
    pub excluded_folders: Vec<String>,

    /// Note file extensions, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_listing_ttl")]
    pub listing_ttl_secs: u64,

    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Connect timeout for upstream requests
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: default_branch(),
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            user_agent: default_user_agent(),
            index_note: default_index_note(),
            excluded_folders: default_excluded_folders(),
            extensions: default_extensions(),
            listing_ttl_secs: default_listing_ttl(),
            fetch_concurrency: default_fetch_concurrency(),
            timeout_secs: default_timeout(),
        }
    }
}

impl VaultConfig {
    pub fn filter(&self) -> ListingFilter {
        ListingFilter {
            extensions: self.extensions.clone(),
            excluded_folders: self.excluded_folders.clone(),
            include_hidden: false,
        }
    }

    pub fn listing_ttl(&self) -> Duration {
        Duration::from_secs(self.listing_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL for raw files, used for image embeds.
    pub fn asset_base(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.raw_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch
        )
    }
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_user_agent() -> String {
    concat!("garden/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_index_note() -> String {
    "Index".to_string()
}

fn default_excluded_folders() -> Vec<String> {
    vec!["private".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

fn default_listing_ttl() -> u64 {
    600 // 10 minutes
}

fn default_fetch_concurrency() -> usize {
    8
}

fn default_timeout() -> u64 {
    10
}

/// Email relay settings for the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_relay_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub service_id: String,

    #[serde(default)]
    pub template_id: String,

    /// Sent as `user_id`
    #[serde(default)]
    pub public_key: String,

    #[serde(default = "default_name_field")]
    pub name_field: String,

    #[serde(default = "default_email_field")]
    pub email_field: String,

    #[serde(default = "default_message_field")]
    pub message_field: String,

    /// Address offered when sending fails
    #[serde(default = "default_fallback_email")]
    pub fallback_email: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: default_relay_endpoint(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            name_field: default_name_field(),
            email_field: default_email_field(),
            message_field: default_message_field(),
            fallback_email: default_fallback_email(),
        }
    }
}

fn default_relay_endpoint() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_name_field() -> String {
    "from_name".to_string()
}

fn default_email_field() -> String {
    "reply_to".to_string()
}

fn default_message_field() -> String {
    "message".to_string()
}

fn default_fallback_email() -> String {
    "hello@example.com".to_string()
}

impl Config {
    /// Load configuration from a JSON file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    }
}
