//! Configuration stored under `.luckydraw/config.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::collect::DEFAULT_MAX_SETS;
use crate::core::share_text::ShareTemplate;

pub const DEFAULT_CONFIG_PATH: &str = ".luckydraw/config.toml";
pub const KAKAO_MEMO_ENDPOINT: &str = "https://kapi.kakao.com/v2/api/talk/memo/default/send";

/// Upper bound for every delay and timeout setting (one day).
pub const MAX_DELAY_SECS: u64 = 86_400;

/// Top-level configuration (TOML).
///
/// Missing fields fall back to defaults, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LuckyConfig {
    /// Largest selectable number of sets per generation request.
    pub max_sets: u8,

    /// Seconds before a status message clears itself.
    pub status_clear_secs: u64,

    /// Fixed RNG seed for the local source. Random when unset.
    pub seed: Option<u64>,

    pub source: SourceConfig,
    pub sms: SmsConfig,
    pub share: ShareConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL serving `/generate-lotto` and `/generate-pension`.
    /// Draws are generated locally when unset.
    pub remote_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SmsConfig {
    /// Full URL of the `/api/send-sms` endpoint. Sends are only logged when unset.
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShareConfig {
    /// Link attached to shared messages (`webUrl` and `mobileWebUrl`).
    pub link_url: String,
    /// Kakao REST endpoint for "send to me" default templates.
    pub kakao_endpoint: String,
    /// OAuth access token. Sharing reports "not initialized" without one.
    pub kakao_access_token: Option<String>,
    pub timeout_secs: u64,
    pub template: ShareTemplate,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            link_url: "http://localhost:3000/".to_string(),
            kakao_endpoint: KAKAO_MEMO_ENDPOINT.to_string(),
            kakao_access_token: None,
            timeout_secs: 10,
            template: ShareTemplate::default(),
        }
    }
}

impl Default for LuckyConfig {
    fn default() -> Self {
        Self {
            max_sets: DEFAULT_MAX_SETS,
            status_clear_secs: 5,
            seed: None,
            source: SourceConfig::default(),
            sms: SmsConfig::default(),
            share: ShareConfig::default(),
        }
    }
}

impl LuckyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_sets == 0 {
            return Err(anyhow!("max_sets must be > 0"));
        }
        check_delay("status_clear_secs", self.status_clear_secs)?;
        check_delay("source.timeout_secs", self.source.timeout_secs)?;
        check_delay("sms.timeout_secs", self.sms.timeout_secs)?;
        check_delay("share.timeout_secs", self.share.timeout_secs)?;
        if self.share.link_url.trim().is_empty() {
            return Err(anyhow!("share.link_url must be non-empty"));
        }
        if let Some(url) = &self.source.remote_url {
            if url.trim().is_empty() {
                return Err(anyhow!("source.remote_url must be non-empty when set"));
            }
        }
        Ok(())
    }

    pub fn status_clear_after(&self) -> Duration {
        Duration::from_secs(self.status_clear_secs)
    }
}

fn check_delay(name: &str, secs: u64) -> Result<()> {
    if secs == 0 || secs > MAX_DELAY_SECS {
        return Err(anyhow!("{name} must be in 1..={MAX_DELAY_SECS}, got {secs}"));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LuckyConfig::default()`.
pub fn load_config(path: &Path) -> Result<LuckyConfig> {
    if !path.exists() {
        let cfg = LuckyConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LuckyConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &LuckyConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, LuckyConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("config.toml");
        let mut cfg = LuckyConfig::default();
        cfg.seed = Some(7);
        cfg.sms.endpoint = Some("http://127.0.0.1:3000/api/send-sms".to_string());
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "max_sets = 3\n\n[share.template]\nheader = \"hi\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.max_sets, 3);
        assert_eq!(cfg.share.template.header, "hi");
        assert_eq!(
            cfg.share.template.footer,
            ShareTemplate::default().footer
        );
        assert_eq!(cfg.status_clear_secs, 5);
    }

    #[test]
    fn zero_max_sets_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "max_sets = 0\n").expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(err.to_string().contains("max_sets"));
    }

    #[test]
    fn oversized_delays_are_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "status_clear_secs = 9223372036854775807\n").expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(err.to_string().contains("status_clear_secs"));

        for (section, field) in [("source", "timeout_secs"), ("sms", "timeout_secs")] {
            fs::write(&path, format!("[{section}]\n{field} = 86401\n")).expect("write");
            let err = load_config(&path).expect_err("invalid");
            assert!(err.to_string().contains(section), "{err}");
        }

        let mut cfg = LuckyConfig::default();
        cfg.share.timeout_secs = MAX_DELAY_SECS;
        cfg.status_clear_secs = MAX_DELAY_SECS;
        assert!(cfg.validate().is_ok());
        cfg.share.timeout_secs = MAX_DELAY_SECS + 1;
        assert!(cfg.validate().is_err());
    }
}
