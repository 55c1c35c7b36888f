//! 配置管理
//!
//! `AdsConfig` 在构造时注入，初始化后不可变（没有运行时热更新）。
//! 支持从 TOML 文件加载，环境变量覆盖，最后进行合法性校验。

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::errors::{DocadsError, Result};

/// 广告组件配置
///
/// 初始化时固定，运行期间不可修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdsConfig {
    /// 轮换间隔（毫秒）
    pub rotation_interval_ms: u64,
    /// 每次 tick 底部广告随之轮换的概率，范围 [0, 1]
    pub footer_rotation_probability: f64,
    /// 是否启用统计
    pub enable_analytics: bool,
    /// 自定义统计上报端点（None 表示仅本地记录）
    pub analytics_endpoint: Option<String>,
    /// 上报请求超时（毫秒）
    pub delivery_timeout_ms: u64,
    /// 上报失败后的重试次数（0 表示只发一次）
    pub delivery_retries: u32,
    /// 本地事件日志文件路径
    pub analytics_file: String,
    /// 导出文件输出目录
    pub export_dir: String,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing 过滤器，如 "info" 或 "docads=debug"
    pub level: String,
    /// 日志文件路径（None 输出到控制台）
    pub file: Option<String>,
    /// "plain" 或 "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: "plain".to_string(),
        }
    }
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            rotation_interval_ms: 30_000,
            footer_rotation_probability: 0.3,
            enable_analytics: true,
            analytics_endpoint: None,
            delivery_timeout_ms: 5_000,
            delivery_retries: 1,
            analytics_file: "docads_analytics.json".to_string(),
            export_dir: ".".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AdsConfig {
    /// Load configuration from TOML file with environment variable fallback
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_default_paths();
        config.override_with_env();
        config.validate()?;
        Ok(config)
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            DocadsError::config_load(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: AdsConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_default_paths() -> Self {
        let config_paths = ["docads.toml", "config/docads.toml", "/etc/docads/config.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                debug!("Loading config from: {}", path);
                match fs::read_to_string(path) {
                    Ok(content) => match toml::from_str::<AdsConfig>(&content) {
                        Ok(config) => {
                            debug!("Successfully loaded config from: {}", path);
                            return config;
                        }
                        Err(e) => {
                            warn!("Failed to parse config file {}: {}", path, e);
                        }
                    },
                    Err(e) => {
                        warn!("Failed to read config file {}: {}", path, e);
                    }
                }
            }
        }

        debug!("No config file found, using defaults");
        Self::default()
    }

    /// Override configuration with environment variables
    fn override_with_env(&mut self) {
        if let Ok(interval) = env::var("DOCADS_ROTATION_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.rotation_interval_ms = ms;
            } else {
                error!("Invalid DOCADS_ROTATION_INTERVAL_MS: {}", interval);
            }
        }
        if let Ok(prob) = env::var("DOCADS_FOOTER_PROBABILITY") {
            if let Ok(p) = prob.parse() {
                self.footer_rotation_probability = p;
            } else {
                error!("Invalid DOCADS_FOOTER_PROBABILITY: {}", prob);
            }
        }
        if let Ok(enable) = env::var("DOCADS_ENABLE_ANALYTICS") {
            if let Ok(b) = enable.parse() {
                self.enable_analytics = b;
            } else {
                error!("Invalid DOCADS_ENABLE_ANALYTICS: {}", enable);
            }
        }
        if let Ok(endpoint) = env::var("DOCADS_ANALYTICS_ENDPOINT") {
            self.analytics_endpoint = if endpoint.is_empty() {
                None
            } else {
                Some(endpoint)
            };
        }
        if let Ok(file) = env::var("DOCADS_ANALYTICS_FILE") {
            self.analytics_file = file;
        }
        if let Ok(dir) = env::var("DOCADS_EXPORT_DIR") {
            self.export_dir = dir;
        }
    }

    /// 校验配置合法性
    pub fn validate(&self) -> Result<()> {
        if self.rotation_interval_ms == 0 {
            return Err(DocadsError::validation(
                "rotation_interval_ms must be greater than 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.footer_rotation_probability) {
            return Err(DocadsError::validation(format!(
                "footer_rotation_probability must be within [0, 1], got {}",
                self.footer_rotation_probability
            )));
        }
        if self.delivery_timeout_ms == 0 {
            return Err(DocadsError::validation(
                "delivery_timeout_ms must be greater than 0",
            ));
        }
        if let Some(ref endpoint) = self.analytics_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(DocadsError::validation(format!(
                    "analytics_endpoint must be an http(s) URL, got '{}'",
                    endpoint
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_widget_defaults() {
        let config = AdsConfig::default();
        assert_eq!(config.rotation_interval_ms, 30_000);
        assert!((config.footer_rotation_probability - 0.3).abs() < f64::EPSILON);
        assert!(config.enable_analytics);
        assert!(config.analytics_endpoint.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let config = AdsConfig {
            footer_rotation_probability: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let config = AdsConfig {
            analytics_endpoint: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AdsConfig {
            analytics_endpoint: Some("https://example.com/api/track-ads".to_string()),
            rotation_interval_ms: 1000,
            ..Default::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AdsConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.rotation_interval_ms, 1000);
        assert_eq!(
            parsed.analytics_endpoint.as_deref(),
            Some("https://example.com/api/track-ads")
        );
    }
}
