//! Runtime configuration read from the environment.
//!
//! `.env` files are honoured through `dotenvy`. Every key has a default so
//! the server starts with no configuration at all.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::generators::common::get_static_dir;
use crate::generators::{
    ItaxCredentialsGenerator, NoticeTerms, PdfRenderEngine, RenderEngine, TypstRenderEngine,
};

const DEFAULT_ORIGINS: &str =
    "http://localhost:5173,http://localhost:3000,http://localhost:8080,http://127.0.0.1:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which engine turns laid-out pages into PDF bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderBackend {
    #[default]
    Native,
    Typst,
}

impl FromStr for RenderBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "pdf" => Ok(Self::Native),
            "typst" => Ok(Self::Typst),
            other => Err(format!("unknown render backend '{other}', expected native or typst")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub allowed_origins: Vec<String>,
    pub static_dir: PathBuf,
    pub render_backend: RenderBackend,
    pub typst_bin: String,
    pub notice: NoticeTerms,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            allowed_origins: split_origins(DEFAULT_ORIGINS),
            static_dir: get_static_dir().to_path_buf(),
            render_backend: RenderBackend::Native,
            typst_bin: "typst".to_string(),
            notice: NoticeTerms::default(),
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError::InvalidValue {
            key,
            value: value.clone(),
            reason: err.to_string(),
        }),
    }
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; used by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let notice = NoticeTerms {
            retrieval_days: parse(
                "NOTICE_RETRIEVAL_DAYS",
                lookup("NOTICE_RETRIEVAL_DAYS"),
                defaults.notice.retrieval_days,
            )?,
            retrieval_fee: parse(
                "NOTICE_RETRIEVAL_FEE",
                lookup("NOTICE_RETRIEVAL_FEE"),
                defaults.notice.retrieval_fee,
            )?,
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port: parse("APP_PORT", lookup("APP_PORT"), defaults.port)?,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or(defaults.allowed_origins),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            render_backend: parse(
                "RENDER_BACKEND",
                lookup("RENDER_BACKEND"),
                defaults.render_backend,
            )?,
            typst_bin: lookup("TYPST_BIN").unwrap_or(defaults.typst_bin),
            notice,
        })
    }

    /// Generator wired to the configured backend and notice terms.
    pub fn build_generator(&self) -> ItaxCredentialsGenerator {
        let engine: Arc<dyn RenderEngine> = match self.render_backend {
            RenderBackend::Native => Arc::new(PdfRenderEngine),
            RenderBackend::Typst => Arc::new(TypstRenderEngine::new(self.typst_bin.clone())),
        };
        ItaxCredentialsGenerator::with_engine(engine).notice_terms(self.notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.render_backend, RenderBackend::Native);
        assert_eq!(config.notice, NoticeTerms::default());
        assert_eq!(config.allowed_origins.len(), 4);
        assert!(config.static_dir.ends_with("static"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("APP_PORT", "9090"),
            ("RENDER_BACKEND", "Typst"),
            ("TYPST_BIN", "/opt/typst"),
            ("NOTICE_RETRIEVAL_DAYS", "5"),
            ("NOTICE_RETRIEVAL_FEE", "450"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.render_backend, RenderBackend::Typst);
        assert_eq!(config.typst_bin, "/opt/typst");
        assert_eq!(config.notice.retrieval_days, 5);
        assert_eq!(config.notice.retrieval_fee, 450);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.build_generator().engine_name(), "typst");
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup(&[("APP_PORT", "eighty")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "APP_PORT");
                assert_eq!(value, "eighty");
            }
        }
    }

    #[test]
    fn test_invalid_backend() {
        let err = AppConfig::from_lookup(lookup(&[("RENDER_BACKEND", "latex")])).unwrap_err();
        assert!(err.to_string().contains("unknown render backend 'latex'"));
    }

    #[test]
    fn test_blank_value_uses_default() {
        let config = AppConfig::from_lookup(lookup(&[("APP_PORT", "  ")])).unwrap();
        assert_eq!(config.port, 8080);
    }
}
