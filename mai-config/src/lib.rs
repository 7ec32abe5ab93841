//! Loader for schedule configuration with YAML + environment overlays.
//!
//! Every section has defaults, so an empty source set yields a working
//! configuration pointed at the public MAI schedule site. Environment
//! variables use the `MAI` prefix and `__` as the nesting separator, e.g.
//! `MAI__SITE__BASE_URL` or `MAI__HTTP__TIMEOUT_SECS`. String values may
//! reference other variables as `${VAR}`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the schedule pages live.
///
/// The listing page is `base_url` itself; the detail and session pages are
/// resolved relative to it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_detail_path")]
    pub detail_path: String,
    #[serde(default = "default_session_path")]
    pub session_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            detail_path: default_detail_path(),
            session_path: default_session_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HttpSettings {
    /// Whole-request timeout. `None` keeps the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub emit_stderr: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            filter: default_log_filter(),
            dir: None,
            emit_stderr: false,
        }
    }
}

fn default_base_url() -> String {
    "https://mai.ru/education/schedule/".into()
}
fn default_detail_path() -> String {
    "detail.php".into()
}
fn default_session_path() -> String {
    "session.php".into()
}
fn default_user_agent() -> String {
    concat!("mai-schedule/", env!("CARGO_PKG_VERSION")).into()
}
fn default_log_format() -> String {
    "text".into()
}
fn default_log_filter() -> String {
    "info".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct ScheduleConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScheduleConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleConfigLoader {
    /// Start with defaults only. `MAI__` environment overrides are layered on
    /// top of every file source when [`load`](Self::load) runs.
    ///
    /// ```
    /// use mai_config::ScheduleConfigLoader;
    ///
    /// let config = ScheduleConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.site.base_url, "https://mai.ru/education/schedule/");
    /// assert_eq!(config.site.detail_path, "detail.php");
    /// assert!(config.http.timeout_secs.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use mai_config::ScheduleConfigLoader;
    ///
    /// let cfg = ScheduleConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// site:
    ///   base_url: "http://127.0.0.1:8080/schedule/"
    /// http:
    ///   timeout_secs: 5
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.site.base_url, "http://127.0.0.1:8080/schedule/");
    /// assert_eq!(cfg.site.session_path, "session.php");
    /// assert_eq!(cfg.http.timeout_secs, Some(5));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// The environment source is added last so `MAI__*` variables win over
    /// files and inline YAML. `${VAR}` placeholders are expanded before the
    /// typed structs are built.
    ///
    /// ```
    /// use mai_config::ScheduleConfigLoader;
    ///
    /// unsafe { std::env::set_var("MAI_DOC_HOST", "schedule.example.org"); }
    ///
    /// let config = ScheduleConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// site:
    ///   base_url: "https://${MAI_DOC_HOST}/education/schedule/"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.site.base_url, "https://schedule.example.org/education/schedule/");
    ///
    /// unsafe { std::env::remove_var("MAI_DOC_HOST"); }
    /// ```
    pub fn load(self) -> Result<ScheduleConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("MAI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
