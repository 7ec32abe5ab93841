use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use mai_common::observability::LogConfig;
use mai_config::{LoggingSettings, SiteConfig};
use mai_http::HttpError;
use mai_schedule::DocumentSource;
use scraper::Html;
use url::Url;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub const BASE: &str = "http://stub.local/schedule/";
pub const GROUP: &str = "M8O-406B-19";

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let settings = LoggingSettings {
            format: std::env::var("MAI_LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            filter: "debug".to_string(),
            dir: Some(std::env::temp_dir().join("mai-schedule-tests")),
            emit_stderr: true,
        };
        LogConfig::from_settings("mai-schedule-tests", &settings)
            .and_then(mai_common::observability::init_logging)
            .unwrap_or_default()
    });
}

pub fn site() -> SiteConfig {
    SiteConfig {
        base_url: BASE.to_string(),
        ..SiteConfig::default()
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path}: {e}"))
}

/// Serves canned pages by exact URL and records every request.
#[derive(Default)]
pub struct StubSource {
    pages: HashMap<String, String>,
    calls: RefCell<Vec<String>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, fixture_name: &str) -> Self {
        self.pages.insert(url.to_string(), fixture(fixture_name));
        self
    }

    /// The usual site: listing, current-week detail page, week 5, session.
    pub fn site() -> Self {
        Self::new()
            .page(BASE, "listing.html")
            .page(&format!("{BASE}detail.php?group={GROUP}"), "detail.html")
            .page(&format!("{BASE}detail.php?group={GROUP}&week=2"), "detail.html")
            .page(&format!("{BASE}detail.php?group={GROUP}&week=3"), "detail.html")
            .page(&format!("{BASE}detail.php?group={GROUP}&week=5"), "detail_week5.html")
            .page(&format!("{BASE}session.php?group={GROUP}"), "session.html")
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl DocumentSource for StubSource {
    fn fetch_document(&self, url: &Url) -> Result<Html, HttpError> {
        self.calls.borrow_mut().push(url.to_string());
        self.pages
            .get(url.as_str())
            .map(|body| Html::parse_document(body))
            .ok_or_else(|| HttpError::Network(format!("no stub page for {url}")))
    }
}
