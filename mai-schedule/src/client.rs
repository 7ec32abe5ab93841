//! The schedule assembler: validate the group, fetch the right page variant,
//! run the parsers and hand back a fresh [`Schedule`].

use std::time::Duration;

use chrono::{Days, Local, NaiveDateTime};
use mai_config::{ScheduleConfig, SiteConfig};
use mai_http::HttpClient;
use scraper::Html;
use url::Url;

use crate::error::{GroupError, ScheduleError};
use crate::model::{DayMode, Schedule, WeekMode};
use crate::parser::ScheduleParser;
use crate::source::DocumentSource;
use crate::validate::{GroupValidator, normalize_group};

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Resolved page URLs for one site.
#[derive(Debug, Clone)]
struct SiteUrls {
    listing: Url,
    detail: Url,
    session: Url,
}

impl SiteUrls {
    fn from_config(site: &SiteConfig) -> Result<Self, ScheduleError> {
        let mut listing = Url::parse(&site.base_url)
            .map_err(|e| ScheduleError::Config(format!("base_url '{}': {e}", site.base_url)))?;
        // Relative page paths resolve against the listing directory.
        if !listing.path().ends_with('/') {
            let dir = format!("{}/", listing.path());
            listing.set_path(&dir);
        }
        let join = |path: &str| {
            listing
                .join(path)
                .map_err(|e| ScheduleError::Config(format!("page path '{path}': {e}")))
        };
        let detail = join(&site.detail_path)?;
        let session = join(&site.session_path)?;
        Ok(Self {
            listing,
            detail,
            session,
        })
    }

    fn detail(&self, group: &str, week: Option<u32>) -> Url {
        let mut url = self.detail.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("group", group);
            if let Some(week) = week {
                query.append_pair("week", &week.to_string());
            }
        }
        url
    }

    fn session(&self, group: &str) -> Url {
        let mut url = self.session.clone();
        url.query_pairs_mut().append_pair("group", group);
        url
    }
}

/// Entry point for every schedule request.
///
/// Each call is independent: the client holds only configuration, compiled
/// selectors and the document source.
pub struct ScheduleClient<S> {
    source: S,
    urls: SiteUrls,
    parser: ScheduleParser,
    validator: GroupValidator,
    clock: Clock,
}

impl ScheduleClient<HttpClient> {
    /// Build a client that fetches over HTTP using the loaded configuration.
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ScheduleError> {
        let http = HttpClient::with_settings(
            config.http.timeout_secs.map(Duration::from_secs),
            &config.http.user_agent,
        )?;
        Self::new(&config.site, http)
    }
}

impl<S: DocumentSource> ScheduleClient<S> {
    pub fn new(site: &SiteConfig, source: S) -> Result<Self, ScheduleError> {
        Ok(Self {
            source,
            urls: SiteUrls::from_config(site)?,
            parser: ScheduleParser::new()?,
            validator: GroupValidator::new()?,
            clock: Box::new(|| Local::now().naive_local()),
        })
    }

    /// Replace the local-time clock, e.g. to pin "now" in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Check the group's shape, then confirm it is on the listing page.
    ///
    /// Surrounding and repeated whitespace in `group` is collapsed first.
    pub fn validate_group(&self, group: &str) -> Result<(), GroupError> {
        self.checked_group(group).map(drop)
    }

    /// Normalize, validate and hand back the group exactly as it is listed.
    /// Every URL and result downstream uses this value.
    fn checked_group(&self, raw: &str) -> Result<String, GroupError> {
        let normalized = normalize_group(raw);
        let group = normalized.as_str();
        self.validator.check_shape(group).inspect_err(|err| {
            tracing::info!(group, code = err.code(), "schedule.validate.bad_shape");
        })?;

        let listing = self
            .source
            .fetch_document(&self.urls.listing)
            .map_err(|err| {
                tracing::warn!(group, error = %err, "schedule.validate.listing_error");
                GroupError::Listing(err)
            })?;

        if self
            .validator
            .listed_in(&listing, self.parser.selectors(), group)
        {
            tracing::debug!(group, "schedule.validate.ok");
            Ok(normalized)
        } else {
            tracing::info!(group, "schedule.validate.not_found");
            Err(GroupError::NotFound(group.to_string()))
        }
    }

    /// Day schedule for `today` or `tomorrow`.
    pub fn day_schedule(&self, mode: &str, group: &str) -> Result<Schedule, ScheduleError> {
        let group = self.checked_group(group)?;
        let mode: DayMode = mode.parse()?;
        self.load_day(mode, &group)
    }

    pub fn day_schedule_for(&self, mode: DayMode, group: &str) -> Result<Schedule, ScheduleError> {
        let group = self.checked_group(group)?;
        self.load_day(mode, &group)
    }

    /// Week schedule for `thisweeknum`, `thisweek`, `nextweek` or `<N>week`.
    pub fn week_schedule(&self, mode: &str, group: &str) -> Result<Schedule, ScheduleError> {
        let group = self.checked_group(group)?;
        let mode: WeekMode = mode.parse()?;
        self.load_week(mode, &group)
    }

    pub fn week_schedule_for(&self, mode: WeekMode, group: &str) -> Result<Schedule, ScheduleError> {
        let group = self.checked_group(group)?;
        self.load_week(mode, &group)
    }

    /// Exam session schedule: every day on the session page.
    pub fn session_schedule(&self, group: &str) -> Result<Schedule, ScheduleError> {
        let group = self.checked_group(group)?;
        let group = group.as_str();
        let page = self.fetch(&self.urls.session(group))?;
        let mut schedule = Schedule::for_group(group);
        schedule.days = self.parser.parse_days(&page, 0)?;
        tracing::info!(group, days = schedule.days.len(), "schedule.session");
        Ok(schedule)
    }

    fn load_day(&self, mode: DayMode, group: &str) -> Result<Schedule, ScheduleError> {
        let today = (self.clock)().date();
        let target = match mode {
            DayMode::Today => Some(today),
            DayMode::Tomorrow => today.checked_add_days(Days::new(1)),
        }
        .ok_or_else(|| ScheduleError::Parse(format!("no calendar day after {today}")))?;
        let date = target.format("%d.%m").to_string();

        let page = self.fetch(&self.urls.detail(group, None))?;
        let day = self
            .parser
            .parse_days(&page, mode.containers_to_scan())?
            .into_iter()
            .find(|day| day.date == date)
            .ok_or_else(|| {
                tracing::info!(group, %mode, date = %date, "schedule.day.not_found");
                ScheduleError::DayNotFound { date: date.clone() }
            })?;

        tracing::info!(group, %mode, date = %date, periods = day.periods.len(), "schedule.day");
        let mut schedule = Schedule::for_group(group);
        schedule.days = vec![day];
        Ok(schedule)
    }

    fn load_week(&self, mode: WeekMode, group: &str) -> Result<Schedule, ScheduleError> {
        let page = self.fetch(&self.urls.detail(group, None))?;
        let (weeks, current) = self.parser.parse_weeks(&page, (self.clock)());
        drop(page);

        let mut schedule = Schedule::for_group(group);
        schedule.weeks = weeks;
        schedule.current_week_number = current;
        if current == 0 {
            tracing::warn!(group, weeks = schedule.weeks.len(), "schedule.week.unresolved");
            return Err(ScheduleError::UnresolvedWeek {
                partial: Box::new(schedule),
            });
        }

        let target = match mode {
            WeekMode::ThisWeekNum => {
                tracing::info!(group, current, "schedule.week.number");
                return Ok(schedule);
            }
            WeekMode::ThisWeek => current,
            WeekMode::NextWeek => current.checked_add(1).ok_or_else(|| {
                ScheduleError::Parse(format!("week {current} has no following week"))
            })?,
            WeekMode::Numbered(n) => n,
        };

        let page = self.fetch(&self.urls.detail(group, Some(target)))?;
        schedule.days = self.parser.parse_days(&page, 0)?;
        tracing::info!(
            group,
            %mode,
            current,
            target,
            days = schedule.days.len(),
            "schedule.week"
        );
        Ok(schedule)
    }

    fn fetch(&self, url: &Url) -> Result<Html, ScheduleError> {
        tracing::debug!(url = %url, "schedule.fetch");
        Ok(self.source.fetch_document(url)?)
    }
}
