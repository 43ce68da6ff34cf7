//! Plate lookup: drive the portal, scrape both ticket tables, wrap the outcome.

use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::portal::{
    Automation, AutomationError, BrowserSession, ChromiumAutomation, IdleCondition, Navigator,
    PHYSICAL_TICKETS_TABLE, PORTAL_URL, VIRTUAL_TICKETS_TABLE,
};
use crate::tickets::{Media, QueryResult, TrafficTicket, extract_table, transform};
use crate::utils::{elapsed_warn_slow, fmt_duration};

const SLOW_LOOKUP: Duration = Duration::from_secs(20);

/// Input rejected before any browser work starts.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("License plate is empty")]
    EmptyLicensePlate,
}

impl LookupError {
    /// Failure label, kept apart from the browser-layer [`AutomationError`] kinds.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyLicensePlate => "EmptyLicensePlate",
        }
    }
}

/// Runs plate lookups against the portal using a given automation backend.
///
/// Every call to [`get`](Self::get) launches and releases its own browser session.
pub struct TicketLookup<A> {
    automation: A,
    idle: IdleCondition,
}

impl<A: Automation> TicketLookup<A> {
    pub fn new(automation: A, idle: IdleCondition) -> Self {
        Self { automation, idle }
    }

    /// Look up every ticket for `license_plate`.
    ///
    /// Never fails: automation errors become [`QueryResult::Failure`] carrying the
    /// error's kind label. Physical tickets come first, then virtual ones.
    #[instrument(skip_all, fields(plate = license_plate))]
    pub async fn get(&self, license_plate: &str) -> QueryResult {
        let start = Instant::now();

        let plate = match plate_input(license_plate) {
            Ok(plate) => plate,
            Err(e) => {
                warn!(error = %e, "rejected license plate");
                return QueryResult::failure(e.kind());
            }
        };

        let session = match self.automation.launch().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "browser launch failed");
                return QueryResult::failure(e.kind());
            }
        };

        let outcome = self.run(&session, plate).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to release browser session");
        }
        let elapsed = elapsed_warn_slow(start, SLOW_LOOKUP, "plate lookup");

        match outcome {
            Ok(tickets) => {
                info!(
                    count = tickets.len(),
                    duration = fmt_duration(elapsed),
                    "lookup complete"
                );
                QueryResult::success(tickets)
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "lookup failed");
                QueryResult::failure(e.kind())
            }
        }
    }

    async fn run(
        &self,
        session: &A::Session,
        plate: &str,
    ) -> Result<Vec<TrafficTicket>, AutomationError> {
        let navigator = Navigator::launch(session, PORTAL_URL, self.idle).await?;
        navigator.search(plate).await?;

        let physical = extract_table(navigator.page(), PHYSICAL_TICKETS_TABLE).await?;
        let mut tickets = transform(Media::Physical, &physical);

        let electronic = extract_table(navigator.page(), VIRTUAL_TICKETS_TABLE).await?;
        let virtual_tickets = transform(Media::Virtual, &electronic);

        debug!(
            physical_count = tickets.len(),
            virtual_count = virtual_tickets.len(),
            "tables normalized"
        );
        tickets.extend(virtual_tickets);
        Ok(tickets)
    }
}

/// Look up `license_plate` with a local Chromium, configured from the environment.
pub async fn get(license_plate: &str) -> QueryResult {
    match Config::load() {
        Ok(config) => get_with_config(&config, license_plate).await,
        Err(e) => {
            warn!(error = %e, "failed to load configuration");
            QueryResult::failure("ConfigError")
        }
    }
}

pub async fn get_with_config(config: &Config, license_plate: &str) -> QueryResult {
    TicketLookup::new(
        ChromiumAutomation::new(config.into()),
        config.idle_condition(),
    )
    .get(license_plate)
    .await
}

/// The text typed into the portal: `raw` without surrounding whitespace.
///
/// Only an empty value is refused; the portal judges everything else.
pub fn plate_input(raw: &str) -> Result<&str, LookupError> {
    match raw.trim() {
        "" => Err(LookupError::EmptyLicensePlate),
        plate => Ok(plate),
    }
}
