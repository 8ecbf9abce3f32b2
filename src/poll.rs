//! The poll loop: fetch, validate, parse, notify, sleep.
//!
//! All mutable state lives in [`PollState`], which the caller owns and passes to
//! each cycle, so a single iteration can be driven in isolation.
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Error, ErrorKind};
use crate::notifier::Notifier;
use crate::practicum::ReviewApi;
use crate::response::{check_response, server_time};
use crate::status::{parse_status, Verdict};

pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// Lower bound (unix seconds) of the next fetch window.
    pub cursor: i64,
    pub last_status: Option<Verdict>,
    pub last_error: Option<String>,
}

impl PollState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            last_status: None,
            last_error: None,
        }
    }

    pub fn starting_now() -> Self {
        Self::new(Utc::now().timestamp())
    }
}

/// What a single cycle ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    NoUpdates,
    Unchanged(Verdict),
    Notified(Verdict),
    Failed(String),
}

/// Chat text reported for a failed cycle. Deduplication compares this text.
pub fn error_message(err: &Error) -> String {
    format!("Сбой в работе программы: {}", err)
}

/// One pass without any error recovery.
pub async fn poll_once(
    api: &dyn ReviewApi,
    notifier: &dyn Notifier,
    state: &mut PollState,
) -> Result<Cycle, Error> {
    let snapshot = api.fetch(state.cursor).await?;
    if let Some(current_date) = server_time(&snapshot) {
        state.cursor = current_date;
    }

    let records = check_response(&snapshot)?;
    let Some(record) = records.first() else {
        debug!(cursor = state.cursor, "no homework updates");
        return Ok(Cycle::NoUpdates);
    };
    if records.len() > 1 {
        debug!(count = records.len(), "several homeworks returned; tracking the first");
    }

    let update = parse_status(record)?;
    if state.last_status == Some(update.verdict) {
        debug!(status = %update.verdict, "status unchanged");
        return Ok(Cycle::Unchanged(update.verdict));
    }

    info!(
        homework = %update.homework_name,
        status = %update.verdict,
        "homework status changed"
    );
    if let Err(err) = notifier.notify(&update.message).await {
        warn!(?err, "status notification not delivered");
    }
    // Advances even when delivery failed; the next cycle does not resend.
    state.last_status = Some(update.verdict);
    Ok(Cycle::Notified(update.verdict))
}

/// One pass with the recovery policy applied: cycle-local errors are reported to
/// the chat once per distinct text and swallowed. Only startup errors escape.
/// `last_error` is never cleared, so a text already sent is not sent again.
#[instrument(skip_all, fields(cursor = state.cursor))]
pub async fn run_cycle(
    api: &dyn ReviewApi,
    notifier: &dyn Notifier,
    state: &mut PollState,
) -> Result<Cycle, Error> {
    match poll_once(api, notifier, state).await {
        Err(err) if err.kind() == ErrorKind::CycleLocal => {
            let message = error_message(&err);
            error!(?err, "poll cycle failed");
            report_error(notifier, state, &message).await;
            Ok(Cycle::Failed(message))
        }
        result => result,
    }
}

async fn report_error(notifier: &dyn Notifier, state: &mut PollState, message: &str) {
    if state.last_error.as_deref() == Some(message) {
        debug!("error already reported");
        return;
    }
    if let Err(err) = notifier.notify(message).await {
        warn!(?err, "error report not delivered");
    }
    state.last_error = Some(message.to_string());
}

/// Poll forever, sleeping `interval` after every cycle whatever its outcome.
pub async fn run(
    api: &dyn ReviewApi,
    notifier: &dyn Notifier,
    mut state: PollState,
    interval: Duration,
) -> Result<(), Error> {
    info!(
        cursor = state.cursor,
        interval_secs = interval.as_secs(),
        "starting homework poller"
    );
    loop {
        run_cycle(api, notifier, &mut state).await?;
        tokio::time::sleep(interval).await;
    }
}
