//! Watch command: periodic refresh plus debounced keyword search from stdin.
//!
//! [`Watch`] holds the timer and debouncer state and is driven by whatever
//! wakes it; [`run`] drives it from tokio with the system clock.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use mt_core::{
    Clock, Debouncer, Engine, EventFilter, EventQuery, KeyValueStore, LogSource, PollTimer,
    SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::events::write_page;
use super::util::{badge_line, refresh};
use crate::Config;

/// Sleep used when nothing is scheduled.
const IDLE_WAKE: Duration = Duration::from_secs(3600);

pub struct Watch<'a, S, C> {
    engine: &'a mut Engine<S>,
    source: &'a dyn LogSource,
    clock: C,
    timer: PollTimer,
    search: Debouncer<String>,
}

impl<'a, S: KeyValueStore, C: Clock> Watch<'a, S, C> {
    pub fn new(
        engine: &'a mut Engine<S>,
        source: &'a dyn LogSource,
        clock: C,
        poll_interval_ms: i64,
        debounce_ms: i64,
    ) -> Self {
        Self {
            engine,
            source,
            clock,
            timer: PollTimer::new(poll_interval_ms),
            search: Debouncer::new(debounce_ms),
        }
    }

    /// Runs the first refresh and starts the poll timer.
    pub fn start<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        self.tick(writer)?;
        self.timer.start(self.clock.now_ms());
        Ok(())
    }

    /// Time until the next tick or pending search, whichever comes first.
    pub fn time_until_wake(&self) -> Duration {
        let now = self.clock.now_ms();
        [self.timer.next_due_ms(), self.search.due_ms()]
            .into_iter()
            .flatten()
            .min()
            .map_or(IDLE_WAKE, |due| {
                Duration::from_millis(u64::try_from(due.saturating_sub(now)).unwrap_or(0))
            })
    }

    /// Queues a search, replacing any search still waiting.
    pub fn on_input(&mut self, line: String) {
        self.search.schedule(self.clock.now_ms(), line);
    }

    /// Runs whatever has come due.
    pub fn on_wake<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        let now = self.clock.now_ms();
        if self.timer.poll(now) {
            self.tick(writer)?;
        }
        if let Some(term) = self.search.poll(now) {
            self.search_now(writer, &term)?;
        }
        Ok(())
    }

    /// Stops the timer and runs any search still waiting.
    pub fn finish<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        self.timer.stop();
        if let Some(term) = self.search.flush() {
            self.search_now(writer, &term)?;
        }
        Ok(())
    }

    fn tick<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        match refresh(&mut *self.engine, self.source) {
            Ok(_) => writeln!(writer, "{}", badge_line(&self.engine.badge()))?,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "refresh failed; keeping previous events");
            }
        }
        Ok(())
    }

    fn search_now<W: Write>(&self, writer: &mut W, term: &str) -> Result<()> {
        let term = term.trim();
        let query = EventQuery {
            filter: EventFilter {
                keyword: (!term.is_empty()).then(|| term.to_string()),
                ..EventFilter::default()
            },
            page_size: self.engine.config().page_size,
            ..EventQuery::default()
        };
        writeln!(writer, "Search: {term:?}")?;
        write_page(writer, &self.engine.query(&query))
    }
}

/// Watches until Ctrl-C or end of input.
pub async fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    engine: &mut Engine<S>,
    source: &dyn LogSource,
    config: &Config,
) -> Result<()> {
    let poll_interval_ms =
        i64::try_from(config.poll_interval_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
    let debounce_ms = i64::try_from(config.search_debounce_ms).unwrap_or(i64::MAX);
    let mut watch = Watch::new(engine, source, SystemClock, poll_interval_ms, debounce_ms);
    watch.start(writer)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            () = tokio::time::sleep(watch.time_until_wake()) => watch.on_wake(writer)?,
            line = lines.next_line() => match line.context("failed to read stdin")? {
                Some(line) => watch.on_input(line),
                None => break,
            },
            result = &mut ctrl_c => {
                result.context("failed to listen for ctrl-c")?;
                break;
            }
        }
        writer.flush()?;
    }

    tracing::debug!("watch stopping");
    watch.finish(writer)?;
    writer.flush()?;
    Ok(())
}
