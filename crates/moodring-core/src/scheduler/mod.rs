//! Scheduler: decides when to fetch and publishes a fresh view every tick.
//!
//! One task owns the tick and resync timers and applies every fetch outcome,
//! so engine state only changes on that task. Fetches themselves run on
//! separate tasks and may overlap; sequence numbers decide which result wins.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{CountdownMode, ScheduleSettings};
use crate::engine::{ApplyResult, EngineState, FetchOutcome, SharedEngine, StatusView};
use crate::limits::{fetch_once, RateLimitSource};
use crate::nudge::Nudger;

/// Receiver for status view updates
pub type StatusViewReceiver = watch::Receiver<StatusView>;

/// Why a fetch was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
    Startup,
    Resync,
    ZeroReached,
    Activity,
}

impl fmt::Display for FetchTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchTrigger::Startup => "startup",
            FetchTrigger::Resync => "resync",
            FetchTrigger::ZeroReached => "zero-reached",
            FetchTrigger::Activity => "activity",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
enum SchedulerCommand {
    Activity,
}

/// Polls a rate-limit source and keeps an `EngineState` current
pub struct Scheduler {
    source: Arc<dyn RateLimitSource>,
    nudger: Arc<dyn Nudger>,
    settings: ScheduleSettings,
    mode: CountdownMode,
    engine: SharedEngine,
}

/// Handle to a running scheduler
pub struct SchedulerHandle {
    commands: mpsc::UnboundedSender<SchedulerCommand>,
    views: StatusViewReceiver,
    engine: SharedEngine,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// A submission happened in the monitored UI; fetch again shortly
    pub fn notify_activity(&self) {
        if self.commands.send(SchedulerCommand::Activity).is_err() {
            debug!("Activity ignored: scheduler stopped");
        }
    }

    /// Subscribe to view updates
    pub fn subscribe(&self) -> StatusViewReceiver {
        self.views.clone()
    }

    pub fn engine(&self) -> SharedEngine {
        Arc::clone(&self.engine)
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the timers and any pending fetch. A request already on the wire
    /// finishes but is no longer applied.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new(
        source: Arc<dyn RateLimitSource>,
        nudger: Arc<dyn Nudger>,
        mut settings: ScheduleSettings,
        mode: CountdownMode,
    ) -> Self {
        settings.validate();
        let engine = EngineState::shared(settings.zero_poll_cooldown());

        Self {
            source,
            nudger,
            settings,
            mode,
            engine,
        }
    }

    /// Start the scheduler in a background task
    pub fn start(self) -> SchedulerHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(StatusView::Loading);
        let engine = Arc::clone(&self.engine);

        let task = tokio::spawn(async move {
            self.run(command_rx, view_tx).await;
        });

        SchedulerHandle {
            commands: command_tx,
            views: view_rx,
            engine,
            task,
        }
    }

    async fn run(
        self,
        mut commands: mpsc::UnboundedReceiver<SchedulerCommand>,
        views: watch::Sender<StatusView>,
    ) {
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<FetchOutcome>();
        // Dropped with this task, which aborts delayed fetches still waiting
        let mut fetches = JoinSet::new();

        let mut tick = tokio::time::interval(self.settings.tick());
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let resync_period = self.settings.resync_interval();
        let mut resync = tokio::time::interval_at(Instant::now() + resync_period, resync_period);
        resync.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Scheduler started (tick {:?}, resync {:?}, nudge: {})",
            self.settings.tick(),
            resync_period,
            self.nudger.name()
        );
        self.spawn_fetch(&mut fetches, FetchTrigger::Startup, Duration::ZERO, &outcome_tx);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let now = Utc::now();
                    if self.engine.write().take_zero_trigger(now) {
                        self.spawn_fetch(
                            &mut fetches,
                            FetchTrigger::ZeroReached,
                            Duration::ZERO,
                            &outcome_tx,
                        );
                    }
                    self.publish(&views);
                }
                _ = resync.tick() => {
                    self.spawn_fetch(
                        &mut fetches,
                        FetchTrigger::Resync,
                        Duration::ZERO,
                        &outcome_tx,
                    );
                }
                command = commands.recv() => match command {
                    Some(SchedulerCommand::Activity) => {
                        self.spawn_fetch(
                            &mut fetches,
                            FetchTrigger::Activity,
                            self.settings.activity_delay(),
                            &outcome_tx,
                        );
                    }
                    None => break, // Handle dropped
                },
                Some(outcome) = outcome_rx.recv() => {
                    self.apply(outcome);
                    self.publish(&views);
                }
                Some(_) = fetches.join_next() => {}
            }
        }

        info!("Scheduler stopped");
    }

    /// Issue one fetch on its own task after `delay`
    fn spawn_fetch(
        &self,
        fetches: &mut JoinSet<()>,
        trigger: FetchTrigger,
        delay: Duration,
        outcomes: &mpsc::UnboundedSender<FetchOutcome>,
    ) {
        let source = Arc::clone(&self.source);
        let engine = Arc::clone(&self.engine);
        let outcomes = outcomes.clone();

        fetches.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            // Numbered at dispatch, not at scheduling, so a delayed fetch
            // still outranks anything issued before it actually ran
            let seq = engine.write().issue_seq();
            debug!("Fetching rate limits (trigger: {}, seq: {})", trigger, seq);

            let result = fetch_once(source).await;
            let _ = outcomes.send(FetchOutcome { seq, result });
        });
    }

    fn apply(&self, outcome: FetchOutcome) {
        let seq = outcome.seq;
        let result = self.engine.write().apply(outcome, Utc::now());

        match result {
            ApplyResult::Updated {
                previous,
                state,
                nudge,
            } => {
                if previous != Some(state) {
                    info!("Rate limit state: {}", state.display_name());
                } else {
                    debug!("Rate limit snapshot updated (seq {})", seq);
                }
                if nudge {
                    self.nudger.nudge();
                }
            }
            ApplyResult::Failed(kind) => {
                let detail = self
                    .engine
                    .read()
                    .error()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                warn!("Rate limit fetch failed ({:?}): {}", kind, detail);
            }
            ApplyResult::Stale => {
                debug!("Discarded stale rate limit response (seq {})", seq);
            }
        }
    }

    fn publish(&self, views: &watch::Sender<StatusView>) {
        let view = self.engine.read().view(Utc::now(), self.mode);
        views.send_replace(view);
    }
}
