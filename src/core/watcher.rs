//! The polling loop: one timer task per watch session.
//!
//! The timer is a scoped resource. [`RateWatcher::start`] acquires it and the
//! returned [`WatchHandle`] releases it on stop or drop, so at most one
//! interval is ever live per session. Commands interrupt an in-flight request
//! by dropping its future, and outcomes are applied through session tickets,
//! so a stale response can never clobber newer state.

use crate::core::currency::CurrencyPair;
use crate::core::rate::RateProvider;
use crate::core::session::{MissingApiKey, Session};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

#[derive(Debug)]
enum WatchCommand {
    ChangePair(CurrencyPair),
    Stop,
}

enum LoopEvent {
    FetchDone,
    Command(Option<WatchCommand>),
}

pub struct RateWatcher {
    provider: Arc<dyn RateProvider>,
    period: Duration,
}

impl RateWatcher {
    pub fn new(provider: Arc<dyn RateProvider>, period: Duration) -> Self {
        RateWatcher { provider, period }
    }

    /// Submits the session and spawns the polling task. The first fetch runs
    /// immediately, then one per period. Fails without spawning anything, and
    /// without any network traffic, when the key is blank.
    pub fn start(&self, api_key: &str, pair: CurrencyPair) -> Result<WatchHandle, MissingApiKey> {
        let mut session = Session::new(api_key, pair);
        session.submit()?;

        let (command_tx, command_rx) = mpsc::channel(8);
        let (update_tx, update_rx) = watch::channel(session.clone());
        let task = tokio::spawn(run_loop(
            Arc::clone(&self.provider),
            self.period,
            session,
            command_rx,
            update_tx,
        ));

        Ok(WatchHandle {
            commands: command_tx,
            updates: update_rx,
            task,
        })
    }
}

/// Owner handle for a running watch session. Dropping it tears the polling
/// task down.
pub struct WatchHandle {
    commands: mpsc::Sender<WatchCommand>,
    updates: watch::Receiver<Session>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Receiver of session snapshots, updated after every state change.
    pub fn updates(&self) -> watch::Receiver<Session> {
        self.updates.clone()
    }

    /// Re-arms polling on a new pair; the next tick, one full period away,
    /// fetches it. An in-flight request for the old pair is canceled.
    pub async fn change_pair(&self, pair: CurrencyPair) -> Result<()> {
        self.commands
            .send(WatchCommand::ChangePair(pair))
            .await
            .context("Watch session is no longer running")
    }

    /// Stops polling and waits for the task to wind down.
    pub async fn stop(mut self) {
        let _ = self.commands.send(WatchCommand::Stop).await;
        let _ = (&mut self.task).await;
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_loop(
    provider: Arc<dyn RateProvider>,
    period: Duration,
    mut session: Session,
    mut commands: mpsc::Receiver<WatchCommand>,
    updates: watch::Sender<Session>,
) {
    let mut ticker = time::interval(period);
    // A slow fetch delays the next tick instead of stacking catch-up ticks.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let event = tokio::select! {
            _ = ticker.tick() => {
                fetch_once(provider.as_ref(), &mut session, &mut commands, &updates).await
            }
            command = commands.recv() => LoopEvent::Command(command),
        };

        match event {
            LoopEvent::FetchDone => {}
            LoopEvent::Command(Some(WatchCommand::ChangePair(pair))) => {
                debug!("Re-arming watch on {pair}");
                session.change_pair(pair);
                ticker.reset();
                let _ = updates.send(session.clone());
            }
            LoopEvent::Command(Some(WatchCommand::Stop)) | LoopEvent::Command(None) => break,
        }
    }
    debug!("Watch session stopped");
}

/// Runs one fetch attempt. A command arriving mid-flight cancels the request
/// and is handed back to the main loop.
async fn fetch_once(
    provider: &dyn RateProvider,
    session: &mut Session,
    commands: &mut mpsc::Receiver<WatchCommand>,
    updates: &watch::Sender<Session>,
) -> LoopEvent {
    let ticket = session.begin_fetch();
    let _ = updates.send(session.clone());

    let api_key = session.api_key().to_string();
    let pair = session.pair().clone();

    tokio::select! {
        outcome = provider.fetch_rate(&api_key, &pair) => {
            if let Err(err) = &outcome {
                debug!("Fetch for {pair} failed: {err:?}");
            }
            session.complete_fetch(ticket, outcome);
            let _ = updates.send(session.clone());
            LoopEvent::FetchDone
        }
        command = commands.recv() => LoopEvent::Command(command),
    }
}
