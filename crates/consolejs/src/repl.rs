//! The console REPL state machine.
//!
//! `ReplController` is idle until the host invokes the start command. While a
//! session is active it owns console input: lines are buffered until two
//! consecutive blank lines, then evaluated as one block. The end sentinel tears
//! the session down; the host's quit command is passed back untouched.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    config::ReplConfig,
    console::ConsoleHost,
    engine::JsEngine,
    input::{InputBuffer, LineAction},
};

/// Whether the host should consider a command or line consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The REPL consumed it; the host must not process it further.
    Handled,
    /// The REPL ignored it; the host should run its normal handling.
    NotHandled,
}

impl Dispatch {
    #[must_use]
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Shared, thread-safe view of whether a REPL session is active.
///
/// This is the only REPL state that may be read off the console thread, e.g.
/// from a host lifecycle callback.
#[derive(Debug, Clone, Default)]
pub struct ActiveFlag(Arc<AtomicBool>);

impl ActiveFlag {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, active: bool) {
        self.0.store(active, Ordering::Release);
    }
}

/// State of one activation: the engine and the pending input.
#[derive(Debug)]
pub struct ReplSession {
    engine: JsEngine,
    input: InputBuffer,
}

impl ReplSession {
    #[must_use]
    pub fn engine(&self) -> &JsEngine {
        &self.engine
    }

    #[must_use]
    pub fn input(&self) -> &InputBuffer {
        &self.input
    }
}

/// Drives REPL sessions from console commands and lines.
#[derive(Debug)]
pub struct ReplController {
    config: ReplConfig,
    session: Option<ReplSession>,
    active: ActiveFlag,
}

impl ReplController {
    #[must_use]
    pub fn new(config: ReplConfig) -> Self {
        Self {
            config,
            session: None,
            active: ActiveFlag::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ReplConfig {
        &self.config
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// A handle on the active flag that can be read from other threads.
    #[must_use]
    pub fn active_flag(&self) -> ActiveFlag {
        self.active.clone()
    }

    /// The current session, if one is active.
    #[must_use]
    pub fn session(&self) -> Option<&ReplSession> {
        self.session.as_ref()
    }

    /// Handles the start command.
    ///
    /// Refuses re-entrant activation with `NotHandled`. A failed engine
    /// construction is reported on the console and leaves the controller idle
    /// without claiming input; the command still counts as handled.
    pub fn start(&mut self, host: &mut dyn ConsoleHost) -> Dispatch {
        if self.session.is_some() {
            log::debug!("start command ignored, a session is already active");
            return Dispatch::NotHandled;
        }

        let engine = match JsEngine::new(&self.config) {
            Ok(engine) => engine,
            Err(err) => {
                log::error!("{err}");
                host.print(&err.to_string());
                return Dispatch::Handled;
            }
        };

        self.session = Some(ReplSession {
            engine,
            input: InputBuffer::new(),
        });
        self.active.set(true);
        host.claim_input();
        host.print(&self.config.prompt_banner());
        log::info!("JavaScript REPL session started");
        Dispatch::Handled
    }

    /// Handles one raw console line.
    pub fn handle_line(&mut self, line: &str, host: &mut dyn ConsoleHost) -> Dispatch {
        let Some(session) = self.session.as_mut() else {
            return Dispatch::NotHandled;
        };

        if line == self.config.quit_sentinel {
            log::debug!("quit command passed through to the host");
            return Dispatch::NotHandled;
        }
        if line == self.config.end_sentinel {
            self.end(host);
            return Dispatch::Handled;
        }

        if self.config.echo_input && !line.trim().is_empty() {
            host.print(&format!("{}{line}", self.config.input_prompt));
        }
        match session.input.push_line(line) {
            LineAction::Buffered | LineAction::BlankPending => {}
            LineAction::Submit(source) => submit(&session.engine, &source, &self.config, host),
        }
        Dispatch::Handled
    }

    /// Ends the active session, if any, as if the end sentinel was entered.
    ///
    /// Hosts call this when they shut down so the input claim is always released.
    pub fn shutdown(&mut self, host: &mut dyn ConsoleHost) {
        if self.session.is_some() {
            self.end(host);
        }
    }

    fn end(&mut self, host: &mut dyn ConsoleHost) {
        if let Some(mut session) = self.session.take() {
            if !session.input.text().is_empty() {
                log::debug!("discarding {} unsubmitted bytes", session.input.text().len());
            }
            session.input.clear();
            drop(session);
        }
        self.active.set(false);
        host.release_input();
        host.print("JavaScript REPL ended.");
        log::info!("JavaScript REPL session ended");
    }
}

/// Evaluates one submitted block and prints its outcome.
fn submit(engine: &JsEngine, source: &str, config: &ReplConfig, host: &mut dyn ConsoleHost) {
    if source.is_empty() {
        return;
    }
    log::debug!("evaluating {} line(s)", source.lines().count());

    let result = engine.evaluate(source);
    for line in engine.take_output() {
        host.print(&line);
    }
    match result {
        Ok(Some(rendered)) => host.print(&format!("{}{rendered}", config.result_prefix)),
        Ok(None) => {}
        Err(err) => {
            log::warn!("evaluation failed: {err}");
            host.print(&err.to_string());
        }
    }
}
