use std::io::{self, Write as _};

/// The host console as seen by the REPL.
///
/// Implement this trait to connect the REPL to a game console, a terminal, or a
/// test harness. All output is fire-and-forget: the REPL never waits on it and
/// never inspects whether it reached the screen.
pub trait ConsoleHost {
    /// Writes one line of text to the console.
    ///
    /// The text carries no trailing newline; the host decides how lines are
    /// terminated.
    fn print(&mut self, text: &str);

    /// Redirects all subsequent free-text console lines to the REPL.
    ///
    /// Called exactly once per activation, after the engine is ready.
    fn claim_input(&mut self);

    /// Restores normal command parsing of console lines.
    ///
    /// Called exactly once per activation, when the session ends.
    fn release_input(&mut self);
}

/// `ConsoleHost` that writes to stdout and tracks ownership in a flag.
///
/// Useful when driving the REPL directly from a terminal.
#[derive(Debug, Default)]
pub struct StdConsole {
    claimed: bool,
}

impl StdConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the REPL currently owns console input.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }
}

impl ConsoleHost for StdConsole {
    fn print(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
        let _ = stdout.flush();
    }

    fn claim_input(&mut self) {
        self.claimed = true;
    }

    fn release_input(&mut self) {
        self.claimed = false;
    }
}

/// A `ConsoleHost` that collects every printed line and counts ownership calls.
///
/// Useful for testing or capturing REPL output programmatically.
#[derive(Debug, Default)]
pub struct CollectConsole {
    lines: Vec<String>,
    claims: usize,
    releases: usize,
}

impl CollectConsole {
    /// Creates a new empty `CollectConsole`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the printed lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns the printed lines joined by newlines.
    #[must_use]
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    /// Drops everything collected so far, keeping the ownership counters.
    pub fn clear_output(&mut self) {
        self.lines.clear();
    }

    /// Number of `claim_input` calls received.
    #[must_use]
    pub fn claims(&self) -> usize {
        self.claims
    }

    /// Number of `release_input` calls received.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.releases
    }

    /// Whether input is claimed right now, i.e. more claims than releases.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claims > self.releases
    }
}

impl ConsoleHost for CollectConsole {
    fn print(&mut self, text: &str) {
        self.lines.push(text.to_owned());
    }

    fn claim_input(&mut self) {
        self.claims += 1;
    }

    fn release_input(&mut self) {
        self.releases += 1;
    }
}
