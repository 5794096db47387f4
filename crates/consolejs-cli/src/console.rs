//! A stand-in for the game's console.
//!
//! `GameConsole` parses commands the way the game does (first token is the
//! command name), keeps the table of registered commands, and hands free text to
//! the REPL while it holds the input claim.

use std::io::Write;

use ahash::AHashMap;
use consolejs::{ActiveFlag, ConsoleHost, Dispatch, ReplConfig, ReplController};

/// Commands the simulated console knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Activates the JavaScript REPL.
    StartRepl,
    /// Lists registered commands.
    Help,
    /// Quits the game.
    Quit,
}

/// Whether the console should keep reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStatus {
    Running,
    Quit,
}

/// Output side of the console plus the input-ownership flag.
#[derive(Debug)]
struct Screen<W> {
    out: W,
    input_claimed: bool,
}

impl<W: Write> ConsoleHost for Screen<W> {
    fn print(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    fn claim_input(&mut self) {
        log::debug!("console input claimed");
        self.input_claimed = true;
    }

    fn release_input(&mut self) {
        log::debug!("console input released");
        self.input_claimed = false;
    }
}

/// The simulated game console with the REPL plugged into it.
#[derive(Debug)]
pub struct GameConsole<W> {
    screen: Screen<W>,
    repl: ReplController,
    commands: AHashMap<String, Command>,
}

impl<W: Write> GameConsole<W> {
    /// Creates a console with only the game's own commands registered.
    ///
    /// The REPL command appears once [`GameConsole::post_load_game`] runs.
    pub fn new(config: ReplConfig, out: W) -> Self {
        let mut commands = AHashMap::new();
        commands.insert(config.quit_sentinel.clone(), Command::Quit);
        commands.insert("help".to_owned(), Command::Help);
        Self {
            screen: Screen {
                out,
                input_claimed: false,
            },
            repl: ReplController::new(config),
            commands,
        }
    }

    /// Host callback after a save is loaded: registers the start command.
    pub fn post_load_game(&mut self) {
        if self.repl.active_flag().is_active() {
            log::warn!("game loaded while a JavaScript session is active");
        }
        let name = self.repl.config().start_command.clone();
        if self.commands.insert(name.clone(), Command::StartRepl).is_none() {
            log::info!("registered console command `{name}`");
        }
    }

    /// Feeds one raw line typed into the console.
    pub fn submit(&mut self, line: &str) -> ConsoleStatus {
        if self.screen.input_claimed && self.repl.handle_line(line, &mut self.screen).is_handled() {
            return ConsoleStatus::Running;
        }
        self.run_command(line)
    }

    fn run_command(&mut self, line: &str) -> ConsoleStatus {
        let Some(name) = line.split_whitespace().next() else {
            return ConsoleStatus::Running;
        };
        match self.commands.get(name).copied() {
            Some(Command::StartRepl) => {
                if self.repl.start(&mut self.screen) == Dispatch::NotHandled {
                    self.screen.print("A JavaScript session is already active.");
                }
                ConsoleStatus::Running
            }
            Some(Command::Help) => {
                let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
                names.sort_unstable();
                self.screen.print(&format!("Commands: {}", names.join(", ")));
                ConsoleStatus::Running
            }
            Some(Command::Quit) => {
                self.shutdown();
                ConsoleStatus::Quit
            }
            None => {
                self.screen.print(&format!("Script command \"{name}\" not found."));
                ConsoleStatus::Running
            }
        }
    }

    /// Ends any active REPL session, releasing the input claim.
    pub fn shutdown(&mut self) {
        self.repl.shutdown(&mut self.screen);
    }

    #[must_use]
    pub fn is_input_claimed(&self) -> bool {
        self.screen.input_claimed
    }

    #[must_use]
    pub fn repl(&self) -> &ReplController {
        &self.repl
    }

    /// The REPL's active flag, for callers on other threads.
    #[must_use]
    pub fn active_flag(&self) -> ActiveFlag {
        self.repl.active_flag()
    }

    #[must_use]
    pub fn output(&self) -> &W {
        &self.screen.out
    }
}
