//! Host-side pieces of the `consolejs` binary: a simulated game console that
//! routes lines between its own commands and the JavaScript REPL.

mod console;

pub use crate::console::{Command, ConsoleStatus, GameConsole};
