//! An in-console JavaScript REPL backed by QuickJS.
//!
//! The host console hands lines to a [`ReplController`]. After the start
//! command the controller owns console input, buffers lines until two blank
//! lines, and evaluates each block in a per-session engine whose undefined
//! globals are created on first reference instead of throwing.
//!
//! ```no_run
//! use consolejs::{ReplConfig, ReplController, StdConsole};
//!
//! let mut console = StdConsole::new();
//! let mut repl = ReplController::new(ReplConfig::default());
//! repl.start(&mut console);
//! for line in ["1 + 1", "", ""] {
//!     repl.handle_line(line, &mut console);
//! }
//! repl.shutdown(&mut console);
//! ```

mod bindings;
mod config;
mod console;
mod engine;
mod error;
mod input;
mod repl;

pub use crate::{
    bindings::{GlobalBindings, LOOKUP_FUNCTION},
    config::{DEFAULT_MAX_STACK_SIZE, DEFAULT_MEMORY_LIMIT, EngineLimits, ReplConfig, ReservedGlobal},
    console::{CollectConsole, ConsoleHost, StdConsole},
    engine::JsEngine,
    error::{ConfigError, JsException, ReplError},
    input::{InputBuffer, LineAction},
    repl::{ActiveFlag, Dispatch, ReplController, ReplSession},
};
