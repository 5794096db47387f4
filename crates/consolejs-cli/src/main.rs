use std::{
    env,
    io::{self, BufRead, Write},
    process::ExitCode,
};

use consolejs::ReplConfig;
use consolejs_cli::{ConsoleStatus, GameConsole};

fn main() -> ExitCode {
    let mut verbose = false;
    let mut config_path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => {
                println!("usage: consolejs [CONFIG.toml] [-v]");
                return ExitCode::SUCCESS;
            }
            _ => config_path = Some(arg),
        }
    }

    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = match config_path {
        Some(path) => match ReplConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => ReplConfig::default(),
    };

    let start_command = config.start_command.clone();
    let mut console = GameConsole::new(config, io::stdout());
    console.post_load_game();
    println!("Game loaded. Type `{start_command}` to open the JavaScript REPL, `help` for commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if !console.is_input_claimed() {
            print!("> ");
            if io::stdout().flush().is_err() {
                break;
            }
        }
        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("failed to read console input: {err}");
                break;
            }
        };
        if console.submit(line.trim_end_matches('\r')) == ConsoleStatus::Quit {
            break;
        }
    }

    console.shutdown();
    ExitCode::SUCCESS
}
