use consolejs::ReplConfig;
use consolejs_cli::{ConsoleStatus, GameConsole};
use pretty_assertions::assert_eq;

fn loaded_console() -> GameConsole<Vec<u8>> {
    let mut console = GameConsole::new(ReplConfig::default(), Vec::new());
    console.post_load_game();
    console
}

fn output(console: &GameConsole<Vec<u8>>) -> String {
    String::from_utf8_lossy(console.output()).into_owned()
}

fn submit_all(console: &mut GameConsole<Vec<u8>>, lines: &[&str]) {
    for line in lines {
        assert_eq!(console.submit(line), ConsoleStatus::Running, "line {line:?} should not quit");
    }
}

#[test]
fn start_command_is_unknown_before_game_load() {
    let mut console = GameConsole::new(ReplConfig::default(), Vec::new());

    console.submit("js");

    assert!(!console.is_input_claimed());
    assert_eq!(output(&console), "Script command \"js\" not found.\n");
}

#[test]
fn start_command_claims_input_after_game_load() {
    let mut console = loaded_console();

    console.submit("js");

    assert!(console.is_input_claimed());
    assert!(console.active_flag().is_active());
}

#[test]
fn lines_reach_the_repl_while_claimed() {
    let mut console = loaded_console();

    submit_all(&mut console, &["js", "help", "", ""]);

    let out = output(&console);
    assert!(!out.contains("Commands:"), "help must be evaluated as JavaScript, got:\n{out}");
    assert!(out.contains("js> help"), "got:\n{out}");
}

#[test]
fn evaluates_a_block_end_to_end() {
    let mut console = loaded_console();

    submit_all(&mut console, &["js", "[1, 2, 3].map((n) => n * n)", "", "", "exit"]);

    let out = output(&console);
    assert!(out.contains("=> 1,4,9\n"), "got:\n{out}");
    assert!(!console.is_input_claimed());
    assert!(!console.repl().is_active());
}

#[test]
fn commands_run_again_after_exit() {
    let mut console = loaded_console();

    submit_all(&mut console, &["js", "exit", "help"]);

    let out = output(&console);
    assert!(out.contains("Commands: help, js, qqq"), "got:\n{out}");
}

#[test]
fn quit_falls_through_to_the_game_and_releases_input() {
    let mut console = loaded_console();
    submit_all(&mut console, &["js", "1 + 1", ""]);

    assert_eq!(console.submit("qqq"), ConsoleStatus::Quit);

    assert!(!console.is_input_claimed());
    assert!(!console.repl().is_active());
    assert!(!output(&console).contains("=> 2"));
}

#[test]
fn blank_lines_are_ignored_outside_the_repl() {
    let mut console = loaded_console();

    submit_all(&mut console, &["", "   "]);

    assert_eq!(output(&console), "");
}
