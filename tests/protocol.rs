//! Integration tests for the blotto engine binary.
//!
//! Tests the full protocol session flow by spawning the engine process,
//! sending commands via stdin, and verifying stdout responses.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

use blotto::solve::Solution;

/// Sends a sequence of commands to the engine and collects stdout lines.
fn run_engine(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_blotto");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start blotto");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

fn solutions(lines: &[String]) -> Vec<Solution> {
    lines
        .iter()
        .filter_map(|l| l.strip_prefix("solution "))
        .map(|json| serde_json::from_str(json).unwrap())
        .collect()
}

#[test]
fn handshake_with_protocol_version() {
    let lines = run_engine(&["blotto", "quit"]);

    assert!(lines.iter().any(|l| l == "id name blotto"));
    assert!(lines.iter().any(|l| l == "protocol_version 1"));

    let ok_idx = lines.iter().position(|l| l == "blottook").unwrap();
    let proto_idx = lines.iter().position(|l| l == "protocol_version 1").unwrap();
    assert!(proto_idx < ok_idx, "protocol_version must appear before blottook");
    for opt in lines.iter().filter(|l| l.starts_with("option ")) {
        assert!(opt.contains("type "), "option line missing type: {}", opt);
    }
}

#[test]
fn empty_lines_are_ignored() {
    let lines = run_engine(&["", "  ", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok".to_string()]);
}

#[test]
fn unknown_commands_report_errors_and_continue() {
    let lines = run_engine(&["foobar", "isready", "quit"]);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "error unknown command 'foobar'");
    assert_eq!(lines[1], "readyok");
}

#[test]
fn solve_without_game_is_an_error() {
    let lines = run_engine(&["solve", "quit"]);
    assert_eq!(lines, vec!["error no game set".to_string()]);
}

#[test]
fn newgame_then_solve_produces_solution() {
    let lines = run_engine(&["newgame 5 3", "solve", "quit"]);

    assert!(lines[0].starts_with("info compositions 21 "), "{:?}", lines);
    let found = solutions(&lines);
    assert_eq!(found.len(), 1);
    let s = &found[0];
    assert_eq!(s.composition.fields(), 3);
    assert_eq!(s.composition.troops(), 5);
    assert!((-1.0..=1.0).contains(&s.worst_case_margin));
    assert!(lines.iter().any(|l| l.starts_with("verdict ")));
}

#[test]
fn single_field_game() {
    let lines = run_engine(&["newgame 3 1", "solve", "quit"]);
    let s = &solutions(&lines)[0];
    assert_eq!(s.composition.counts(), &[3]);
    assert_eq!(s.win_prob, 0.0);
    assert_eq!(s.draw_prob, 1.0);
    assert_eq!(s.lose_prob, 0.0);
    assert_eq!(s.worst_case_margin, 0.0);
}

#[test]
fn invalid_numbers_do_not_crash() {
    let lines = run_engine(&["newgame abc 3", "newgame 0 3", "isready", "quit"]);
    assert_eq!(lines.len(), 3, "{:?}", lines);
    assert!(lines[0].starts_with("error invalid troops value 'abc'"));
    assert!(lines[1].starts_with("error invalid troops '0'"));
    assert_eq!(lines[2], "readyok");
}

#[test]
fn rejected_newgame_drops_previous_game() {
    let lines = run_engine(&["newgame 4 2", "newgame 4 0", "solve", "quit"]);
    assert!(lines[0].starts_with("error invalid fields '0'"));
    assert_eq!(lines[1], "error no game set");
}

#[test]
fn newgame_replaces_current_game() {
    let lines = run_engine(&["newgame 5 3", "newgame 3 1", "solve", "quit"]);
    let s = &solutions(&lines)[0];
    assert_eq!(s.composition.counts(), &[3]);
}

#[test]
fn repeated_solves_are_identical() {
    let lines = run_engine(&["newgame 6 3", "solve threads 1", "solve threads 4", "quit"]);
    let found = solutions(&lines);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0], found[1]);
}

#[test]
fn max_compositions_option_rejects_large_games() {
    let lines = run_engine(&[
        "setoption name MaxCompositions value 10",
        "newgame 5 3",
        "quit",
    ]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("error 5 troops over 3 fields gives 21 compositions"));
}

#[test]
fn strict_solve_accepts_robust_game() {
    let lines = run_engine(&["newgame 5 3", "solve strict", "quit"]);
    let found = solutions(&lines);
    assert_eq!(found.len(), 1, "{:?}", lines);
    assert_eq!(found[0].composition.counts(), &[0, 2, 3]);
    assert_eq!(found[0].worst_case_margin, 0.0);
    assert!(!lines.iter().any(|l| l.starts_with("nosolution")));
}

#[test]
fn strict_solve_without_robust_allocation() {
    let lines = run_engine(&["newgame 7 3", "solve strict", "quit"]);
    assert_eq!(lines.len(), 2, "{:?}", lines);
    assert_eq!(lines[1], "nosolution -0.3333");
}

#[test]
fn best_effort_solve_returns_negative_margin() {
    let lines = run_engine(&["newgame 7 3", "solve besteffort", "quit"]);
    let s = &solutions(&lines)[0];
    assert_eq!(s.composition.counts(), &[0, 2, 5]);
    assert!((s.worst_case_margin + 1.0 / 3.0).abs() < 1e-12);
    assert!(lines
        .iter()
        .any(|l| l == &format!("verdict {}", blotto::protocol::PARTIAL_VERDICT)));
}

#[test]
fn huge_thread_counts_still_solve() {
    let lines = run_engine(&["newgame 4 3", "solve threads 1000000", "quit"]);
    assert_eq!(solutions(&lines).len(), 1, "{:?}", lines);
}

#[test]
fn commands_after_quit_are_ignored() {
    let lines = run_engine(&["quit", "isready"]);
    assert!(lines.is_empty());
}
