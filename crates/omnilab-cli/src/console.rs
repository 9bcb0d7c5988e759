//! Interactive console session and scripted demo.
//!
//! The console is the host side of the engine's two event streams: stdin
//! lines are delivered as finalized transcripts, and frame ticks are
//! driven between commands until the session settles. Every HUD update is
//! printed as one line — status fields first, narration last.

use anyhow::Result;
use omnilab::{HudUpdate, LabConfig, LabSession};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

/// Transcript sequence played by `demo` and `export`.
const DEMO_SCRIPT: &[&str] = &[
    "fabricate the time band",
    "focus on the core",
    "run a safety diagnostic",
    "clear the workspace",
    "build me the helmet",
    "open the helmet",
    "close the helmet",
    "reset the view",
];

fn print_observer() -> Box<dyn omnilab::LabObserver> {
    Box::new(|update: &HudUpdate| {
        println!(
            "[{:<7}] {:<13} load {:>5.1}% parts {:>2} | {}",
            update.status,
            update.project_name,
            update.thermal_or_load,
            update.part_count,
            update.log_line
        );
    })
}

/// Drive frames until animations and the diagnostic settle.
fn settle(session: &mut LabSession, realtime: bool) {
    while !session.is_settled() {
        session.advance(FRAME);
        if realtime {
            thread::sleep(FRAME);
        }
    }
}

/// Interactive session: read transcripts from stdin until EOF or `quit`.
pub fn run(config: LabConfig) -> Result<()> {
    let mut session = LabSession::new(config);
    session.set_observer(print_observer());
    session.announce_boot();
    println!("Voice link online. Type a command; 'quit' ends the session.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("mic> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let transcript = line.trim();
        if transcript.is_empty() {
            continue;
        }
        if transcript.eq_ignore_ascii_case("quit") || transcript.eq_ignore_ascii_case("exit") {
            break;
        }
        session.handle_transcript(transcript);
        settle(&mut session, true);
    }
    println!("Voice link offline.");
    Ok(())
}

/// Play the demo script in real time.
pub fn demo(config: LabConfig) {
    let mut session = LabSession::new(config);
    session.set_observer(print_observer());
    session.announce_boot();
    for transcript in DEMO_SCRIPT {
        println!("mic> {transcript}");
        session.handle_transcript(transcript);
        settle(&mut session, true);
    }
}

/// Run the demo script headless and return the final metrics snapshot.
pub fn export(config: LabConfig) -> Result<String> {
    let mut session = LabSession::new(config);
    for transcript in DEMO_SCRIPT {
        session.handle_transcript(transcript);
        settle(&mut session, false);
    }
    Ok(session.metrics_snapshot().to_json()?)
}
