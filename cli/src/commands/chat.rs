use anyhow::Result;
use ccbot_config::Config;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

use super::providers::{build_pipeline, Credentials};

fn is_exit(line: &str) -> bool {
    line == "X" || line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Line loop: read a question, print the answer, keep going on failure.
///
/// Returns on an exit word or end of input.
pub fn run_chat<R, W, F, E>(input: R, mut out: W, mut ask: F) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> std::result::Result<String, E>,
    E: Display,
{
    writeln!(out, "Contra Costa vaccination bot. Type 'exit', 'quit' or 'X' to leave.")?;
    let mut lines = input.lines();
    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line?;
        let question = line.trim();

        if is_exit(question) {
            writeln!(out, "👋 Goodbye!")?;
            return Ok(());
        }
        if question.is_empty() {
            writeln!(out, "⚠️ Please enter a question.")?;
            continue;
        }

        match ask(question) {
            Ok(answer) => writeln!(out, "🤖 Bot: {}", answer)?,
            Err(e) => writeln!(out, "⚠️ Error: {}", e)?,
        }
    }
}

pub fn handle_chat(config: &Config, top: Option<usize>) -> Result<()> {
    let pipeline = build_pipeline(config, &Credentials::from_env())?;
    let stdin = io::stdin();
    run_chat(stdin.lock(), io::stdout(), |q| {
        pipeline.ask(q, top).map(|answer| answer.text)
    })?;
    Ok(())
}
