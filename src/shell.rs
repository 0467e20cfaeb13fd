//! Line-oriented solving shell.
//!
//! A small GTP-flavoured protocol for driving a [`Session`] from a terminal
//! or a script. Each command produces one response: `= <text>` on success,
//! `? <text>` on failure, followed by a blank line. An optional numeric id in
//! front of the command is echoed back.
//!
//! ## Commands
//!
//! - `play <vertex>` (or just `<vertex>`) - Place a stone for the side to move
//! - `undo` - Take back the last move and its scripted reply
//! - `reset` - Start the problem over
//! - `hint` - Suggest the next move
//! - `try` / `exit` - Enter / leave free exploration
//! - `board` - Print the position
//! - `state` - Print the solving state
//! - `list_commands` / `help` - List commands
//! - `quit` - Leave the shell

use std::io::{BufRead, Write};
use std::thread;

use anyhow::Result;
use log::debug;

use crate::config::Config;
use crate::coord::{self, Move};
use crate::solver::{Placement, Session};

const KNOWN_COMMANDS: &[&str] = &[
    "board",
    "exit",
    "help",
    "hint",
    "list_commands",
    "play",
    "quit",
    "reset",
    "state",
    "try",
    "undo",
];

pub struct SolveShell {
    session: Session,
    config: Config,
}

impl SolveShell {
    pub fn new(session: Session, config: Config) -> Self {
        Self { session, config }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((&command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric id off the front of a line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let end = line
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(line.len(), |(i, _)| i);
        match line[..end].parse::<u32>() {
            Ok(id) => (Some(id), line[end..].trim()),
            Err(_) => (None, line),
        }
    }

    /// Run one command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        let size = self.session.board().size;
        match command {
            "play" => match args.first() {
                Some(vertex) => self.play(vertex),
                None => (false, "missing argument".to_string()),
            },

            "undo" => match self.session.undo() {
                Some(removed) => (true, format!("removed {}", removed.len())),
                None => (false, "nothing to undo".to_string()),
            },

            "reset" => {
                self.session.reset();
                (true, String::new())
            }

            "hint" => match self.session.current_hint() {
                Some(mv) => (true, vertex_or_pass(mv, size)),
                None => (false, "no hint".to_string()),
            },

            "try" => {
                if self.session.enter_try_mode() {
                    (true, String::new())
                } else {
                    (false, "already in try mode".to_string())
                }
            }

            "exit" => match self.session.exit_try_mode() {
                Some(n) => (true, format!("discarded {n}")),
                None => (false, "not in try mode".to_string()),
            },

            "board" => (true, format!("\n{}", self.session.board())),

            "state" => (
                true,
                format!("{} {} to play", self.session.state(), self.session.to_play()),
            ),

            "list_commands" | "help" => (true, KNOWN_COMMANDS.join("\n")),

            "quit" => (true, String::new()),

            // A bare vertex is a play.
            other if coord::parse_vertex(other, size).is_some() => self.play(other),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn play(&mut self, vertex: &str) -> (bool, String) {
        let size = self.session.board().size;
        let pt = match coord::parse_vertex(vertex, size) {
            Some(Move::Place(pt)) => pt,
            Some(Move::Pass) => return (false, "cannot pass here".to_string()),
            None => return (false, format!("invalid vertex {vertex}")),
        };
        let Some(placement) = self.session.place_stone(pt) else {
            return (false, "illegal move".to_string());
        };
        if placement.reply.is_some() && !self.config.reply_delay().is_zero() {
            debug!("pausing {:?} before the reply", self.config.reply_delay());
            thread::sleep(self.config.reply_delay());
        }
        (true, describe(&placement, size))
    }
}

fn vertex_or_pass(mv: Move, size: usize) -> String {
    coord::str_vertex_move(mv, size).unwrap_or_else(|| "?".to_string())
}

/// `<state>[ captured N][ reply <vertex>[ captured M]]`
fn describe(placement: &Placement, size: usize) -> String {
    let mut out = placement.state.to_string();
    if !placement.captured.is_empty() {
        out.push_str(&format!(" captured {}", placement.captured.len()));
    }
    if let Some(reply) = &placement.reply {
        out.push_str(&format!(" reply {}", vertex_or_pass(reply.play.mv, size)));
        if !reply.captured.is_empty() {
            out.push_str(&format!(" captured {}", reply.captured.len()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sgf::parse;

    const PROBLEM: &str = "(;SZ[9]AB[ch][dh][di]AW[ai][bi][bh](;B[ci];W[bg];B[ah]C[Correct])(;B[ah]BM[1]))";

    fn shell() -> SolveShell {
        let config = Config {
            reply_delay_ms: 0,
            ..Config::default()
        };
        let session = Session::with_config(parse(PROBLEM).unwrap(), config.clone());
        SolveShell::new(session, config)
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = SolveShell::parse_id("12 hint");
        assert_eq!(id, Some(12));
        assert_eq!(cmd, "hint");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = SolveShell::parse_id("hint");
        assert_eq!(id, None);
        assert_eq!(cmd, "hint");
    }

    #[test]
    fn test_play_and_hint() {
        let mut sh = shell();
        assert_eq!(sh.execute("hint", &[]), (true, "C1".to_string()));
        assert_eq!(sh.execute("play", &["C1"]), (true, "awaiting reply B3".to_string()));
        assert_eq!(sh.execute("a2", &[]), (true, "solved".to_string()));
        assert!(!sh.execute("hint", &[]).0);
    }

    #[test]
    fn test_errors() {
        let mut sh = shell();
        assert!(!sh.execute("play", &[]).0);
        assert!(!sh.execute("play", &["Z99"]).0);
        assert!(!sh.execute("play", &["C2"]).0);
        assert!(!sh.execute("exit", &[]).0);
        assert!(!sh.execute("undo", &[]).0);
        assert!(!sh.execute("frobnicate", &[]).0);
    }

    #[test]
    fn test_try_roundtrip() {
        let mut sh = shell();
        assert!(sh.execute("try", &[]).0);
        assert_eq!(sh.execute("state", &[]), (true, "try black to play".to_string()));
        sh.execute("E5", &[]);
        assert_eq!(sh.execute("exit", &[]), (true, "discarded 1".to_string()));
    }

    #[test]
    fn test_run_loop() {
        let mut sh = shell();
        let input = "# comment\n1 C1\n\n2 undo\nquit\nhint\n";
        let mut out = Vec::new();
        sh.run(input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "=1 awaiting reply B3\n\n=2 removed 2\n\n= \n\n");
    }
}
