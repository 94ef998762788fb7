//! Transcription provider.
//!
//! Speech capture lives outside this crate. What the session loop needs is a
//! blocking `listen()` that yields one transcript per turn; [`LineTranscriber`]
//! provides that over any line source (stdin, or a replay script).

use std::io::BufRead;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListenError {
    /// Something was heard but could not be transcribed.
    #[error("didn't catch that")]
    NotUnderstood,

    /// The source has no more input.
    #[error("input closed")]
    Closed,

    #[error("transcription source failed: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Transcriber {
    fn listen(&mut self) -> Result<String, ListenError>;
}

/// One transcript per line.
///
/// Lines starting with `#` are comments. A line holding only `?` stands for a
/// recognition failure, so scripted sessions can replay one.
pub struct LineTranscriber<R> {
    reader: R,
    prompt: bool,
}

impl<R: BufRead> LineTranscriber<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            prompt: false,
        }
    }

    /// Print "Listening..." before each read, like a live microphone would.
    pub fn with_prompt(mut self) -> Self {
        self.prompt = true;
        self
    }
}

impl<R: BufRead> Transcriber for LineTranscriber<R> {
    fn listen(&mut self) -> Result<String, ListenError> {
        loop {
            if self.prompt {
                println!("\n Listening...");
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(ListenError::Closed);
            }
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            if line == "?" {
                return Err(ListenError::NotUnderstood);
            }
            return Ok(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_and_skips_comments() {
        let mut t = LineTranscriber::new(Cursor::new("# intro\ncarat versus price\n?\n\nquit\n"));
        assert_eq!(t.listen().unwrap(), "carat versus price");
        assert!(matches!(t.listen(), Err(ListenError::NotUnderstood)));
        assert_eq!(t.listen().unwrap(), "");
        assert_eq!(t.listen().unwrap(), "quit");
        assert!(matches!(t.listen(), Err(ListenError::Closed)));
    }

    #[test]
    fn error_messages() {
        assert_eq!(ListenError::NotUnderstood.to_string(), "didn't catch that");
    }
}
