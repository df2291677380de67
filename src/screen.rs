/// Terminal output for the countdown display
use std::io::{self, Write};

use crate::error::Result;

/// Where countdown frames are drawn.
pub trait Screen {
    fn clear(&mut self) -> Result<()>;

    fn print(&mut self, text: &str) -> Result<()>;
}

/// Writes frames to a terminal, clearing it between frames.
pub struct TerminalScreen<W: Write> {
    out: W,
}

impl TerminalScreen<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalScreen<W> {
    #[cfg(unix)]
    fn clear_terminal(&mut self) -> Result<()> {
        write!(self.out, "\x1B[2J\x1B[1;1H")?;
        self.out.flush()?;
        Ok(())
    }

    #[cfg(windows)]
    fn clear_terminal(&mut self) -> Result<()> {
        self.out.flush()?;
        let status = std::process::Command::new("cmd").args(["/C", "cls"]).status()?;
        if !status.success() {
            log::warn!("cls exited with {}", status);
        }
        Ok(())
    }

    #[cfg(not(any(unix, windows)))]
    fn clear_terminal(&mut self) -> Result<()> {
        Err(crate::error::CountdownError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}

impl<W: Write> Screen for TerminalScreen<W> {
    fn clear(&mut self) -> Result<()> {
        self.clear_terminal()
    }

    fn print(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_screen_writes_escape_then_text() {
        let mut screen = TerminalScreen { out: Vec::new() };
        screen.clear().unwrap();
        screen.print("00h00m05s remaining of 00h00m05s").unwrap();

        let written = String::from_utf8(screen.out).unwrap();
        assert!(written.starts_with("\x1B[2J"));
        assert!(written.ends_with("00h00m05s remaining of 00h00m05s\n"));
    }
}
