//! Operator-facing status output.
//!
//! All user-visible text goes through `Console`. The output encoding is an
//! explicit setting rather than something read from the terminal, so the
//! same run prints identically in a CI log and an interactive shell.

use std::io::{self, Write};

/// How status symbols are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEncoding {
    /// UTF-8 text with emoji status symbols.
    #[default]
    Utf8,
    /// Plain ASCII tags for terminals that cannot render emoji.
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Start,
    Drop,
    Migrate,
    Seed,
    Fixture,
    Verify,
    Note,
    Ok,
    Warn,
    Fail,
    Info,
    Bullet,
}

impl Status {
    fn symbol(self, encoding: OutputEncoding) -> &'static str {
        match encoding {
            OutputEncoding::Utf8 => match self {
                Status::Start => "🚀",
                Status::Drop => "🗑️ ",
                Status::Migrate => "📝",
                Status::Seed => "🌱",
                Status::Fixture => "👤",
                Status::Verify => "🔍",
                Status::Note => "📝",
                Status::Ok => "✅",
                Status::Warn => "⚠️ ",
                Status::Fail => "❌",
                Status::Info => "ℹ️ ",
                Status::Bullet => "•",
            },
            OutputEncoding::Ascii => match self {
                Status::Start => ">>",
                Status::Drop => "[drop]",
                Status::Migrate => "[migrate]",
                Status::Seed => "[seed]",
                Status::Fixture => "[fixture]",
                Status::Verify => "[verify]",
                Status::Note => "[note]",
                Status::Ok => "[ok]",
                Status::Warn => "[warn]",
                Status::Fail => "[FAIL]",
                Status::Info => "[info]",
                Status::Bullet => "-",
            },
        }
    }
}

pub const RULE_WIDTH: usize = 50;

pub struct Console<W: Write> {
    out: W,
    encoding: OutputEncoding,
}

impl Console<io::Stdout> {
    pub fn stdout(encoding: OutputEncoding) -> Self {
        Self::new(io::stdout(), encoding)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, encoding: OutputEncoding) -> Self {
        Self { out, encoding }
    }

    /// A top-level status line, e.g. `✅ Migrations completed`.
    pub fn status(&mut self, status: Status, text: &str) -> io::Result<()> {
        writeln!(self.out, "{} {text}", status.symbol(self.encoding))
    }

    /// An indented detail line under the current step.
    pub fn detail(&mut self, status: Status, text: &str) -> io::Result<()> {
        writeln!(self.out, "   {} {text}", status.symbol(self.encoding))
    }

    /// A step heading, separated from the previous step by a blank line.
    pub fn section(&mut self, status: Status, text: &str) -> io::Result<()> {
        writeln!(self.out)?;
        self.status(status, text)
    }

    pub fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Raw text, written as-is (used for captured subprocess stderr).
    pub fn raw(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return writeln!(self.out);
        }
        write!(self.out, "{text}")?;
        if !text.ends_with('\n') {
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
