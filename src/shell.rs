use std::fmt::{self, Display};
use std::io::{self, Write};

use anyhow::bail;
use is_terminal::IsTerminal;
use termcolor::Color::{Cyan, Green, Red, Yellow};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// The requested verbosity of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Verbose,
    VeryVerbose,
    Normal,
    Quiet,
}

/// Whether colour was explicitly requested or left to terminal detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorConfig {
    Auto,
    Always,
    Never,
}

/// Cargo-style terminal output: right-aligned status headers on stderr,
/// `error:`/`warning:`/`note:` prefixes and a verbosity filter.
pub struct Shell {
    output: ShellOut,
    verbosity: Verbosity,
}

enum ShellOut {
    /// Captured output, used by tests.
    Write(Box<dyn Write>),
    Stream {
        stdout: StandardStream,
        stderr: StandardStream,
        stderr_tty: bool,
        color: ColorConfig,
    },
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.output {
            ShellOut::Write(_) => f
                .debug_struct("Shell")
                .field("verbosity", &self.verbosity)
                .finish(),
            ShellOut::Stream { color, .. } => f
                .debug_struct("Shell")
                .field("verbosity", &self.verbosity)
                .field("color", color)
                .finish(),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Creates a shell writing to the process' stdout and stderr, with
    /// colour enabled when stderr is a terminal.
    pub fn new() -> Shell {
        let color = ColorConfig::Auto;
        Shell {
            output: ShellOut::Stream {
                stdout: StandardStream::stdout(color.to_choice(io::stdout().is_terminal())),
                stderr: StandardStream::stderr(color.to_choice(io::stderr().is_terminal())),
                stderr_tty: io::stderr().is_terminal(),
                color,
            },
            verbosity: Verbosity::Normal,
        }
    }

    /// Creates a shell that writes everything, uncoloured, to `out`.
    pub fn from_write(out: Box<dyn Write>) -> Shell {
        Shell {
            output: ShellOut::Write(out),
            verbosity: Verbosity::Normal,
        }
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Applies a `--color` value. `None` keeps automatic detection.
    pub fn set_color_choice(&mut self, color: Option<&str>) -> anyhow::Result<()> {
        if let ShellOut::Stream {
            stdout,
            stderr,
            stderr_tty,
            color: current,
        } = &mut self.output
        {
            let cfg = match color {
                Some("always") => ColorConfig::Always,
                Some("never") => ColorConfig::Never,
                Some("auto") | None => ColorConfig::Auto,
                Some(other) => bail!(
                    "argument for --color must be auto, always, or never, but found `{other}`"
                ),
            };
            *current = cfg;
            *stdout = StandardStream::stdout(cfg.to_choice(io::stdout().is_terminal()));
            *stderr = StandardStream::stderr(cfg.to_choice(*stderr_tty));
        }
        Ok(())
    }

    /// Stream for user-facing output such as prompts and the config dump.
    pub fn out(&mut self) -> &mut dyn Write {
        match &mut self.output {
            ShellOut::Write(w) => &mut **w,
            ShellOut::Stream { stdout, .. } => stdout,
        }
    }

    /// Prints a green, right-aligned `status` followed by `message`.
    pub fn status<T: Display, U: Display>(&mut self, status: T, message: U) -> anyhow::Result<()> {
        self.print(&status, &message, Green, true)
    }

    pub fn status_with_color<T: Display, U: Display>(
        &mut self,
        status: T,
        message: U,
        color: Color,
    ) -> anyhow::Result<()> {
        self.print(&status, &message, color, true)
    }

    /// Runs `callback` only at verbose levels.
    pub fn verbose<F>(&mut self, mut callback: F) -> anyhow::Result<()>
    where
        F: FnMut(&mut Shell) -> anyhow::Result<()>,
    {
        match self.verbosity {
            Verbosity::Verbose | Verbosity::VeryVerbose => callback(self),
            _ => Ok(()),
        }
    }

    /// Runs `callback` only at the `-vv` level.
    pub fn very_verbose<F>(&mut self, mut callback: F) -> anyhow::Result<()>
    where
        F: FnMut(&mut Shell) -> anyhow::Result<()>,
    {
        match self.verbosity {
            Verbosity::VeryVerbose => callback(self),
            _ => Ok(()),
        }
    }

    /// Prints a red `error:` message. Shown even when quiet.
    pub fn error<T: Display>(&mut self, message: T) -> anyhow::Result<()> {
        self.write_prefixed(&"error", &message, Red)
    }

    pub fn warn<T: Display>(&mut self, message: T) -> anyhow::Result<()> {
        match self.verbosity {
            Verbosity::Quiet => Ok(()),
            _ => self.print(&"warning", &message, Yellow, false),
        }
    }

    pub fn note<T: Display>(&mut self, message: T) -> anyhow::Result<()> {
        self.print(&"note", &message, Cyan, false)
    }

    fn print(
        &mut self,
        status: &dyn Display,
        message: &dyn Display,
        color: Color,
        justified: bool,
    ) -> anyhow::Result<()> {
        match self.verbosity {
            Verbosity::Quiet => Ok(()),
            _ if justified => self.write_justified(status, message, color),
            _ => self.write_prefixed(status, message, color),
        }
    }

    fn write_justified(
        &mut self,
        status: &dyn Display,
        message: &dyn Display,
        color: Color,
    ) -> anyhow::Result<()> {
        match &mut self.output {
            ShellOut::Write(w) => {
                write!(w, "{status:>12}")?;
                finish_line(w, message)
            }
            ShellOut::Stream { stderr, .. } => {
                stderr.reset()?;
                stderr.set_color(ColorSpec::new().set_bold(true).set_fg(Some(color)))?;
                write!(stderr, "{status:>12}")?;
                stderr.reset()?;
                finish_line(stderr, message)
            }
        }
    }

    fn write_prefixed(
        &mut self,
        status: &dyn Display,
        message: &dyn Display,
        color: Color,
    ) -> anyhow::Result<()> {
        match &mut self.output {
            ShellOut::Write(w) => {
                write!(w, "{status}:")?;
                finish_line(w, message)
            }
            ShellOut::Stream { stderr, .. } => {
                stderr.reset()?;
                stderr.set_color(ColorSpec::new().set_bold(true).set_fg(Some(color)))?;
                write!(stderr, "{status}")?;
                stderr.reset()?;
                stderr.set_color(ColorSpec::new().set_bold(true))?;
                write!(stderr, ":")?;
                stderr.reset()?;
                finish_line(stderr, message)
            }
        }
    }
}

fn finish_line(w: &mut dyn Write, message: &dyn Display) -> anyhow::Result<()> {
    writeln!(w, " {message}")?;
    Ok(())
}

impl ColorConfig {
    fn to_choice(self, is_tty: bool) -> ColorChoice {
        match self {
            ColorConfig::Always => ColorChoice::Always,
            ColorConfig::Never => ColorChoice::Never,
            ColorConfig::Auto if is_tty => ColorChoice::Auto,
            ColorConfig::Auto => ColorChoice::Never,
        }
    }
}
