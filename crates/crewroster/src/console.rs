//! Text console used by the interactive roster.
//!
//! The roster workflows only talk to the user through the [`Console`] trait,
//! passing option labels and rows of plain strings. [`TerminalConsole`] is the
//! line-oriented implementation over any reader and writer, so sessions can be
//! scripted in tests.

use std::io::{BufRead, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};

use crate::error::{Error, Result};

/// Program banner shown at the top of every screen.
pub const BANNER: &str = "CREW TRAINING PROGRAMMER";

/// Prompts and rendering the roster workflows need from a user interface.
pub trait Console {
    /// Start a new screen with the banner and a title.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn banner(&mut self, title: &str) -> Result<()>;

    /// Show a line of text.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn show(&mut self, text: &str) -> Result<()>;

    /// Wait for the user to hit enter.
    ///
    /// # Errors
    ///
    /// Returns an error if input is closed.
    fn pause(&mut self) -> Result<()>;

    /// Show numbered options, starting at 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn render_menu(&mut self, options: &[&str]) -> Result<()>;

    /// Read a whole number in `min..=max`, asking again until one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if input is closed.
    fn read_bounded_integer(&mut self, prompt: &str, min: u32, max: u32) -> Result<u32>;

    /// Read a yes or no answer.
    ///
    /// # Errors
    ///
    /// Returns an error if input is closed.
    fn read_yes_no(&mut self) -> Result<bool>;

    /// Read a word made only of letters, asking again until one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if input is closed.
    fn read_alpha_string(&mut self, prompt: &str) -> Result<String>;

    /// Read a non-empty line of free text.
    ///
    /// # Errors
    ///
    /// Returns an error if input is closed.
    fn read_text(&mut self, prompt: &str) -> Result<String>;

    /// Show rows as a grid under the given headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn render_table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> Result<()>;
}

/// Render rows as a grid table.
///
/// ```
/// use crewroster::console::render_grid;
///
/// let grid = render_grid(&["PID", "Surname"], &[vec!["1".into(), "Greg".into()]]);
/// assert!(grid.contains("| 1   | Greg    |"));
/// ```
#[must_use]
pub fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = vec![
        grid_rule(&widths, '-'),
        grid_line(&widths, headers.iter().copied()),
        grid_rule(&widths, '='),
    ];
    for row in rows {
        out.push(grid_line(&widths, row.iter().map(String::as_str)));
        out.push(grid_rule(&widths, '-'));
    }
    if rows.is_empty() {
        out.push(grid_rule(&widths, '-'));
    }
    out.join("\n")
}

fn grid_rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat(fill).take(width + 2));
        line.push('+');
    }
    line
}

fn grid_line<'a>(widths: &[usize], mut cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for width in widths {
        let cell = cells.next().unwrap_or("");
        let pad = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.extend(std::iter::repeat(' ').take(pad + 1));
        line.push('|');
    }
    line
}

/// A console over a line reader and a writer.
#[derive(Debug)]
pub struct TerminalConsole<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl TerminalConsole<std::io::StdinLock<'static>, std::io::Stdout> {
    /// A console on standard input and output.
    #[must_use]
    pub fn stdio(clear_screen: bool) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout(), clear_screen)
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    /// Create a console over the given input and output.
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Self {
            input,
            output,
            clear_screen,
        }
    }

    /// Consume the console and return its output.
    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn banner(&mut self, title: &str) -> Result<()> {
        if self.clear_screen {
            queue!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        writeln!(self.output, "{BANNER} V {}\n", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.output, "{title}")?;
        Ok(())
    }

    fn show(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.prompt("Hit ENTER to continue... ")?;
        Ok(())
    }

    fn render_menu(&mut self, options: &[&str]) -> Result<()> {
        for (number, option) in options.iter().enumerate() {
            writeln!(self.output, "{:<4}{option}", number + 1)?;
        }
        Ok(())
    }

    fn read_bounded_integer(&mut self, prompt: &str, min: u32, max: u32) -> Result<u32> {
        loop {
            let line = self.prompt(prompt)?;
            match line.trim().parse::<i64>() {
                Ok(value) if value >= i64::from(min) && value <= i64::from(max) => {
                    // Within u32 bounds, so the conversion holds.
                    if let Ok(value) = u32::try_from(value) {
                        return Ok(value);
                    }
                }
                Ok(_) => writeln!(self.output, "Out of range, please try again.")?,
                Err(_) => writeln!(self.output, "Enter only numbers, please try again.")?,
            }
        }
    }

    fn read_yes_no(&mut self) -> Result<bool> {
        loop {
            match self.prompt("Enter Y or N: ")?.trim().to_uppercase().as_str() {
                "Y" => return Ok(true),
                "N" => return Ok(false),
                _ => {}
            }
        }
    }

    fn read_alpha_string(&mut self, prompt: &str) -> Result<String> {
        loop {
            let line = self.prompt(prompt)?;
            if !line.is_empty() && line.chars().all(char::is_alphabetic) {
                return Ok(line);
            }
            writeln!(
                self.output,
                "Only alphabetical characters (with no spaces), please try again."
            )?;
        }
    }

    fn read_text(&mut self, prompt: &str) -> Result<String> {
        loop {
            let line = self.prompt(prompt)?;
            if !line.trim().is_empty() {
                return Ok(line.trim().to_string());
            }
        }
    }

    fn render_table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
        writeln!(self.output, "{}", render_grid(headers, rows))?;
        Ok(())
    }
}
