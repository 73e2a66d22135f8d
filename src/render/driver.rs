//! Crossterm terminal output backend.
//!
//! The `Driver` wraps a buffered stdout writer: it enters and leaves the
//! alternate screen, toggles mouse capture, and writes [`CellUpdate`]s from
//! the canvas diff.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{self, Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};

use crate::style::Color;

use super::canvas::CellUpdate;
use super::strip::CellStyle;

/// Terminal output backend using crossterm.
///
/// Creating a driver does not touch the terminal; call [`Driver::enter`].
pub struct Driver {
    writer: BufWriter<Stdout>,
    mouse_capture: bool,
}

impl Driver {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
            mouse_capture: false,
        })
    }

    /// Enter the alternate screen in raw mode, optionally capturing the mouse.
    pub fn enter(&mut self, title: &str, mouse_capture: bool) -> io::Result<()> {
        execute!(
            self.writer,
            EnterAlternateScreen,
            SetTitle(title),
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        if mouse_capture {
            execute!(self.writer, EnableMouseCapture)?;
            self.mouse_capture = true;
        }
        Ok(())
    }

    /// Restore the terminal.
    pub fn leave(&mut self) -> io::Result<()> {
        if self.mouse_capture {
            execute!(self.writer, DisableMouseCapture)?;
            self.mouse_capture = false;
        }
        terminal::disable_raw_mode()?;
        execute!(self.writer, cursor::Show, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Queue a batch of cell updates. Call [`flush`](Self::flush) afterward.
    pub fn apply_updates(&mut self, updates: &[CellUpdate]) -> io::Result<()> {
        for update in updates {
            queue!(self.writer, cursor::MoveTo(update.x, update.y))?;
            self.apply_cell_style(&update.cell.style)?;
            queue!(
                self.writer,
                Print(update.cell.ch),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Terminal size in (columns, rows).
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn apply_cell_style(&mut self, style: &CellStyle) -> io::Result<()> {
        if let Some(fg) = style.fg.and_then(to_crossterm) {
            queue!(self.writer, SetForegroundColor(fg))?;
        }
        if let Some(bg) = style.bg.and_then(to_crossterm) {
            queue!(self.writer, SetBackgroundColor(bg))?;
        }
        if style.bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.writer, SetAttribute(Attribute::Dim))?;
        }
        if style.reverse {
            queue!(self.writer, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }
}

/// Map an ARGB color to a terminal color. Fully transparent colors map to
/// `None`; partial alpha is ignored.
pub fn to_crossterm(color: Color) -> Option<style::Color> {
    if color.is_transparent() {
        return None;
    }
    Some(style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    })
}
