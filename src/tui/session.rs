// terminal session - owns raw mode / alternate screen and hands the console
// to external programs and line prompts

use crossterm::{
    cursor::{Hide, Show},
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Size};
use std::io::{self, BufRead, Stdout, Write, stdout};
use std::time::Duration;

use crate::Error;

pub struct UiSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

fn terminal_err(e: io::Error) -> Error {
    Error::Terminal(e.to_string())
}

impl UiSession {
    pub fn start() -> Result<Self, Error> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend).map_err(terminal_err)?;
        let mut session = Self {
            terminal,
            active: false,
        };
        session.enter()?;
        Ok(session)
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<(), Error> {
        self.terminal.draw(render).map_err(terminal_err)?;
        Ok(())
    }

    pub fn size(&self) -> Result<Size, Error> {
        self.terminal.size().map_err(terminal_err)
    }

    /// Leaves the ui for plain console use. The ui comes back when the
    /// returned guard is resumed or dropped, whichever happens first.
    pub fn suspend(&mut self) -> Result<Suspended<'_>, Error> {
        self.leave()?;
        Ok(Suspended {
            session: self,
            resumed: false,
        })
    }

    fn enter(&mut self) -> Result<(), Error> {
        enable_raw_mode().map_err(terminal_err)?;
        execute!(self.terminal.backend_mut(), EnterAlternateScreen, Hide).map_err(terminal_err)?;
        self.active = true;

        // keys typed while away (editor leftovers, the enter after a prompt)
        while event::poll(Duration::ZERO).map_err(terminal_err)? {
            event::read().map_err(terminal_err)?;
        }

        // next draw repaints everything
        self.terminal.clear().map_err(terminal_err)?;
        Ok(())
    }

    fn leave(&mut self) -> Result<(), Error> {
        self.active = false;
        disable_raw_mode().map_err(terminal_err)?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show).map_err(terminal_err)?;
        Ok(())
    }
}

impl Drop for UiSession {
    fn drop(&mut self) {
        if self.active {
            self.leave().ok();
        }
    }
}

/// Console access while the ui is suspended.
pub struct Suspended<'a> {
    session: &'a mut UiSession,
    resumed: bool,
}

impl Suspended<'_> {
    /// Prints `message` and reads one line from stdin, without the newline.
    /// `None` at end of input.
    pub fn prompt(&mut self, message: &str) -> Result<Option<String>, Error> {
        let mut out = io::stdout();
        write!(out, "{message}")?;
        out.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            println!();
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn resume(mut self) -> Result<(), Error> {
        self.resumed = true;
        self.session.enter()
    }
}

impl Drop for Suspended<'_> {
    fn drop(&mut self) {
        if !self.resumed
            && let Err(e) = self.session.enter()
        {
            tracing::error!(error = %e, "failed to restore terminal");
        }
    }
}
