//! Full-screen terminal editor on top of [`EditorSession`](crate::session::EditorSession).
//!
//! Input events are drained in batches and the screen is redrawn at most
//! once per batch, so fast mouse drags do not queue up frames.

mod canvas;
pub mod config;
mod input;
mod menubar;
mod panel;
pub mod state;
mod statusbar;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{cursor, event, execute, terminal};

use crate::render::FrameScheduler;

use input::Action;
use state::EditorState;
use ui::Layout;

pub struct Editor {
    state: EditorState,
    frames: FrameScheduler,
}

impl Editor {
    pub fn open(path: &str) -> Result<Self> {
        let state = EditorState::open(path)?;
        Ok(Editor {
            state,
            frames: FrameScheduler::default(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            event::EnableFocusChange,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.main_loop(&mut stdout);

        let _ = execute!(
            stdout,
            event::DisableFocusChange,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();

        tracing::debug!(coalesced = self.frames.coalesced(), "editor closed");
        result
    }

    fn main_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let mut layout = self.layout()?;
        self.full_redraw(stdout, &layout)?;

        loop {
            // Block for the first event, then drain whatever else is queued.
            let mut next = Some(event::read()?);
            while let Some(ev) = next.take() {
                match input::handle_event(&mut self.state, ev, &layout) {
                    Action::Continue => {}
                    Action::Redraw => self.frames.request(),
                    Action::Quit => {
                        if self.confirm_quit(stdout)? {
                            return Ok(());
                        }
                        self.frames.request();
                    }
                }
                if event::poll(Duration::ZERO)? {
                    next = Some(event::read()?);
                }
            }

            if self.frames.take_frame() {
                layout = self.layout()?;
                self.full_redraw(stdout, &layout)?;
            }
        }
    }

    /// `true` when the editor should close.
    fn confirm_quit(&mut self, stdout: &mut io::Stdout) -> Result<bool> {
        self.state.session.end_stroke();
        if !self.state.dirty() {
            return Ok(true);
        }
        self.state.status_message = Some("Unsaved changes! q again to quit, Ctrl-s to save".into());
        let layout = self.layout()?;
        self.full_redraw(stdout, &layout)?;

        // Wait for the next key.
        loop {
            match event::read()? {
                event::Event::Key(k) => {
                    if k.code == event::KeyCode::Char('q') {
                        return Ok(true);
                    }
                    if k.code == event::KeyCode::Char('s')
                        && k.modifiers.contains(event::KeyModifiers::CONTROL)
                    {
                        if let Err(e) = self.state.save() {
                            self.state.status_message = Some(format!("Save failed: {e:#}"));
                            return Ok(false);
                        }
                        return Ok(true);
                    }
                    self.state.status_message = None;
                    return Ok(false);
                }
                event::Event::Resize(_, _) => {
                    let layout = self.layout()?;
                    self.full_redraw(stdout, &layout)?;
                }
                _ => {}
            }
        }
    }

    fn layout(&self) -> Result<Layout> {
        let (term_w, term_h) = terminal::size()?;
        Ok(Layout::compute(term_w, term_h, &self.state.session, &self.state.config))
    }

    fn full_redraw(&self, stdout: &mut io::Stdout, layout: &Layout) -> Result<()> {
        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;

        menubar::render_menubar(stdout, layout, &self.state)?;
        canvas::render_canvases(stdout, layout, &self.state)?;
        panel::render_right_panel(stdout, layout, &self.state)?;
        statusbar::render_statusbar(stdout, layout, &self.state)?;

        stdout.flush()?;
        Ok(())
    }
}
