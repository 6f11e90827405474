// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod layout;
mod render;

pub use layout::{ComposerLayout, Control};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute, terminal};
use npgen_app::{ComposerCommand, ComposerEvent, ComposerState, Focus, PulseKind, Theme};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Host capabilities the composer consumes: clipboard and durable settings.
pub trait ComposerRuntime {
    fn write_clipboard(&mut self, text: &str) -> Result<()>;
    fn load_dark_mode(&mut self) -> Result<Option<bool>>;
    fn save_dark_mode(&mut self, dark: bool) -> Result<()>;
    fn spawn_clipboard_write(
        &mut self,
        request_id: u64,
        text: String,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let error = self
            .write_clipboard(&text)
            .err()
            .map(|error| format!("{error:#}"));
        tx.send(InternalEvent::ClipboardFinished {
            request_id,
            text,
            error,
        })
        .map_err(|_| anyhow::anyhow!("clipboard event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearPulse {
        kind: PulseKind,
        token: u64,
    },
    ClipboardFinished {
        request_id: u64,
        text: String,
        error: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackDurations {
    pub copied: Duration,
    pub error: Duration,
}

impl FeedbackDurations {
    const fn for_pulse(self, kind: PulseKind) -> Duration {
        match kind {
            PulseKind::Copied => self.copied,
            PulseKind::Error => self.error,
        }
    }
}

impl Default for FeedbackDurations {
    fn default() -> Self {
        Self {
            copied: Duration::from_millis(2000),
            error: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    Section(usize),
    Number(usize),
    Copy,
    Clear,
}

fn shortcut_for_key(code: KeyCode) -> Option<Shortcut> {
    match code {
        KeyCode::F(1) => Some(Shortcut::Section(0)),
        KeyCode::F(2) => Some(Shortcut::Section(1)),
        KeyCode::F(3) => Some(Shortcut::Section(2)),
        KeyCode::F(4) => Some(Shortcut::Section(3)),
        KeyCode::F(5) => Some(Shortcut::Number(0)),
        KeyCode::F(6) => Some(Shortcut::Number(1)),
        KeyCode::F(7) => Some(Shortcut::Number(2)),
        KeyCode::F(8) => Some(Shortcut::Number(3)),
        KeyCode::Enter | KeyCode::F(9) => Some(Shortcut::Copy),
        KeyCode::Esc => Some(Shortcut::Clear),
        _ => None,
    }
}

/// Owns the composer state for the lifetime of one mounted session.
pub struct Composer<R: ComposerRuntime> {
    state: ComposerState,
    runtime: R,
    durations: FeedbackDurations,
    layout: ComposerLayout,
    copied_token: u64,
    error_token: u64,
    clipboard_requests: u64,
    internal_tx: Sender<InternalEvent>,
    internal_rx: Receiver<InternalEvent>,
}

impl<R: ComposerRuntime> Composer<R> {
    /// Applies the stored theme before anything is drawn.
    pub fn mount(state: ComposerState, runtime: R, durations: FeedbackDurations) -> Self {
        let (internal_tx, internal_rx) = mpsc::channel();
        let mut composer = Self {
            state,
            runtime,
            durations,
            layout: ComposerLayout::default(),
            copied_token: 0,
            error_token: 0,
            clipboard_requests: 0,
            internal_tx,
            internal_rx,
        };
        composer.load_theme();
        composer
    }

    pub fn state(&self) -> &ComposerState {
        &self.state
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn layout(&self) -> &ComposerLayout {
        &self.layout
    }

    pub fn relayout(&mut self, area: Rect) {
        self.layout = ComposerLayout::compute(area, &self.state);
    }

    pub fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        self.relayout(frame.area());
        render::render(frame, &self.state, &self.layout);
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            return true;
        }

        if let Some(shortcut) = shortcut_for_key(key.code) {
            match shortcut {
                Shortcut::Section(index) => self.click(Control::Section(index)),
                Shortcut::Number(index) => self.click(Control::Number(index)),
                Shortcut::Copy if self.state.focus() == Focus::DigitField => self.copy_action(),
                Shortcut::Clear if self.state.focus() == Focus::DigitField => {
                    self.dispatch(ComposerCommand::ClearDigits);
                }
                Shortcut::Copy | Shortcut::Clear => self.activate_focused(key.code),
            }
            return false;
        }

        match key.code {
            KeyCode::Tab => self.dispatch(ComposerCommand::CycleFocus(1)),
            KeyCode::BackTab => self.dispatch(ComposerCommand::CycleFocus(-1)),
            KeyCode::Char(' ') if self.state.focus() != Focus::DigitField => {
                self.activate_focused(key.code);
            }
            KeyCode::Char(ch)
                if self.state.focus() == Focus::DigitField
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut raw = self.state.digits().to_owned();
                raw.push(ch);
                self.dispatch(ComposerCommand::EditDigits(raw));
            }
            KeyCode::Backspace if self.state.focus() == Focus::DigitField => {
                let mut raw = self.state.digits().to_owned();
                raw.pop();
                self.dispatch(ComposerCommand::EditDigits(raw));
            }
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let control = self.layout.hit_test(mouse.column, mouse.row);
        self.click(control);
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.state.focus() != Focus::DigitField {
            return;
        }
        let mut raw = self.state.digits().to_owned();
        raw.push_str(text);
        self.dispatch(ComposerCommand::EditDigits(raw));
    }

    /// Same path for mouse clicks, F-key shortcuts, and Enter/Space on a
    /// focused control. Any click inside the card hands focus back to the
    /// digit field.
    pub fn click(&mut self, control: Control) {
        match control {
            Control::Section(index) => self.dispatch(ComposerCommand::SelectSection(index)),
            Control::Number(index) => self.dispatch(ComposerCommand::SelectNumber(index)),
            Control::CopyButton if self.state.parts().copy_button => self.copy_action(),
            Control::ThemeToggle if self.state.parts().theme_toggle => self.toggle_theme(),
            Control::Outside => {
                self.dispatch(ComposerCommand::Focus(Focus::Nothing));
                return;
            }
            Control::CopyButton | Control::ThemeToggle | Control::DigitField | Control::Card => {}
        }
        self.dispatch(ComposerCommand::Focus(Focus::DigitField));
    }

    pub fn process_internal_events(&mut self) {
        while let Ok(event) = self.internal_rx.try_recv() {
            self.handle_internal_event(event);
        }
    }

    /// Blocks until one internal event arrives or `timeout` passes.
    pub fn wait_internal_event(&mut self, timeout: Duration) -> bool {
        match self.internal_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_internal_event(event);
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }

    fn handle_internal_event(&mut self, event: InternalEvent) {
        match event {
            InternalEvent::ClearPulse { kind, token } if token == self.pulse_token(kind) => {
                self.dispatch(ComposerCommand::EndPulse(kind));
            }
            InternalEvent::ClearPulse { .. } => {}
            InternalEvent::ClipboardFinished {
                request_id,
                text,
                error: None,
            } => {
                tracing::debug!(request_id, code = %text, "copied code to clipboard");
                self.dispatch(ComposerCommand::StartPulse(PulseKind::Copied));
            }
            InternalEvent::ClipboardFinished {
                request_id,
                text,
                error: Some(error),
            } => {
                tracing::warn!(request_id, code = %text, %error, "failed to copy code to clipboard");
            }
        }
    }

    fn activate_focused(&mut self, code: KeyCode) {
        if !matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
            return;
        }
        match self.state.focus() {
            Focus::CopyButton => self.click(Control::CopyButton),
            Focus::ThemeToggle => self.click(Control::ThemeToggle),
            Focus::DigitField | Focus::Nothing => {}
        }
    }

    fn copy_action(&mut self) {
        self.dispatch(ComposerCommand::Copy);
    }

    fn toggle_theme(&mut self) {
        self.dispatch(ComposerCommand::ToggleTheme);
    }

    fn load_theme(&mut self) {
        if !self.state.parts().theme_toggle {
            return;
        }
        match self.runtime.load_dark_mode() {
            Ok(Some(dark)) => {
                self.state
                    .dispatch(ComposerCommand::ApplyTheme(Theme::from_dark(dark)));
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "failed to load theme preference");
            }
        }
    }

    fn dispatch(&mut self, command: ComposerCommand) {
        let events = self.state.dispatch(command);
        self.apply_events(events);
    }

    fn apply_events(&mut self, events: Vec<ComposerEvent>) {
        for event in events {
            match event {
                ComposerEvent::CopyRequested(text) => self.request_copy(text),
                ComposerEvent::PulseStarted(kind) => self.schedule_pulse_clear(kind),
                ComposerEvent::ThemeChanged(theme) => {
                    if let Err(error) = self.runtime.save_dark_mode(theme.is_dark()) {
                        tracing::warn!(
                            theme = theme.as_str(),
                            error = %format!("{error:#}"),
                            "failed to save theme preference"
                        );
                    }
                }
                ComposerEvent::SectionChanged(_)
                | ComposerEvent::NumberChanged(_)
                | ComposerEvent::DisplayChanged(_)
                | ComposerEvent::PulseEnded(_)
                | ComposerEvent::FocusChanged(_) => {}
            }
        }
    }

    fn request_copy(&mut self, text: String) {
        self.clipboard_requests = self.clipboard_requests.saturating_add(1);
        let request_id = self.clipboard_requests;
        if let Err(error) =
            self.runtime
                .spawn_clipboard_write(request_id, text, self.internal_tx.clone())
        {
            tracing::warn!(request_id, error = %format!("{error:#}"), "failed to start clipboard write");
        }
    }

    fn pulse_token(&self, kind: PulseKind) -> u64 {
        match kind {
            PulseKind::Copied => self.copied_token,
            PulseKind::Error => self.error_token,
        }
    }

    fn schedule_pulse_clear(&mut self, kind: PulseKind) {
        let slot = match kind {
            PulseKind::Copied => &mut self.copied_token,
            PulseKind::Error => &mut self.error_token,
        };
        *slot = slot.saturating_add(1);
        let token = *slot;
        let delay = self.durations.for_pulse(kind);
        let sender = self.internal_tx.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = sender.send(InternalEvent::ClearPulse { kind, token });
        });
    }
}

pub fn run_app<R: ComposerRuntime>(composer: &mut Composer<R>) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let entered = execute!(
        io::stdout(),
        terminal::EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("enter alternate screen");

    let result = entered.and_then(|()| {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend).context("create terminal")?;
        event_loop(&mut terminal, composer)
    });

    let restored = restore_terminal();
    first_error([result, restored])
}

fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode().context("disable raw mode");
    let screen = execute!(
        io::stdout(),
        DisableBracketedPaste,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show
    )
    .context("leave alternate screen");
    first_error([raw, screen])
}

/// Teardown steps are all evaluated before this is called; report the
/// earliest failure.
fn first_error<const N: usize>(steps: [Result<()>; N]) -> Result<()> {
    steps.into_iter().collect()
}

fn event_loop<R: ComposerRuntime>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    composer: &mut Composer<R>,
) -> Result<()> {
    loop {
        composer.process_internal_events();

        terminal
            .draw(|frame| composer.draw(frame))
            .context("draw frame")?;

        if !event::poll(POLL_INTERVAL).context("poll event")? {
            continue;
        }
        match event::read().context("read event")? {
            Event::Key(key) => {
                if composer.handle_key(key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => composer.handle_mouse(mouse),
            Event::Paste(text) => composer.handle_paste(&text),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Shortcut, first_error, shortcut_for_key};
    use crossterm::event::KeyCode;

    #[test]
    fn teardown_reports_earliest_failure() {
        assert!(first_error([Ok(()), Ok(())]).is_ok());
        let error = first_error([
            Ok(()),
            Err(anyhow::anyhow!("disable raw mode")),
            Err(anyhow::anyhow!("leave alternate screen")),
        ])
        .expect_err("a failed step should surface");
        assert_eq!(error.to_string(), "disable raw mode");
    }

    #[test]
    fn function_keys_map_one_to_one() {
        let sections: Vec<_> = (1..=4).map(|n| shortcut_for_key(KeyCode::F(n))).collect();
        assert_eq!(
            sections,
            vec![
                Some(Shortcut::Section(0)),
                Some(Shortcut::Section(1)),
                Some(Shortcut::Section(2)),
                Some(Shortcut::Section(3)),
            ]
        );
        let numbers: Vec<_> = (5..=8).map(|n| shortcut_for_key(KeyCode::F(n))).collect();
        assert_eq!(
            numbers,
            vec![
                Some(Shortcut::Number(0)),
                Some(Shortcut::Number(1)),
                Some(Shortcut::Number(2)),
                Some(Shortcut::Number(3)),
            ]
        );
    }

    #[test]
    fn commit_and_clear_keys() {
        assert_eq!(shortcut_for_key(KeyCode::Enter), Some(Shortcut::Copy));
        assert_eq!(shortcut_for_key(KeyCode::F(9)), Some(Shortcut::Copy));
        assert_eq!(shortcut_for_key(KeyCode::Esc), Some(Shortcut::Clear));
        assert_eq!(shortcut_for_key(KeyCode::F(10)), None);
        assert_eq!(shortcut_for_key(KeyCode::Char('1')), None);
    }
}
