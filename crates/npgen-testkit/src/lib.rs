// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use npgen_app::ComposerState;
use npgen_tui::{Composer, ComposerRuntime, FeedbackDurations};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Durable settings slot that outlives a single runtime, so a test can
/// mount a second composer and observe what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct SharedStorage(Rc<RefCell<Option<bool>>>);

impl SharedStorage {
    pub fn with_dark_mode(dark: bool) -> Self {
        Self(Rc::new(RefCell::new(Some(dark))))
    }

    pub fn dark_mode(&self) -> Option<bool> {
        *self.0.borrow()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClipboardMode {
    #[default]
    Working,
    Failing(String),
}

/// In-process stand-in for the platform clipboard and settings store.
#[derive(Debug, Default)]
pub struct RecordingRuntime {
    pub clipboard: Vec<String>,
    pub clipboard_mode: ClipboardMode,
    pub storage: Option<SharedStorage>,
    /// Raw stored value that fails to parse until the next save replaces it.
    pub unreadable_theme: Option<String>,
    pub save_count: usize,
}

impl RecordingRuntime {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            storage: Some(storage),
            ..Self::default()
        }
    }

    /// No settings store mounted.
    pub fn without_storage() -> Self {
        Self::default()
    }

    pub fn unreadable_theme(mut self, raw: &str) -> Self {
        self.unreadable_theme = Some(raw.to_owned());
        self
    }

    pub fn failing_clipboard(mut self, reason: &str) -> Self {
        self.clipboard_mode = ClipboardMode::Failing(reason.to_owned());
        self
    }
}

impl ComposerRuntime for RecordingRuntime {
    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        match &self.clipboard_mode {
            ClipboardMode::Working => {
                self.clipboard.push(text.to_owned());
                Ok(())
            }
            ClipboardMode::Failing(reason) => bail!("clipboard unavailable: {reason}"),
        }
    }

    fn load_dark_mode(&mut self) -> Result<Option<bool>> {
        if let Some(raw) = &self.unreadable_theme {
            bail!("setting `darkMode` has invalid value `{raw}`");
        }
        Ok(self.storage.as_ref().and_then(SharedStorage::dark_mode))
    }

    fn save_dark_mode(&mut self, dark: bool) -> Result<()> {
        if let Some(storage) = &self.storage {
            *storage.0.borrow_mut() = Some(dark);
            self.unreadable_theme = None;
            self.save_count += 1;
        }
        Ok(())
    }
}

/// Fast pulses so timer tests finish quickly.
pub fn quick_durations() -> FeedbackDurations {
    FeedbackDurations {
        copied: Duration::from_millis(40),
        error: Duration::from_millis(20),
    }
}

pub fn mount(runtime: RecordingRuntime) -> Composer<RecordingRuntime> {
    Composer::mount(ComposerState::default(), runtime, FeedbackDurations::default())
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

pub fn ctrl(ch: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(ch),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

pub fn left_click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

pub fn type_text<R: ComposerRuntime>(composer: &mut Composer<R>, text: &str) {
    for ch in text.chars() {
        composer.handle_key(key(KeyCode::Char(ch)));
    }
}
