// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    ChoiceGroup, CodeCatalog, DigitBuffer, Focus, PulseKind, Theme, WidgetParts, derive_display,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerState {
    sections: ChoiceGroup,
    numbers: ChoiceGroup,
    digits: DigitBuffer,
    theme: Theme,
    focus: Focus,
    copied: bool,
    error: bool,
    parts: WidgetParts,
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::new(CodeCatalog::default(), WidgetParts::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerCommand {
    SelectSection(usize),
    SelectNumber(usize),
    /// Full raw content of the digit field after an edit.
    EditDigits(String),
    ClearDigits,
    Copy,
    ToggleTheme,
    ApplyTheme(Theme),
    Focus(Focus),
    CycleFocus(isize),
    StartPulse(PulseKind),
    EndPulse(PulseKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerEvent {
    SectionChanged(String),
    NumberChanged(String),
    DisplayChanged(String),
    CopyRequested(String),
    PulseStarted(PulseKind),
    PulseEnded(PulseKind),
    ThemeChanged(Theme),
    FocusChanged(Focus),
}

impl ComposerState {
    pub fn new(catalog: CodeCatalog, parts: WidgetParts) -> Self {
        Self {
            sections: catalog.sections,
            numbers: catalog.numbers,
            digits: DigitBuffer::default(),
            theme: Theme::default(),
            focus: Focus::DigitField,
            copied: false,
            error: false,
            parts,
        }
    }

    pub fn sections(&self) -> &ChoiceGroup {
        &self.sections
    }

    pub fn numbers(&self) -> &ChoiceGroup {
        &self.numbers
    }

    pub fn digits(&self) -> &str {
        self.digits.as_str()
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub const fn focus(&self) -> Focus {
        self.focus
    }

    pub const fn parts(&self) -> WidgetParts {
        self.parts
    }

    pub const fn pulse_active(&self, kind: PulseKind) -> bool {
        match kind {
            PulseKind::Copied => self.copied,
            PulseKind::Error => self.error,
        }
    }

    pub fn display(&self) -> String {
        derive_display(
            self.sections.selected(),
            self.numbers.selected(),
            self.digits.as_str(),
        )
    }

    pub fn dispatch(&mut self, command: ComposerCommand) -> Vec<ComposerEvent> {
        match command {
            ComposerCommand::SelectSection(index) => {
                let Some(tag) = self.sections.select(index).map(str::to_owned) else {
                    return Vec::new();
                };
                let mut events = vec![
                    ComposerEvent::SectionChanged(tag),
                    ComposerEvent::DisplayChanged(self.display()),
                ];
                events.extend(self.set_focus(Focus::DigitField));
                events
            }
            ComposerCommand::SelectNumber(index) => {
                let Some(tag) = self.numbers.select(index).map(str::to_owned) else {
                    return Vec::new();
                };
                let mut events = vec![
                    ComposerEvent::NumberChanged(tag),
                    ComposerEvent::DisplayChanged(self.display()),
                ];
                events.extend(self.set_focus(Focus::DigitField));
                events
            }
            ComposerCommand::EditDigits(raw) => self.edit_digits(&raw),
            ComposerCommand::ClearDigits => {
                self.digits.clear();
                vec![ComposerEvent::DisplayChanged(self.display())]
            }
            ComposerCommand::Copy => self.copy_and_reset(),
            ComposerCommand::ToggleTheme => {
                if !self.parts.theme_toggle {
                    return Vec::new();
                }
                self.theme = self.theme.toggled();
                vec![ComposerEvent::ThemeChanged(self.theme)]
            }
            ComposerCommand::ApplyTheme(theme) => {
                if !self.parts.theme_toggle || self.theme == theme {
                    return Vec::new();
                }
                self.theme = theme;
                vec![ComposerEvent::ThemeChanged(self.theme)]
            }
            ComposerCommand::Focus(target) => {
                if !self.focusable(target) {
                    return Vec::new();
                }
                self.set_focus(target).into_iter().collect()
            }
            ComposerCommand::CycleFocus(delta) => self.cycle_focus(delta),
            ComposerCommand::StartPulse(kind) => {
                self.set_pulse(kind, true);
                vec![ComposerEvent::PulseStarted(kind)]
            }
            ComposerCommand::EndPulse(kind) => {
                if !self.pulse_active(kind) {
                    return Vec::new();
                }
                self.set_pulse(kind, false);
                vec![ComposerEvent::PulseEnded(kind)]
            }
        }
    }

    fn edit_digits(&mut self, raw: &str) -> Vec<ComposerEvent> {
        let outcome = self.digits.accept(raw);
        let mut events = Vec::new();
        if outcome.truncated {
            self.set_pulse(PulseKind::Error, true);
            events.push(ComposerEvent::PulseStarted(PulseKind::Error));
        }
        events.push(ComposerEvent::DisplayChanged(self.display()));

        if self.digits.is_complete() {
            events.extend(self.copy_and_reset());
        }
        events
    }

    fn copy_and_reset(&mut self) -> Vec<ComposerEvent> {
        let text = self.display();
        self.digits.clear();
        let mut events = vec![
            ComposerEvent::CopyRequested(text),
            ComposerEvent::DisplayChanged(self.display()),
        ];
        events.extend(self.set_focus(Focus::DigitField));
        events
    }

    fn cycle_focus(&mut self, delta: isize) -> Vec<ComposerEvent> {
        let ring = self.focus_ring();
        let next = match ring.iter().position(|target| *target == self.focus) {
            Some(current) => {
                let len = ring.len() as isize;
                ring[(current as isize + delta).rem_euclid(len) as usize]
            }
            None => Focus::DigitField,
        };
        self.set_focus(next).into_iter().collect()
    }

    fn focus_ring(&self) -> Vec<Focus> {
        let mut ring = vec![Focus::DigitField];
        if self.parts.copy_button {
            ring.push(Focus::CopyButton);
        }
        if self.parts.theme_toggle {
            ring.push(Focus::ThemeToggle);
        }
        ring
    }

    fn focusable(&self, target: Focus) -> bool {
        match target {
            Focus::DigitField | Focus::Nothing => true,
            Focus::CopyButton => self.parts.copy_button,
            Focus::ThemeToggle => self.parts.theme_toggle,
        }
    }

    fn set_focus(&mut self, target: Focus) -> Option<ComposerEvent> {
        if self.focus == target {
            return None;
        }
        self.focus = target;
        Some(ComposerEvent::FocusChanged(target))
    }

    fn set_pulse(&mut self, kind: PulseKind, on: bool) {
        match kind {
            PulseKind::Copied => self.copied = on,
            PulseKind::Error => self.error = on,
        }
    }
}
