// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0


pub const DIGIT_WIDTH: usize = 7;
pub const CODE_PREFIX: char = 'F';

/// Formats `SECTION-NUMBER-F0000000`, left-padding `digits` with zeros.
pub fn derive_display(section: &str, number: &str, digits: &str) -> String {
    format!("{section}-{number}-{CODE_PREFIX}{digits:0>width$}", width = DIGIT_WIDTH)
}

pub fn sanitize_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputOutcome {
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DigitBuffer(String);

impl DigitBuffer {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.0.len() == DIGIT_WIDTH
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replaces the buffer with the digits of `raw`, keeping the first
    /// `DIGIT_WIDTH` of them.
    pub fn accept(&mut self, raw: &str) -> InputOutcome {
        let mut digits = sanitize_digits(raw);
        let truncated = digits.len() > DIGIT_WIDTH;
        digits.truncate(DIGIT_WIDTH);
        self.0 = digits;
        InputOutcome { truncated }
    }
}
