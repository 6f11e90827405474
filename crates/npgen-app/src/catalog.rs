// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

pub const MAX_TAG_LEN: usize = 8;

pub const DEFAULT_SECTIONS: [&str; 4] = ["OD", "SP", "BN", "TP"];
pub const DEFAULT_SECTION: &str = "OD";
pub const DEFAULT_NUMBERS: [&str; 4] = ["23", "24", "25", "26"];
pub const DEFAULT_NUMBER: &str = "24";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    Section,
    Number,
}

impl ChoiceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Number => "number",
        }
    }
}

/// A button row with exactly one active option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceGroup {
    kind: ChoiceKind,
    options: Vec<String>,
    selected: usize,
}

impl ChoiceGroup {
    pub fn new<I, S>(kind: ChoiceKind, options: I, default: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for raw in options {
            let tag = normalize_tag(kind, raw.as_ref())?;
            if normalized.contains(&tag) {
                bail!(
                    "{} option {tag:?} is listed twice; keep each {} once",
                    kind.as_str(),
                    kind.as_str()
                );
            }
            normalized.push(tag);
        }

        if normalized.is_empty() {
            bail!(
                "{} list is empty; configure at least one {}",
                kind.as_str(),
                kind.as_str()
            );
        }

        let default = normalize_tag(kind, default)?;
        let Some(selected) = normalized.iter().position(|tag| *tag == default) else {
            bail!(
                "default {} {default:?} is not one of [{}]; pick a listed value",
                kind.as_str(),
                normalized.join(", ")
            );
        };

        Ok(Self {
            kind,
            options: normalized,
            selected,
        })
    }

    pub const fn kind(&self) -> ChoiceKind {
        self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> &str {
        &self.options[self.selected]
    }

    pub const fn is_active(&self, index: usize) -> bool {
        self.selected == index
    }

    /// Returns the newly active tag, or `None` when no option sits at `index`.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        if index >= self.options.len() {
            return None;
        }
        self.selected = index;
        Some(self.selected())
    }
}

fn normalize_tag(kind: ChoiceKind, raw: &str) -> Result<String> {
    let tag = raw.trim().to_ascii_uppercase();
    if tag.is_empty() {
        bail!("{} values must not be empty", kind.as_str());
    }
    if tag.len() > MAX_TAG_LEN {
        bail!(
            "{} value {tag:?} is longer than {MAX_TAG_LEN} characters",
            kind.as_str()
        );
    }
    if !tag.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        bail!(
            "{} value {tag:?} must contain only ASCII letters and digits",
            kind.as_str()
        );
    }
    Ok(tag)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCatalog {
    pub sections: ChoiceGroup,
    pub numbers: ChoiceGroup,
}

impl CodeCatalog {
    pub fn new(sections: ChoiceGroup, numbers: ChoiceGroup) -> Result<Self> {
        if sections.kind() != ChoiceKind::Section || numbers.kind() != ChoiceKind::Number {
            bail!("catalog groups are swapped; pass sections first, then numbers");
        }
        Ok(Self { sections, numbers })
    }
}

impl Default for CodeCatalog {
    fn default() -> Self {
        Self {
            sections: ChoiceGroup {
                kind: ChoiceKind::Section,
                options: DEFAULT_SECTIONS.iter().map(|tag| (*tag).to_owned()).collect(),
                selected: 0,
            },
            numbers: ChoiceGroup {
                kind: ChoiceKind::Number,
                options: DEFAULT_NUMBERS.iter().map(|tag| (*tag).to_owned()).collect(),
                selected: 1,
            },
        }
    }
}
