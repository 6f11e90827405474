// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use npgen_app::{ChoiceGroup, ComposerState, DIGIT_WIDTH};
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

pub(crate) const LABEL_WIDTH: u16 = 9;
const CARD_WIDTH: u16 = 60;
const CARD_HEIGHT: u16 = 16;
const OPTION_GAP: u16 = 1;
const COPY_BUTTON_WIDTH: u16 = 10;
const TOGGLE_WIDTH: u16 = 4;

/// Clickable targets, in hit-test terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Section(usize),
    Number(usize),
    DigitField,
    CopyButton,
    ThemeToggle,
    Card,
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposerLayout {
    pub card: Rect,
    pub sections: Vec<Rect>,
    pub numbers: Vec<Rect>,
    pub digit_field: Rect,
    pub result_box: Rect,
    pub copy_button: Option<Rect>,
    pub theme_toggle: Option<Rect>,
    pub status: Rect,
    pub help: Rect,
}

impl ComposerLayout {
    pub fn compute(area: Rect, state: &ComposerState) -> Self {
        let card = centered(area, CARD_WIDTH, CARD_HEIGHT);
        let inner = inset(card, 1);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let parts = state.parts();
        let digit_field = clip(
            Rect::new(
                rows[3].x + LABEL_WIDTH,
                rows[3].y,
                DIGIT_WIDTH as u16 + 4,
                rows[3].height,
            ),
            inner,
        );

        let result_width = rows[4].width.saturating_sub(COPY_BUTTON_WIDTH + 1);
        let result_box = Rect::new(rows[4].x, rows[4].y, result_width, rows[4].height);
        let copy_button = parts.copy_button.then(|| {
            clip(
                Rect::new(
                    result_box.right() + 1,
                    rows[4].y,
                    COPY_BUTTON_WIDTH,
                    rows[4].height,
                ),
                inner,
            )
        });
        let theme_toggle = parts.theme_toggle.then(|| {
            clip(
                Rect::new(
                    card.right().saturating_sub(TOGGLE_WIDTH + 2),
                    card.y,
                    TOGGLE_WIDTH,
                    card.height.min(1),
                ),
                card,
            )
        });

        Self {
            card,
            sections: option_cells(rows[0], state.sections()),
            numbers: option_cells(rows[1], state.numbers()),
            digit_field,
            result_box,
            copy_button,
            theme_toggle,
            status: rows[5],
            help: rows[6],
        }
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Control {
        let point = Position::new(column, row);
        if self.theme_toggle.is_some_and(|rect| rect.contains(point)) {
            return Control::ThemeToggle;
        }
        if self.copy_button.is_some_and(|rect| rect.contains(point)) {
            return Control::CopyButton;
        }
        if let Some(index) = self.sections.iter().position(|rect| rect.contains(point)) {
            return Control::Section(index);
        }
        if let Some(index) = self.numbers.iter().position(|rect| rect.contains(point)) {
            return Control::Number(index);
        }
        if self.digit_field.contains(point) {
            return Control::DigitField;
        }
        if self.card.contains(point) {
            return Control::Card;
        }
        Control::Outside
    }
}

/// Cells that do not fit the row are left out; their F-key still works.
fn option_cells(row: Rect, group: &ChoiceGroup) -> Vec<Rect> {
    let mut cells = Vec::with_capacity(group.options().len());
    let mut x = row.x.saturating_add(LABEL_WIDTH);
    for option in group.options() {
        let width = option.chars().count() as u16 + 4;
        if x.saturating_add(width) > row.right() {
            break;
        }
        cells.push(Rect::new(x, row.y, width, row.height));
        x = x.saturating_add(width + OPTION_GAP);
    }
    cells
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn inset(rect: Rect, margin: u16) -> Rect {
    Rect::new(
        rect.x.saturating_add(margin),
        rect.y.saturating_add(margin),
        rect.width.saturating_sub(margin * 2),
        rect.height.saturating_sub(margin * 2),
    )
}

fn clip(rect: Rect, bounds: Rect) -> Rect {
    rect.intersection(bounds)
}
