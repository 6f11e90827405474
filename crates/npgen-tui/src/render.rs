// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::layout::{ComposerLayout, LABEL_WIDTH};
use npgen_app::{ChoiceGroup, ComposerState, DIGIT_WIDTH, Focus, PulseKind, Theme};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const COPIED_STATUS: &str = "✓ copied to clipboard";
const HELP_TEXT: &str = "F1-F4 section · F5-F8 number · Enter/F9 copy · Esc clear\nTab focus · click card to type · Ctrl+Q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    fg: Color,
    bg: Color,
    muted: Color,
    accent: Color,
    active_fg: Color,
    active_bg: Color,
    copied: Color,
    error: Color,
}

impl Palette {
    const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                muted: Color::Gray,
                accent: Color::Blue,
                active_fg: Color::White,
                active_bg: Color::Blue,
                copied: Color::Green,
                error: Color::Red,
            },
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                active_fg: Color::Black,
                active_bg: Color::Cyan,
                copied: Color::LightGreen,
                error: Color::LightRed,
            },
        }
    }

    fn base(self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    fn focus_border(self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.muted)
        }
    }
}

pub(crate) fn render(frame: &mut Frame<'_>, state: &ComposerState, layout: &ComposerLayout) {
    let palette = Palette::for_theme(state.theme());
    let area = frame.area();
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(palette.base()), area);

    let card = Block::default()
        .title(" npgen ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(palette.base());
    frame.render_widget(card, layout.card);

    render_option_row(frame, palette, "Section", state.sections(), &layout.sections);
    render_option_row(frame, palette, "Number", state.numbers(), &layout.numbers);
    render_digit_field(frame, palette, state, layout.digit_field);
    render_result(frame, palette, state, layout);

    if let Some(rect) = layout.theme_toggle {
        let focused = state.focus() == Focus::ThemeToggle;
        let toggle = Paragraph::new(format!(" {} ", state.theme().glyph()))
            .style(palette.focus_border(focused).bg(palette.bg));
        frame.render_widget(toggle, rect);
    }

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(palette.copied).bg(palette.bg));
    frame.render_widget(status, layout.status);

    let help = Paragraph::new(HELP_TEXT).style(Style::default().fg(palette.muted).bg(palette.bg));
    frame.render_widget(help, layout.help);
}

fn render_option_row(
    frame: &mut Frame<'_>,
    palette: Palette,
    label: &str,
    group: &ChoiceGroup,
    cells: &[Rect],
) {
    let Some(first) = cells.first() else {
        return;
    };
    let label_rect = Rect::new(
        first.x.saturating_sub(LABEL_WIDTH),
        first.y,
        LABEL_WIDTH,
        1,
    );
    frame.render_widget(
        Paragraph::new(label.to_owned()).style(palette.base().add_modifier(Modifier::BOLD)),
        label_rect,
    );

    for (index, rect) in cells.iter().enumerate() {
        let style = if group.is_active(index) {
            Style::default()
                .fg(palette.active_fg)
                .bg(palette.active_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            palette.base()
        };
        let text = option_label(&group.options()[index]);
        frame.render_widget(Paragraph::new(text).style(style), *rect);
    }
}

fn render_digit_field(frame: &mut Frame<'_>, palette: Palette, state: &ComposerState, rect: Rect) {
    let focused = state.focus() == Focus::DigitField;
    let shaking = state.pulse_active(PulseKind::Error);
    let border_style = if shaking {
        Style::default().fg(palette.error).add_modifier(Modifier::BOLD)
    } else {
        palette.focus_border(focused)
    };
    let label_rect = Rect::new(rect.x.saturating_sub(LABEL_WIDTH), rect.y + 1, LABEL_WIDTH, 1);
    frame.render_widget(
        Paragraph::new("Digits").style(palette.base().add_modifier(Modifier::BOLD)),
        label_rect.intersection(frame.area()),
    );

    let field = Paragraph::new(state.digits().to_owned())
        .style(palette.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(field, rect);

    if focused && rect.width > 2 && rect.height > 2 {
        let caret = rect.x + 1 + state.digits().len().min(DIGIT_WIDTH) as u16;
        frame.set_cursor_position(Position::new(caret, rect.y + 1));
    }
}

fn render_result(
    frame: &mut Frame<'_>,
    palette: Palette,
    state: &ComposerState,
    layout: &ComposerLayout,
) {
    let copied = state.pulse_active(PulseKind::Copied);
    let border_style = if copied {
        Style::default().fg(palette.copied).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted)
    };
    let code = Line::from(vec![Span::styled(
        state.display(),
        palette.base().add_modifier(Modifier::BOLD),
    )]);
    let result = Paragraph::new(code).block(
        Block::default()
            .title(" Result ")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(result, layout.result_box);

    if let Some(rect) = layout.copy_button {
        let focused = state.focus() == Focus::CopyButton;
        let button = Paragraph::new(" Copy ").style(palette.base()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.focus_border(focused)),
        );
        frame.render_widget(button, rect);
    }
}

fn option_label(tag: &str) -> String {
    format!("[ {tag} ]")
}

fn status_text(state: &ComposerState) -> String {
    if state.pulse_active(PulseKind::Copied) {
        COPIED_STATUS.to_owned()
    } else if state.pulse_active(PulseKind::Error) {
        format!("only {DIGIT_WIDTH} digits fit; extra input dropped")
    } else {
        String::new()
    }
}
