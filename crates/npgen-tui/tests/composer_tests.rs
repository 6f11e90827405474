// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use crossterm::event::KeyCode;
use npgen_app::{
    ChoiceGroup, ChoiceKind, CodeCatalog, ComposerState, Focus, PulseKind, Theme, WidgetParts,
};
use npgen_testkit::{
    RecordingRuntime, SharedStorage, ctrl, key, left_click, mount, quick_durations, type_text,
};
use npgen_tui::{Composer, FeedbackDurations};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

fn screen() -> Rect {
    Rect::new(0, 0, 80, 24)
}

#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn click_rect<R: npgen_tui::ComposerRuntime>(composer: &mut Composer<R>, rect: Rect) {
    composer.handle_mouse(left_click(rect.x, rect.y));
}

fn render_text<R: npgen_tui::ComposerRuntime>(composer: &mut Composer<R>) -> Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(80, 24))?;
    terminal.draw(|frame| composer.draw(frame))?;
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    Ok(text)
}

#[test]
fn seven_digits_copy_padded_code_and_reset() {
    let mut composer = mount(RecordingRuntime::without_storage());

    type_text(&mut composer, "1234567");
    composer.process_internal_events();

    assert_eq!(composer.runtime().clipboard, vec!["OD-24-F1234567"]);
    assert_eq!(composer.state().digits(), "");
    assert_eq!(composer.state().display(), "OD-24-F0000000");
    assert!(composer.state().pulse_active(PulseKind::Copied));
    assert_eq!(composer.state().focus(), Focus::DigitField);
}

#[test]
fn clicking_section_and_number_rederives_display() {
    let mut composer = mount(RecordingRuntime::without_storage());
    composer.relayout(screen());

    let sp = composer.layout().sections[1];
    let n25 = composer.layout().numbers[2];
    click_rect(&mut composer, sp);
    click_rect(&mut composer, n25);
    type_text(&mut composer, "9");

    assert_eq!(composer.state().display(), "SP-25-F0000009");
    assert!(composer.state().sections().is_active(1));
    assert!(!composer.state().sections().is_active(0));
    assert!(composer.runtime().clipboard.is_empty());
}

#[test]
fn function_key_selects_section_without_field_focus() {
    let mut composer = mount(RecordingRuntime::without_storage());
    composer.relayout(screen());
    composer.handle_mouse(left_click(0, 0));
    assert_eq!(composer.state().focus(), Focus::Nothing);

    composer.handle_key(key(KeyCode::F(2)));

    assert_eq!(composer.state().sections().selected(), "SP");
    assert!(composer.state().sections().is_active(1));
    assert_eq!(composer.state().focus(), Focus::DigitField);
}

#[test]
fn function_keys_select_numbers_one_to_one() {
    let mut composer = mount(RecordingRuntime::without_storage());

    for (n, expected) in [(5, "23"), (6, "24"), (7, "25"), (8, "26")] {
        composer.handle_key(key(KeyCode::F(n)));
        assert_eq!(composer.state().numbers().selected(), expected);
    }
    for (n, expected) in [(1, "OD"), (2, "SP"), (3, "BN"), (4, "TP")] {
        composer.handle_key(key(KeyCode::F(n)));
        assert_eq!(composer.state().sections().selected(), expected);
    }
}

#[test]
fn function_key_past_catalog_end_is_ignored() -> Result<()> {
    let catalog = CodeCatalog::new(
        ChoiceGroup::new(ChoiceKind::Section, ["OD", "SP"], "SP")?,
        ChoiceGroup::new(ChoiceKind::Number, ["24"], "24")?,
    )?;
    let state = ComposerState::new(catalog, WidgetParts::default());
    let mut composer = Composer::mount(
        state,
        RecordingRuntime::without_storage(),
        FeedbackDurations::default(),
    );

    assert!(!composer.handle_key(key(KeyCode::F(4))));
    assert!(!composer.handle_key(key(KeyCode::F(8))));
    assert_eq!(composer.state().display(), "SP-24-F0000000");
    Ok(())
}

#[test]
fn theme_preference_is_reapplied_on_next_mount() {
    let storage = SharedStorage::default();
    {
        let mut composer = mount(RecordingRuntime::new(storage.clone()));
        assert_eq!(composer.state().theme(), Theme::Light);
        composer.relayout(screen());
        let toggle = composer.layout().theme_toggle.expect("toggle mounted");
        click_rect(&mut composer, toggle);

        assert_eq!(composer.state().theme(), Theme::Dark);
        assert_eq!(composer.state().focus(), Focus::DigitField);
        assert_eq!(composer.runtime().save_count, 1);
    }
    assert_eq!(storage.dark_mode(), Some(true));

    let reloaded = mount(RecordingRuntime::new(storage));
    assert_eq!(reloaded.state().theme(), Theme::Dark);
}

#[test]
fn failed_clipboard_logs_once_and_still_resets() {
    let counter = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut composer =
            mount(RecordingRuntime::without_storage().failing_clipboard("no display server"));

        type_text(&mut composer, "42");
        composer.handle_key(key(KeyCode::Enter));
        composer.process_internal_events();

        assert!(composer.runtime().clipboard.is_empty());
        assert!(!composer.state().pulse_active(PulseKind::Copied));
        assert_eq!(composer.state().digits(), "");
        assert_eq!(composer.state().focus(), Focus::DigitField);
    });

    assert_eq!(counter.count(), 1);
}

#[test]
fn enter_and_escape_only_act_while_field_focused() {
    let mut composer = mount(RecordingRuntime::without_storage());
    composer.relayout(screen());
    type_text(&mut composer, "12");
    composer.handle_mouse(left_click(0, 0));

    composer.handle_key(key(KeyCode::Enter));
    composer.handle_key(key(KeyCode::F(9)));
    composer.handle_key(key(KeyCode::Esc));
    composer.process_internal_events();
    assert!(composer.runtime().clipboard.is_empty());
    assert_eq!(composer.state().digits(), "12");

    let card = composer.layout().status;
    click_rect(&mut composer, card);
    assert_eq!(composer.state().focus(), Focus::DigitField);

    composer.handle_key(key(KeyCode::Esc));
    assert_eq!(composer.state().digits(), "");
    assert_eq!(composer.state().focus(), Focus::DigitField);

    type_text(&mut composer, "7");
    composer.handle_key(key(KeyCode::F(9)));
    composer.process_internal_events();
    assert_eq!(composer.runtime().clipboard, vec!["OD-24-F0000007"]);
}

#[test]
fn copy_button_via_click_and_focused_enter() {
    let mut composer = mount(RecordingRuntime::without_storage());
    composer.relayout(screen());

    type_text(&mut composer, "5");
    let copy = composer.layout().copy_button.expect("copy button mounted");
    click_rect(&mut composer, copy);

    type_text(&mut composer, "6");
    composer.handle_key(key(KeyCode::Tab));
    assert_eq!(composer.state().focus(), Focus::CopyButton);
    composer.handle_key(key(KeyCode::Enter));
    composer.process_internal_events();

    assert_eq!(
        composer.runtime().clipboard,
        vec!["OD-24-F0000005", "OD-24-F0000006"]
    );
    assert_eq!(composer.state().focus(), Focus::DigitField);
}

#[test]
fn typing_strips_non_digits_and_backspace_edits() {
    let mut composer = mount(RecordingRuntime::without_storage());

    type_text(&mut composer, "1a2 b3");
    assert_eq!(composer.state().digits(), "123");
    assert!(!composer.state().pulse_active(PulseKind::Error));

    composer.handle_key(key(KeyCode::Backspace));
    assert_eq!(composer.state().digits(), "12");
    assert_eq!(composer.state().display(), "OD-24-F0000012");
}

#[test]
fn digits_typed_away_from_field_are_ignored() {
    let mut composer = mount(RecordingRuntime::without_storage());
    composer.handle_key(key(KeyCode::Tab));

    type_text(&mut composer, "99");
    composer.handle_paste("123");
    assert_eq!(composer.state().digits(), "");
}

#[test]
fn pasting_eight_digits_truncates_flags_error_and_commits() {
    let mut composer = mount(RecordingRuntime::without_storage());

    composer.handle_paste("12345678");
    composer.process_internal_events();

    assert!(composer.state().pulse_active(PulseKind::Error));
    assert_eq!(composer.runtime().clipboard, vec!["OD-24-F1234567"]);
    assert_eq!(composer.state().digits(), "");
}

#[test]
fn copied_pulse_reverts_after_timer() {
    let mut composer = Composer::mount(
        ComposerState::default(),
        RecordingRuntime::without_storage(),
        quick_durations(),
    );

    type_text(&mut composer, "7654321");
    composer.process_internal_events();
    assert!(composer.state().pulse_active(PulseKind::Copied));

    assert!(composer.wait_internal_event(Duration::from_secs(2)));
    assert!(!composer.state().pulse_active(PulseKind::Copied));
}

#[test]
fn retriggered_pulse_ignores_stale_timer() {
    let durations = FeedbackDurations {
        copied: Duration::from_secs(30),
        error: Duration::from_millis(150),
    };
    let mut composer = Composer::mount(
        ComposerState::default(),
        RecordingRuntime::without_storage(),
        durations,
    );

    composer.handle_paste("11111111");
    composer.process_internal_events();
    thread::sleep(Duration::from_millis(75));
    composer.handle_paste("22222222");
    composer.process_internal_events();

    assert!(composer.wait_internal_event(Duration::from_secs(2)));
    assert!(
        composer.state().pulse_active(PulseKind::Error),
        "first timer must not clear the replacement pulse"
    );

    assert!(composer.wait_internal_event(Duration::from_secs(2)));
    assert!(!composer.state().pulse_active(PulseKind::Error));
}

#[test]
fn missing_parts_are_not_wired() {
    let storage = SharedStorage::with_dark_mode(true);
    let parts = WidgetParts {
        copy_button: false,
        theme_toggle: false,
    };
    let mut composer = Composer::mount(
        ComposerState::new(CodeCatalog::default(), parts),
        RecordingRuntime::new(storage.clone()),
        FeedbackDurations::default(),
    );
    assert_eq!(composer.state().theme(), Theme::Light);

    composer.relayout(screen());
    assert!(composer.layout().copy_button.is_none());
    composer.handle_key(key(KeyCode::Tab));
    assert_eq!(composer.state().focus(), Focus::DigitField);

    type_text(&mut composer, "3");
    composer.handle_key(key(KeyCode::Enter));
    composer.process_internal_events();
    assert_eq!(composer.runtime().clipboard, vec!["OD-24-F0000003"]);
    assert_eq!(composer.runtime().save_count, 0);
    assert_eq!(storage.dark_mode(), Some(true));
}

#[test]
fn ctrl_q_and_ctrl_c_quit() {
    let mut composer = mount(RecordingRuntime::without_storage());
    assert!(composer.handle_key(ctrl('q')));
    assert!(composer.handle_key(ctrl('c')));
    assert!(!composer.handle_key(key(KeyCode::Char('q'))));
}

#[test]
fn render_shows_code_options_and_copied_status() -> Result<()> {
    let mut composer = mount(RecordingRuntime::without_storage());

    let idle = render_text(&mut composer)?;
    assert!(idle.contains("OD-24-F0000000"));
    assert!(idle.contains("[ SP ]"));
    assert!(idle.contains("[ 26 ]"));
    assert!(!idle.contains("copied to clipboard"));

    type_text(&mut composer, "1234567");
    composer.process_internal_events();
    let copied = render_text(&mut composer)?;
    assert!(copied.contains("copied to clipboard"));
    assert!(copied.contains("OD-24-F0000000"));
    Ok(())
}

#[test]
fn tiny_terminals_render_without_panicking() -> Result<()> {
    for (width, height) in [(0, 0), (2, 1), (5, 3), (12, 4)] {
        let mut composer = mount(RecordingRuntime::without_storage());
        type_text(&mut composer, "12");
        let mut terminal = Terminal::new(TestBackend::new(width, height))?;
        terminal.draw(|frame| composer.draw(frame))?;
        if let Some(toggle) = composer.layout().theme_toggle {
            assert!(toggle.right() <= width, "{width}x{height}");
        }
    }
    Ok(())
}

#[test]
fn unreadable_theme_falls_back_to_light_and_is_overwritten() {
    let counter = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let storage = SharedStorage::default();

    tracing::subscriber::with_default(subscriber, || {
        let mut composer = mount(RecordingRuntime::new(storage.clone()).unreadable_theme("maybe"));
        assert_eq!(composer.state().theme(), Theme::Light);

        composer.relayout(screen());
        let toggle = composer.layout().theme_toggle.expect("toggle mounted");
        click_rect(&mut composer, toggle);

        assert_eq!(composer.state().theme(), Theme::Dark);
        assert_eq!(composer.runtime().unreadable_theme, None);
        assert_eq!(composer.runtime().save_count, 1);
    });

    assert_eq!(counter.count(), 1);
    assert_eq!(storage.dark_mode(), Some(true));
    let reloaded = mount(RecordingRuntime::new(storage));
    assert_eq!(reloaded.state().theme(), Theme::Dark);
}
