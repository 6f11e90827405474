// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use arboard::Clipboard;
use npgen_db::Store;
use npgen_tui::InternalEvent;
use std::sync::mpsc::Sender;
use std::thread;

/// Wires the composer to the system clipboard and, when one opened,
/// the settings store.
pub struct StoreRuntime<'a> {
    store: Option<&'a Store>,
}

impl<'a> StoreRuntime<'a> {
    pub fn new(store: Option<&'a Store>) -> Self {
        Self { store }
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("access system clipboard")?;
    clipboard
        .set_text(text)
        .context("write code to system clipboard")?;
    Ok(())
}

impl npgen_tui::ComposerRuntime for StoreRuntime<'_> {
    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        copy_to_clipboard(text)
    }

    // Clipboard access can block on X11/Wayland; keep it off the UI thread.
    fn spawn_clipboard_write(
        &mut self,
        request_id: u64,
        text: String,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        thread::Builder::new()
            .name("npgen-clipboard".to_owned())
            .spawn(move || {
                let error = copy_to_clipboard(&text)
                    .err()
                    .map(|error| format!("{error:#}"));
                let _ = tx.send(InternalEvent::ClipboardFinished {
                    request_id,
                    text,
                    error,
                });
            })
            .map_err(|error| anyhow!("spawn clipboard worker: {error}"))?;
        Ok(())
    }

    fn load_dark_mode(&mut self) -> Result<Option<bool>> {
        match self.store {
            Some(store) => store.get_dark_mode_override(),
            None => Ok(None),
        }
    }

    fn save_dark_mode(&mut self, dark: bool) -> Result<()> {
        match self.store {
            Some(store) => store.put_dark_mode(dark),
            None => Ok(()),
        }
    }
}
