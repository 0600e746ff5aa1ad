//! Native dialog integration using the rfd crate
//!
//! This module provides functions to open native file picker dialogs for
//! opening and saving documents, plus the blocking message and confirmation
//! dialogs the rest of the app presents. Everything here blocks until the
//! user answers, which is exactly what the one-command-at-a-time dispatch
//! model expects.

use crate::shell::ConfirmAnswer;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

/// File extension filters for supported file types.
const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];
const SOURCE_EXTENSIONS: &[&str] = &["java", "c", "cpp", "h", "htm", "html"];

/// Opens a native file dialog for selecting a single file to read.
///
/// Returns `Some(PathBuf)` if a file was selected, `None` if cancelled.
pub fn open_file_dialog(initial_dir: Option<&PathBuf>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Open File")
        .add_filter("Text Files", TEXT_EXTENSIONS)
        .add_filter("Source Files", SOURCE_EXTENSIONS)
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}

/// Opens a native save dialog for choosing a destination file.
///
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_file_dialog(
    initial_dir: Option<&PathBuf>,
    default_name: Option<&str>,
) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Save File")
        .add_filter("Text Files", TEXT_EXTENSIONS)
        .add_filter("Source Files", SOURCE_EXTENSIONS)
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    if let Some(name) = default_name {
        dialog = dialog.set_file_name(name);
    }

    dialog.save_file()
}

/// Presents a blocking yes/no/cancel prompt.
///
/// Closing the dialog without answering maps to
/// [`ConfirmAnswer::Dismissed`], the same as pressing Cancel.
pub fn confirm_dialog(title: &str, prompt: &str) -> ConfirmAnswer {
    let result = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(prompt)
        .set_buttons(MessageButtons::YesNoCancel)
        .show();

    match result {
        MessageDialogResult::Yes => ConfirmAnswer::Yes,
        MessageDialogResult::No => ConfirmAnswer::No,
        _ => ConfirmAnswer::Dismissed,
    }
}

/// Presents a blocking informational message with a single OK button.
pub fn message_dialog(title: &str, text: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(text)
        .set_buttons(MessageButtons::Ok)
        .show();
}
