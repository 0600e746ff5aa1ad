//! The shell seam
//!
//! The session and formatting state machines never talk to a UI toolkit
//! directly. Everything they need from the surrounding window (picking a
//! path, asking a yes/no/cancel question, reading or replacing the text
//! buffer, showing a message) goes through the [`Shell`] trait. The eframe
//! application implements it over native dialogs; tests implement it over
//! scripted queues.

use std::path::PathBuf;

/// Which way a path picker should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    /// Choose an existing file to read.
    Load,
    /// Choose a destination file to write.
    Save,
}

/// Answer to a modal yes/no/cancel prompt.
///
/// `Dismissed` covers both the explicit cancel button and closing the prompt
/// without answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAnswer {
    Yes,
    No,
    Dismissed,
}

/// Capabilities the window must provide to the core state machines.
///
/// Implementations are expected to be synchronous: a picker or prompt blocks
/// until the user answers, matching the one-command-at-a-time dispatch model.
pub trait Shell {
    /// Ask the user for a path. `None` means the picker was cancelled.
    fn pick_path(&mut self, mode: PickMode) -> Option<PathBuf>;

    /// Present a modal yes/no/cancel prompt and return the answer.
    fn confirm(&mut self, prompt: &str) -> ConfirmAnswer;

    /// Current contents of the text buffer.
    fn buffer_text(&self) -> String;

    /// Replace the entire text buffer.
    fn set_buffer_text(&mut self, text: &str);

    /// Show a modal informational message.
    fn show_message(&mut self, text: &str);
}
