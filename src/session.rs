//! Document session state
//!
//! One window owns one [`SessionState`]: the document's identity (untitled
//! vs. backed by a file on disk), the window-title text, and the persistence
//! operations that move between those states. The text buffer itself lives in
//! the shell; operations receive its contents as an argument and push
//! replacements back through [`Shell`].

use crate::error::Error;
use crate::shell::{ConfirmAnswer, PickMode, Shell};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Display name of a document that has never been saved.
pub const UNTITLED: &str = "untitled";

/// Buffer text shown when an opened file cannot be read.
pub const READ_FAILURE_MARKER: &str = "FILE NOT FOUND..!";

/// Window-title text after a failed write.
pub const WRITE_FAILURE_TITLE: &str = "nofile";

/// Exit prompt for sessions that have never been saved.
const SAVE_FILE_PROMPT: &str = "Do you want to save file?";

/// Exit prompt for sessions already backed by a file.
const SAVE_CHANGES_PROMPT: &str = "Do you want to save changes?";

// ─────────────────────────────────────────────────────────────────────────────
// Document Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Where a document lives, if anywhere.
///
/// A directory exists exactly when the document has a name; the enum makes
/// the other combinations unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentIdentity {
    /// Never saved to a concrete path.
    Untitled,
    /// Backed by `directory/name` on disk.
    Named { name: String, directory: PathBuf },
}

impl DocumentIdentity {
    pub fn is_untitled(&self) -> bool {
        matches!(self, DocumentIdentity::Untitled)
    }

    /// Name shown in the window title; the sentinel for untitled documents.
    pub fn display_name(&self) -> &str {
        match self {
            DocumentIdentity::Untitled => UNTITLED,
            DocumentIdentity::Named { name, .. } => name,
        }
    }

    /// Directory backing the document, once it has one.
    pub fn directory(&self) -> Option<&Path> {
        match self {
            DocumentIdentity::Untitled => None,
            DocumentIdentity::Named { directory, .. } => Some(directory),
        }
    }

    /// Full on-disk path, once the document has one.
    pub fn file_path(&self) -> Option<PathBuf> {
        match self {
            DocumentIdentity::Untitled => None,
            DocumentIdentity::Named { name, directory } => Some(directory.join(name)),
        }
    }
}

/// Split a picked path into its display name and parent directory.
///
/// Returns `None` for paths without a final component, which a real picker
/// never produces; callers treat that case like a dismissed picker.
fn split_path(path: &Path) -> Option<(String, PathBuf)> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Some((name, directory))
}

// ─────────────────────────────────────────────────────────────────────────────
// Operation Outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// What a persistence operation did, for the shell to render.
#[derive(Debug)]
pub enum PersistOutcome {
    /// Buffer written to the path.
    Saved(PathBuf),
    /// File read; the content has replaced the buffer.
    Loaded(PathBuf, String),
    /// Picker dismissed. `open` leaves the session untouched; `save_as`
    /// resets identity to untitled (buffer kept).
    Cancelled,
    /// The untitled sentinel was picked: identity reset, buffer cleared.
    Reset,
    /// The operation failed; the error is ready for display.
    Failed(Error),
}

/// States of the exit decision gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// The save-before-exit prompt is up.
    Confirming,
    /// Terminal: the window should be disposed.
    Closed,
    /// Terminal: the exit was dismissed; the window stays open.
    Aborted,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session State
// ─────────────────────────────────────────────────────────────────────────────

/// Identity and persistence state of one document window.
#[derive(Debug)]
pub struct SessionState {
    /// Whether the document is backed by a concrete file yet.
    identity: DocumentIdentity,
    /// Window-title text. Tracks the display name, except after a failed
    /// write, which parks it on [`WRITE_FAILURE_TITLE`] until the next
    /// successful operation.
    title: String,
}

impl SessionState {
    /// Create a fresh, untitled session.
    pub fn new() -> Self {
        Self {
            identity: DocumentIdentity::Untitled,
            title: UNTITLED.to_string(),
        }
    }

    pub fn identity(&self) -> &DocumentIdentity {
        &self.identity
    }

    /// Text for the window title bar.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Directory backing the document, once it has one. Drives features that
    /// need a concrete location, like opening the containing folder.
    pub fn directory(&self) -> Option<&Path> {
        self.identity.directory()
    }

    /// Pick a file and load it into the buffer.
    ///
    /// A cancelled picker leaves the session untouched. Picking a file whose
    /// display name is the untitled sentinel resets the session and clears
    /// the buffer. Otherwise identity follows the picked path even when the
    /// read fails; an unreadable file puts [`READ_FAILURE_MARKER`] in the
    /// buffer and reports the error instead of aborting the session.
    pub fn open(&mut self, shell: &mut dyn Shell) -> PersistOutcome {
        let picked = shell.pick_path(PickMode::Load).and_then(|p| split_path(&p));
        let Some((name, directory)) = picked else {
            debug!("open picker cancelled");
            return PersistOutcome::Cancelled;
        };

        if name == UNTITLED {
            debug!("untitled sentinel picked; session resets");
            self.identity = DocumentIdentity::Untitled;
            self.title = UNTITLED.to_string();
            shell.set_buffer_text("");
            return PersistOutcome::Reset;
        }

        let file_path = directory.join(&name);
        self.identity = DocumentIdentity::Named {
            name: name.clone(),
            directory,
        };
        self.title = name;

        match fs::read_to_string(&file_path) {
            Ok(content) => {
                info!("opened {}", file_path.display());
                shell.set_buffer_text(&content);
                PersistOutcome::Loaded(file_path, content)
            }
            Err(source) => {
                warn!("failed to read {}: {}", file_path.display(), source);
                shell.set_buffer_text(READ_FAILURE_MARKER);
                PersistOutcome::Failed(Error::NotFound {
                    path: file_path,
                    source,
                })
            }
        }
    }

    /// Write the buffer to the document's backing file.
    ///
    /// Untitled sessions have no backing file, so the call delegates to
    /// [`SessionState::save_as`]. A failed write parks the title on
    /// [`WRITE_FAILURE_TITLE`] and clears the buffer; name and directory keep
    /// their last values.
    pub fn save(&mut self, buffer: &str, shell: &mut dyn Shell) -> PersistOutcome {
        let Some(file_path) = self.identity.file_path() else {
            debug!("save on an untitled session; delegating to save-as");
            return self.save_as(buffer, shell);
        };
        self.title = self.identity.display_name().to_string();
        self.write_buffer(&file_path, buffer, shell)
    }

    /// Pick a destination and write the buffer there.
    ///
    /// A cancelled picker resets identity to untitled and leaves the buffer
    /// alone. Otherwise identity follows the chosen path; write failures
    /// behave as in [`SessionState::save`].
    pub fn save_as(&mut self, buffer: &str, shell: &mut dyn Shell) -> PersistOutcome {
        let picked = shell.pick_path(PickMode::Save).and_then(|p| split_path(&p));
        let Some((name, directory)) = picked else {
            debug!("save-as picker cancelled; session becomes untitled");
            self.identity = DocumentIdentity::Untitled;
            self.title = UNTITLED.to_string();
            return PersistOutcome::Cancelled;
        };

        let file_path = directory.join(&name);
        self.identity = DocumentIdentity::Named {
            name: name.clone(),
            directory,
        };
        self.title = name;
        self.write_buffer(&file_path, buffer, shell)
    }

    /// Run the exit decision gate.
    ///
    /// Starts in [`ExitState::Confirming`] with a yes/no/cancel prompt:
    /// *Yes* saves first (untitled sessions go through the save-as picker;
    /// dismissing that picker still closes the window), *No* closes and
    /// discards unsaved changes, *Dismissed* aborts the exit and keeps the
    /// window open with nothing mutated.
    pub fn request_exit(&mut self, buffer: &str, shell: &mut dyn Shell) -> ExitState {
        let mut state = ExitState::Confirming;
        loop {
            state = match state {
                ExitState::Confirming => {
                    let answer = shell.confirm(self.exit_prompt());
                    debug!("exit prompt answered {:?}", answer);
                    match answer {
                        ConfirmAnswer::Yes => {
                            // Failures and cancelled pickers here do not keep
                            // the window open.
                            if let PersistOutcome::Failed(err) = self.save(buffer, shell) {
                                warn!("save during exit failed: {}", err);
                            }
                            ExitState::Closed
                        }
                        ConfirmAnswer::No => ExitState::Closed,
                        ConfirmAnswer::Dismissed => ExitState::Aborted,
                    }
                }
                terminal => return terminal,
            };
        }
    }

    fn exit_prompt(&self) -> &'static str {
        if self.identity.is_untitled() {
            SAVE_FILE_PROMPT
        } else {
            SAVE_CHANGES_PROMPT
        }
    }

    fn write_buffer(&mut self, path: &Path, buffer: &str, shell: &mut dyn Shell) -> PersistOutcome {
        match fs::write(path, buffer) {
            Ok(()) => {
                info!("saved {}", path.display());
                PersistOutcome::Saved(path.to_path_buf())
            }
            Err(source) => {
                warn!("failed to write {}: {}", path.display(), source);
                self.title = WRITE_FAILURE_TITLE.to_string();
                shell.set_buffer_text("");
                PersistOutcome::Failed(Error::WriteFailed {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    /// Shell double driven by queued picker results and prompt answers.
    #[derive(Default)]
    struct ScriptedShell {
        picks: VecDeque<Option<PathBuf>>,
        answers: VecDeque<ConfirmAnswer>,
        buffer: String,
        messages: Vec<String>,
        prompts: Vec<String>,
        modes: Vec<PickMode>,
    }

    impl ScriptedShell {
        fn new() -> Self {
            Self::default()
        }

        fn will_pick(mut self, path: Option<PathBuf>) -> Self {
            self.picks.push_back(path);
            self
        }

        fn will_answer(mut self, answer: ConfirmAnswer) -> Self {
            self.answers.push_back(answer);
            self
        }

        fn with_buffer(mut self, text: &str) -> Self {
            self.buffer = text.to_string();
            self
        }
    }

    impl Shell for ScriptedShell {
        fn pick_path(&mut self, mode: PickMode) -> Option<PathBuf> {
            self.modes.push(mode);
            self.picks.pop_front().expect("unexpected pick_path call")
        }

        fn confirm(&mut self, prompt: &str) -> ConfirmAnswer {
            self.prompts.push(prompt.to_string());
            self.answers.pop_front().expect("unexpected confirm call")
        }

        fn buffer_text(&self) -> String {
            self.buffer.clone()
        }

        fn set_buffer_text(&mut self, text: &str) {
            self.buffer = text.to_string();
        }

        fn show_message(&mut self, text: &str) {
            self.messages.push(text.to_string());
        }
    }

    fn named_session(dir: &TempDir, name: &str, content: &str) -> SessionState {
        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new().will_pick(Some(dir.path().join(name)));
        let outcome = session.save_as(content, &mut shell);
        assert!(matches!(outcome, PersistOutcome::Saved(_)));
        session
    }

    // ─── Identity ────────────────────────────────────────────────────────────

    #[test]
    fn test_new_session_is_untitled() {
        let session = SessionState::new();
        assert!(session.identity().is_untitled());
        assert_eq!(session.title(), UNTITLED);
        assert!(session.directory().is_none());
        assert!(session.identity().file_path().is_none());
    }

    #[test]
    fn test_named_identity_composes_file_path() {
        let identity = DocumentIdentity::Named {
            name: "note.txt".to_string(),
            directory: PathBuf::from("/docs"),
        };
        assert!(!identity.is_untitled());
        assert_eq!(identity.display_name(), "note.txt");
        assert_eq!(identity.file_path(), Some(PathBuf::from("/docs/note.txt")));
    }

    // ─── Open ────────────────────────────────────────────────────────────────

    #[test]
    fn test_open_cancelled_keeps_identity() {
        let dir = TempDir::new().unwrap();
        let mut session = named_session(&dir, "note.txt", "body");
        let before = session.identity().clone();

        let mut shell = ScriptedShell::new().will_pick(None).with_buffer("body");
        let outcome = session.open(&mut shell);

        assert!(matches!(outcome, PersistOutcome::Cancelled));
        assert_eq!(session.identity(), &before);
        assert_eq!(session.title(), "note.txt");
        assert_eq!(shell.buffer, "body");
    }

    #[test]
    fn test_open_loads_file_into_buffer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("letter.txt");
        std::fs::write(&path, "alpha\nbeta\n").unwrap();

        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new().will_pick(Some(path.clone()));
        let outcome = session.open(&mut shell);

        assert!(matches!(outcome, PersistOutcome::Loaded(p, c) if p == path && c == "alpha\nbeta\n"));
        assert_eq!(shell.buffer, "alpha\nbeta\n");
        assert_eq!(session.title(), "letter.txt");
        assert_eq!(session.directory(), Some(dir.path()));
        assert_eq!(shell.modes, vec![PickMode::Load]);
    }

    #[test]
    fn test_open_missing_file_marks_buffer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new()
            .will_pick(Some(path.clone()))
            .with_buffer("previous text");
        let outcome = session.open(&mut shell);

        assert!(matches!(outcome, PersistOutcome::Failed(Error::NotFound { path: p, .. }) if p == path));
        assert_eq!(shell.buffer, READ_FAILURE_MARKER);
        // Identity still follows the picked path; the session survives.
        assert_eq!(session.title(), "missing.txt");
        assert_eq!(session.directory(), Some(dir.path()));
    }

    #[test]
    fn test_open_untitled_sentinel_resets_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(UNTITLED);
        std::fs::write(&path, "should never load").unwrap();

        let mut session = named_session(&dir, "note.txt", "body");
        let mut shell = ScriptedShell::new()
            .will_pick(Some(path))
            .with_buffer("body");
        let outcome = session.open(&mut shell);

        assert!(matches!(outcome, PersistOutcome::Reset));
        assert!(session.identity().is_untitled());
        assert_eq!(session.title(), UNTITLED);
        assert_eq!(shell.buffer, "");
    }

    // ─── Save / Save As ──────────────────────────────────────────────────────

    #[test]
    fn test_save_untitled_delegates_to_save_as() {
        let docs = TempDir::new().unwrap();
        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new().will_pick(Some(docs.path().join("note.txt")));

        let outcome = session.save("hello", &mut shell);

        let expected = docs.path().join("note.txt");
        assert!(matches!(outcome, PersistOutcome::Saved(p) if p == expected));
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "hello");
        assert_eq!(session.title(), "note.txt");
        assert_eq!(session.directory(), Some(docs.path()));
        assert_eq!(shell.modes, vec![PickMode::Save]);
    }

    #[test]
    fn test_save_named_writes_in_place_without_picker() {
        let dir = TempDir::new().unwrap();
        let mut session = named_session(&dir, "note.txt", "v1");

        let mut shell = ScriptedShell::new();
        let outcome = session.save("v2", &mut shell);

        assert!(matches!(outcome, PersistOutcome::Saved(_)));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("note.txt")).unwrap(),
            "v2"
        );
        assert!(shell.modes.is_empty());
    }

    #[test]
    fn test_save_write_failure_marks_title_and_clears_buffer() {
        let dir = TempDir::new().unwrap();
        let doomed = dir.path().join("no_such_dir").join("note.txt");

        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new()
            .will_pick(Some(doomed.clone()))
            .with_buffer("precious");
        let outcome = session.save_as("precious", &mut shell);

        assert!(matches!(outcome, PersistOutcome::Failed(Error::WriteFailed { path, .. }) if path == doomed));
        assert_eq!(session.title(), WRITE_FAILURE_TITLE);
        assert_eq!(shell.buffer, "");
        // Name and directory keep their last values.
        assert_eq!(session.identity().display_name(), "note.txt");
        assert_eq!(session.directory(), Some(doomed.parent().unwrap()));
    }

    #[test]
    fn test_save_after_failure_restores_title() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("no_such_dir");
        let doomed = nested.join("note.txt");

        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new().will_pick(Some(doomed.clone()));
        let outcome = session.save_as("draft", &mut shell);
        assert!(matches!(outcome, PersistOutcome::Failed(_)));
        assert_eq!(session.title(), WRITE_FAILURE_TITLE);

        std::fs::create_dir(&nested).unwrap();
        let outcome = session.save("draft", &mut shell);
        assert!(matches!(outcome, PersistOutcome::Saved(_)));
        assert_eq!(session.title(), "note.txt");
        assert_eq!(std::fs::read_to_string(&doomed).unwrap(), "draft");
    }

    #[test]
    fn test_save_as_cancelled_resets_identity_keeps_buffer() {
        let dir = TempDir::new().unwrap();
        let mut session = named_session(&dir, "note.txt", "body");

        let mut shell = ScriptedShell::new().will_pick(None).with_buffer("keep me");
        let outcome = session.save_as("keep me", &mut shell);

        assert!(matches!(outcome, PersistOutcome::Cancelled));
        assert!(session.identity().is_untitled());
        assert_eq!(session.title(), UNTITLED);
        assert_eq!(shell.buffer, "keep me");
        // The previously saved file is untouched.
        assert_eq!(
            std::fs::read_to_string(dir.path().join("note.txt")).unwrap(),
            "body"
        );
    }

    #[test]
    fn test_round_trip_save_then_open_preserves_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("round.txt");
        let content = "line one\nline two\n\ttabbed\n";

        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new()
            .will_pick(Some(path.clone()))
            .will_pick(Some(path));
        let outcome = session.save_as(content, &mut shell);
        assert!(matches!(outcome, PersistOutcome::Saved(_)));

        let outcome = session.open(&mut shell);
        assert!(matches!(outcome, PersistOutcome::Loaded(..)));
        assert_eq!(shell.buffer, content);
    }

    // ─── Exit Gate ───────────────────────────────────────────────────────────

    #[test]
    fn test_exit_answer_no_closes_without_writing() {
        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new()
            .will_answer(ConfirmAnswer::No)
            .with_buffer("unsaved");

        let state = session.request_exit("unsaved", &mut shell);

        assert_eq!(state, ExitState::Closed);
        assert!(shell.modes.is_empty());
        assert!(session.identity().is_untitled());
    }

    #[test]
    fn test_exit_answer_dismissed_aborts() {
        let dir = TempDir::new().unwrap();
        let mut session = named_session(&dir, "note.txt", "body");

        let mut shell = ScriptedShell::new()
            .will_answer(ConfirmAnswer::Dismissed)
            .with_buffer("edited");
        let state = session.request_exit("edited", &mut shell);

        assert_eq!(state, ExitState::Aborted);
        assert_eq!(session.title(), "note.txt");
        assert_eq!(shell.buffer, "edited");
        // The file still holds the last saved content.
        assert_eq!(
            std::fs::read_to_string(dir.path().join("note.txt")).unwrap(),
            "body"
        );
    }

    #[test]
    fn test_exit_answer_yes_untitled_saves_through_picker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_words.txt");

        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new()
            .will_answer(ConfirmAnswer::Yes)
            .will_pick(Some(path.clone()));
        let state = session.request_exit("goodbye", &mut shell);

        assert_eq!(state, ExitState::Closed);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "goodbye");
        assert_eq!(shell.modes, vec![PickMode::Save]);
    }

    #[test]
    fn test_exit_answer_yes_with_cancelled_picker_still_closes() {
        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new()
            .will_answer(ConfirmAnswer::Yes)
            .will_pick(None);

        let state = session.request_exit("vanishes", &mut shell);

        assert_eq!(state, ExitState::Closed);
        assert!(session.identity().is_untitled());
    }

    #[test]
    fn test_exit_answer_yes_named_saves_in_place() {
        let dir = TempDir::new().unwrap();
        let mut session = named_session(&dir, "note.txt", "v1");

        let mut shell = ScriptedShell::new().will_answer(ConfirmAnswer::Yes);
        let state = session.request_exit("v2", &mut shell);

        assert_eq!(state, ExitState::Closed);
        assert!(shell.modes.is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("note.txt")).unwrap(),
            "v2"
        );
    }

    #[test]
    fn test_exit_prompt_wording_tracks_identity() {
        let mut session = SessionState::new();
        let mut shell = ScriptedShell::new().will_answer(ConfirmAnswer::Dismissed);
        session.request_exit("", &mut shell);
        assert_eq!(shell.prompts, vec![SAVE_FILE_PROMPT.to_string()]);

        let dir = TempDir::new().unwrap();
        let mut session = named_session(&dir, "note.txt", "body");
        let mut shell = ScriptedShell::new().will_answer(ConfirmAnswer::Dismissed);
        session.request_exit("body", &mut shell);
        assert_eq!(shell.prompts, vec![SAVE_CHANGES_PROMPT.to_string()]);
    }
}
