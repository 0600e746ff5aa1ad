//! Main application module for Jotpad
//!
//! This module implements the eframe App trait for the main window,
//! wiring the menu bar and editor widget to the document session and
//! formatting state.

// Allow clippy lint for this module:
// - option_map_unit_fn: Keyboard handling closure pattern is clearer than suggested alternative
#![allow(clippy::option_map_unit_fn)]

use crate::config::{load_config, save_config_silent, Settings, WindowSize};
use crate::files::dialogs::{confirm_dialog, message_dialog, open_file_dialog, save_file_dialog};
use crate::formatting::{FormattingState, FONT_FAMILIES, FONT_SIZE_PRESETS};
use crate::session::{DocumentIdentity, ExitState, PersistOutcome, SessionState};
use crate::shell::{ConfirmAnswer, PickMode, Shell};
use crate::templates::{TemplateCatalog, BUILTIN_TEMPLATES};
use eframe::egui;
use egui::text::LayoutJob;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application display name, shown in the window title and dialog captions.
pub const APP_NAME: &str = "Jotpad";

/// Confirmation shown after an explicit save succeeds.
const SAVED_MESSAGE: &str = "Changes saved";

/// Menu and keyboard actions that need to be deferred.
///
/// These actions are detected inside UI closures and executed afterwards
/// to avoid borrow conflicts, and because several of them open blocking
/// native dialogs.
#[derive(Debug, Clone, Copy)]
enum MenuAction {
    /// Start a fresh untitled document (Ctrl+N)
    New,
    /// Open file dialog (Ctrl+O)
    Open,
    /// Save current document (Ctrl+S)
    Save,
    /// Save As dialog (Ctrl+Shift+S)
    SaveAs,
    /// Reveal the document's directory in the system file manager
    OpenFolder,
    /// Run the exit confirmation flow
    Exit,
    /// Clear the buffer back to plain text
    PlainText,
    /// Replace the buffer with boilerplate for the tagged language
    Template(&'static str),
    /// Toggle word wrap
    ToggleWrap,
    /// Switch to the named font family
    SetFont(&'static str),
    /// Switch to a preset font size
    SetSizePreset(u32),
    /// Apply the custom size typed into the Format menu
    ApplySizeInput,
}

/// Dialog-backed [`Shell`] over the window's text buffer.
///
/// Built fresh for each command dispatch so it can borrow the buffer
/// mutably while the session state is borrowed elsewhere on the app.
struct AppShell<'a> {
    /// The editor buffer the session reads and writes.
    buffer: &'a mut String,
    /// Starting directory for file pickers.
    initial_dir: Option<PathBuf>,
    /// Suggested file name for save pickers.
    default_name: Option<String>,
}

impl Shell for AppShell<'_> {
    fn pick_path(&mut self, mode: PickMode) -> Option<PathBuf> {
        match mode {
            PickMode::Load => open_file_dialog(self.initial_dir.as_ref()),
            PickMode::Save => {
                save_file_dialog(self.initial_dir.as_ref(), self.default_name.as_deref())
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> ConfirmAnswer {
        confirm_dialog(APP_NAME, prompt)
    }

    fn buffer_text(&self) -> String {
        self.buffer.clone()
    }

    fn set_buffer_text(&mut self, text: &str) {
        *self.buffer = text.to_string();
    }

    fn show_message(&mut self, text: &str) {
        message_dialog(APP_NAME, text);
    }
}

/// Main application state.
pub struct JotpadApp {
    /// Document identity, window title, and persistence flow.
    session: SessionState,
    /// Font family, size, word wrap, and the template catalog.
    formatting: FormattingState,
    /// The text buffer the editor renders and edits.
    buffer: String,
    /// Persisted preferences.
    settings: Settings,
    /// Scratch text for the custom font-size field in the Format menu.
    size_input: String,
    /// Track if we should exit (after confirmation).
    should_exit: bool,
    /// Last known window size (for detecting changes).
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes).
    last_window_pos: Option<egui::Pos2>,
}

impl JotpadApp {
    /// Create a new application instance.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = load_config();
        let catalog = template_catalog(&settings);
        debug!("Template catalog at {}", catalog.root().display());

        let formatting = FormattingState::restore(
            &settings.font_family,
            settings.font_size,
            settings.word_wrap,
            catalog,
        );
        debug!(
            "Restored formatting: {} {}pt, wrap {}",
            formatting.font_family(),
            formatting.font_size(),
            formatting.wrap_label()
        );

        let size_input = formatting.font_size().to_string();

        Self {
            session: SessionState::new(),
            formatting,
            buffer: String::new(),
            settings,
            size_input,
            should_exit: false,
            last_window_size: None,
            last_window_pos: None,
        }
    }

    /// Update window size in settings if changed.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let mut changed = false;

        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                let current_size = rect.size();
                let current_pos = rect.min;

                // Check if size changed
                let size_changed = self
                    .last_window_size
                    .map(|s| (s - current_size).length() > 1.0)
                    .unwrap_or(true);

                // Check if position changed
                let pos_changed = self
                    .last_window_pos
                    .map(|p| (p - current_pos).length() > 1.0)
                    .unwrap_or(true);

                if size_changed || pos_changed {
                    self.last_window_size = Some(current_size);
                    self.last_window_pos = Some(current_pos);
                    changed = true;
                }
            }
        });

        if changed {
            if let (Some(size), Some(pos)) = (self.last_window_size, self.last_window_pos) {
                let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));

                self.settings.window_size = WindowSize {
                    width: size.x,
                    height: size.y,
                    x: Some(pos.x),
                    y: Some(pos.y),
                    maximized,
                };

                debug!(
                    "Window state updated: {}x{} at ({}, {}), maximized: {}",
                    size.x, size.y, pos.x, pos.y, maximized
                );
            }
        }
    }

    /// Get the window title based on the session.
    ///
    /// Returns a title in the format: "untitled - Jotpad".
    fn window_title(&self) -> String {
        format!("{} - {}", self.session.title(), APP_NAME)
    }

    /// Handle a close request from the window.
    ///
    /// Returns `true` if the application should close.
    fn handle_close_request(&mut self) -> bool {
        if self.should_exit {
            return true;
        }

        let mut shell = AppShell {
            buffer: &mut self.buffer,
            initial_dir: picker_start_dir(self.session.directory(), &self.settings),
            default_name: Some(suggested_name(self.session.identity())),
        };
        let text = shell.buffer_text();
        match self.session.request_exit(&text, &mut shell) {
            ExitState::Closed => {
                info!("Exit confirmed");
                true
            }
            ExitState::Aborted => {
                debug!("Exit dismissed, keeping the window open");
                false
            }
            // request_exit only returns terminal states
            ExitState::Confirming => false,
        }
    }

    /// Handle keyboard shortcuts.
    ///
    /// Processes global keyboard shortcuts:
    /// - Ctrl+S: Save current document
    /// - Ctrl+Shift+S: Save As
    /// - Ctrl+O: Open file
    /// - Ctrl+N: New document
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            // Ctrl+Shift+S: Save As (check first since it's more specific)
            if i.modifiers.ctrl && i.modifiers.shift && i.key_pressed(egui::Key::S) {
                debug!("Keyboard shortcut: Ctrl+Shift+S (Save As)");
                return Some(MenuAction::SaveAs);
            }

            // Ctrl+S: Save
            if i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::S) {
                debug!("Keyboard shortcut: Ctrl+S (Save)");
                return Some(MenuAction::Save);
            }

            // Ctrl+O: Open
            if i.modifiers.ctrl && i.key_pressed(egui::Key::O) {
                debug!("Keyboard shortcut: Ctrl+O (Open)");
                return Some(MenuAction::Open);
            }

            // Ctrl+N: New document
            if i.modifiers.ctrl && i.key_pressed(egui::Key::N) {
                debug!("Keyboard shortcut: Ctrl+N (New)");
                return Some(MenuAction::New);
            }

            None
        })
        .map(|action| self.dispatch(action));
    }

    /// Execute a deferred menu or keyboard action.
    fn dispatch(&mut self, action: MenuAction) {
        match action {
            MenuAction::New => self.handle_new(),
            MenuAction::Open => self.handle_open(),
            MenuAction::Save => self.handle_save(),
            MenuAction::SaveAs => self.handle_save_as(),
            MenuAction::OpenFolder => self.handle_open_folder(),
            MenuAction::Exit => {
                if self.handle_close_request() {
                    self.should_exit = true;
                }
            }
            MenuAction::PlainText => self.handle_plain_text(),
            MenuAction::Template(tag) => self.handle_template(tag),
            MenuAction::ToggleWrap => self.handle_toggle_wrap(),
            MenuAction::SetFont(family) => self.handle_set_font(family),
            MenuAction::SetSizePreset(size) => self.handle_set_size_preset(size),
            MenuAction::ApplySizeInput => self.handle_size_input(),
        }
    }

    /// Handle the New action: a fresh untitled document with default formatting.
    fn handle_new(&mut self) {
        info!("Starting a fresh document");
        self.session = SessionState::new();
        self.formatting = FormattingState::with_templates(template_catalog(&self.settings));
        self.buffer.clear();
        self.size_input = self.formatting.font_size().to_string();
    }

    /// Handle the Open action.
    fn handle_open(&mut self) {
        let mut shell = AppShell {
            buffer: &mut self.buffer,
            initial_dir: picker_start_dir(self.session.directory(), &self.settings),
            default_name: None,
        };
        match self.session.open(&mut shell) {
            PersistOutcome::Loaded(path, _) => {
                info!("Opened {}", path.display());
                self.settings.add_recent_file(path);
            }
            PersistOutcome::Failed(err) => {
                // The buffer already carries the read-failure marker.
                warn!("Open failed: {}", err);
            }
            PersistOutcome::Reset => info!("Picked the reserved untitled name, document reset"),
            PersistOutcome::Cancelled => debug!("Open dialog cancelled"),
            PersistOutcome::Saved(_) => {}
        }
    }

    /// Handle the Save action.
    fn handle_save(&mut self) {
        let mut shell = AppShell {
            buffer: &mut self.buffer,
            initial_dir: picker_start_dir(self.session.directory(), &self.settings),
            default_name: Some(suggested_name(self.session.identity())),
        };
        let text = shell.buffer_text();
        match self.session.save(&text, &mut shell) {
            PersistOutcome::Saved(path) => {
                info!("Saved {}", path.display());
                shell.show_message(SAVED_MESSAGE);
                self.settings.add_recent_file(path);
            }
            PersistOutcome::Cancelled => debug!("Save dialog cancelled"),
            PersistOutcome::Failed(err) => {
                warn!("Save failed: {}", err);
                shell.show_message(&err.to_string());
            }
            // Not produced by save
            PersistOutcome::Loaded(..) | PersistOutcome::Reset => {}
        }
    }

    /// Handle the Save As action.
    fn handle_save_as(&mut self) {
        let mut shell = AppShell {
            buffer: &mut self.buffer,
            initial_dir: picker_start_dir(self.session.directory(), &self.settings),
            default_name: Some(suggested_name(self.session.identity())),
        };
        let text = shell.buffer_text();
        match self.session.save_as(&text, &mut shell) {
            PersistOutcome::Saved(path) => {
                info!("Saved {}", path.display());
                shell.show_message(SAVED_MESSAGE);
                self.settings.add_recent_file(path);
            }
            PersistOutcome::Cancelled => debug!("Save As dialog cancelled"),
            PersistOutcome::Failed(err) => {
                warn!("Save As failed: {}", err);
                shell.show_message(&err.to_string());
            }
            // Not produced by save_as
            PersistOutcome::Loaded(..) | PersistOutcome::Reset => {}
        }
    }

    /// Reveal the document's directory in the system file manager.
    fn handle_open_folder(&mut self) {
        let Some(dir) = self.session.directory() else {
            return;
        };
        if let Err(err) = open::that(dir) {
            warn!("Failed to open {}: {}", dir.display(), err);
            message_dialog(APP_NAME, &format!("Failed to open folder: {}", err));
        }
    }

    /// Clear the buffer back to plain text (no boilerplate).
    fn handle_plain_text(&mut self) {
        info!("Cleared buffer to plain text");
        self.buffer.clear();
    }

    /// Replace the buffer with boilerplate for the tagged language.
    fn handle_template(&mut self, tag: &str) {
        match self.formatting.load_template(tag) {
            Ok(text) => {
                info!("Inserted '{}' boilerplate", tag);
                self.buffer = text;
            }
            Err(err) => {
                warn!("{}", err);
                message_dialog(APP_NAME, &err.to_string());
            }
        }
    }

    /// Toggle word wrap and remember the choice.
    fn handle_toggle_wrap(&mut self) {
        let wrap = self.formatting.toggle_word_wrap();
        self.settings.word_wrap = wrap;
        info!("Word wrap {}", self.formatting.wrap_label());
    }

    /// Switch to the named font family and remember the choice.
    fn handle_set_font(&mut self, family: &str) {
        let spec = self.formatting.set_font(family);
        info!("Font set to {}", spec.family);
        self.settings.font_family = spec.family;
    }

    /// Switch to a preset font size.
    fn handle_set_size_preset(&mut self, size: u32) {
        // Presets are positive, so this cannot be rejected
        if let Ok(spec) = self.formatting.set_font_size(&size.to_string()) {
            self.settings.font_size = spec.size;
            self.size_input = spec.size.to_string();
        }
    }

    /// Apply the custom size typed into the Format menu.
    ///
    /// Rejected input leaves the size unchanged and resets the field to the
    /// current value.
    fn handle_size_input(&mut self) {
        let input = self.size_input.clone();
        match self.formatting.set_font_size(&input) {
            Ok(spec) => {
                info!("Font size set to {}", spec.size);
                self.settings.font_size = spec.size;
                self.size_input = spec.size.to_string();
            }
            Err(err) => {
                warn!("{}", err);
                message_dialog(APP_NAME, &err.to_string());
                self.size_input = self.formatting.font_size().to_string();
            }
        }
    }

    /// Render the menu bar, returning any action picked this frame.
    fn menu_bar(&mut self, ui: &mut egui::Ui) -> Option<MenuAction> {
        let mut action = None;

        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New").clicked() {
                    ui.close_menu();
                    action = Some(MenuAction::New);
                }
                if ui.button("Open…").clicked() {
                    ui.close_menu();
                    action = Some(MenuAction::Open);
                }
                if ui.button("Save").clicked() {
                    ui.close_menu();
                    action = Some(MenuAction::Save);
                }
                if ui.button("Save As…").clicked() {
                    ui.close_menu();
                    action = Some(MenuAction::SaveAs);
                }
                ui.separator();

                // Only meaningful once the document has a directory
                let has_dir = self.session.directory().is_some();
                if ui
                    .add_enabled(has_dir, egui::Button::new("Open Containing Folder"))
                    .clicked()
                {
                    ui.close_menu();
                    action = Some(MenuAction::OpenFolder);
                }
                ui.separator();

                if ui.button("Exit").clicked() {
                    ui.close_menu();
                    action = Some(MenuAction::Exit);
                }
            });

            ui.menu_button("Language", |ui| {
                if ui.button("Plain Text").clicked() {
                    ui.close_menu();
                    action = Some(MenuAction::PlainText);
                }
                ui.separator();
                for (label, tag) in BUILTIN_TEMPLATES {
                    if ui.button(*label).clicked() {
                        ui.close_menu();
                        action = Some(MenuAction::Template(tag));
                    }
                }
            });

            ui.menu_button("Format", |ui| {
                let wrap_text = format!("Word Wrap: {}", self.formatting.wrap_label());
                if ui.button(wrap_text).clicked() {
                    ui.close_menu();
                    action = Some(MenuAction::ToggleWrap);
                }
                ui.separator();

                ui.menu_button("Font", |ui| {
                    for family in FONT_FAMILIES {
                        let selected = self.formatting.font_family() == *family;
                        if ui.radio(selected, *family).clicked() {
                            ui.close_menu();
                            action = Some(MenuAction::SetFont(family));
                        }
                    }
                });

                ui.menu_button("Size", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Custom:");
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut self.size_input).desired_width(48.0),
                        );
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            ui.close_menu();
                            action = Some(MenuAction::ApplySizeInput);
                        }
                    });
                    ui.separator();
                    for size in FONT_SIZE_PRESETS {
                        let selected = self.formatting.font_size() == *size;
                        if ui.radio(selected, size.to_string()).clicked() {
                            ui.close_menu();
                            action = Some(MenuAction::SetSizePreset(*size));
                        }
                    }
                });
            });
        });

        action
    }

    /// Render the editor with the current formatting descriptor.
    fn editor(&mut self, ui: &mut egui::Ui) {
        let spec = self.formatting.font_spec();
        let font_id = egui::FontId::new(spec.size as f32, font_family_for(&spec.family));
        let word_wrap = self.formatting.word_wrap();

        let layouter_font = font_id.clone();
        let mut layouter = move |ui: &egui::Ui, text: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let layout_job = if word_wrap {
                LayoutJob::simple(
                    text.to_owned(),
                    layouter_font.clone(),
                    ui.visuals().text_color(),
                    wrap_width,
                )
            } else {
                LayoutJob::simple_singleline(
                    text.to_owned(),
                    layouter_font.clone(),
                    ui.visuals().text_color(),
                )
            };
            ui.fonts(|f| f.layout_job(layout_job))
        };

        // Without wrap, long lines scroll sideways instead of folding
        let scroll_area = if word_wrap {
            egui::ScrollArea::vertical()
        } else {
            egui::ScrollArea::both()
        };

        scroll_area.auto_shrink([false, false]).show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut self.buffer)
                    .id_source("editor")
                    .font(font_id)
                    .desired_width(f32::INFINITY)
                    .frame(false)
                    .layouter(&mut layouter),
            );
        });
    }
}

impl eframe::App for JotpadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Window title tracks the session
        let title = self.window_title();
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));

        // Track window size/position changes for persistence
        self.update_window_state(ctx);

        // Handle close request from the window button
        if ctx.input(|i| i.viewport().close_requested()) && !self.handle_close_request() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }

        self.handle_keyboard_shortcuts(ctx);

        let mut menu_action = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            menu_action = self.menu_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.editor(ui);
        });

        if let Some(action) = menu_action {
            self.dispatch(action);
        }

        if self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        save_config_silent(&self.settings);
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application settings");
        save_config_silent(&self.settings);
    }
}

/// Starting directory for file pickers: the document's own directory first,
/// then the most recent file's parent.
fn picker_start_dir(session_dir: Option<&Path>, settings: &Settings) -> Option<PathBuf> {
    session_dir.map(Path::to_path_buf).or_else(|| {
        settings
            .recent_files
            .first()
            .and_then(|recent| recent.parent())
            .map(Path::to_path_buf)
    })
}

/// Default file name offered by save pickers.
fn suggested_name(identity: &DocumentIdentity) -> String {
    if identity.is_untitled() {
        "untitled.txt".to_string()
    } else {
        identity.display_name().to_string()
    }
}

/// Build the template catalog from the configured directory.
fn template_catalog(settings: &Settings) -> TemplateCatalog {
    match &settings.template_dir {
        Some(dir) => TemplateCatalog::new(dir),
        None => TemplateCatalog::default(),
    }
}

/// Map a stored family label onto an egui font family.
///
/// Only the built-in egui families exist without loading font data, so
/// labels that suggest a monospace face render monospace and everything
/// else renders proportional.
fn font_family_for(label: &str) -> egui::FontFamily {
    let lower = label.to_lowercase();
    if lower.contains("mono") || lower.contains("courier") || lower.contains("consolas") {
        egui::FontFamily::Monospace
    } else {
        egui::FontFamily::Proportional
    }
}
