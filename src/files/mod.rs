//! File operations module for Jotpad
//!
//! This module provides functionality for native dialogs: opening and saving
//! documents, confirmation prompts, and informational messages.

pub mod dialogs;
