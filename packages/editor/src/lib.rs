//! # Sitecraft Editor
//!
//! Block editing engine for Sitecraft sites.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Block tree, Page, Site, Theme        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Pure mutations over the block list       │
//! │  - Snapshot undo/redo                       │
//! │  - Best-effort persistence                  │
//! │  - Templates, combinations, drag-and-drop   │
//! │  - Page tree, URLs, theme                   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host UI: rendering, styling (not here)      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The session owns the state**: one `EditSession` per editor; no
//!    globals
//! 2. **Blocks are values**: every change produces a new list; history keeps
//!    full snapshots
//! 3. **Persistence never blocks editing**: save errors are logged, never
//!    rolled back
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sitecraft_editor::{EditSession, EditorOptions, DropPosition};
//! use sitecraft_model::{BlockKind, Site};
//!
//! let mut session = EditSession::new(EditorOptions::default()).with_site(site);
//! session.set_current_page(Some("home"))?;
//!
//! session.drop_block(BlockKind::Text, DropPosition::End)?;
//! session.insert_combination("features-grid", None)?;
//! session.undo();
//! ```

mod errors;
mod mutations;
mod options;
mod persistence;
mod session;
mod templates;
mod undo_stack;
mod url;
mod validation;

pub use errors::EditorError;
pub use mutations::{create_block_for_drop, BlockPatch, DropPosition, Mutation, MutationError};
pub use options::EditorOptions;
pub use persistence::{
    FileStore, KeyValueStore, MemoryStore, Persistence, PersistenceError, SaveOutcome,
    DEFAULT_STORAGE_KEY,
};
pub use session::{BlockEvent, EditSession, EditorEvent, UpdateSource};
pub use templates::{BlockCombination, BlockTemplate, Library, SearchResults, TemplateCategory, TemplateError};
pub use undo_stack::{HistoryEntry, UndoStack};
pub use url::{create_slug, generate_breadcrumbs, generate_page_url, validate_slug, Breadcrumb, UrlError};
pub use validation::{
    validate_markup, validate_page_settings, ValidationError, ValidationResult, INVALID_MARKUP_MESSAGE,
};
