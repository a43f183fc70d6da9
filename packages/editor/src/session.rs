//! # Edit Session
//!
//! The single owner of editing state for one user: the site, the page being
//! edited, its block list, selection and UI flags, plus the history,
//! persistence and id generator that back them.
//!
//! Every block change runs the same path:
//!
//! ```text
//! Mutation::apply(blocks) → push previous list on history → replace blocks
//!   → persist (autosave) → write into current page → mark unsaved → event
//! ```
//!
//! Sessions are single-threaded and synchronous. Persistence failures are
//! logged and never roll back in-memory state.

use crate::mutations::{create_block_for_drop, BlockPatch, DropPosition, Mutation};
use crate::options::EditorOptions;
use crate::persistence::{KeyValueStore, MemoryStore, Persistence, SaveOutcome};
use crate::templates::Library;
use crate::undo_stack::UndoStack;
use crate::url::{create_slug, generate_breadcrumbs, generate_page_url, Breadcrumb};
use crate::validation::{validate_markup, validate_page_settings, ValidationError, ValidationResult};
use crate::{EditorError, MutationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use sitecraft_model::{
    find_block, find_block_mut, Block, BlockContent, BlockKind, BlockSettings, IdGenerator, Page,
    PagePatch, PageSettings, Site, SitePatch, Theme,
};

const PAGE_ID_IN_USE: &str = "Page id is already in use";

/// What triggered a block update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSource {
    User,
    System,
    Undo,
    Redo,
}

/// Notifications emitted by the session, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditorEvent {
    PageChange {
        page_id: Option<String>,
    },
    BlockUpdate {
        block_id: Option<String>,
        source: UpdateSource,
    },
    ThemeChange {
        theme: Box<Theme>,
    },
    Error {
        message: String,
    },
}

/// Events raised by block components for the session to reconcile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockEvent {
    /// Full replacement of a block (matched by id)
    BlockUpdate(Block),

    /// Partial settings patch
    SettingsUpdate { block_id: String, patch: BlockSettings },

    /// Partial content patch
    ContentUpdate { block_id: String, patch: BlockContent },
}

#[derive(Debug)]
pub struct EditSession {
    site: Option<Site>,
    current_page_id: Option<String>,
    blocks: Vec<Block>,
    selected_block_id: Option<String>,

    is_dragging: bool,
    is_preview_mode: bool,
    has_unsaved_changes: bool,
    last_saved: Option<DateTime<Utc>>,

    history: UndoStack,
    persistence: Persistence,
    ids: IdGenerator,
    library: Library,
    options: EditorOptions,

    events: Vec<EditorEvent>,
}

impl EditSession {
    /// Session persisting to memory only
    pub fn new(options: EditorOptions) -> Self {
        Self::with_store(options, Box::new(MemoryStore::new()))
    }

    pub fn with_store(options: EditorOptions, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            site: None,
            current_page_id: None,
            blocks: Vec::new(),
            selected_block_id: None,
            is_dragging: false,
            is_preview_mode: false,
            has_unsaved_changes: false,
            last_saved: None,
            history: UndoStack::with_max_levels(options.max_history_size),
            persistence: Persistence::with_key(store, options.storage_key.clone()),
            ids: IdGenerator::new(),
            library: Library::builtin(),
            options,
            events: Vec::new(),
        }
    }

    pub fn with_site(mut self, site: Site) -> Self {
        self.site = Some(site);
        self
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    // ---- State ----

    pub fn site(&self) -> Option<&Site> {
        self.site.as_ref()
    }

    /// Take the site out of the session, e.g. to write it to disk
    pub fn into_site(self) -> Option<Site> {
        self.site
    }

    pub fn current_page(&self) -> Option<&Page> {
        let id = self.current_page_id.as_deref()?;
        self.site.as_ref()?.page(id)
    }

    pub fn current_page_id(&self) -> Option<&str> {
        self.current_page_id.as_deref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected_block_id.as_deref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        find_block(&self.blocks, self.selected_block_id.as_deref()?)
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_preview_mode(&self) -> bool {
        self.is_preview_mode
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut Library {
        &mut self.library
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    // ---- Events ----

    pub fn events(&self) -> &[EditorEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    /// Report an error as an event and hand it back
    fn fail<T>(&mut self, error: EditorError) -> Result<T, EditorError> {
        tracing::debug!("Editor error: {}", error);
        self.emit(EditorEvent::Error {
            message: error.to_string(),
        });
        Err(error)
    }

    // ---- Blocks ----

    /// Apply a mutation to the block list as one undo step
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        let next = match mutation.apply(&self.blocks) {
            Ok(next) => next,
            Err(e) => return self.fail(e.into()),
        };

        tracing::debug!("Applied {}", mutation.name());
        let block_id = match &mutation {
            Mutation::InsertBlock { block, .. } => Some(block.id.clone()),
            Mutation::UpdateBlock { block_id, .. }
            | Mutation::RemoveBlock { block_id }
            | Mutation::MoveBlock { block_id, .. } => Some(block_id.clone()),
            Mutation::ReplaceBlocks { .. } => None,
        };

        self.commit(next, block_id);
        Ok(())
    }

    fn commit(&mut self, next: Vec<Block>, block_id: Option<String>) {
        let previous = std::mem::replace(&mut self.blocks, next);
        self.history.push(previous);
        self.after_change(block_id, UpdateSource::User);
    }

    /// Shared tail of every block change: persist, sync the page, notify
    fn after_change(&mut self, block_id: Option<String>, source: UpdateSource) {
        if self.options.autosave {
            self.persistence.save(&self.blocks);
        }

        if let (Some(site), Some(page_id)) = (self.site.as_mut(), self.current_page_id.as_deref()) {
            if let Some(page) = site.page_mut(page_id) {
                page.content = self.blocks.clone();
                page.touch();
            }
        }

        if let Some(selected) = self.selected_block_id.as_deref() {
            if find_block(&self.blocks, selected).is_none() {
                self.selected_block_id = None;
            }
        }

        self.has_unsaved_changes = true;
        self.emit(EditorEvent::BlockUpdate { block_id, source });
    }

    /// Replace the whole block list
    pub fn update_blocks(&mut self, blocks: Vec<Block>) -> Result<(), EditorError> {
        self.apply(Mutation::ReplaceBlocks { blocks })
    }

    pub fn insert_block(&mut self, index: usize, block: Block) -> Result<(), EditorError> {
        self.apply(Mutation::InsertBlock { index, block })
    }

    /// Append a block to the end of the list
    pub fn add_block(&mut self, block: Block) -> Result<(), EditorError> {
        let index = self.blocks.len();
        self.insert_block(index, block)
    }

    /// Create a block of `kind` and insert it where it was dropped.
    /// Returns the new block's id.
    pub fn drop_block(&mut self, kind: BlockKind, position: DropPosition) -> Result<String, EditorError> {
        let block = create_block_for_drop(kind, &mut self.ids);
        let id = block.id.clone();
        self.insert_block(position.insert_index(self.blocks.len()), block)?;
        Ok(id)
    }

    pub fn update_block(&mut self, block_id: &str, patch: BlockPatch) -> Result<(), EditorError> {
        self.apply(Mutation::UpdateBlock {
            block_id: block_id.to_string(),
            patch,
        })
    }

    /// Remove a block and its children. Clears the selection when it pointed
    /// into the removed subtree.
    pub fn remove_block(&mut self, block_id: &str) -> Result<(), EditorError> {
        self.apply(Mutation::RemoveBlock {
            block_id: block_id.to_string(),
        })
    }

    pub fn move_block(&mut self, block_id: &str, to_index: usize) -> Result<(), EditorError> {
        self.apply(Mutation::MoveBlock {
            block_id: block_id.to_string(),
            to_index,
        })
    }

    pub fn select_block(&mut self, block_id: Option<&str>) {
        self.selected_block_id = block_id.map(str::to_string);
    }

    /// Insert a block from the library (appended when `index` is `None`).
    /// Returns the new block's id.
    pub fn insert_template(&mut self, template_id: &str, index: Option<usize>) -> Result<String, EditorError> {
        let block = match self.library.create_block_from_template(template_id, &mut self.ids) {
            Ok(block) => block,
            Err(e) => return self.fail(e.into()),
        };

        let id = block.id.clone();
        let index = index.unwrap_or(self.blocks.len());
        self.insert_block(index, block)?;
        Ok(id)
    }

    /// Insert every block of a combination as one change: one undo step, one
    /// autosave and one event. An unknown combination inserts nothing.
    /// Returns the ids of the top-level blocks.
    pub fn insert_combination(
        &mut self,
        combination_id: &str,
        index: Option<usize>,
    ) -> Result<Vec<String>, EditorError> {
        let blocks = self
            .library
            .create_blocks_from_combination(combination_id, &mut self.ids);
        if blocks.is_empty() {
            return Ok(Vec::new());
        }

        let len = self.blocks.len();
        let start = index.unwrap_or(len);
        if start > len {
            return self.fail(MutationError::IndexOutOfBounds { index: start, len }.into());
        }

        let ids: Vec<String> = blocks.iter().map(|b| b.id.clone()).collect();
        let mut next = self.blocks.clone();
        let tail = next.split_off(start);
        next.extend(blocks);
        next.extend(tail);

        tracing::debug!("Inserted combination {} ({} blocks)", combination_id, ids.len());
        let previous = std::mem::replace(&mut self.blocks, next);
        self.history.push_described(previous, format!("Insert {}", combination_id));
        self.after_change(None, UpdateSource::User);

        Ok(ids)
    }

    /// Reconcile an event raised by a block component
    pub fn dispatch(&mut self, event: BlockEvent) -> Result<(), EditorError> {
        match event {
            BlockEvent::BlockUpdate(block) => {
                if block.kind.is_markup() {
                    self.check_markup(&block.content)?;
                }

                let mut next = self.blocks.clone();
                let Some(slot) = find_block_mut(&mut next, &block.id) else {
                    return self.fail(MutationError::BlockNotFound(block.id).into());
                };
                let id = block.id.clone();
                *slot = block;
                self.commit(next, Some(id));
                Ok(())
            }
            BlockEvent::SettingsUpdate { block_id, patch } => {
                self.update_block(&block_id, BlockPatch::settings(patch))
            }
            BlockEvent::ContentUpdate { block_id, patch } => {
                let is_markup = find_block(&self.blocks, &block_id)
                    .map(|b| b.kind.is_markup())
                    .unwrap_or(false);
                if is_markup {
                    self.check_markup(&patch)?;
                }
                self.update_block(&block_id, BlockPatch::content(patch))
            }
        }
    }

    fn check_markup(&mut self, content: &BlockContent) -> Result<(), EditorError> {
        let Some(html) = content.as_text() else {
            return Ok(());
        };
        let result = validate_markup(html);
        if result.is_valid() {
            Ok(())
        } else {
            self.fail(EditorError::Validation(result))
        }
    }

    // ---- History ----

    /// Step back one change. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.blocks.clone()) else {
            return false;
        };
        self.blocks = previous;
        self.after_change(None, UpdateSource::Undo);
        true
    }

    /// Reapply the last undone change. Returns `false` when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.blocks.clone()) else {
            return false;
        };
        self.blocks = next;
        self.after_change(None, UpdateSource::Redo);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- Pages ----

    fn site_mut(&mut self) -> Result<&mut Site, EditorError> {
        self.site.as_mut().ok_or(EditorError::NoSite)
    }

    /// Switch the page being edited. Its content becomes the block list and
    /// history starts over.
    pub fn set_current_page(&mut self, page_id: Option<&str>) -> Result<(), EditorError> {
        let content = match page_id {
            Some(id) => {
                let Some(site) = self.site.as_ref() else {
                    return self.fail(EditorError::NoSite);
                };
                match site.page(id) {
                    Some(page) => page.content.clone(),
                    None => return self.fail(EditorError::PageNotFound(id.to_string())),
                }
            }
            None => Vec::new(),
        };

        self.current_page_id = page_id.map(str::to_string);
        self.blocks = content;
        self.selected_block_id = None;
        self.history.clear();

        tracing::info!("Editing page {:?}", page_id);
        self.emit(EditorEvent::PageChange {
            page_id: page_id.map(str::to_string),
        });
        Ok(())
    }

    pub fn update_page(&mut self, page_id: &str, patch: PagePatch) -> Result<(), EditorError> {
        let content = patch.content.clone();
        match self.site_mut()?.page_mut(page_id) {
            Some(page) => page.apply_patch(patch),
            None => return self.fail(EditorError::PageNotFound(page_id.to_string())),
        }

        if self.current_page_id.as_deref() == Some(page_id) {
            if let Some(content) = content {
                self.blocks = content;
                self.history.clear();
                self.selected_block_id = None;
            }
        }

        self.has_unsaved_changes = true;
        self.emit(EditorEvent::PageChange {
            page_id: Some(page_id.to_string()),
        });
        Ok(())
    }

    /// Absolute URL of a page in the current site
    pub fn page_url(&self, page_id: &str) -> Result<String, EditorError> {
        let site = self.site.as_ref().ok_or(EditorError::NoSite)?;
        let page = site
            .page(page_id)
            .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))?;
        Ok(generate_page_url(page, &site.pages)?)
    }

    pub fn breadcrumbs(&self, page_id: &str) -> Result<Vec<Breadcrumb>, EditorError> {
        let site = self.site.as_ref().ok_or(EditorError::NoSite)?;
        let page = site
            .page(page_id)
            .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))?;
        Ok(generate_breadcrumbs(page, &site.pages)?)
    }

    /// URL segments in use by every page except `page_id`
    fn taken_segments(&self, page_id: &str) -> Vec<String> {
        self.site
            .iter()
            .flat_map(|site| site.pages.iter())
            .filter(|page| page.id != page_id)
            .map(|page| page.segment().to_string())
            .collect()
    }

    fn page_from_settings(&mut self, settings: &PageSettings) -> Page {
        let id = if settings.id.is_empty() {
            self.ids.new_id_with_prefix("page")
        } else {
            settings.id.clone()
        };

        let slug = match create_slug(&settings.url_prefix) {
            slug if !slug.is_empty() => slug,
            _ => create_slug(&settings.title),
        };

        let mut page = Page::new(id, settings.title.clone(), slug);
        page.apply_settings(settings);
        page
    }

    /// Add a page built from the settings form. An empty id is generated.
    /// Returns the page id.
    pub fn create_page(&mut self, settings: PageSettings) -> Result<String, EditorError> {
        if self.site.is_none() {
            return self.fail(EditorError::NoSite);
        }

        let taken = self.taken_segments(&settings.id);
        let taken: Vec<&str> = taken.iter().map(String::as_str).collect();
        let mut errors = validate_page_settings(&settings, &taken).errors;
        let id_taken = self
            .site
            .as_ref()
            .is_some_and(|site| !settings.id.is_empty() && site.page(&settings.id).is_some());
        if id_taken {
            errors.push(ValidationError::new("id", PAGE_ID_IN_USE));
        }
        if !errors.is_empty() {
            return self.fail(EditorError::Validation(ValidationResult::from_errors(errors)));
        }

        let page = self.page_from_settings(&settings);
        let id = page.id.clone();
        tracing::info!("Created page {} ({})", id, page.slug);
        self.site_mut()?.pages.push(page);
        self.has_unsaved_changes = true;
        Ok(id)
    }

    /// Replace the page list from the page-settings panel.
    ///
    /// Pages named in `settings` keep their content and slug; new ids become
    /// new pages; pages missing from `settings` are dropped. If the current
    /// page is dropped the editor is cleared.
    pub fn apply_page_settings(&mut self, settings: Vec<PageSettings>) -> Result<(), EditorError> {
        if self.site.is_none() {
            return self.fail(EditorError::NoSite);
        }

        let mut errors: Vec<ValidationError> = Vec::new();
        let mut seen_ids = HashSet::new();
        for (index, entry) in settings.iter().enumerate() {
            if !entry.id.is_empty() && !seen_ids.insert(entry.id.as_str()) {
                errors.push(ValidationError::new("id", PAGE_ID_IN_USE));
            }

            let others: Vec<&str> = settings
                .iter()
                .enumerate()
                .filter(|(i, other)| *i != index && !other.url_prefix.is_empty())
                .map(|(_, other)| other.url_prefix.as_str())
                .collect();
            errors.extend(validate_page_settings(entry, &others).errors);
        }
        if !errors.is_empty() {
            return self.fail(EditorError::Validation(ValidationResult::from_errors(errors)));
        }

        let mut pages = Vec::with_capacity(settings.len());
        for entry in &settings {
            let existing = self.site.as_ref().and_then(|site| site.page(&entry.id)).cloned();
            let page = match existing {
                Some(mut page) => {
                    page.apply_settings(entry);
                    page
                }
                None => self.page_from_settings(entry),
            };
            pages.push(page);
        }

        tracing::info!("Applied settings for {} pages", pages.len());
        self.site_mut()?.pages = pages;
        self.has_unsaved_changes = true;
        self.drop_current_page_if_missing();
        Ok(())
    }

    /// Delete a page. Deleting the current page clears the editor.
    pub fn delete_page(&mut self, page_id: &str) -> Result<(), EditorError> {
        if self.site_mut()?.remove_page(page_id).is_none() {
            return self.fail(EditorError::PageNotFound(page_id.to_string()));
        }

        tracing::info!("Deleted page {}", page_id);
        self.has_unsaved_changes = true;
        self.drop_current_page_if_missing();
        Ok(())
    }

    fn drop_current_page_if_missing(&mut self) {
        let Some(current) = self.current_page_id.as_deref() else {
            return;
        };
        let exists = self
            .site
            .as_ref()
            .map(|site| site.page(current).is_some())
            .unwrap_or(false);

        if !exists {
            self.current_page_id = None;
            self.blocks.clear();
            self.selected_block_id = None;
            self.history.clear();
            self.emit(EditorEvent::PageChange { page_id: None });
        }
    }

    // ---- Site ----

    pub fn set_site(&mut self, site: Option<Site>) {
        self.site = site;
        self.drop_current_page_if_missing();
    }

    /// Patch site fields. When `pages` is replaced and the current page is
    /// still there, its new content becomes the block list and history starts
    /// over.
    pub fn update_site(&mut self, patch: SitePatch) -> Result<(), EditorError> {
        let theme = patch.theme.clone();
        let pages_replaced = patch.pages.is_some();
        self.site_mut()?.apply_patch(patch);

        self.has_unsaved_changes = true;
        if let Some(theme) = theme {
            self.emit(EditorEvent::ThemeChange { theme: Box::new(theme) });
        }
        self.drop_current_page_if_missing();

        if pages_replaced {
            if let Some(content) = self.current_page().map(|page| page.content.clone()) {
                self.blocks = content;
                self.history.clear();
                self.selected_block_id = None;
            }
        }
        Ok(())
    }

    /// Replace the site's theme wholesale
    pub fn update_theme(&mut self, theme: Theme) -> Result<(), EditorError> {
        self.site_mut()?.theme = theme.clone();
        self.has_unsaved_changes = true;
        self.emit(EditorEvent::ThemeChange { theme: Box::new(theme) });
        Ok(())
    }

    // ---- UI flags & persistence ----

    pub fn set_dragging(&mut self, is_dragging: bool) {
        self.is_dragging = is_dragging;
    }

    /// Flip preview mode, returning the new value
    pub fn toggle_preview_mode(&mut self) -> bool {
        self.is_preview_mode = !self.is_preview_mode;
        self.is_preview_mode
    }

    pub fn mark_saved(&mut self) {
        self.has_unsaved_changes = false;
        self.last_saved = Some(Utc::now());
    }

    /// Write the block list now, regardless of autosave
    pub fn save(&mut self) -> SaveOutcome {
        let outcome = self.persistence.save(&self.blocks);
        if outcome.is_saved() {
            self.mark_saved();
        }
        outcome
    }

    /// Write the block list now and report any storage failure
    pub fn try_save(&mut self) -> Result<(), EditorError> {
        self.persistence.try_save(&self.blocks)?;
        self.mark_saved();
        Ok(())
    }

    /// Load persisted blocks into the editor, e.g. at startup. Does not touch
    /// history. Returns the number of top-level blocks restored.
    pub fn restore(&mut self) -> usize {
        let blocks = self.persistence.load();
        if blocks.is_empty() {
            return 0;
        }

        let count = blocks.len();
        tracing::debug!("Restored {} blocks", count);
        self.blocks = blocks;
        if let (Some(site), Some(page_id)) = (self.site.as_mut(), self.current_page_id.as_deref()) {
            if let Some(page) = site.page_mut(page_id) {
                page.content = self.blocks.clone();
            }
        }
        count
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> EditSession {
        let mut site = Site::new("site-1", "My Site");
        site.pages.push(Page::new("home", "Home", "home"));
        site.pages.push(Page::new("about", "About", "about"));

        let mut session = EditSession::default()
            .with_site(site)
            .with_id_generator(IdGenerator::from_seed("t"));
        session.set_current_page(Some("home")).unwrap();
        session.drain_events();
        session
    }

    fn text(id: &str) -> Block {
        Block::new(id, BlockKind::Text).with_text(id)
    }

    fn ids(session: &EditSession) -> Vec<&str> {
        session.blocks().iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_add_block_runs_full_pipeline() {
        let mut session = session();
        session.add_block(text("a")).unwrap();

        assert_eq!(ids(&session), vec!["a"]);
        assert!(session.can_undo());
        assert!(session.has_unsaved_changes());
        assert_eq!(session.current_page().unwrap().content, session.blocks());
        assert_eq!(session.persistence().load(), session.blocks());
        assert_eq!(
            session.events(),
            &[EditorEvent::BlockUpdate {
                block_id: Some("a".into()),
                source: UpdateSource::User
            }]
        );
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut session = session();
        session.add_block(text("a")).unwrap();
        session.add_block(text("b")).unwrap();

        assert!(session.undo());
        assert_eq!(ids(&session), vec!["a"]);
        assert_eq!(session.current_page().unwrap().content.len(), 1);

        assert!(session.undo());
        assert!(session.blocks().is_empty());
        assert!(!session.undo());

        assert!(session.redo());
        assert!(session.redo());
        assert_eq!(ids(&session), vec!["a", "b"]);
        assert!(!session.redo());

        let sources: Vec<UpdateSource> = session
            .events()
            .iter()
            .filter_map(|e| match e {
                EditorEvent::BlockUpdate { source, .. } => Some(*source),
                _ => None,
            })
            .collect();
        assert_eq!(
            sources,
            vec![
                UpdateSource::User,
                UpdateSource::User,
                UpdateSource::Undo,
                UpdateSource::Undo,
                UpdateSource::Redo,
                UpdateSource::Redo
            ]
        );
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut session = session();
        session.add_block(text("a")).unwrap();
        session.add_block(text("b")).unwrap();
        session.select_block(Some("a"));

        session.remove_block("b").unwrap();
        assert_eq!(session.selected_block_id(), Some("a"));

        session.remove_block("a").unwrap();
        assert_eq!(session.selected_block_id(), None);
    }

    #[test]
    fn test_missing_block_is_an_error_and_an_event() {
        let mut session = session();
        let result = session.remove_block("nope");

        assert!(matches!(
            result,
            Err(EditorError::Mutation(MutationError::BlockNotFound(_)))
        ));
        assert!(!session.can_undo());
        assert!(matches!(session.events(), [EditorEvent::Error { .. }]));
    }

    #[test]
    fn test_drop_block() {
        let mut session = session();
        session.add_block(text("a")).unwrap();

        let id = session.drop_block(BlockKind::Image, DropPosition::Start).unwrap();
        assert_eq!(id, "block-t-1");
        assert_eq!(ids(&session), vec!["block-t-1", "a"]);

        session.drop_block(BlockKind::Columns, DropPosition::End).unwrap();
        let last = session.blocks().last().unwrap();
        assert_eq!(last.kind, BlockKind::Columns);
        assert_eq!(last.children(), Some(&[][..]));
    }

    #[test]
    fn test_combination_is_one_undo_step() {
        let mut session = session();
        session.add_block(text("a")).unwrap();

        let inserted = session.insert_combination("hero-section", Some(0)).unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(session.blocks().len(), 2);
        assert_eq!(session.history().undo_description(), Some("Insert hero-section"));

        session.undo();
        assert_eq!(ids(&session), vec!["a"]);

        assert!(session.insert_combination("missing", None).unwrap().is_empty());
        assert_eq!(ids(&session), vec!["a"]);
    }

    #[test]
    fn test_combination_saves_and_notifies_once() {
        let mut session = session();
        let inserted = session.insert_combination("feature-grid", None).unwrap();
        assert_eq!(inserted.len(), 1);

        assert_eq!(
            session.drain_events(),
            vec![EditorEvent::BlockUpdate {
                block_id: None,
                source: UpdateSource::User
            }]
        );
        assert_eq!(session.history().undo_levels(), 1);
        assert_eq!(session.persistence().load(), session.blocks());

        let result = session.insert_combination("hero-section", Some(5));
        assert!(matches!(
            result,
            Err(EditorError::Mutation(MutationError::IndexOutOfBounds { index: 5, len: 1 }))
        ));
        assert_eq!(session.blocks().len(), 1);
    }

    #[test]
    fn test_insert_unknown_template_fails() {
        let mut session = session();
        assert!(matches!(
            session.insert_template("missing", None),
            Err(EditorError::Template(_))
        ));
        assert!(session.blocks().is_empty());
    }

    #[test]
    fn test_dispatch_settings_and_content() {
        let mut session = session();
        session.add_block(text("a")).unwrap();

        let mut patch = BlockSettings::new();
        patch.insert("alignment", "center");
        session
            .dispatch(BlockEvent::SettingsUpdate {
                block_id: "a".into(),
                patch,
            })
            .unwrap();
        session
            .dispatch(BlockEvent::ContentUpdate {
                block_id: "a".into(),
                patch: BlockContent::Text("Hello".into()),
            })
            .unwrap();

        let block = &session.blocks()[0];
        assert_eq!(block.settings.get_str("alignment"), Some("center"));
        assert_eq!(block.settings.get_str("width"), Some("normal"));
        assert_eq!(block.content.as_text(), Some("Hello"));
    }

    #[test]
    fn test_dispatch_full_block_replaces() {
        let mut session = session();
        session
            .add_block(Block::new("img", BlockKind::Image).with_class_name("old"))
            .unwrap();

        let replacement = Block::new("img", BlockKind::Image)
            .with_content(BlockContent::Fields(
                json!({ "url": "a.png" }).as_object().cloned().unwrap(),
            ))
            .with_settings(BlockSettings::new());
        session.dispatch(BlockEvent::BlockUpdate(replacement.clone())).unwrap();

        assert_eq!(session.blocks()[0], replacement);
    }

    #[test]
    fn test_invalid_embed_markup_is_rejected() {
        let mut session = session();
        session
            .add_block(Block::new("e", BlockKind::Embed).with_text("<div></div>"))
            .unwrap();

        let result = session.dispatch(BlockEvent::ContentUpdate {
            block_id: "e".into(),
            patch: BlockContent::Text("<div>".into()),
        });

        match result {
            Err(EditorError::Validation(result)) => {
                assert_eq!(result.message(), Some("Invalid HTML. Please check your code."));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(session.blocks()[0].content.as_text(), Some("<div></div>"));
    }

    #[test]
    fn test_set_current_page_resets_history() {
        let mut session = session();
        session.add_block(text("a")).unwrap();

        session.set_current_page(Some("about")).unwrap();
        assert!(session.blocks().is_empty());
        assert!(!session.can_undo());

        session.set_current_page(Some("home")).unwrap();
        assert_eq!(ids(&session), vec!["a"]);

        assert!(matches!(
            session.set_current_page(Some("gone")),
            Err(EditorError::PageNotFound(_))
        ));
        assert_eq!(session.current_page_id(), Some("home"));
    }

    #[test]
    fn test_delete_current_page_clears_editor() {
        let mut session = session();
        session.add_block(text("a")).unwrap();
        session.select_block(Some("a"));

        session.delete_page("home").unwrap();
        assert_eq!(session.current_page_id(), None);
        assert!(session.blocks().is_empty());
        assert_eq!(session.selected_block_id(), None);
        assert_eq!(session.site().unwrap().pages.len(), 1);
        assert!(session
            .events()
            .contains(&EditorEvent::PageChange { page_id: None }));

        assert!(matches!(
            session.delete_page("home"),
            Err(EditorError::PageNotFound(_))
        ));
    }

    #[test]
    fn test_create_page() {
        let mut session = session();
        let id = session
            .create_page(PageSettings {
                id: String::new(),
                title: "Contact Us".into(),
                url_prefix: String::new(),
                parent_id: Some("about".into()),
                order: 2,
                show_in_nav: true,
                is_dummy: false,
            })
            .unwrap();

        let page = session.site().unwrap().page(&id).unwrap();
        assert!(id.starts_with("page-t-"));
        assert_eq!(page.slug, "contact-us");
        assert_eq!(page.parent_id.as_deref(), Some("about"));
        assert!(page.content.is_empty());

        let settings = PageSettings {
            url_prefix: "about".into(),
            ..page.to_settings()
        };
        let taken = session.create_page(settings);
        assert!(matches!(taken, Err(EditorError::Validation(_))));
    }

    #[test]
    fn test_create_page_rejects_existing_id() {
        let mut session = session();
        let settings = PageSettings {
            id: "home".into(),
            title: "Another Home".into(),
            url_prefix: "another-home".into(),
            parent_id: None,
            order: 3,
            show_in_nav: true,
            is_dummy: false,
        };

        match session.create_page(settings) {
            Err(EditorError::Validation(result)) => {
                assert_eq!(result.errors.len(), 1);
                assert_eq!(result.errors[0].field, "id");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        let homes = session.site().unwrap().pages.iter().filter(|p| p.id == "home").count();
        assert_eq!(homes, 1);
    }

    #[test]
    fn test_apply_page_settings_rejects_repeated_ids() {
        let mut session = session();
        let home = session.site().unwrap().page("home").unwrap().to_settings();
        let copy = PageSettings {
            title: "Copy".into(),
            ..home.clone()
        };

        match session.apply_page_settings(vec![home, copy]) {
            Err(EditorError::Validation(result)) => {
                assert!(result.errors.iter().any(|e| e.field == "id"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(session.site().unwrap().pages.len(), 2);
    }

    #[test]
    fn test_apply_page_settings_replaces_list() {
        let mut session = session();
        session.add_block(text("a")).unwrap();

        let mut home = session.site().unwrap().page("home").unwrap().to_settings();
        home.title = "Start".into();
        let new_page = PageSettings {
            id: "blog".into(),
            title: "Blog".into(),
            url_prefix: "News".into(),
            parent_id: None,
            order: 1,
            show_in_nav: true,
            is_dummy: false,
        };

        // "News" is not a valid slug
        assert!(session
            .apply_page_settings(vec![home.clone(), new_page.clone()])
            .is_err());

        let new_page = PageSettings {
            url_prefix: "news".into(),
            ..new_page
        };
        session.apply_page_settings(vec![home, new_page]).unwrap();

        let site = session.site().unwrap();
        let titles: Vec<&str> = site.pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Start", "Blog"]);
        assert_eq!(site.page("home").unwrap().content.len(), 1);
        assert_eq!(site.page("blog").unwrap().slug, "news");
        assert!(site.page("about").is_none());
        assert_eq!(session.current_page_id(), Some("home"));
    }

    #[test]
    fn test_update_theme_and_site() {
        let mut session = session();
        let theme = Theme::default().renamed("Dark");

        session.update_theme(theme.clone()).unwrap();
        assert_eq!(session.site().unwrap().theme.name, "Dark");
        assert_eq!(
            session.events().last(),
            Some(&EditorEvent::ThemeChange { theme: Box::new(theme) })
        );

        session
            .update_site(SitePatch {
                name: Some("Renamed".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(session.site().unwrap().name, "Renamed");

        let mut empty = EditSession::default();
        assert!(matches!(
            empty.update_theme(Theme::default()),
            Err(EditorError::NoSite)
        ));
    }

    #[test]
    fn test_update_site_pages_reloads_current_blocks() {
        let mut session = session();
        session.add_block(text("a")).unwrap();
        session.select_block(Some("a"));

        let mut pages = session.site().unwrap().pages.clone();
        pages[0].content = vec![text("x"), text("y")];
        session
            .update_site(SitePatch {
                pages: Some(pages),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(ids(&session), vec!["x", "y"]);
        assert!(!session.can_undo());
        assert_eq!(session.selected_block_id(), None);

        session.add_block(text("z")).unwrap();
        assert_eq!(session.current_page().unwrap().content.len(), 3);
    }

    #[test]
    fn test_page_url_and_breadcrumbs() {
        let mut session = session();
        session
            .update_page(
                "about",
                PagePatch {
                    parent_id: Some(Some("home".into())),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(session.page_url("about").unwrap(), "/home/about");
        let crumbs = session.breadcrumbs("about").unwrap();
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[0].url, "/home");

        assert!(matches!(session.page_url("gone"), Err(EditorError::PageNotFound(_))));

        session
            .update_page(
                "home",
                PagePatch {
                    parent_id: Some(Some("about".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(matches!(session.page_url("about"), Err(EditorError::Url(_))));
    }

    #[test]
    fn test_ui_flags() {
        let mut session = session();
        session.set_dragging(true);
        assert!(session.is_dragging());
        assert!(session.toggle_preview_mode());
        assert!(!session.toggle_preview_mode());

        session.add_block(text("a")).unwrap();
        assert!(session.has_unsaved_changes());
        session.mark_saved();
        assert!(!session.has_unsaved_changes());
        assert!(session.last_saved().is_some());
    }

    #[test]
    fn test_autosave_off_and_restore() {
        let options = EditorOptions::default().with_autosave(false);
        let mut session = EditSession::new(options);
        session.add_block(text("a")).unwrap();
        assert!(session.persistence().load().is_empty());

        assert!(session.save().is_saved());
        assert!(!session.has_unsaved_changes());

        session.update_blocks(Vec::new()).unwrap();
        assert_eq!(session.restore(), 1);
        assert_eq!(ids(&session), vec!["a"]);
    }
}
