//! # Block Mutations
//!
//! Operations on a page's block list.
//!
//! ## Design Principles
//!
//! 1. **Pure**: `apply` takes the current list and returns a new one; the
//!    input is never modified
//! 2. **Shallow**: updates replace fields one level deep; settings and
//!    structured content are merged key by key, never deep-merged
//! 3. **Permissive**: no structural validation; any kind may hold any
//!    content
//!
//! ## Mutation Semantics
//!
//! ### InsertBlock
//! - Inserts into the top-level list at `index` (`0..=len`)
//!
//! ### UpdateBlock / RemoveBlock
//! - Target a block anywhere in the tree by id
//! - Removing a container removes its descendants
//!
//! ### MoveBlock
//! - Moves a block within its own sibling sequence; `to_index` is clamped

use serde::{Deserialize, Serialize};
use sitecraft_model::{find_block_mut, Block, BlockContent, BlockKind, BlockSettings, IdGenerator};
use thiserror::Error;

/// Block list operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a block into the top-level list
    InsertBlock { index: usize, block: Block },

    /// Shallow update of a block's fields
    UpdateBlock { block_id: String, patch: BlockPatch },

    /// Remove a block (and its children) from the tree
    RemoveBlock { block_id: String },

    /// Reorder a block within its sibling sequence
    MoveBlock { block_id: String, to_index: usize },

    /// Replace the entire list
    ReplaceBlocks { blocks: Vec<Block> },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Insert index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Partial block update.
///
/// `settings` is merged into the block's settings one level deep. `content`
/// replaces the block's content, except that structured (`Fields`) content
/// is merged key by key into existing structured content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BlockSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl BlockPatch {
    pub fn settings(settings: BlockSettings) -> Self {
        Self {
            settings: Some(settings),
            ..Default::default()
        }
    }

    pub fn content(content: BlockContent) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    /// Patch that turns `block` into the given full block (id excluded)
    pub fn replace_with(block: &Block) -> Self {
        Self {
            kind: Some(block.kind.clone()),
            content: Some(block.content.clone()),
            settings: Some(block.settings.clone()),
            class_name: block.class_name.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.content.is_none()
            && self.settings.is_none()
            && self.class_name.is_none()
    }

    pub fn apply_to(&self, block: &mut Block) {
        if let Some(kind) = &self.kind {
            block.kind = kind.clone();
        }

        if let Some(content) = &self.content {
            match (&mut block.content, content) {
                (BlockContent::Fields(existing), BlockContent::Fields(updates)) => {
                    for (key, value) in updates {
                        existing.insert(key.clone(), value.clone());
                    }
                }
                (slot, replacement) => *slot = replacement.clone().normalized(),
            }
        }

        if let Some(settings) = &self.settings {
            block.settings.merge(settings);
        }

        if let Some(class_name) = &self.class_name {
            block.class_name = Some(class_name.clone());
        }
    }
}

impl Mutation {
    /// Apply the mutation, producing a new block list
    pub fn apply(&self, blocks: &[Block]) -> Result<Vec<Block>, MutationError> {
        self.validate(blocks)?;

        match self {
            Mutation::InsertBlock { index, block } => {
                let mut next = blocks.to_vec();
                next.insert(*index, block.clone());
                Ok(next)
            }

            Mutation::UpdateBlock { block_id, patch } => {
                let mut next = blocks.to_vec();
                let target = find_block_mut(&mut next, block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                patch.apply_to(target);
                Ok(next)
            }

            Mutation::RemoveBlock { block_id } => {
                let mut next = blocks.to_vec();
                let siblings = sequence_containing(&mut next, block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                siblings.retain(|block| &block.id != block_id);
                Ok(next)
            }

            Mutation::MoveBlock { block_id, to_index } => {
                let mut next = blocks.to_vec();
                let siblings = sequence_containing(&mut next, block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                let from = siblings
                    .iter()
                    .position(|block| &block.id == block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                let block = siblings.remove(from);
                let to = (*to_index).min(siblings.len());
                siblings.insert(to, block);
                Ok(next)
            }

            Mutation::ReplaceBlocks { blocks } => Ok(blocks.clone()),
        }
    }

    /// Check that the mutation can be applied to `blocks`
    pub fn validate(&self, blocks: &[Block]) -> Result<(), MutationError> {
        match self {
            Mutation::InsertBlock { index, .. } => {
                if *index > blocks.len() {
                    return Err(MutationError::IndexOutOfBounds {
                        index: *index,
                        len: blocks.len(),
                    });
                }
                Ok(())
            }
            Mutation::UpdateBlock { block_id, .. }
            | Mutation::RemoveBlock { block_id }
            | Mutation::MoveBlock { block_id, .. } => {
                if sitecraft_model::find_block(blocks, block_id).is_none() {
                    return Err(MutationError::BlockNotFound(block_id.clone()));
                }
                Ok(())
            }
            Mutation::ReplaceBlocks { .. } => Ok(()),
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertBlock { .. } => "InsertBlock",
            Mutation::UpdateBlock { .. } => "UpdateBlock",
            Mutation::RemoveBlock { .. } => "RemoveBlock",
            Mutation::MoveBlock { .. } => "MoveBlock",
            Mutation::ReplaceBlocks { .. } => "ReplaceBlocks",
        }
    }
}

/// The sibling sequence (top-level list or a container's children) that
/// directly holds the block with `id`
fn sequence_containing<'a>(blocks: &'a mut Vec<Block>, id: &str) -> Option<&'a mut Vec<Block>> {
    if blocks.iter().any(|block| block.id == id) {
        return Some(blocks);
    }

    for block in blocks.iter_mut() {
        if let Some(children) = block.children_mut() {
            if let Some(found) = sequence_containing(children, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Where a dragged block lands in the editor plate.
///
/// Only the start and the end of the list are distinguished: a drop in the
/// top half of the drop target inserts first, anywhere below inserts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropPosition {
    Start,
    End,
}

impl DropPosition {
    /// Resolve from the pointer's Y coordinate and the drop target's
    /// vertical bounds
    pub fn from_pointer(pointer_y: f64, target_top: f64, target_bottom: f64) -> Self {
        let middle = (target_bottom - target_top) / 2.0;
        let offset = pointer_y - target_top;

        if offset > middle {
            DropPosition::End
        } else {
            DropPosition::Start
        }
    }

    pub fn insert_index(self, len: usize) -> usize {
        match self {
            DropPosition::Start => 0,
            DropPosition::End => len,
        }
    }
}

/// Block synthesized from a drag-and-drop payload (the kind tag)
pub fn create_block_for_drop(kind: BlockKind, ids: &mut IdGenerator) -> Block {
    Block::new(ids.new_id(), kind)
}
