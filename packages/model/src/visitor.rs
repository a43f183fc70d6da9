use crate::block::{Block, BlockContent};
use crate::id_generator::IdGenerator;
use std::collections::HashSet;

/// Visitor pattern for traversing block trees immutably
///
/// Default implementations walk the entire tree, parents before children.
/// Override `visit_block` to act on each node, calling `walk_block` to
/// continue into its children.
pub trait BlockVisitor: Sized {
    fn visit_blocks(&mut self, blocks: &[Block]) {
        walk_blocks(self, blocks);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }
}

/// Mutable visitor pattern for transforming block trees
pub trait BlockVisitorMut: Sized {
    fn visit_blocks_mut(&mut self, blocks: &mut [Block]) {
        walk_blocks_mut(self, blocks);
    }

    fn visit_block_mut(&mut self, block: &mut Block) {
        walk_block_mut(self, block);
    }
}

pub fn walk_blocks<V: BlockVisitor>(visitor: &mut V, blocks: &[Block]) {
    for block in blocks {
        visitor.visit_block(block);
    }
}

pub fn walk_block<V: BlockVisitor>(visitor: &mut V, block: &Block) {
    if let BlockContent::Children(children) = &block.content {
        visitor.visit_blocks(children);
    }
}

pub fn walk_blocks_mut<V: BlockVisitorMut>(visitor: &mut V, blocks: &mut [Block]) {
    for block in blocks {
        visitor.visit_block_mut(block);
    }
}

pub fn walk_block_mut<V: BlockVisitorMut>(visitor: &mut V, block: &mut Block) {
    if let BlockContent::Children(children) = &mut block.content {
        visitor.visit_blocks_mut(children);
    }
}

struct IdCollector {
    ids: Vec<String>,
}

impl BlockVisitor for IdCollector {
    fn visit_block(&mut self, block: &Block) {
        self.ids.push(block.id.clone());
        walk_block(self, block);
    }
}

/// All block ids in depth-first order
pub fn collect_ids(blocks: &[Block]) -> Vec<String> {
    let mut collector = IdCollector { ids: Vec::new() };
    collector.visit_blocks(blocks);
    collector.ids
}

/// Total number of blocks, nested ones included
pub fn count_blocks(blocks: &[Block]) -> usize {
    collect_ids(blocks).len()
}

/// Ids that occur more than once in the tree (each reported once)
pub fn duplicate_ids(blocks: &[Block]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for id in collect_ids(blocks) {
        if !seen.insert(id.clone()) && reported.insert(id.clone()) {
            duplicates.push(id);
        }
    }

    duplicates
}

struct IdReassigner<'a> {
    ids: &'a mut IdGenerator,
}

impl BlockVisitorMut for IdReassigner<'_> {
    fn visit_block_mut(&mut self, block: &mut Block) {
        block.id = self.ids.new_id();
        walk_block_mut(self, block);
    }
}

/// Give every block in the tree a fresh id
pub fn reassign_ids(block: &mut Block, ids: &mut IdGenerator) {
    IdReassigner { ids }.visit_block_mut(block);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    fn tree() -> Vec<Block> {
        vec![
            Block::new("a", BlockKind::Text),
            Block::new("b", BlockKind::Columns).with_children(vec![
                Block::new("c", BlockKind::Text),
                Block::new("d", BlockKind::Div).with_children(vec![Block::new("e", BlockKind::P)]),
            ]),
        ]
    }

    #[test]
    fn test_collect_ids_depth_first() {
        assert_eq!(collect_ids(&tree()), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(count_blocks(&tree()), 5);
    }

    #[test]
    fn test_duplicate_ids() {
        let mut blocks = tree();
        assert!(duplicate_ids(&blocks).is_empty());

        blocks.push(Block::new("c", BlockKind::Image));
        blocks.push(Block::new("c", BlockKind::Image));
        assert_eq!(duplicate_ids(&blocks), vec!["c"]);
    }

    #[test]
    fn test_reassign_ids_reaches_nested_blocks() {
        let mut ids = IdGenerator::from_seed("s");
        let mut block = tree().remove(1);
        reassign_ids(&mut block, &mut ids);

        assert_eq!(
            collect_ids(std::slice::from_ref(&block)),
            vec!["block-s-1", "block-s-2", "block-s-3", "block-s-4"]
        );
    }
}
