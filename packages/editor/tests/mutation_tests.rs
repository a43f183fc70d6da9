//! Comprehensive mutation tests

use serde_json::json;
use sitecraft_editor::{create_block_for_drop, BlockPatch, DropPosition, Mutation, MutationError};
use sitecraft_model::{Block, BlockContent, BlockKind, BlockSettings, IdGenerator};

fn page() -> Vec<Block> {
    vec![
        Block::new("intro", BlockKind::Heading).with_text("Intro"),
        Block::new("cols", BlockKind::Columns).with_children(vec![
            Block::new("left", BlockKind::Text).with_text("Left"),
            Block::new("right", BlockKind::Image),
        ]),
        Block::new("outro", BlockKind::Text).with_text("Bye"),
    ]
}

fn top_ids(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|b| b.id.as_str()).collect()
}

fn fields(value: serde_json::Value) -> BlockContent {
    BlockContent::Fields(value.as_object().cloned().unwrap())
}

#[test]
fn test_insert_at_bounds() {
    let blocks = page();
    let block = Block::new("new", BlockKind::Spacer);

    let front = Mutation::InsertBlock { index: 0, block: block.clone() }
        .apply(&blocks)
        .unwrap();
    assert_eq!(top_ids(&front), vec!["new", "intro", "cols", "outro"]);

    let back = Mutation::InsertBlock { index: 3, block: block.clone() }
        .apply(&blocks)
        .unwrap();
    assert_eq!(top_ids(&back), vec!["intro", "cols", "outro", "new"]);

    let err = Mutation::InsertBlock { index: 4, block }.apply(&blocks).unwrap_err();
    assert_eq!(err, MutationError::IndexOutOfBounds { index: 4, len: 3 });
}

#[test]
fn test_apply_leaves_input_untouched() {
    let blocks = page();
    let next = Mutation::RemoveBlock {
        block_id: "intro".into(),
    }
    .apply(&blocks)
    .unwrap();

    assert_eq!(blocks, page());
    assert_eq!(next.len(), 2);
}

#[test]
fn test_update_nested_block() {
    let blocks = page();
    let mut settings = BlockSettings::new();
    settings.insert("alignment", "right");

    let next = Mutation::UpdateBlock {
        block_id: "left".into(),
        patch: BlockPatch::settings(settings),
    }
    .apply(&blocks)
    .unwrap();

    let left = &next[1].children().unwrap()[0];
    assert_eq!(left.settings.get_str("alignment"), Some("right"));
    assert_eq!(left.settings.get_str("padding"), Some("normal"));
    assert_eq!(left.content.as_text(), Some("Left"));
}

#[test]
fn test_structured_content_merges_one_level() {
    let blocks = vec![Block::new("img", BlockKind::Image)
        .with_content(fields(json!({ "url": "a.png", "alt": "A", "meta": { "w": 1 } })))];

    let next = Mutation::UpdateBlock {
        block_id: "img".into(),
        patch: BlockPatch::content(fields(json!({ "alt": "B", "meta": { "h": 2 } }))),
    }
    .apply(&blocks)
    .unwrap();

    let content = next[0].content.as_fields().unwrap();
    assert_eq!(content["url"], "a.png");
    assert_eq!(content["alt"], "B");
    assert_eq!(content["meta"], json!({ "h": 2 }));
}

#[test]
fn test_text_content_replaces() {
    let next = Mutation::UpdateBlock {
        block_id: "intro".into(),
        patch: BlockPatch::content(BlockContent::Text("Hello".into())),
    }
    .apply(&page())
    .unwrap();

    assert_eq!(next[0].content.as_text(), Some("Hello"));
}

#[test]
fn test_kind_change_keeps_id() {
    let patch = BlockPatch {
        kind: Some(BlockKind::Text),
        class_name: Some("lead".into()),
        ..Default::default()
    };
    let next = Mutation::UpdateBlock {
        block_id: "intro".into(),
        patch,
    }
    .apply(&page())
    .unwrap();

    assert_eq!(next[0].id, "intro");
    assert_eq!(next[0].kind, BlockKind::Text);
    assert_eq!(next[0].class_name.as_deref(), Some("lead"));
}

#[test]
fn test_remove_container_removes_children() {
    let next = Mutation::RemoveBlock {
        block_id: "cols".into(),
    }
    .apply(&page())
    .unwrap();

    assert_eq!(top_ids(&next), vec!["intro", "outro"]);
    assert!(sitecraft_model::find_block(&next, "left").is_none());
}

#[test]
fn test_remove_nested_block() {
    let next = Mutation::RemoveBlock {
        block_id: "right".into(),
    }
    .apply(&page())
    .unwrap();

    assert_eq!(next[1].children().unwrap().len(), 1);
}

#[test]
fn test_move_clamps_and_stays_among_siblings() {
    let blocks = page();

    let next = Mutation::MoveBlock {
        block_id: "intro".into(),
        to_index: 99,
    }
    .apply(&blocks)
    .unwrap();
    assert_eq!(top_ids(&next), vec!["cols", "outro", "intro"]);

    let next = Mutation::MoveBlock {
        block_id: "right".into(),
        to_index: 0,
    }
    .apply(&blocks)
    .unwrap();
    let children: Vec<&str> = next[1].children().unwrap().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(children, vec!["right", "left"]);
    assert_eq!(top_ids(&next), top_ids(&blocks));
}

#[test]
fn test_missing_block_errors() {
    let blocks = page();
    for mutation in [
        Mutation::RemoveBlock { block_id: "x".into() },
        Mutation::MoveBlock { block_id: "x".into(), to_index: 0 },
        Mutation::UpdateBlock { block_id: "x".into(), patch: BlockPatch::default() },
    ] {
        assert_eq!(mutation.apply(&blocks), Err(MutationError::BlockNotFound("x".into())));
    }
}

#[test]
fn test_drop_position_from_pointer() {
    assert_eq!(DropPosition::from_pointer(110.0, 100.0, 300.0), DropPosition::Start);
    assert_eq!(DropPosition::from_pointer(200.0, 100.0, 300.0), DropPosition::Start);
    assert_eq!(DropPosition::from_pointer(250.0, 100.0, 300.0), DropPosition::End);
    assert_eq!(DropPosition::End.insert_index(4), 4);
    assert_eq!(DropPosition::Start.insert_index(4), 0);
}

#[test]
fn test_dropped_block_defaults() {
    let mut ids = IdGenerator::from_seed("d");
    let block = create_block_for_drop(BlockKind::from_tag("section"), &mut ids);

    assert_eq!(block.id, "block-d-1");
    assert_eq!(block.kind, BlockKind::Section);
    assert_eq!(block.children(), Some(&[][..]));
    assert_eq!(block.settings.get_str("width"), Some("normal"));

    let unknown = create_block_for_drop(BlockKind::from_tag("marquee"), &mut ids);
    assert_eq!(unknown.kind, BlockKind::Unknown("marquee".into()));
    assert_eq!(unknown.id, "block-d-2");
}
