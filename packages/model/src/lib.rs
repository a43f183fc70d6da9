//! # Sitecraft Model
//!
//! Data model shared by the editor and the CLI: the block tree that makes up
//! a page, pages and their hierarchy, the site, and theme tokens.
//!
//! ```text
//! Site
//!  ├─ theme: Theme
//!  └─ pages: [Page]
//!              └─ content: [Block]
//!                            └─ content: Children([Block]) | Text | Fields | ...
//! ```

pub mod block;
pub mod id_generator;
pub mod page;
pub mod site;
pub mod theme;
pub mod visitor;

pub use block::{find_block, find_block_mut, Block, BlockCategory, BlockContent, BlockKind, BlockSettings};
pub use id_generator::IdGenerator;
pub use page::{Page, PagePatch, PageSettings};
pub use site::{Site, SitePatch};
pub use theme::Theme;
pub use visitor::{collect_ids, count_blocks, duplicate_ids, reassign_ids, BlockVisitor, BlockVisitorMut};
