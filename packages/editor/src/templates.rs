//! # Block Library
//!
//! Predefined block shapes that the editor can instantiate:
//!
//! - **Templates**: a single block (text, image, columns, ...)
//! - **Combinations**: a named group of pre-configured blocks, e.g. a
//!   features grid expanding into a columns block with text children
//!
//! Instantiation gives every block in the shape, nested ones included, a
//! fresh id from the session's `IdGenerator`.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sitecraft_model::{reassign_ids, Block, BlockContent, BlockKind, BlockSettings, IdGenerator};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Template {0} not found")]
    TemplateNotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Basic,
    Media,
    Layout,
    Advanced,
}

impl TemplateCategory {
    pub fn label(&self) -> &'static str {
        match self {
            TemplateCategory::Basic => "basic",
            TemplateCategory::Media => "media",
            TemplateCategory::Layout => "layout",
            TemplateCategory::Advanced => "advanced",
        }
    }
}

/// A single-block preset. The id of `block` is a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: TemplateCategory,
    pub block: Block,
}

/// A multi-block preset. Block ids are placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCombination {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub blocks: Vec<Block>,
}

/// Library search results, grouped by category label
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults<'a> {
    Templates(BTreeMap<String, Vec<&'a BlockTemplate>>),
    Combinations(BTreeMap<String, Vec<&'a BlockCombination>>),
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            SearchResults::Templates(groups) => groups.is_empty(),
            SearchResults::Combinations(groups) => groups.is_empty(),
        }
    }
}

/// Registry of templates and combinations
#[derive(Debug, Clone, Default)]
pub struct Library {
    templates: Vec<BlockTemplate>,
    combinations: Vec<BlockCombination>,
}

impl Library {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Library with the built-in templates and combinations
    pub fn builtin() -> Self {
        Self {
            templates: builtin_templates(),
            combinations: builtin_combinations(),
        }
    }

    pub fn register_template(&mut self, template: BlockTemplate) {
        self.templates.retain(|t| t.id != template.id);
        self.templates.push(template);
    }

    pub fn register_combination(&mut self, combination: BlockCombination) {
        self.combinations.retain(|c| c.id != combination.id);
        self.combinations.push(combination);
    }

    pub fn templates(&self) -> &[BlockTemplate] {
        &self.templates
    }

    pub fn combinations(&self) -> &[BlockCombination] {
        &self.combinations
    }

    pub fn template(&self, id: &str) -> Option<&BlockTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn combination(&self, id: &str) -> Option<&BlockCombination> {
        self.combinations.iter().find(|c| c.id == id)
    }

    /// Instantiate a template. Unknown ids are an error.
    pub fn create_block_from_template(
        &self,
        template_id: &str,
        ids: &mut IdGenerator,
    ) -> Result<Block, TemplateError> {
        let template = self
            .template(template_id)
            .ok_or_else(|| TemplateError::TemplateNotFound(template_id.to_string()))?;

        let mut block = template.block.clone();
        reassign_ids(&mut block, ids);
        Ok(block)
    }

    /// Instantiate a combination. Unknown ids yield an empty list.
    pub fn create_blocks_from_combination(
        &self,
        combination_id: &str,
        ids: &mut IdGenerator,
    ) -> Vec<Block> {
        let Some(combination) = self.combination(combination_id) else {
            tracing::debug!("Unknown combination {}", combination_id);
            return Vec::new();
        };

        combination
            .blocks
            .iter()
            .cloned()
            .map(|mut block| {
                reassign_ids(&mut block, ids);
                block
            })
            .collect()
    }

    /// Search the library the way the block panel does.
    ///
    /// A term mentioning "template" searches templates using the rest of the
    /// term; any other term searches combinations. Matching is a
    /// case-insensitive substring test on name and description; an empty
    /// term matches everything.
    pub fn search(&self, term: &str) -> SearchResults<'_> {
        let term = term.to_lowercase();

        if term.contains("template") {
            let rest = term.replace("templates", "").replace("template", "");
            let rest = rest.trim();
            let mut groups: BTreeMap<String, Vec<&BlockTemplate>> = BTreeMap::new();
            for template in &self.templates {
                if matches_term(&template.name, &template.description, rest) {
                    groups
                        .entry(template.category.label().to_string())
                        .or_default()
                        .push(template);
                }
            }
            SearchResults::Templates(groups)
        } else {
            let term = term.trim();
            let mut groups: BTreeMap<String, Vec<&BlockCombination>> = BTreeMap::new();
            for combination in &self.combinations {
                if matches_term(&combination.name, &combination.description, term) {
                    groups
                        .entry(combination.category.clone())
                        .or_default()
                        .push(combination);
                }
            }
            SearchResults::Combinations(groups)
        }
    }
}

fn matches_term(name: &str, description: &str, term: &str) -> bool {
    term.is_empty()
        || name.to_lowercase().contains(term)
        || description.to_lowercase().contains(term)
}

fn settings(value: serde_json::Value) -> BlockSettings {
    value
        .as_object()
        .cloned()
        .map(BlockSettings::from)
        .unwrap_or_default()
}

fn fields(value: serde_json::Value) -> BlockContent {
    BlockContent::Fields(value.as_object().cloned().unwrap_or_default())
}

fn template(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    category: TemplateCategory,
    block: Block,
) -> BlockTemplate {
    BlockTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category,
        block,
    }
}

fn builtin_templates() -> Vec<BlockTemplate> {
    use TemplateCategory::*;

    vec![
        template(
            "text",
            "Text",
            "A paragraph of rich text",
            "text",
            Basic,
            Block::new("", BlockKind::Text).with_text("Start typing..."),
        ),
        template(
            "heading",
            "Heading",
            "A section title",
            "text",
            Basic,
            Block::new("", BlockKind::Heading)
                .with_text("Heading")
                .with_settings(settings(json!({ "fontSize": "xl", "fontWeight": "bold" }))),
        ),
        template(
            "button",
            "Button",
            "A call-to-action link styled as a button",
            "basic",
            Basic,
            Block::new("", BlockKind::Button).with_content(fields(json!({ "label": "Click me", "href": "#" }))),
        ),
        template(
            "spacer",
            "Spacer",
            "Vertical whitespace between blocks",
            "basic",
            Basic,
            Block::new("", BlockKind::Spacer).with_settings(settings(json!({ "height": "medium" }))),
        ),
        template(
            "image",
            "Image",
            "A single image with alt text",
            "image",
            Media,
            Block::new("", BlockKind::Image).with_content(fields(json!({ "url": "", "alt": "" }))),
        ),
        template(
            "gallery",
            "Gallery",
            "A grid, masonry or carousel of images",
            "image",
            Media,
            Block::new("", BlockKind::Gallery).with_content(fields(json!({
                "images": [],
                "layout": "grid",
                "columnCount": 3,
                "gap": 1
            }))),
        ),
        template(
            "video",
            "Video",
            "An embedded video player",
            "video",
            Media,
            Block::new("", BlockKind::Video).with_content(fields(json!({ "url": "", "autoplay": false }))),
        ),
        template(
            "columns",
            "Columns",
            "Two side-by-side columns of text",
            "columns",
            Layout,
            Block::new("", BlockKind::Columns).with_children(vec![
                Block::new("", BlockKind::Text).with_text("Left column"),
                Block::new("", BlockKind::Text).with_text("Right column"),
            ]),
        ),
        template(
            "section",
            "Section",
            "A full-width container for other blocks",
            "layout",
            Layout,
            Block::new("", BlockKind::Section),
        ),
        template(
            "grid",
            "Grid",
            "A three-column grid container",
            "grid",
            Layout,
            Block::new("", BlockKind::Grid).with_settings(settings(json!({ "columns": 3, "gap": "normal" }))),
        ),
        template(
            "embed",
            "Embed",
            "Third-party embed code",
            "embed",
            Advanced,
            Block::new("", BlockKind::Embed).with_text(""),
        ),
        template(
            "html",
            "HTML",
            "Custom HTML markup",
            "html",
            Advanced,
            Block::new("", BlockKind::Html).with_text("<div></div>"),
        ),
    ]
}

fn builtin_combinations() -> Vec<BlockCombination> {
    let features = (1..=6)
        .map(|i| {
            Block::new("", BlockKind::Text)
                .with_text(format!("Feature {}", i))
                .with_settings(settings(json!({ "alignment": "center", "fontSize": "large" })))
        })
        .collect();

    let feature_card = Block::new("", BlockKind::Div).with_children(vec![
        Block::new("", BlockKind::Image).with_settings(settings(json!({ "width": "medium" }))),
        Block::new("", BlockKind::Heading).with_text("Feature Title"),
        Block::new("", BlockKind::Text).with_text("Feature description"),
    ]);

    vec![
        BlockCombination {
            id: "features-grid".to_string(),
            name: "Features Grid".to_string(),
            description: "3x2 grid of features with icons and descriptions".to_string(),
            category: "Features".to_string(),
            tags: vec!["features".into(), "grid".into(), "benefits".into()],
            blocks: vec![Block::new("", BlockKind::Columns)
                .with_settings(settings(json!({ "width": "normal", "columns": 3 })))
                .with_children(features)],
        },
        BlockCombination {
            id: "hero-section".to_string(),
            name: "Hero Section".to_string(),
            description: "Large welcome heading with a short description".to_string(),
            category: "Headers".to_string(),
            tags: vec!["hero".into(), "header".into(), "intro".into()],
            blocks: vec![Block::new("", BlockKind::Section).with_children(vec![
                Block::new("", BlockKind::Heading)
                    .with_text("Welcome to my website")
                    .with_settings(settings(json!({ "fontSize": "xl", "fontWeight": "bold" }))),
                Block::new("", BlockKind::Text)
                    .with_text("A beautiful description goes here")
                    .with_settings(settings(json!({ "fontSize": "lg" }))),
            ])],
        },
        BlockCombination {
            id: "feature-grid".to_string(),
            name: "Feature Cards".to_string(),
            description: "Three cards with an image, title and description".to_string(),
            category: "Features".to_string(),
            tags: vec!["features".into(), "cards".into()],
            blocks: vec![Block::new("", BlockKind::Grid)
                .with_settings(settings(json!({ "columns": 3, "gap": "large" })))
                .with_children(vec![feature_card.clone(), feature_card.clone(), feature_card])],
        },
    ]
}
