use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node in a page's content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: BlockKind,

    #[serde(default)]
    pub content: BlockContent,

    #[serde(default)]
    pub settings: BlockSettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// Known block kinds, plus a fallback for tags this build does not recognize.
///
/// Serialized as the plain tag string (`"text"`, `"columns"`, `"h1"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    // Basic
    Text,
    Heading,
    Image,
    Button,
    Spacer,
    Html,

    // Layout
    Columns,
    Section,
    Container,
    Grid,

    // Media
    Video,
    Embed,
    Gallery,

    // Forms
    Form,
    Input,
    Textarea,
    Select,

    // Interactive
    Tabs,
    Accordion,
    Modal,

    // Raw HTML elements
    Div,
    Span,
    A,
    P,
    H1,
    H2,
    H3,
    H4,
    Ul,
    Ol,
    Li,

    /// Tag not known to this build; carried verbatim.
    Unknown(String),
}

/// Block library grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Basic,
    Layout,
    Media,
    Forms,
    Interactive,
    Advanced,
    Element,
}

impl BlockKind {
    /// Every recognized kind, in library order
    pub const KNOWN: [BlockKind; 31] = [
        BlockKind::Text,
        BlockKind::Heading,
        BlockKind::Image,
        BlockKind::Button,
        BlockKind::Spacer,
        BlockKind::Html,
        BlockKind::Columns,
        BlockKind::Section,
        BlockKind::Container,
        BlockKind::Grid,
        BlockKind::Video,
        BlockKind::Embed,
        BlockKind::Gallery,
        BlockKind::Form,
        BlockKind::Input,
        BlockKind::Textarea,
        BlockKind::Select,
        BlockKind::Tabs,
        BlockKind::Accordion,
        BlockKind::Modal,
        BlockKind::Div,
        BlockKind::Span,
        BlockKind::A,
        BlockKind::P,
        BlockKind::H1,
        BlockKind::H2,
        BlockKind::H3,
        BlockKind::H4,
        BlockKind::Ul,
        BlockKind::Ol,
        BlockKind::Li,
    ];

    /// The serialized type tag
    pub fn tag(&self) -> &str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Heading => "heading",
            BlockKind::Image => "image",
            BlockKind::Button => "button",
            BlockKind::Spacer => "spacer",
            BlockKind::Html => "html",
            BlockKind::Columns => "columns",
            BlockKind::Section => "section",
            BlockKind::Container => "container",
            BlockKind::Grid => "grid",
            BlockKind::Video => "video",
            BlockKind::Embed => "embed",
            BlockKind::Gallery => "gallery",
            BlockKind::Form => "form",
            BlockKind::Input => "input",
            BlockKind::Textarea => "textarea",
            BlockKind::Select => "select",
            BlockKind::Tabs => "tabs",
            BlockKind::Accordion => "accordion",
            BlockKind::Modal => "modal",
            BlockKind::Div => "div",
            BlockKind::Span => "span",
            BlockKind::A => "a",
            BlockKind::P => "p",
            BlockKind::H1 => "h1",
            BlockKind::H2 => "h2",
            BlockKind::H3 => "h3",
            BlockKind::H4 => "h4",
            BlockKind::Ul => "ul",
            BlockKind::Ol => "ol",
            BlockKind::Li => "li",
            BlockKind::Unknown(tag) => tag,
        }
    }

    /// Resolve a type tag. Unrecognized tags become `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|kind| kind.tag() == tag)
            .cloned()
            .unwrap_or_else(|| BlockKind::Unknown(tag.to_string()))
    }

    /// Name of the editor component that renders this kind.
    ///
    /// Site blocks map to `site-<tag>-block`; raw elements render as themselves.
    pub fn component_name(&self) -> String {
        match self.category() {
            BlockCategory::Element => self.tag().to_string(),
            _ if self.is_unknown() => self.tag().to_string(),
            _ => format!("site-{}-block", self.tag()),
        }
    }

    pub fn category(&self) -> BlockCategory {
        match self {
            BlockKind::Text
            | BlockKind::Heading
            | BlockKind::Image
            | BlockKind::Button
            | BlockKind::Spacer => BlockCategory::Basic,
            BlockKind::Columns | BlockKind::Section | BlockKind::Container | BlockKind::Grid => {
                BlockCategory::Layout
            }
            BlockKind::Video | BlockKind::Embed | BlockKind::Gallery => BlockCategory::Media,
            BlockKind::Form | BlockKind::Input | BlockKind::Textarea | BlockKind::Select => {
                BlockCategory::Forms
            }
            BlockKind::Tabs | BlockKind::Accordion | BlockKind::Modal => {
                BlockCategory::Interactive
            }
            BlockKind::Html | BlockKind::Unknown(_) => BlockCategory::Advanced,
            BlockKind::Div
            | BlockKind::Span
            | BlockKind::A
            | BlockKind::P
            | BlockKind::H1
            | BlockKind::H2
            | BlockKind::H3
            | BlockKind::H4
            | BlockKind::Ul
            | BlockKind::Ol
            | BlockKind::Li => BlockCategory::Element,
        }
    }

    /// Kinds whose content is conventionally a sequence of child blocks
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            BlockKind::Columns
                | BlockKind::Section
                | BlockKind::Container
                | BlockKind::Grid
                | BlockKind::Form
                | BlockKind::Tabs
                | BlockKind::Accordion
                | BlockKind::Modal
                | BlockKind::Div
                | BlockKind::Ul
                | BlockKind::Ol
                | BlockKind::Li
        )
    }

    /// Kinds whose content is raw markup
    pub fn is_markup(&self) -> bool {
        matches!(self, BlockKind::Embed | BlockKind::Html)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, BlockKind::Unknown(_))
    }
}

impl From<String> for BlockKind {
    fn from(tag: String) -> Self {
        BlockKind::from_tag(&tag)
    }
}

impl From<&str> for BlockKind {
    fn from(tag: &str) -> Self {
        BlockKind::from_tag(tag)
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Unknown(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Type-dependent block payload.
///
/// No validation is applied against the block kind: any kind may hold any
/// content shape. `Other` only holds values no other variant can represent;
/// build content from raw JSON with `BlockContent::from` (or call
/// `normalized`) so it reads back as the same variant after a save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockContent {
    #[default]
    Empty,

    /// Scalar text (text, heading, embed markup, ...)
    Text(String),

    /// Ordered child blocks (containers)
    Children(Vec<Block>),

    /// Structured payload (media reference, gallery images, ...)
    Fields(Map<String, Value>),

    /// Anything else the document carried
    Other(Value),
}

impl BlockContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            BlockContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&Map<String, Value>> {
        match self {
            BlockContent::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    /// Move an `Other` value into the variant it deserializes as
    pub fn normalized(self) -> Self {
        match self {
            BlockContent::Other(value) => BlockContent::from(value),
            content => content,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            BlockContent::Empty => true,
            BlockContent::Text(text) => text.is_empty(),
            BlockContent::Children(children) => children.is_empty(),
            BlockContent::Fields(fields) => fields.is_empty(),
            BlockContent::Other(value) => value.is_null(),
        }
    }
}

impl From<Value> for BlockContent {
    fn from(value: Value) -> Self {
        if value.is_array() {
            return match Vec::<Block>::deserialize(&value) {
                Ok(children) => BlockContent::Children(children),
                Err(_) => BlockContent::Other(value),
            };
        }

        match value {
            Value::Null => BlockContent::Empty,
            Value::String(text) => BlockContent::Text(text),
            Value::Object(fields) => BlockContent::Fields(fields),
            other => BlockContent::Other(other),
        }
    }
}

/// Presentation options of a block (width, alignment, padding, kind extras)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockSettings(Map<String, Value>);

impl BlockSettings {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Default settings for a block kind
    pub fn defaults_for(kind: &BlockKind) -> Self {
        let mut settings = Self::new();
        settings.insert("width", "normal");
        settings.insert("alignment", "left");
        settings.insert("padding", "normal");

        match kind {
            BlockKind::Text => {
                settings.insert("fontSize", "normal");
                settings.insert("fontWeight", "normal");
            }
            BlockKind::Image => {
                settings.insert("width", "full");
                settings.insert("aspectRatio", "16:9");
                settings.insert("borderRadius", "none");
            }
            BlockKind::Columns => {
                settings.insert("columns", 2);
                settings.insert("gap", "normal");
                settings.insert("stackOnMobile", true);
            }
            BlockKind::Section => {
                settings.insert("width", "full");
                settings.insert("padding", "large");
                settings.insert("background", "none");
            }
            _ => {}
        }

        settings
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// One-level merge: keys in `patch` overwrite keys here, nested values
    /// are replaced whole.
    pub fn merge(&mut self, patch: &BlockSettings) {
        for (key, value) in &patch.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for BlockSettings {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for BlockSettings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Block {
    /// New block with the kind's default settings and default content
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        let content = if kind.is_container() {
            BlockContent::Children(Vec::new())
        } else {
            BlockContent::Empty
        };

        Self {
            id: id.into(),
            settings: BlockSettings::defaults_for(&kind),
            kind,
            content,
            class_name: None,
        }
    }

    pub fn with_content(mut self, content: BlockContent) -> Self {
        self.content = content.normalized();
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_content(BlockContent::Text(text.into()))
    }

    pub fn with_children(self, children: Vec<Block>) -> Self {
        self.with_content(BlockContent::Children(children))
    }

    pub fn with_settings(mut self, settings: BlockSettings) -> Self {
        self.settings.merge(&settings);
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Nested blocks, if the content is a child sequence
    pub fn children(&self) -> Option<&[Block]> {
        match &self.content {
            BlockContent::Children(children) => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match &mut self.content {
            BlockContent::Children(children) => Some(children),
            _ => None,
        }
    }
}

/// Depth-first search for a block by id
pub fn find_block<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        if let Some(found) = block.children().and_then(|children| find_block(children, id)) {
            return Some(found);
        }
    }
    None
}

pub fn find_block_mut<'a>(blocks: &'a mut [Block], id: &str) -> Option<&'a mut Block> {
    for block in blocks.iter_mut() {
        if block.id == id {
            return Some(block);
        }
        if let Some(children) = block.children_mut() {
            if let Some(found) = find_block_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}
