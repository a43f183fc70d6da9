use crate::block::Block;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A page of the site: metadata plus its top-level block sequence.
///
/// Pages form a tree through `parent_id`. A dummy page is a structural node
/// that groups children in navigation but contributes no URL segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,

    #[serde(default)]
    pub content: Vec<Block>,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub order: i32,

    #[serde(default = "default_true")]
    pub show_in_nav: bool,

    #[serde(default)]
    pub is_dummy: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Page-settings panel view of a page (everything except content)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub url_prefix: String,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub order: i32,

    #[serde(default = "default_true")]
    pub show_in_nav: bool,

    #[serde(default)]
    pub is_dummy: bool,
}

/// Partial page update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_nav: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dummy: Option<bool>,
}

impl Page {
    pub fn new(id: impl Into<String>, title: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            url_prefix: None,
            content: Vec::new(),
            parent_id: None,
            order: 0,
            show_in_nav: true,
            is_dummy: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn dummy(mut self) -> Self {
        self.is_dummy = true;
        self
    }

    /// URL segment contributed by this page: the prefix if set, else the slug
    pub fn segment(&self) -> &str {
        match self.url_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => prefix,
            _ => &self.slug,
        }
    }

    pub fn to_settings(&self) -> PageSettings {
        PageSettings {
            id: self.id.clone(),
            title: self.title.clone(),
            url_prefix: self.url_prefix.clone().unwrap_or_default(),
            parent_id: self.parent_id.clone(),
            order: self.order,
            show_in_nav: self.show_in_nav,
            is_dummy: self.is_dummy,
        }
    }

    /// Overwrite the settings-panel fields; content and slug are kept
    pub fn apply_settings(&mut self, settings: &PageSettings) {
        self.title = settings.title.clone();
        self.url_prefix = if settings.url_prefix.is_empty() {
            None
        } else {
            Some(settings.url_prefix.clone())
        };
        self.parent_id = settings.parent_id.clone();
        self.order = settings.order;
        self.show_in_nav = settings.show_in_nav;
        self.is_dummy = settings.is_dummy;
        self.touch();
    }

    pub fn apply_patch(&mut self, patch: PagePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(url_prefix) = patch.url_prefix {
            self.url_prefix = Some(url_prefix).filter(|prefix| !prefix.is_empty());
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(show_in_nav) = patch.show_in_nav {
            self.show_in_nav = show_in_nav;
        }
        if let Some(is_dummy) = patch.is_dummy {
            self.is_dummy = is_dummy;
        }
        self.touch();
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_prefers_url_prefix() {
        let mut page = Page::new("p1", "About", "about");
        assert_eq!(page.segment(), "about");

        page.url_prefix = Some("about-us".into());
        assert_eq!(page.segment(), "about-us");

        page.url_prefix = Some(String::new());
        assert_eq!(page.segment(), "about");
    }

    #[test]
    fn test_settings_round_trip() {
        let page = Page::new("p1", "Docs", "docs").with_parent("root");
        let mut settings = page.to_settings();
        settings.title = "Documentation".into();
        settings.url_prefix = "documentation".into();
        settings.show_in_nav = false;

        let mut updated = page.clone();
        updated.apply_settings(&settings);

        assert_eq!(updated.title, "Documentation");
        assert_eq!(updated.url_prefix.as_deref(), Some("documentation"));
        assert_eq!(updated.slug, "docs");
        assert!(!updated.show_in_nav);
        assert!(updated.updated_at >= page.updated_at);
    }

    #[test]
    fn test_apply_patch_leaves_unset_fields() {
        let mut page = Page::new("p1", "Home", "home").with_parent("root");
        page.apply_patch(PagePatch {
            title: Some("Start".into()),
            parent_id: Some(None),
            ..Default::default()
        });

        assert_eq!(page.title, "Start");
        assert_eq!(page.slug, "home");
        assert_eq!(page.parent_id, None);
    }

    #[test]
    fn test_page_json_defaults() {
        let json = r#"{
            "id": "p1",
            "title": "Home",
            "slug": "home",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;

        let page: Page = serde_json::from_str(json).unwrap();
        assert!(page.show_in_nav);
        assert!(!page.is_dummy);
        assert!(page.content.is_empty());
        assert_eq!(page.parent_id, None);
    }
}
