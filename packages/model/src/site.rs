use crate::page::Page;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};

/// A site: its pages and the single active theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub pages: Vec<Page>,

    #[serde(default)]
    pub theme: Theme,
}

/// Site-level fields that `update_site` may replace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<Page>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Site {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pages: Vec::new(),
            theme: Theme::default(),
        }
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.id == id)
    }

    pub fn page_mut(&mut self, id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|page| page.id == id)
    }

    /// Direct children of a page, by `order`
    pub fn children_of(&self, id: &str) -> Vec<&Page> {
        let mut children: Vec<&Page> = self
            .pages
            .iter()
            .filter(|page| page.parent_id.as_deref() == Some(id))
            .collect();
        children.sort_by_key(|page| page.order);
        children
    }

    /// Top-level pages shown in navigation, by `order`
    pub fn nav_pages(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self
            .pages
            .iter()
            .filter(|page| page.show_in_nav && page.parent_id.is_none())
            .collect();
        pages.sort_by_key(|page| page.order);
        pages
    }

    /// Remove a page, returning it. Children keep their dangling `parent_id`.
    pub fn remove_page(&mut self, id: &str) -> Option<Page> {
        let index = self.pages.iter().position(|page| page.id == id)?;
        Some(self.pages.remove(index))
    }

    /// Replace the theme wholesale
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn apply_patch(&mut self, patch: SitePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(pages) = patch.pages {
            self.pages = pages;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
    }
}
