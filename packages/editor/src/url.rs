//! Page URLs, breadcrumbs and slugs.
//!
//! A page's URL is the path of its ancestors' segments, root first. Dummy
//! pages group children in navigation but contribute no segment. A parent id
//! that matches no page ends the walk as if the page were top-level.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sitecraft_model::Page;
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Cycle detected in page hierarchy at {0}")]
    CycleDetected(String),
}

/// One step of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub id: String,
    pub title: String,
    pub url: String,
    pub is_dummy: bool,
}

/// `page` followed by its ancestors, nearest first
fn ancestry<'a>(page: &'a Page, pages: &'a [Page]) -> Result<Vec<&'a Page>, UrlError> {
    let mut chain = vec![page];
    let mut seen = HashSet::from([page.id.as_str()]);
    let mut current = page;

    while let Some(parent_id) = current.parent_id.as_deref() {
        let Some(parent) = pages.iter().find(|p| p.id == parent_id) else {
            break;
        };
        if !seen.insert(parent.id.as_str()) {
            return Err(UrlError::CycleDetected(parent.id.clone()));
        }
        chain.push(parent);
        current = parent;
    }

    Ok(chain)
}

/// Absolute URL of `page` within `pages`, e.g. `/a/b`
pub fn generate_page_url(page: &Page, pages: &[Page]) -> Result<String, UrlError> {
    let segments: Vec<&str> = ancestry(page, pages)?
        .into_iter()
        .rev()
        .filter(|p| !p.is_dummy)
        .map(Page::segment)
        .collect();

    Ok(format!("/{}", segments.join("/")))
}

/// Trail from the root down to `page`. Dummy ancestors are included and
/// flagged.
pub fn generate_breadcrumbs(page: &Page, pages: &[Page]) -> Result<Vec<Breadcrumb>, UrlError> {
    ancestry(page, pages)?
        .into_iter()
        .rev()
        .map(|p| {
            Ok(Breadcrumb {
                id: p.id.clone(),
                title: p.title.clone(),
                url: generate_page_url(p, pages)?,
                is_dummy: p.is_dummy,
            })
        })
        .collect()
}

/// Lowercase `text`, turn every run of characters outside `[a-z0-9]` into a
/// single `-`, and strip leading and trailing dashes.
pub fn create_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("SLUG_REGEX: invalid regex pattern"));

/// Whether `slug` is well formed and not already taken
pub fn validate_slug(slug: &str, existing: &[&str]) -> bool {
    SLUG_REGEX.is_match(slug) && !existing.contains(&slug)
}
