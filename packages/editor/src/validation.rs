//! Validation of user input before it is committed: embed/HTML markup and
//! page settings.

use crate::url::validate_slug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sitecraft_model::PageSettings;
use std::sync::LazyLock;

/// Shown when embed or HTML block markup does not parse
pub const INVALID_MARKUP_MESSAGE: &str = "Invalid HTML. Please check your code.";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// First error message, if any
    pub fn message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

static COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("COMMENT_REGEX: invalid regex pattern"));

static SCRIPT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("SCRIPT_REGEX: invalid regex pattern")
});

static STYLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("STYLE_REGEX: invalid regex pattern")
});

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)[^>]*?(/?)>").expect("TAG_REGEX: invalid regex pattern")
});

/// A tag opened at the end of the input and never terminated with `>`
static UNTERMINATED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*$").expect("UNTERMINATED_REGEX: invalid regex pattern"));

/// Find the first structural problem in `html`, if any
fn markup_problem(html: &str) -> Option<String> {
    let stripped = COMMENT_REGEX.replace_all(html, "");
    let stripped = SCRIPT_REGEX.replace_all(&stripped, "");
    let stripped = STYLE_REGEX.replace_all(&stripped, "");

    if UNTERMINATED_REGEX.is_match(&stripped) {
        return Some("unterminated tag".to_string());
    }

    let mut open: Vec<String> = Vec::new();
    for captures in TAG_REGEX.captures_iter(&stripped) {
        let closing = !captures[1].is_empty();
        let self_closing = !captures[3].is_empty();
        let name = captures[2].to_lowercase();

        if VOID_ELEMENTS.contains(&name.as_str()) || self_closing {
            continue;
        }

        if closing {
            match open.pop() {
                Some(expected) if expected == name => {}
                Some(expected) => {
                    return Some(format!("expected </{}>, found </{}>", expected, name));
                }
                None => return Some(format!("unexpected </{}>", name)),
            }
        } else {
            open.push(name);
        }
    }

    open.pop().map(|name| format!("<{}> is never closed", name))
}

/// Check that the tags in embed/HTML block markup are balanced
pub fn validate_markup(html: &str) -> ValidationResult {
    match markup_problem(html) {
        None => ValidationResult::ok(),
        Some(problem) => {
            tracing::debug!("Rejected markup: {}", problem);
            ValidationResult::from_errors(vec![ValidationError::new("content", INVALID_MARKUP_MESSAGE)])
        }
    }
}

/// Check a page-settings form. `existing_slugs` are the URL segments used by
/// other pages.
pub fn validate_page_settings(settings: &PageSettings, existing_slugs: &[&str]) -> ValidationResult {
    let mut errors = Vec::new();

    if settings.title.trim().is_empty() {
        errors.push(ValidationError::new("title", "Title is required"));
    }

    if !settings.url_prefix.is_empty() && !validate_slug(&settings.url_prefix, existing_slugs) {
        let message = if existing_slugs.contains(&settings.url_prefix.as_str()) {
            "URL prefix is already in use"
        } else {
            "URL prefix may only contain lowercase letters, numbers and dashes"
        };
        errors.push(ValidationError::new("urlPrefix", message));
    }

    if settings.parent_id.as_deref() == Some(settings.id.as_str()) {
        errors.push(ValidationError::new("parentId", "A page cannot be its own parent"));
    }

    ValidationResult::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(title: &str, url_prefix: &str) -> PageSettings {
        PageSettings {
            id: "p1".into(),
            title: title.into(),
            url_prefix: url_prefix.into(),
            parent_id: None,
            order: 0,
            show_in_nav: true,
            is_dummy: false,
        }
    }

    #[test]
    fn test_balanced_markup_is_valid() {
        assert!(validate_markup("").is_valid());
        assert!(validate_markup("plain text").is_valid());
        assert!(validate_markup("<div><p>Hi<br>there</p><img src=\"a.png\"></div>").is_valid());
        assert!(validate_markup("<iframe src=\"https://example.com\"></iframe>").is_valid());
        assert!(validate_markup("<custom-widget/><!-- <div> -->").is_valid());
        assert!(validate_markup("<script>if (a < b && c > d) {}</script>").is_valid());
        assert!(validate_markup("<DIV></div>").is_valid());
    }

    #[test]
    fn test_unbalanced_markup_is_invalid() {
        for html in ["<div>", "</div>", "<div><span></div></span>", "<div class=\"x\"", "<p>a</p></p>"] {
            let result = validate_markup(html);
            assert!(!result.is_valid(), "{} should be invalid", html);
            assert_eq!(result.message(), Some(INVALID_MARKUP_MESSAGE));
            assert_eq!(result.errors[0].field, "content");
        }
    }

    #[test]
    fn test_page_settings() {
        assert!(validate_page_settings(&settings("About", "about"), &[]).is_valid());
        assert!(validate_page_settings(&settings("About", ""), &["about"]).is_valid());

        let result = validate_page_settings(&settings(" ", "About Us"), &[]);
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "urlPrefix"]);

        let taken = validate_page_settings(&settings("About", "about"), &["about"]);
        assert_eq!(taken.message(), Some("URL prefix is already in use"));

        let mut own_parent = settings("About", "");
        own_parent.parent_id = Some("p1".into());
        assert_eq!(validate_page_settings(&own_parent, &[]).errors[0].field, "parentId");
    }

    #[test]
    fn test_display() {
        let result = ValidationResult::from_errors(vec![
            ValidationError::new("title", "Title is required"),
            ValidationError::new("urlPrefix", "bad"),
        ]);
        assert_eq!(result.to_string(), "title: Title is required; urlPrefix: bad");
    }
}
