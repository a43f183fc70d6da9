//! Loading and saving whole site documents

use serde_json::json;
use sitecraft_model::{
    collect_ids, count_blocks, duplicate_ids, find_block, BlockContent, BlockKind, Site, Theme,
};

fn document() -> serde_json::Value {
    json!({
        "id": "site-1",
        "name": "Bakery",
        "pages": [
            {
                "id": "home",
                "title": "Home",
                "slug": "home",
                "createdAt": "2024-03-01T09:00:00Z",
                "updatedAt": "2024-03-02T10:30:00Z",
                "content": [
                    { "id": "b1", "type": "heading", "content": "Fresh bread daily", "settings": { "fontSize": "xl" } },
                    {
                        "id": "b2",
                        "type": "columns",
                        "content": [
                            { "id": "b3", "type": "image", "content": { "url": "loaf.jpg", "alt": "A loaf" } },
                            { "id": "b4", "type": "text", "content": "Sourdough", "className": "lead" }
                        ]
                    },
                    { "id": "b5", "type": "marquee", "content": 42 },
                    { "id": "b6", "type": "spacer", "content": null }
                ]
            },
            {
                "id": "menu",
                "title": "Menu",
                "slug": "menu",
                "urlPrefix": "our-menu",
                "order": 1,
                "showInNav": false,
                "createdAt": "2024-03-01T09:00:00Z",
                "updatedAt": "2024-03-01T09:00:00Z"
            }
        ]
    })
}

#[test]
fn test_load_site_document() {
    let site: Site = serde_json::from_value(document()).unwrap();

    assert_eq!(site.pages.len(), 2);
    assert_eq!(site.theme, Theme::default());

    let home = site.page("home").unwrap();
    assert_eq!(count_blocks(&home.content), 6);
    assert!(duplicate_ids(&home.content).is_empty());
    assert_eq!(
        collect_ids(&home.content),
        vec!["b1", "b2", "b3", "b4", "b5", "b6"]
    );

    let image = find_block(&home.content, "b3").unwrap();
    assert_eq!(image.content.as_fields().unwrap()["alt"], "A loaf");

    let unknown = find_block(&home.content, "b5").unwrap();
    assert_eq!(unknown.kind, BlockKind::Unknown("marquee".into()));
    assert_eq!(unknown.content, BlockContent::Other(json!(42)));

    assert_eq!(find_block(&home.content, "b6").unwrap().content, BlockContent::Empty);
    assert_eq!(
        find_block(&home.content, "b4").unwrap().class_name.as_deref(),
        Some("lead")
    );

    let menu = site.page("menu").unwrap();
    assert_eq!(menu.segment(), "our-menu");
    assert!(!menu.show_in_nav);
    assert!(menu.content.is_empty());
    assert_eq!(site.nav_pages().len(), 1);
}

#[test]
fn test_save_and_reload_preserves_document() {
    let site: Site = serde_json::from_value(document()).unwrap();
    let saved = serde_json::to_string(&site).unwrap();
    let reloaded: Site = serde_json::from_str(&saved).unwrap();

    assert_eq!(reloaded, site);

    let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
    let blocks = &value["pages"][0]["content"];
    assert_eq!(blocks[1]["type"], "columns");
    assert_eq!(blocks[2]["type"], "marquee");
    assert_eq!(blocks[1]["content"][1]["className"], "lead");
    assert!(blocks[0].get("className").is_none());
}

#[test]
fn test_missing_timestamps_are_rejected() {
    let mut doc = document();
    doc["pages"][1]
        .as_object_mut()
        .unwrap()
        .remove("createdAt");

    assert!(serde_json::from_value::<Site>(doc).is_err());
}
