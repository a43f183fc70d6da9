pub mod block;
pub mod init;
pub mod page;
pub mod theme;

pub use block::{block, BlockArgs};
pub use init::{init, InitArgs};
pub use page::{page, PageArgs};
pub use theme::{theme, ThemeArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use sitecraft_editor::{EditSession, FileStore};
use sitecraft_model::Site;
use std::fs;
use std::path::Path;

/// Read the site file
pub fn load_site(path: &Path) -> Result<Site> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read site file {} (run `sitecraft init`?)", path.display()))?;
    let site = serde_json::from_str(&content)
        .with_context(|| format!("Invalid site file {}", path.display()))?;
    Ok(site)
}

pub fn save_site(path: &Path, site: &Site) -> Result<()> {
    let json = serde_json::to_string_pretty(site)?;
    fs::write(path, json)?;
    Ok(())
}

/// Open an editing session on the site file with the local block store
pub fn open_session(config: &Config, cwd: &str) -> Result<EditSession> {
    let site = load_site(&config.get_site_path(cwd))?;
    let store = FileStore::new(config.get_store_dir(cwd));
    tracing::debug!("Opened site {} ({} pages)", site.name, site.pages.len());

    Ok(EditSession::with_store(config.editor.clone(), Box::new(store)).with_site(site))
}

/// Write the session's site back to the site file
pub fn close_session(session: EditSession, config: &Config, cwd: &str) -> Result<()> {
    if let Some(site) = session.into_site() {
        save_site(&config.get_site_path(cwd), &site)?;
    }
    Ok(())
}
