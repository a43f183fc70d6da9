use super::save_site;
use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sitecraft_editor::{EditSession, EditorOptions};
use sitecraft_model::{Page, Site};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Site name
    #[arg(short, long, default_value = "My Site")]
    pub name: String,

    /// Site file to create
    #[arg(short, long, default_value = "site.json")]
    pub site_file: String,

    /// Force overwrite existing config and site
    #[arg(short, long)]
    pub force: bool,
}

/// Starter site: a home page opening with a hero section
pub fn starter_site(name: &str) -> Result<Site> {
    let mut site = Site::new("site-1", name);
    site.pages.push(Page::new("home", "Home", "home"));

    let mut session = EditSession::new(EditorOptions::default().with_autosave(false)).with_site(site);
    session.set_current_page(Some("home"))?;
    session.insert_combination("hero-section", None)?;

    session
        .into_site()
        .ok_or_else(|| anyhow::anyhow!("starter site was not created"))
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Sitecraft site...".bright_blue().bold());

    let config = Config {
        site_file: args.site_file.clone(),
        ..Config::default()
    };

    let site = starter_site(&args.name)?;
    save_site(&config.get_site_path(cwd), &site)?;
    println!("  {} Created {}", "✓".green(), args.site_file);

    let store_dir = config.get_store_dir(cwd);
    if !store_dir.exists() {
        fs::create_dir_all(&store_dir)?;
        println!("  {} Created {}/", "✓".green(), config.store_dir);
    }

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Site initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: sitecraft block list home");
    println!("  2. Run: sitecraft block add-combination home features-grid");
    println!("  3. Run: sitecraft page url home");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::load_site;

    #[test]
    fn test_starter_site() {
        let site = starter_site("Demo").unwrap();
        assert_eq!(site.name, "Demo");

        let home = site.page("home").unwrap();
        assert_eq!(home.content.len(), 1);
        assert_eq!(home.content[0].children().unwrap().len(), 2);
    }

    #[test]
    fn test_init_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        init(
            InitArgs {
                name: "Demo".into(),
                site_file: "site.json".into(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        assert!(dir.path().join(DEFAULT_CONFIG_NAME).exists());
        assert!(dir.path().join(".sitecraft").is_dir());

        let config = Config::load(&cwd).unwrap();
        let site = load_site(&config.get_site_path(&cwd)).unwrap();
        assert_eq!(site.name, "Demo");
    }
}
