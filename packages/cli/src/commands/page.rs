use super::load_site;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use sitecraft_editor::{create_slug, generate_page_url, validate_slug, EditSession};
use sitecraft_model::{Page, Site};

#[derive(Debug, Args)]
pub struct PageArgs {
    #[command(subcommand)]
    pub command: PageCommand,
}

#[derive(Debug, Subcommand)]
pub enum PageCommand {
    /// Print the URL of a page
    Url {
        /// Page id
        id: String,
    },

    /// Print the breadcrumb trail of a page
    Breadcrumbs {
        /// Page id
        id: String,
    },

    /// List pages as a tree
    List,

    /// Turn text into a URL slug
    Slug {
        /// Text to slugify
        text: String,
    },
}

pub fn page(args: PageArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    match args.command {
        PageCommand::Slug { text } => slug(&text, &config, cwd)?,
        PageCommand::Url { id } => {
            let session = read_only_session(&config, cwd)?;
            println!("{}", session.page_url(&id)?);
        }
        PageCommand::Breadcrumbs { id } => {
            let session = read_only_session(&config, cwd)?;
            let crumbs = session.breadcrumbs(&id)?;
            let trail: Vec<String> = crumbs
                .iter()
                .map(|crumb| {
                    if crumb.is_dummy {
                        crumb.title.dimmed().to_string()
                    } else {
                        format!("{} ({})", crumb.title.bright_white(), crumb.url)
                    }
                })
                .collect();
            println!("{}", trail.join(" › "));
        }
        PageCommand::List => list(&load_site(&config.get_site_path(cwd))?)?,
    }

    Ok(())
}

/// Session over the site file that never touches the block store
fn read_only_session(config: &Config, cwd: &str) -> Result<EditSession> {
    let site = load_site(&config.get_site_path(cwd))?;
    Ok(EditSession::new(config.editor.clone().with_autosave(false)).with_site(site))
}

fn list(site: &Site) -> Result<()> {
    println!("{}", site.name.bright_blue().bold());

    let mut roots: Vec<&Page> = site
        .pages
        .iter()
        .filter(|page| match page.parent_id.as_deref() {
            Some(parent) => site.page(parent).is_none(),
            None => true,
        })
        .collect();
    roots.sort_by_key(|page| page.order);

    for root in roots {
        print_page(site, root, 1)?;
    }
    Ok(())
}

fn print_page(site: &Site, page: &Page, depth: usize) -> Result<()> {
    let url = generate_page_url(page, &site.pages)?;
    let mut line = format!("{}{} {}", "  ".repeat(depth), page.title.bright_white(), url.dimmed());
    if page.is_dummy {
        line.push_str(&format!(" {}", "[group]".yellow()));
    }
    if !page.show_in_nav {
        line.push_str(&format!(" {}", "[hidden]".yellow()));
    }
    println!("{}  {} blocks", line, page.content.len());

    for child in site.children_of(&page.id) {
        print_page(site, child, depth + 1)?;
    }
    Ok(())
}

fn slug(text: &str, config: &Config, cwd: &str) -> Result<()> {
    let slug = create_slug(text);

    // Report collisions when a site is present
    let taken: Vec<String> = load_site(&config.get_site_path(cwd))
        .map(|site| site.pages.iter().map(|page| page.segment().to_string()).collect())
        .unwrap_or_default();
    let taken: Vec<&str> = taken.iter().map(String::as_str).collect();

    if validate_slug(&slug, &taken) {
        println!("{}", slug);
    } else if slug.is_empty() {
        return Err(anyhow!("Cannot make a slug from {:?}", text));
    } else {
        println!("{} {}", slug, "(already in use)".yellow());
    }
    Ok(())
}
