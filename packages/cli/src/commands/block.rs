use super::{close_session, open_session};
use crate::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use sitecraft_editor::{EditSession, SearchResults};
use sitecraft_model::{count_blocks, Block, BlockContent};

#[derive(Debug, Args)]
pub struct BlockArgs {
    #[command(subcommand)]
    pub command: BlockCommand,
}

#[derive(Debug, Subcommand)]
pub enum BlockCommand {
    /// List block templates
    Templates {
        /// Filter by name or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List block combinations
    Combinations {
        /// Filter by name or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Insert a block from a template into a page
    AddTemplate {
        /// Page id
        page: String,
        /// Template id
        template: String,
        /// Insert position (appends by default)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Insert a block combination into a page
    AddCombination {
        /// Page id
        page: String,
        /// Combination id
        combination: String,
        /// Insert position (appends by default)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Show the block tree of a page
    List {
        /// Page id
        page: String,
    },

    /// Remove a block (and its children) from a page
    Remove {
        /// Page id
        page: String,
        /// Block id
        block_id: String,
    },
}

pub fn block(args: BlockArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    match args.command {
        BlockCommand::Templates { search } => {
            let session = EditSession::new(config.editor.clone());
            let term = format!("template {}", search.unwrap_or_default());
            print_results(session.library().search(&term));
        }
        BlockCommand::Combinations { search } => {
            let session = EditSession::new(config.editor.clone());
            print_results(session.library().search(&search.unwrap_or_default()));
        }
        BlockCommand::AddTemplate { page, template, index } => {
            let mut session = open_page(&config, cwd, &page)?;
            let id = session.insert_template(&template, index)?;
            println!("  {} Inserted {} as {}", "✓".green(), template, id.bright_white());
            close_session(session, &config, cwd)?;
        }
        BlockCommand::AddCombination {
            page,
            combination,
            index,
        } => {
            let mut session = open_page(&config, cwd, &page)?;
            let ids = session.insert_combination(&combination, index)?;
            if ids.is_empty() {
                println!("{} Unknown combination {}, nothing inserted", "⚠️".yellow(), combination);
                return Ok(());
            }
            for id in &ids {
                println!("  {} Inserted {}", "✓".green(), id.bright_white());
            }
            close_session(session, &config, cwd)?;
        }
        BlockCommand::List { page } => {
            let session = open_page(&config, cwd, &page)?;
            let blocks = session.blocks();
            println!(
                "{} ({} blocks)",
                page.bright_blue().bold(),
                count_blocks(blocks)
            );
            print_tree(blocks, 1);
        }
        BlockCommand::Remove { page, block_id } => {
            let mut session = open_page(&config, cwd, &page)?;
            session.remove_block(&block_id)?;
            println!("  {} Removed {}", "✓".green(), block_id);
            close_session(session, &config, cwd)?;
        }
    }

    Ok(())
}

fn open_page(config: &Config, cwd: &str, page: &str) -> Result<EditSession> {
    let mut session = open_session(config, cwd)?;
    session.set_current_page(Some(page))?;
    Ok(session)
}

fn print_results(results: SearchResults<'_>) {
    if results.is_empty() {
        println!("{}", "No matches".yellow());
        return;
    }

    match results {
        SearchResults::Templates(groups) => {
            for (category, templates) in groups {
                println!("{}", category.bright_blue().bold());
                for template in templates {
                    println!(
                        "  {:<12} {}",
                        template.id.bright_white(),
                        template.description.dimmed()
                    );
                }
            }
        }
        SearchResults::Combinations(groups) => {
            for (category, combinations) in groups {
                println!("{}", category.bright_blue().bold());
                for combination in combinations {
                    println!(
                        "  {:<14} {}",
                        combination.id.bright_white(),
                        combination.description.dimmed()
                    );
                }
            }
        }
    }
}

fn print_tree(blocks: &[Block], depth: usize) {
    for block in blocks {
        let preview = match &block.content {
            BlockContent::Text(text) => format!("{:?}", truncate(text, 40)),
            _ => String::new(),
        };
        println!(
            "{}{} {} {}",
            "  ".repeat(depth),
            block.kind.tag().bright_white(),
            block.id.dimmed(),
            preview
        );
        if let Some(children) = block.children() {
            print_tree(children, depth + 1);
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}
