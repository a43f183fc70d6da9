use super::load_site;
use crate::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use sitecraft_model::Theme;

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the theme as CSS custom properties
    Vars {
        /// Use the default theme instead of the site's
        #[arg(long)]
        default: bool,
    },
}

pub fn theme(args: ThemeArgs, cwd: &str) -> Result<()> {
    match args.command {
        ThemeCommand::Vars { default } => {
            let theme = if default {
                Theme::default()
            } else {
                let config = Config::load(cwd)?;
                load_site(&config.get_site_path(cwd))?.theme
            };

            println!("{}", format!("/* {} */", theme.name).dimmed());
            println!(":root {{");
            for (name, value) in theme.css_variables() {
                println!("  {}: {};", name, value);
            }
            println!("}}");
        }
    }
    Ok(())
}
