//! Tag and folder listing handlers.

use anyhow::Result;
use std::path::Path;

use super::load_index;
use crate::cli::output::{FolderListing, OutputFormat, TagListing, print_json};
use crate::cli::{FoldersArgs, TagsArgs};

pub fn handle_tags(args: &TagsArgs, vault_dir: &Path) -> Result<()> {
    let index = load_index(vault_dir)?;
    let listings: Vec<TagListing> = index
        .tags
        .iter()
        .map(|(name, count)| TagListing {
            name: name.clone(),
            count: *count,
        })
        .collect();

    match args.format {
        OutputFormat::Json => print_json(&listings),
        OutputFormat::Human => {
            if listings.is_empty() {
                println!("No tags found.");
                return Ok(());
            }
            for tag in &listings {
                println!("{:<30} {:>5}", tag.name, tag.count);
            }
            Ok(())
        }
    }
}

pub fn handle_folders(args: &FoldersArgs, vault_dir: &Path) -> Result<()> {
    let index = load_index(vault_dir)?;
    let listings: Vec<FolderListing> = index
        .folders
        .iter()
        .map(|(folder, count)| FolderListing {
            folder: folder.clone(),
            count: *count,
        })
        .collect();

    match args.format {
        OutputFormat::Json => print_json(&listings),
        OutputFormat::Human => {
            if listings.is_empty() {
                println!("No folders found.");
                return Ok(());
            }
            for folder in &listings {
                println!("{:<40} {:>5}", folder.folder, folder.count);
            }
            Ok(())
        }
    }
}
