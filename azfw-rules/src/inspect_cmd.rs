use anyhow::{Context, Result};
use azfw_rules::hierarchy::build_hierarchy;
use azfw_rules::inspect::{render_summary, render_tree, summarize};
use azfw_rules::row::rows_from_table;
use csv_guard_core::parse_file;

use crate::cli::{InspectArgs, OutputFormat};

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let table = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let rows = rows_from_table(&table);
    let groups = build_hierarchy(&rows)
        .with_context(|| format!("failed to build hierarchy from {}", args.file.display()))?;

    match args.format {
        OutputFormat::Text => {
            println!("{}", render_tree(&groups, args.depth));
            println!("{}", render_summary(summarize(&groups)));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
    }

    Ok(())
}
