use anyhow::{bail, Context, Result};
use azfw_rules::profile::load_profile;
use azfw_rules::report::colorize_validate_text;
use azfw_rules::row::rows_from_table;
use azfw_rules::validate::{
    build_validate_report, render_validate_text, report_from_format_issues, ValidateReport,
};
use csv_guard_core::{parse_file, ParseError};

use crate::cli::{OutputFormat, ValidateArgs};

pub fn run_validate(args: ValidateArgs) -> Result<()> {
    let (profile, profile_source) =
        load_profile(args.profile.as_deref()).context("failed to load validation profile")?;
    let file = args.file.display().to_string();

    let table = match parse_file(&args.file) {
        Ok(table) => table,
        Err(ParseError::Format(issues)) => {
            // The format guard is fail-fast: misread field boundaries would
            // turn every semantic check into noise.
            let report = report_from_format_issues(&file, &profile_source, &issues);
            emit(&report, &args)?;
            bail!("validate failed: {} format error(s)", report.errors);
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", args.file.display()))
        }
    };

    let rows = rows_from_table(&table);
    let report = build_validate_report(&file, &profile_source, &table, &rows, &profile);
    emit(&report, &args)?;

    if report.errors > 0 {
        bail!("validate failed: {} error(s)", report.errors);
    }
    if args.strict && report.warnings > 0 {
        bail!(
            "validate failed in strict mode: {} warning(s)",
            report.warnings
        );
    }
    Ok(())
}

fn emit(report: &ValidateReport, args: &ValidateArgs) -> Result<()> {
    match args.format {
        OutputFormat::Text => println!(
            "{}",
            colorize_validate_text(&render_validate_text(report, args.strict, args.verbose))
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
