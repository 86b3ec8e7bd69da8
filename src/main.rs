//! site-rename: Normalize content file names and keep a site consistent.
//!
//! Renames every page under the pages directory to kebab-case, rewrites the
//! markdown links and navigation entries pointing at them, migrates the
//! redirect table so published URLs keep working, and finally moves the files.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Commands, SiteArgs};
use colored::Colorize;
use dialoguer::Confirm;
use site_rename::{Config, Plan, Report, engine, scanner};

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Detect {
            site,
            json,
            verbose,
        } => cmd_detect(site, json, verbose),
        Commands::Apply {
            site,
            interactive,
            verbose,
        } => cmd_apply(site, interactive, verbose),
        Commands::Scan { site } => cmd_scan(site),
        Commands::Prefix { site } => cmd_prefix(site),
    }
}

fn load_config(site: SiteArgs) -> Result<Config> {
    site.into_config().context("Invalid site configuration")
}

fn build_plan(config: &Config, verbose: bool) -> Result<Plan> {
    if verbose {
        eprintln!(
            "{} Scanning {}",
            "info:".blue().bold(),
            config.resolve(&config.pages_dir).display()
        );
    }

    let plan = engine::plan(config).context("Failed to plan renames")?;

    if !plan.is_empty() && plan.redirects.is_none() {
        eprintln!(
            "{} No redirects file at {}; old URLs will not be redirected",
            "warn:".yellow().bold(),
            config.redirects_file.display()
        );
    }

    if verbose {
        let d = plan.report().diagnostics;
        eprintln!(
            "{} {} files scanned, {} to rename",
            "info:".blue().bold(),
            d.files_scanned,
            d.renames
        );
    }

    Ok(plan)
}

fn cmd_detect(site: SiteArgs, json_output: bool, verbose: bool) -> Result<()> {
    let config = load_config(site)?;
    let plan = build_plan(&config, verbose)?;
    let report = plan.report();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, false);
    }

    Ok(())
}

fn cmd_apply(site: SiteArgs, interactive: bool, verbose: bool) -> Result<()> {
    let config = load_config(site)?;
    let plan = build_plan(&config, verbose)?;

    if plan.is_empty() {
        println!("{} All files already follow the naming convention", "ok:".green().bold());
        return Ok(());
    }

    let report = plan.report();
    print_report(&report, !interactive);

    if interactive {
        let proceed = Confirm::new()
            .with_prompt("Apply these changes?")
            .default(false)
            .interact()?;
        if !proceed {
            println!("{} Nothing was changed", "info:".blue().bold());
            return Ok(());
        }
    }

    plan.apply(&config).context("Failed to apply renames")?;

    println!(
        "\n{} Renamed {} file(s), rewrote {} link(s)",
        "ok:".green().bold(),
        report.diagnostics.renames,
        report.diagnostics.links_rewritten
    );

    Ok(())
}

fn cmd_scan(site: SiteArgs) -> Result<()> {
    let config = load_config(site)?;
    let files = scanner::deployable_files(&config)?;

    println!("Would scan {} files:", files.len());
    for file in files {
        println!("  {}", file.display());
    }

    Ok(())
}

fn cmd_prefix(site: SiteArgs) -> Result<()> {
    let config = load_config(site)?;
    let prefix = config.path_prefix()?;
    println!("{prefix}");
    Ok(())
}

fn print_report(report: &Report, applying: bool) {
    if report.renames.is_empty() {
        println!("{} All files already follow the naming convention", "ok:".green().bold());
        return;
    }

    println!(
        "\n{} {} file(s):\n",
        if applying { "Renaming" } else { "Would rename" }.yellow().bold(),
        report.renames.len()
    );
    for rename in &report.renames {
        println!(
            "  {} {} {}",
            rename.from.display().to_string().red(),
            "->".dimmed(),
            rename.to.display().to_string().green()
        );
    }

    if !report.edits.is_empty() {
        println!(
            "\n{} references in {} file(s):\n",
            if applying { "Updating" } else { "Would update" }.yellow().bold(),
            report.edits.len()
        );
        for edit in &report.edits {
            println!(
                "  {} {}",
                edit.file.display(),
                format!("({} link(s))", edit.links).dimmed()
            );
        }
    }

    if let Some(redirects) = &report.redirects {
        println!(
            "\n{} {} -> {} redirect rule(s)",
            "Redirects:".bold(),
            redirects.before,
            redirects.after
        );
    }

    if !applying {
        println!("\n{} Use `site-rename apply` to make these changes", "hint:".cyan().bold());
    }
}
