use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

mod config;
mod core;
mod report;

use crate::config::Config;
use crate::core::{load_project, target_from, LoadOptions, Project, ScanOptions};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "incdeps",
    version,
    about = "Analyze large C/C++ code bases for #include dependency information"
)]
struct Cli {
    /// Source directory to analyze
    #[arg(long, value_name = "PATH", default_value = ".")]
    dir: PathBuf,

    /// Treat every folder holding code as a component
    #[arg(long)]
    infer: bool,

    /// Disable the trailing-include-guard scanner fast path
    #[arg(long)]
    full_scan: bool,

    /// File names to exclude from the analysis
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    ignore: Vec<String>,

    /// Components to remove from the analysis, by dotted name
    #[arg(long, value_name = "TARGET", value_delimiter = ',')]
    drop: Vec<String>,

    /// Code base size, complexity and cycle counts
    #[arg(long)]
    stats: bool,

    /// Print stats as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Direct dependencies cycling back to the given component
    #[arg(long, value_name = "TARGET")]
    cycles: Option<String>,

    /// Include statements that could refer to more than one header
    #[arg(long)]
    ambiguous: bool,

    /// Components and files out of the ordinary
    #[arg(long)]
    outliers: bool,

    /// All information on the given components
    #[arg(long, value_name = "TARGET")]
    info: Vec<String>,

    /// Incoming and outgoing links for the given components
    #[arg(long, value_name = "TARGET")]
    inout: Vec<String>,

    /// Files including the given file
    #[arg(long, value_name = "FILE")]
    usedby: Vec<String>,

    /// Shortest dependency chain between two components
    #[arg(long, value_names = ["FROM", "TO"], num_args = 2)]
    shortest: Vec<String>,

    /// Lines each header pulls in transitively, weighted by use
    #[arg(long)]
    includesize: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.dir);
    config.blacklist.extend(cli.ignore.iter().cloned());

    let wants_loc = cli.stats || cli.outliers || cli.includesize || !cli.info.is_empty();
    let options = LoadOptions {
        infer_components: cli.infer,
        with_loc: wants_loc,
        scan: ScanOptions {
            final_guard_fast_path: !cli.full_scan,
        },
        drops: cli.drop.clone(),
    };

    let start = Instant::now();
    let mut project = load_project(&cli.dir, &config, &options)?;
    println!(
        "Analyzed {} files in {:.2}s",
        project.file_count(),
        start.elapsed().as_secs_f64()
    );

    let mut ran_report = false;

    if cli.stats || cli.json {
        ran_report = true;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report::stats_json(&project))?);
        } else {
            report::print_stats(&project);
        }
    }
    if let Some(target) = &cli.cycles {
        ran_report = true;
        with_target(&project, target, |id| {
            report::print_cycles_for_target(&project, id)
        });
    }
    if cli.ambiguous {
        ran_report = true;
        report::print_ambiguous(&project);
    }
    if cli.outliers {
        ran_report = true;
        report::print_outliers(&config, &project);
    }
    for target in &cli.info {
        ran_report = true;
        with_target(&project, target, |id| {
            report::print_info_on_target(&project, id)
        });
    }
    for target in &cli.inout {
        ran_report = true;
        with_target(&project, target, |id| {
            report::print_links_for_target(&project, id)
        });
    }
    for path in &cli.usedby {
        ran_report = true;
        report::print_used_by(&project, path);
    }
    if let [from, to] = cli.shortest.as_slice() {
        ran_report = true;
        match (
            project.component_id(&target_from(from)),
            project.component_id(&target_from(to)),
        ) {
            (Some(a), Some(b)) => report::print_shortest(&project, a, b),
            (None, _) => println!("No such component {from}"),
            (_, None) => println!("No such component {to}"),
        }
    }
    if cli.includesize {
        ran_report = true;
        report::print_include_size(&mut project);
    }

    if !ran_report {
        report::print_stats(&project);
    }
    Ok(())
}

fn with_target(project: &Project, target: &str, f: impl FnOnce(crate::core::ComponentId)) {
    match project.component_id(&target_from(target)) {
        Some(id) => f(id),
        None => println!("No such component {target}"),
    }
}
