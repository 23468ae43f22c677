use anyhow::{Context, Result};
use clap::Parser;
use epimon::{
    prelude::*,
    stats::{read_visits_from_path, LATEST_VISITS},
    utils::{render_hbars, render_vbars},
};
use log::*;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

/// Visit statistics and quick report from a CSV export.
#[derive(Parser, Debug)]
#[command(name = "stats")]
struct Cli {
    /// CSV file with an `id,visited_at,institution,patient,symptoms` header.
    visits: PathBuf,

    /// Role of the caller: Admin, Clinician or Analyst.
    #[arg(short, long, default_value = "Analyst")]
    role: Role,

    /// Institution of the caller. Restricts clinicians to their own visits.
    #[arg(short, long)]
    institution: Option<InstitutionId>,

    /// Number of recent visits listed in the report.
    #[arg(short = 'n', long, default_value_t = LATEST_VISITS)]
    latest: usize,

    /// Plot daily visits and category counts.
    #[arg(long)]
    plot: bool,

    #[arg(short, long)]
    verbose: bool,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    SimpleLogger::new().with_level(level).init()?;

    let visits = read_visits_from_path(&cli.visits)
        .with_context(|| format!("cannot load visits from {}", cli.visits.display()))?;
    let log: VisitLog = visits.into_iter().collect();

    let user = UserProfile::new("cli", cli.role, cli.institution);
    let scope = AccessScope::for_user(&user);
    if scope.is_none() {
        warn!("role {} without institution cannot see any visit", cli.role);
    }

    let result = statistics_for_user(&log, &user);
    println!("{}", result.to_json()?);

    let report = match scope {
        Some(scope) => QuickReport::from_source(&log, &scope, cli.latest),
        None => QuickReport::build(&[], cli.latest),
    };
    println!();
    print!("{}", report.render(|id| log.institution_name(id)));

    if cli.plot {
        let daily: Vec<Real> = result.daily_counts().iter().map(|c| c.count as Real).collect();
        let categories: Vec<(&str, Real)> = result
            .category_counts()
            .iter()
            .map(|c| (c.category.label(), c.count as Real))
            .collect();
        eprintln!("Visits per day");
        eprint!("{}", render_vbars(&daily, 10, 80));
        eprintln!("Symptom categories");
        eprint!("{}", render_hbars(&categories, 40));
    }
    return Ok(());
}
