//! # Command execution
//!
//! One function per subcommand. Read-only commands open the ledger without
//! taking its lock; commands that record something hold the lock until they
//! return.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use takeoff_core::calculations::{CalculationRecord, RecordId, SystemClock};
use takeoff_core::elements::{Element, ElementType};
use takeoff_core::errors::CalcError;
use takeoff_core::estimator::Estimator;
use takeoff_core::pdf::PdfReport;
use takeoff_core::project::{Project, ProjectId};
use takeoff_core::report::{ReportHeader, ReportRenderer, TextReport};
use takeoff_core::store::{CalculationStore, LedgerStore, ProjectStore};
use tracing::debug;

use crate::cli::{
    Cli, Commands, EstimateArgs, ProjectAddArgs, ProjectArg, ProjectCommand, ReportArgs, SettingsArgs,
};

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Session {
        ledger: &cli.ledger,
        user: &cli.user,
        json: cli.json,
    };
    match cli.command {
        Commands::Project(ProjectCommand::Add(args)) => project_add(&ctx, args),
        Commands::Project(ProjectCommand::List) => project_list(&ctx),
        Commands::Estimate(args) => estimate(&ctx, args),
        Commands::History(args) => history(&ctx, args),
        Commands::Bom(args) => bom(&ctx, args),
        Commands::Report(args) => report(&ctx, args),
        Commands::Types => types(&ctx),
        Commands::Settings(args) => settings(&ctx, args),
    }
}

struct Session<'a> {
    ledger: &'a Path,
    user: &'a str,
    json: bool,
}

impl Session<'_> {
    fn open_for_write(&self) -> Result<LedgerStore> {
        Ok(LedgerStore::open(self.ledger, self.user)?)
    }

    fn open_for_read(&self) -> Result<LedgerStore> {
        let store = LedgerStore::open_read_only(self.ledger)?;
        if let Some(holder) = store.held_by() {
            eprintln!(
                "note: {} is being edited by {} on {} since {}; showing the last saved state",
                self.ledger.display(),
                holder.user_id,
                holder.machine,
                holder.locked_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
        Ok(store)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve a project given by id or by exact name.
fn resolve_project(store: &impl ProjectStore, key: &str) -> Result<ProjectId> {
    if let Ok(id) = key.parse::<ProjectId>() {
        return Ok(id);
    }
    let mut matches = store.list()?.into_iter().filter(|p| p.meta.name == key);
    match (matches.next(), matches.next()) {
        (Some(project), None) => Ok(project.id),
        (Some(_), Some(_)) => Err(CalcError::configuration(format!(
            "more than one project is named '{}'; use its id",
            key
        ))
        .into()),
        (None, _) => Err(CalcError::project_not_found(key).into()),
    }
}

fn project_add(ctx: &Session, args: ProjectAddArgs) -> Result<()> {
    let mut store = ctx.open_for_write()?;
    let project = Project::new(args.name, args.client, args.address).with_engineer(args.engineer);
    let id = store.insert(project.clone())?;
    if ctx.json {
        print_json(&project)
    } else {
        println!("Added project '{}' ({})", project.meta.name, id);
        Ok(())
    }
}

fn project_list(ctx: &Session) -> Result<()> {
    if !ctx.ledger.exists() {
        debug!(path = %ctx.ledger.display(), "no ledger yet");
        return if ctx.json {
            print_json(&Vec::<Project>::new())
        } else {
            println!("No projects in {}", ctx.ledger.display());
            Ok(())
        };
    }
    let store = ctx.open_for_read()?;
    let projects = store.list()?;
    if ctx.json {
        return print_json(&projects);
    }
    if projects.is_empty() {
        println!("No projects in {}", ctx.ledger.display());
    }
    for p in &projects {
        println!(
            "{}  {:<24} {:<16} {}",
            p.id, p.meta.name, p.meta.client, p.meta.address
        );
    }
    Ok(())
}

fn estimate(ctx: &Session, args: EstimateArgs) -> Result<()> {
    let element = Element::try_from(args.element_input())?;

    let store = if args.dry_run {
        ctx.open_for_read()?
    } else {
        ctx.open_for_write()?
    };
    let project_id = resolve_project(&store, &args.project)?;
    let settings = store.settings();
    let strictness = args.strictness_or(settings.strictness);
    let project = store.get(project_id).ok();

    let mut estimator = Estimator::new(store, strictness, SystemClock);
    let record = if args.dry_run {
        estimator.preview(project_id, element)?
    } else {
        estimator.estimate(project_id, element)?
    };

    if ctx.json {
        return print_json(&record);
    }
    let mut report = TextReport::new(settings.report_decimals);
    if let Some(project) = &project {
        report = report.with_header(ReportHeader::from(project));
    }
    print!("{}", report.render_string(&record));
    if args.dry_run {
        println!("\n(dry run, not recorded)");
    }
    Ok(())
}

fn history(ctx: &Session, args: ProjectArg) -> Result<()> {
    let store = ctx.open_for_read()?;
    let project_id = resolve_project(&store, &args.project)?;
    let settings = store.settings();
    let estimator = Estimator::new(store, settings.strictness, SystemClock);
    let records = estimator.history(project_id)?;

    if ctx.json {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("No estimates recorded");
    }
    for r in &records {
        print_history_line(r, settings.report_decimals);
    }
    Ok(())
}

fn print_history_line(record: &CalculationRecord, decimals: usize) {
    let id = record.id.map(|id| id.to_string()).unwrap_or_default();
    println!(
        "{}  {}  {:<30} {:>10.*} m³",
        record.date.format("%Y-%m-%d %H:%M"),
        id,
        record.element.element_type.label(),
        decimals,
        record.computed_volume
    );
}

fn bom(ctx: &Session, args: ProjectArg) -> Result<()> {
    let store = ctx.open_for_read()?;
    let project_id = resolve_project(&store, &args.project)?;
    let settings = store.settings();
    let estimator = Estimator::new(store, settings.strictness, SystemClock);
    let totals = estimator.bill_of_materials(project_id)?;

    if ctx.json {
        return print_json(&totals);
    }
    if totals.is_empty() {
        println!("No materials recorded");
    }
    for m in &totals {
        println!("{:<10} {:>14} {}", m.kind.name(), m.format_amount(settings.report_decimals), m.unit);
    }
    Ok(())
}

fn report(ctx: &Session, args: ReportArgs) -> Result<()> {
    let record_id: RecordId = args.record.parse()?;
    let store = ctx.open_for_read()?;
    let record = store.get_record(record_id)?;
    let decimals = store.settings().report_decimals;
    let header = store.get(record.project_id).ok().map(|p| ReportHeader::from(&p));

    let renderer: Box<dyn ReportRenderer> = match &args.pdf {
        Some(_) => Box::new(header.into_iter().fold(PdfReport::new(decimals), PdfReport::with_header)),
        None => Box::new(header.into_iter().fold(TextReport::new(decimals), TextReport::with_header)),
    };
    let bytes = renderer.render(&record)?;

    match args.pdf {
        Some(out) => {
            fs::write(&out, bytes).with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote {} report to {}", renderer.format(), out.display());
        }
        None => io::stdout()
            .write_all(&bytes)
            .context("writing report to stdout")?,
    }
    Ok(())
}

fn settings(ctx: &Session, args: SettingsArgs) -> Result<()> {
    let current = if args.is_update() {
        let mut store = ctx.open_for_write()?;
        let next = args.apply(store.settings());
        store.set_settings(next)?;
        next
    } else {
        ctx.open_for_read()?.settings()
    };

    if ctx.json {
        return print_json(&current);
    }
    println!("strictness       {}", current.strictness);
    println!("report-decimals  {}", current.report_decimals);
    Ok(())
}

#[derive(Serialize)]
struct TypeInfo {
    code: &'static str,
    label: &'static str,
    required: Vec<&'static str>,
}

fn types(ctx: &Session) -> Result<()> {
    let infos: Vec<TypeInfo> = ElementType::ALL
        .iter()
        .map(|t| TypeInfo {
            code: t.code(),
            label: t.label(),
            required: t.required_dimensions().iter().map(|d| d.name()).collect(),
        })
        .collect();

    if ctx.json {
        return print_json(&infos);
    }
    for info in &infos {
        println!("{:<28} {:<30} {}", info.code, info.label, info.required.join(", "));
    }
    Ok(())
}
