//! DurianTrack - durian orchard record keeper
//!
//! A CLI tool for tracking trees, growth measurements, treatments,
//! harvests, and scheduled tasks, with analytics and reports derived
//! from the records.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad input, unknown tree, data file failure, etc.)

mod analytics;
mod cli;
mod config;
mod i18n;
mod models;
mod report;
mod schedule;
mod store;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use cli::{Args, Command, OutputFormat, RecordCommand, TaskCommand};
use config::Config;
use models::{
    FertilizerRecord, GrowthRecord, HarvestRecord, IrrigationRecord, PestRecord, TaskSchedule,
    TaskState, Tree,
};
use schedule::{classify_for_list, ListStatus};
use std::path::{Path, PathBuf};
use store::{FarmStore, JsonStore};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    init_logging(&args);
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Command failed: {}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            debug!("Loaded default config from .duriantrack.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    if let Command::Init = args.command {
        return handle_init(&config);
    }

    let data_path = PathBuf::from(&config.general.data_file);
    let mut store = JsonStore::open(&data_path)?;
    let today = Local::now().date_naive();

    match args.command {
        Command::Init => unreachable!("handled above"),
        Command::AddFarm(farm_args) => handle_add_farm(&mut store, farm_args),
        Command::AddBlock(block_args) => handle_add_block(&mut store, block_args),
        Command::AddTree(tree_args) => handle_add_tree(&mut store, tree_args),
        Command::EditTree(edit_args) => handle_edit_tree(&mut store, edit_args),
        Command::RemoveTree { code } => handle_remove_tree(&mut store, &code),
        Command::Trees {
            variety,
            status,
            block,
        } => handle_list_trees(&store, variety, status, block, today),
        Command::Record(record) => handle_record(&mut store, record, today),
        Command::Task(task) => handle_task(&mut store, task, today),
        Command::Analytics { json } => handle_analytics(&store, &config, json, today),
        Command::Report { output, format } => {
            handle_report(&store, &config, output, format, today)
        }
        Command::Export { what, output } => handle_export(&store, what, output),
    }
}

/// Handle `init`: write a default config and an empty data file.
fn handle_init(config: &Config) -> Result<()> {
    let config_path = Path::new(".duriantrack.toml");
    if config_path.exists() {
        println!("⚠️  .duriantrack.toml already exists, leaving it alone.");
    } else {
        std::fs::write(config_path, Config::default_toml())
            .context("Failed to write .duriantrack.toml")?;
        println!("✅ Created .duriantrack.toml with default settings.");
    }

    let data_path = PathBuf::from(&config.general.data_file);
    if data_path.exists() {
        println!("⚠️  {} already exists, leaving it alone.", data_path.display());
    } else {
        let mut store = JsonStore::open(&data_path)?;
        store.commit()?;
        println!("✅ Created empty data file: {}", data_path.display());
    }

    Ok(())
}

fn handle_add_farm(store: &mut JsonStore, args: cli::AddFarmArgs) -> Result<()> {
    let id = store.data().next_id("farm");
    store.data_mut().farms.push(models::Farm {
        id: id.clone(),
        name: args.name.clone(),
        village: args.village,
        district: args.district,
        province: args.province,
        elevation: args.elevation,
    });
    store.commit()?;
    println!("✅ Added farm {} ({})", args.name, id);
    Ok(())
}

fn handle_add_block(store: &mut JsonStore, args: cli::AddBlockArgs) -> Result<()> {
    let farm_id = match args.farm {
        Some(ref name) => {
            store
                .data()
                .farms
                .iter()
                .find(|f| f.name == *name)
                .map(|f| f.id.clone())
                .with_context(|| format!("No farm named '{}'", name))?
        }
        None => only_farm_id(store)?,
    };

    let id = store.data().next_id("block");
    store.data_mut().blocks.push(models::Block {
        id: id.clone(),
        farm_id,
        name: args.name.clone(),
    });
    store.commit()?;
    println!("✅ Added block {} ({})", args.name, id);
    Ok(())
}

fn handle_add_tree(store: &mut JsonStore, args: cli::AddTreeArgs) -> Result<()> {
    if store.data().find_tree_by_code(&args.code).is_some() {
        bail!("A tree with code '{}' already exists", args.code);
    }

    let farm_id = only_farm_id(store)?;
    let block_id = match args.block {
        Some(ref name) => Some(resolve_block_id(store, name)?),
        None => None,
    };

    let id = store.data().next_id("tree");
    store.data_mut().trees.push(Tree {
        id: id.clone(),
        tree_code: args.code.clone(),
        farm_id,
        block_id,
        variety: args.variety,
        variety_other: args.variety_other,
        planting_date: args.planted,
        rootstock_type: args.rootstock,
        row_spacing: args.row_spacing,
        tree_spacing: args.tree_spacing,
        status: args.status,
        gps_lat: args.lat,
        gps_lng: args.lng,
        notes: args.notes,
    });
    store.commit()?;
    println!("✅ Added tree {} ({})", args.code, id);
    Ok(())
}

/// Handle `edit-tree`: apply only the fields given on the command line.
fn handle_edit_tree(store: &mut JsonStore, args: cli::EditTreeArgs) -> Result<()> {
    let block_id = match args.block {
        Some(ref name) => Some(resolve_block_id(store, name)?),
        None => None,
    };

    let tree = store
        .data_mut()
        .find_tree_by_code_mut(&args.code)
        .with_context(|| format!("No tree with code '{}'", args.code))?;

    if let Some(variety) = args.variety {
        tree.variety = variety;
        if variety != models::Variety::Other {
            tree.variety_other = None;
        }
    }
    if args.variety_other.is_some() {
        tree.variety_other = args.variety_other;
    }
    if block_id.is_some() {
        tree.block_id = block_id;
    }
    if let Some(planted) = args.planted {
        tree.planting_date = Some(planted);
    }
    if args.rootstock.is_some() {
        tree.rootstock_type = args.rootstock;
    }
    if args.row_spacing.is_some() {
        tree.row_spacing = args.row_spacing;
    }
    if args.tree_spacing.is_some() {
        tree.tree_spacing = args.tree_spacing;
    }
    if let Some(status) = args.status {
        tree.status = status;
    }
    if args.lat.is_some() {
        tree.gps_lat = args.lat;
    }
    if args.lng.is_some() {
        tree.gps_lng = args.lng;
    }
    if let Some(notes) = args.notes {
        tree.notes = notes;
    }

    store.commit()?;
    println!("✅ Updated tree {}", args.code);
    Ok(())
}

/// Handle `remove-tree`: delete the tree and everything referencing it.
fn handle_remove_tree(store: &mut JsonStore, code: &str) -> Result<()> {
    let tree_id = resolve_tree_id(store, code)?;
    let removed = store
        .data_mut()
        .remove_tree(&tree_id)
        .with_context(|| format!("No tree with code '{}'", code))?;
    store.commit()?;
    println!("✅ Removed tree {} and {} of its records", code, removed);
    Ok(())
}

fn handle_list_trees(
    store: &JsonStore,
    variety: Option<models::Variety>,
    status: Option<models::TreeStatus>,
    block: Option<String>,
    today: NaiveDate,
) -> Result<()> {
    let data = store.data();
    let block_id = match block {
        Some(ref name) => Some(resolve_block_id(store, name)?),
        None => None,
    };

    let trees: Vec<&Tree> = data
        .trees
        .iter()
        .filter(|t| variety.map_or(true, |v| t.variety == v))
        .filter(|t| status.map_or(true, |s| t.status == s))
        .filter(|t| {
            block_id
                .as_deref()
                .map_or(true, |b| t.block_id.as_deref() == Some(b))
        })
        .collect();

    if trees.is_empty() {
        println!("No trees found.");
        return Ok(());
    }

    println!("🌳 {} trees:\n", trees.len());
    for tree in trees {
        let block_name = tree
            .block_id
            .as_deref()
            .and_then(|id| data.find_block(id))
            .map(|b| b.name.as_str())
            .unwrap_or("-");
        let age = tree
            .age_months(today)
            .map(|m| format!("{:.1} y", m as f64 / 12.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:<10} {:<16} {:<8} block: {:<10} age: {}",
            tree.tree_code,
            tree.variety_name(),
            tree.status.to_string(),
            block_name,
            age,
        );
    }

    Ok(())
}

/// Handle `record *`: append one activity record to a tree.
fn handle_record(store: &mut JsonStore, record: RecordCommand, today: NaiveDate) -> Result<()> {
    match record {
        RecordCommand::Growth(args) => {
            let tree_id = resolve_tree_id(store, &args.tree)?;
            store.data_mut().growth_records.push(GrowthRecord {
                tree_id,
                record_date: args.date.unwrap_or(today),
                height_m: args.height,
                trunk_diameter_cm: args.diameter,
                canopy_diameter_m: args.canopy,
                growth_stage: args.stage,
                vigor_score: args.vigor,
                photos: args.photos,
                notes: args.notes,
            });
            store.commit()?;
            println!("✅ Recorded growth for {}", args.tree);
        }
        RecordCommand::Fertilizer(args) => {
            let tree_id = resolve_tree_id(store, &args.tree)?;
            let (farm_id, block_id) = tree_location(store, &tree_id);
            store.data_mut().fertilizer_records.push(FertilizerRecord {
                tree_id,
                block_id,
                farm_id,
                record_date: args.date.unwrap_or(today),
                fertilizer_type: args.fertilizer,
                amount_per_tree: args.amount,
                amount_unit: args.unit,
                method: args.method,
                soil_ph: args.soil_ph,
                soil_ec: args.soil_ec,
                notes: args.notes,
            });
            store.commit()?;
            println!("✅ Recorded fertilizer application for {}", args.tree);
        }
        RecordCommand::Irrigation(args) => {
            let tree_id = resolve_tree_id(store, &args.tree)?;
            let (farm_id, block_id) = tree_location(store, &tree_id);
            store.data_mut().irrigation_records.push(IrrigationRecord {
                tree_id,
                block_id,
                farm_id,
                record_date: args.date.unwrap_or(today),
                irrigation_method: args.method,
                duration_minutes: args.minutes,
                volume_liters: args.liters,
                weather: args.weather,
                notes: args.notes,
            });
            store.commit()?;
            println!("✅ Recorded irrigation for {}", args.tree);
        }
        RecordCommand::Pest(args) => {
            let tree_id = resolve_tree_id(store, &args.tree)?;
            let (farm_id, _) = tree_location(store, &tree_id);
            store.data_mut().pest_records.push(PestRecord {
                tree_id,
                farm_id,
                record_date: args.date.unwrap_or(today),
                pest_type: args.pest,
                pest_other: args.pest_other,
                severity: args.severity,
                treatment_product: args.treatment,
                photos: args.photos,
                notes: args.notes,
            });
            store.commit()?;
            println!("✅ Recorded pest observation for {}", args.tree);
        }
        RecordCommand::Harvest(args) => {
            let tree_id = resolve_tree_id(store, &args.tree)?;
            let (farm_id, _) = tree_location(store, &tree_id);
            let total_revenue = HarvestRecord::derive_revenue(args.weight, args.price);
            store.data_mut().harvest_records.push(HarvestRecord {
                tree_id,
                farm_id,
                record_date: args.date.unwrap_or(today),
                stage: args.stage,
                estimated_fruit_count: args.estimated,
                harvested_fruit_count: args.harvested,
                total_weight_kg: args.weight,
                grade_a_count: args.grade_a,
                grade_b_count: args.grade_b,
                grade_c_count: args.grade_c,
                price_per_kg: args.price,
                total_revenue,
                notes: args.notes,
            });
            store.commit()?;
            match total_revenue {
                Some(revenue) => {
                    println!("✅ Recorded harvest for {} (revenue ${:.2})", args.tree, revenue)
                }
                None => println!("✅ Recorded harvest for {}", args.tree),
            }
        }
    }

    Ok(())
}

/// Handle `task *`.
fn handle_task(store: &mut JsonStore, command: TaskCommand, today: NaiveDate) -> Result<()> {
    match command {
        TaskCommand::Add(args) => {
            let tree_id = match args.tree {
                Some(ref code) => Some(resolve_tree_id(store, code)?),
                None => None,
            };
            let block_id = match args.block {
                Some(ref name) => Some(resolve_block_id(store, name)?),
                None => None,
            };

            let id = store.data().next_id("task");
            store.data_mut().tasks.push(TaskSchedule {
                id: id.clone(),
                farm_id: None,
                tree_id,
                block_id,
                task_type: args.task_type,
                title: args.title.clone(),
                description: args.description,
                due_date: args.due,
                repeat_interval_days: args.repeat_days.filter(|d| *d > 0),
                status: TaskState::Pending,
                completed_date: None,
            });
            store.commit()?;
            println!("✅ Scheduled task {} ({}) due {}", args.title, id, args.due);
        }
        TaskCommand::List { all } => {
            let counts = schedule::task_counts(&store.data().tasks, today);
            println!(
                "📋 Tasks: {} overdue, {} pending, {} completed\n",
                counts.overdue, counts.pending, counts.completed
            );

            let mut tasks: Vec<&TaskSchedule> = store
                .data()
                .tasks
                .iter()
                .filter(|t| all || t.is_pending())
                .collect();
            tasks.sort_by_key(|t| t.due_date);

            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in tasks {
                let status = classify_for_list(task, today);
                let marker = match status {
                    ListStatus::Completed => "✔",
                    ListStatus::Overdue => "⚠",
                    _ => "·",
                };
                println!(
                    "   {} [{:<9}] {:<10} {} - {} ({})",
                    marker, status.to_string(), task.id, task.due_date, task.title, task.task_type
                );
            }
        }
        TaskCommand::Done { id } => {
            let task = store
                .data_mut()
                .find_task_mut(&id)
                .with_context(|| format!("No task with id '{}'", id))?;
            if task.is_completed() {
                bail!("Task '{}' is already completed", id);
            }

            schedule::mark_completed(task, today);
            let follow_up_due = schedule::next_due_date(task);
            let title = task.title.clone();

            if let Some(due) = follow_up_due {
                let template = task.clone();
                let next_id = store.data().next_id("task");
                store.data_mut().tasks.push(TaskSchedule {
                    id: next_id.clone(),
                    due_date: due,
                    status: TaskState::Pending,
                    completed_date: None,
                    ..template
                });
                println!("🔁 Scheduled next occurrence {} due {}", next_id, due);
            }

            store.commit()?;
            println!("✅ Completed task: {}", title);
        }
        TaskCommand::Calendar { year, month } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            print_calendar(store, year, month, today);
        }
    }

    Ok(())
}

/// Render one month of the task calendar.
fn print_calendar(store: &JsonStore, year: i32, month: u32, today: NaiveDate) {
    let days = schedule::calendar_days(year, month);
    if days.is_empty() {
        println!("Invalid month.");
        return;
    }

    println!("📅 {}-{:02}\n", year, month);
    println!("    Su  Mo  Tu  We  Th  Fr  Sa");

    for week in days.chunks(7) {
        let mut line = String::from("   ");
        for day in week {
            let due = schedule::tasks_due_on(&store.data().tasks, *day);
            let marker = if due.iter().any(|t| t.is_pending() && t.due_date < today) {
                '!'
            } else if due.iter().any(|t| t.is_pending()) {
                '*'
            } else {
                ' '
            };
            if day.month() == month {
                line.push_str(&format!("{:>3}{}", day.day(), marker));
            } else {
                line.push_str("    ");
            }
        }
        println!("{}", line);
    }
    println!("\n   * pending   ! overdue");
}

/// Handle `analytics`: print derived summaries.
fn handle_analytics(store: &JsonStore, config: &Config, json: bool, today: NaiveDate) -> Result<()> {
    let farm_report = report::build_report(store.data(), &config.report, today);

    if json {
        println!("{}", report::generate_json_report(&farm_report)?);
        return Ok(());
    }

    let strings = config.general.locale.strings();
    let stats = &farm_report.stats;

    println!("📊 {}", strings.farm_overview);
    println!("   {}: {}", strings.total_trees, farm_report.metadata.tree_count);
    println!(
        "   {}: {} {}",
        strings.average_age, farm_report.metadata.average_age_years, strings.years
    );
    println!("   {}: {} kg", strings.total_harvest, stats.total_yield);
    println!("   {}: ${}", strings.total_revenue, stats.total_revenue);
    println!(
        "   {}: {} kg",
        strings.avg_yield_per_tree, stats.avg_yield_per_tree
    );

    if !farm_report.yield_by_variety.is_empty() {
        println!("\n🍈 {} {}:", strings.total_harvest, strings.per_variety);
        for entry in &farm_report.yield_by_variety {
            println!(
                "   {:<16} total {:>8} kg   avg {:>6} kg",
                entry.name, entry.total, entry.average
            );
        }
    }

    if !farm_report.yield_by_year.is_empty() {
        println!("\n📈 {} {}:", strings.total_harvest, strings.per_year);
        for entry in &farm_report.yield_by_year {
            println!("   {}  {:>8} kg", entry.year, entry.total);
        }
    }

    if !farm_report.growth_trend.is_empty() {
        println!("\n🌱 {}:", strings.growth_trend);
        for point in &farm_report.growth_trend {
            println!(
                "   {:<9} height {:>5} m   diameter {:>5} cm",
                point.month, point.avg_height, point.avg_diameter
            );
        }
    }

    Ok(())
}

/// Handle `report`: generate and save a report file.
fn handle_report(
    store: &JsonStore,
    config: &Config,
    output: Option<PathBuf>,
    format: OutputFormat,
    today: NaiveDate,
) -> Result<()> {
    let farm_report = report::build_report(store.data(), &config.report, today);

    let content = match format {
        OutputFormat::Markdown => {
            report::generate_markdown_report(&farm_report, config.general.locale.strings())
        }
        OutputFormat::Json => report::generate_json_report(&farm_report)?,
    };

    let output = output.unwrap_or_else(|| PathBuf::from(&config.report.output));
    std::fs::write(&output, &content)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    println!("✅ Report saved to: {}", output.display());
    Ok(())
}

/// Handle `export`: write one collection as CSV.
fn handle_export(
    store: &JsonStore,
    what: cli::ExportKind,
    output: Option<PathBuf>,
) -> Result<()> {
    let (content, default_name) = match what {
        cli::ExportKind::Trees => (report::export_trees_csv(store.data()), "trees_export.csv"),
        cli::ExportKind::Harvest => (
            report::export_harvest_csv(store.data()),
            "harvest_export.csv",
        ),
        cli::ExportKind::Farms => (report::export_farms_csv(store.data()), "farm_summary.csv"),
    };

    let output = output.unwrap_or_else(|| PathBuf::from(default_name));
    std::fs::write(&output, &content)
        .with_context(|| format!("Failed to write export to {}", output.display()))?;

    println!("✅ Export saved to: {}", output.display());
    Ok(())
}

/// Resolve a tree code to its id.
fn resolve_tree_id(store: &JsonStore, code: &str) -> Result<String> {
    store
        .data()
        .find_tree_by_code(code)
        .map(|t| t.id.clone())
        .with_context(|| format!("No tree with code '{}'", code))
}

/// Resolve a block name to its id.
fn resolve_block_id(store: &JsonStore, name: &str) -> Result<String> {
    store
        .data()
        .blocks
        .iter()
        .find(|b| b.name == name)
        .map(|b| b.id.clone())
        .with_context(|| format!("No block named '{}'", name))
}

/// Farm and block of a tree, for denormalizing onto records.
fn tree_location(store: &JsonStore, tree_id: &str) -> (Option<String>, Option<String>) {
    match store.data().find_tree(tree_id) {
        Some(tree) => (Some(tree.farm_id.clone()), tree.block_id.clone()),
        None => (None, None),
    }
}

/// The single registered farm, required before trees can be added.
fn only_farm_id(store: &JsonStore) -> Result<String> {
    let farms = &store.data().farms;
    match farms.len() {
        0 => bail!("No farm registered yet; run `duriantrack add-farm` first"),
        _ => Ok(farms[0].id.clone()),
    }
}
