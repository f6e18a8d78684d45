//! Sample host for the grid engine: filters and sorts JSON records.

mod args;
mod columns;
mod error;

use std::fs::File;
use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use quickgrid_lib::model::ColumnId;
use quickgrid_lib::{ChannelListener, Grid, GridConfig, QueryOptions};
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::args::Args;
use crate::columns::FilterSpec;
use crate::columns::Record;
use crate::columns::parse_column;
use crate::columns::parse_filter;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Args) -> Result<(), CliError> {
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    match &args.log_file {
        Some(path) => WriteLogger::init(level, Config::default(), File::create(path)?)?,
        None => TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?,
    }
    Ok(())
}

async fn run(args: Args) -> Result<(), CliError> {
    let records = load_records(&args)?;
    let options = load_options(&args)?;

    let (listener, mut rx) = ChannelListener::new();
    let watcher = tokio::spawn(async move {
        let mut changes = 0usize;
        while let Some(query) = rx.recv().await {
            changes += 1;
            log::debug!("Change {}: {:?}", changes, query);
        }
        changes
    });

    let config = match args.max_filters {
        Some(max) => GridConfig::new().with_default_max_filters(max),
        None => GridConfig::new(),
    };
    let mut grid = Grid::with_config(config).with_listener(listener);
    for spec in &args.columns {
        grid.register_column(parse_column(spec, args.multi_sort, args.max_filters)?)?;
    }

    for column in &args.or_columns {
        grid.toggle_filter_mode(column.as_str())?;
    }
    for (column, clauses) in group_filters(&args.filters)? {
        let clauses: Vec<_> = clauses
            .iter()
            .map(|c| (c.operator, c.value.as_deref()))
            .collect();
        grid.apply_filters(column, &clauses)?;
    }
    for column in &args.sorts {
        grid.toggle_sort(column.as_str())?;
    }

    let query = grid.snapshot();
    drop(grid);
    let changes = watcher.await.unwrap_or_default();
    log::info!("{} grid changes", changes);

    if args.odata {
        println!("{}", query.to_odata(options.combinator).to_query_string());
        return Ok(());
    }
    if args.explain {
        match query.combine_predicate_for_in_memory(&options) {
            Some(lambda) => println!("# {}", lambda),
            None => println!("# no filter"),
        }
        for (step, column) in query.sort_steps() {
            println!("# {} {}", step, column);
        }
    }

    let total = records.len();
    let view = query.apply_all(records, &options);
    for record in &view {
        println!("{}", serde_json::to_string(record)?);
    }
    log::info!("{} of {} records shown", view.len(), total);
    Ok(())
}

fn load_records(args: &Args) -> Result<Vec<Record>, CliError> {
    let mut raw = String::new();
    match &args.data {
        Some(path) => File::open(path)?.read_to_string(&mut raw)?,
        None => std::io::stdin().read_to_string(&mut raw)?,
    };
    let json: serde_json::Value = serde_json::from_str(&raw)?;
    let serde_json::Value::Array(items) = json else {
        return Err(CliError::NotRecords);
    };
    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Object(record) => Ok(record),
            _ => Err(CliError::NotRecords),
        })
        .collect()
}

fn load_options(args: &Args) -> Result<QueryOptions, CliError> {
    let mut options = match &args.options {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => QueryOptions::default(),
    };
    if args.exact {
        options = options.with_case_fold(false);
    }
    if args.null_default {
        options = options.with_null_default(true);
    }
    if let Some(combinator) = args.combinator {
        options = options.with_combinator(combinator.into());
    }
    Ok(options)
}

/// Groups filter specs by column, in first-seen order.
fn group_filters(specs: &[String]) -> Result<Vec<(ColumnId, Vec<FilterSpec>)>, CliError> {
    let mut groups: Vec<(ColumnId, Vec<FilterSpec>)> = Vec::new();
    for spec in specs {
        let spec = parse_filter(spec)?;
        let id = ColumnId::new(spec.column.as_str());
        match groups.iter_mut().find(|(column, _)| *column == id) {
            Some((_, clauses)) => clauses.push(spec),
            None => groups.push((id, vec![spec])),
        }
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_filters_keeps_order() {
        let specs = vec![
            "Age:gt:18".to_string(),
            "Name:contains:jo".to_string(),
            "Age:lt:65".to_string(),
        ];
        let groups = group_filters(&specs).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, ColumnId::new("Age"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, ColumnId::new("Name"));
    }
}
