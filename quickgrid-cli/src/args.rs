//! Command line arguments

use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;
use quickgrid_lib::query::LogicalOp;

#[derive(Debug, Parser)]
#[command(name = "quickgrid")]
#[command(about = "Filter and sort JSON records the way a data grid would", long_about = None)]
pub struct Args {
    /// JSON file holding an array of objects. Reads stdin when omitted.
    #[arg(long, env = "QUICKGRID_DATA")]
    pub data: Option<PathBuf>,

    /// Column as NAME=KIND, with `?` for nullable and `:A|B|C` for
    /// enumeration members (e.g. `Age=integer?`, `Status=enumeration:Open|Closed`).
    #[arg(long = "column", short = 'c', required = true)]
    pub columns: Vec<String>,

    /// Filter clause as COLUMN:OPERATOR[:VALUE]. Repeat a column for
    /// several clauses.
    #[arg(long = "filter", short = 'f')]
    pub filters: Vec<String>,

    /// Join this column's clauses with OR instead of AND.
    #[arg(long = "or-column")]
    pub or_columns: Vec<String>,

    /// Toggle sort on a column. Repeat to cycle the direction.
    #[arg(long = "sort", short = 's')]
    pub sorts: Vec<String>,

    /// Let sorted columns combine instead of replacing each other.
    #[arg(long)]
    pub multi_sort: bool,

    /// Upper bound of clauses per column.
    #[arg(long, env = "QUICKGRID_MAX_FILTERS")]
    pub max_filters: Option<usize>,

    /// JSON file with query options (`null_default`, `case_fold`, `combinator`).
    #[arg(long, env = "QUICKGRID_OPTIONS")]
    pub options: Option<PathBuf>,

    /// Operator joining the filters of different columns.
    #[arg(long, value_enum)]
    pub combinator: Option<Combinator>,

    /// Compare text case-sensitively.
    #[arg(long)]
    pub exact: bool,

    /// Treat missing values as their type's default.
    #[arg(long)]
    pub null_default: bool,

    /// Print the OData query options instead of the records.
    #[arg(long)]
    pub odata: bool,

    /// Print the in-memory predicate before the records.
    #[arg(long)]
    pub explain: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, env = "QUICKGRID_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Combinator {
    And,
    AndAlso,
    AndAssign,
    Or,
    OrElse,
    OrAssign,
}

impl From<Combinator> for LogicalOp {
    fn from(combinator: Combinator) -> Self {
        match combinator {
            Combinator::And => LogicalOp::And,
            Combinator::AndAlso => LogicalOp::AndAlso,
            Combinator::AndAssign => LogicalOp::AndAssign,
            Combinator::Or => LogicalOp::Or,
            Combinator::OrElse => LogicalOp::OrElse,
            Combinator::OrAssign => LogicalOp::OrAssign,
        }
    }
}
