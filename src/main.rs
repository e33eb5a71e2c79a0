//! CLI entry point for `expr2sql`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use expr2sql::assembler::{self, Mode, Params};
use expr2sql::inputs::source::{DataHandle, InputSource};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(
    name = "expr2sql",
    about = "Compile factor expressions into an analytic SQL feature query"
)]
struct Cli {
    /// Input mode: expr or sql
    #[arg(long, default_value = "expr")]
    mode: Mode,

    /// Expression block file, `-` for stdin
    #[arg(long)]
    expr: Option<PathBuf>,

    /// Filter block file, `-` for stdin
    #[arg(long)]
    expr_filters: Option<PathBuf>,

    /// Default tables for unqualified columns, `;`-separated
    #[arg(long, default_value = "cn_stock_prefactors")]
    expr_tables: String,

    /// Extra fields appended to the expression block, `,`-separated
    #[arg(long, default_value = "date, instrument")]
    extra_fields: String,

    /// ORDER BY key spec, empty to omit the clause
    #[arg(long, default_value = "date, instrument")]
    order_by: String,

    /// Drop rows containing null values
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    expr_drop_na: bool,

    /// Prepend the raw SQL text to the compiled expression query
    #[arg(long)]
    expr_add_sql: bool,

    /// Raw SQL file, `-` for stdin
    #[arg(long)]
    sql: Option<PathBuf>,

    /// SQL file bound to input slot 1
    #[arg(long, value_name = "FILE")]
    input_1_sql: Option<PathBuf>,

    /// Existing table bound to input slot 1
    #[arg(long, value_name = "TABLE", conflicts_with = "input_1_sql")]
    input_1_table: Option<String>,

    /// SQL file bound to input slot 2
    #[arg(long, value_name = "FILE")]
    input_2_sql: Option<PathBuf>,

    /// Existing table bound to input slot 2
    #[arg(long, value_name = "TABLE", conflicts_with = "input_2_sql")]
    input_2_table: Option<String>,

    /// SQL file bound to input slot 3
    #[arg(long, value_name = "FILE")]
    input_3_sql: Option<PathBuf>,

    /// Existing table bound to input slot 3
    #[arg(long, value_name = "TABLE", conflicts_with = "input_3_sql")]
    input_3_table: Option<String>,

    /// Write the compiled SQL here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the artifact as a `{"sql": ...}` JSON payload
    #[arg(long)]
    json: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let params = match build_params(&cli) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Error reading input text: {e}");
            process::exit(2);
        }
    };

    let artifact = match assembler::compile(&params) {
        Ok(artifact) => artifact,
        Err(e) => {
            eprintln!("Compile error: {e}");
            process::exit(2);
        }
    };

    let rendered = if cli.json {
        artifact.to_json().to_string()
    } else {
        artifact.sql
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &rendered) {
                eprintln!("Error writing {}: {e}", path.display());
                process::exit(2);
            }
        }
        None => println!("{rendered}"),
    }
}

/// Logs go to stderr so stdout stays clean for the compiled artifact.
fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn build_params(cli: &Cli) -> std::io::Result<Params> {
    Ok(Params {
        inputs: [
            bind_slot(cli.input_1_sql.as_deref(), cli.input_1_table.as_deref())?,
            bind_slot(cli.input_2_sql.as_deref(), cli.input_2_table.as_deref())?,
            bind_slot(cli.input_3_sql.as_deref(), cli.input_3_table.as_deref())?,
        ],
        mode: cli.mode,
        expr: read_optional(cli.expr.as_deref())?,
        expr_filters: read_optional(cli.expr_filters.as_deref())?,
        expr_tables: cli.expr_tables.clone(),
        extra_fields: cli.extra_fields.clone(),
        order_by: cli.order_by.clone(),
        expr_drop_na: cli.expr_drop_na,
        expr_add_sql: cli.expr_add_sql,
        sql: read_optional(cli.sql.as_deref())?,
        extract_data: false,
    })
}

fn bind_slot(sql: Option<&Path>, table: Option<&str>) -> std::io::Result<Option<InputSource>> {
    if let Some(path) = sql {
        return Ok(Some(InputSource::Sql(read_text(path)?)));
    }
    Ok(table.map(|id| InputSource::Handle(DataHandle::table(id))))
}

fn read_optional(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => read_text(path),
        None => Ok(String::new()),
    }
}

fn read_text(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
}
