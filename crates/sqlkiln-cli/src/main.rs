//! sqlkiln CLI
//!
//! Renders dialect SQL from JSON query and schema descriptions, and
//! describes live PostgreSQL tables.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlkiln_core::introspect::Introspect;
use sqlkiln_core::{Dialect, Query, QueryKind, SchemaDescription};
use sqlkiln_pgsql::{IntrospectConfig, PgCatalog, PgsqlIntrospector};

/// Dialect-driven SQL rendering and schema introspection.
#[derive(Parser)]
#[command(name = "sqlkiln")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dialect to render with.
    #[arg(short, long, env = "SQLKILN_DIALECT", value_enum, default_value_t = DialectName::Pgsql)]
    dialect: DialectName,

    /// PostgreSQL connection string, needed by `describe` and `tables`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DialectName {
    Generic,
    Pgsql,
}

impl DialectName {
    fn build(self) -> sqlkiln_core::Result<Dialect> {
        match self {
            Self::Generic => Dialect::generic(),
            Self::Pgsql => sqlkiln_pgsql::dialect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DdlKind {
    CreateTable,
    DropTable,
}

impl From<DdlKind> for QueryKind {
    fn from(kind: DdlKind) -> Self {
        match kind {
            DdlKind::CreateTable => Self::CreateTable,
            DdlKind::DropTable => Self::DropTable,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON query description to SQL and bindings.
    Render {
        /// Query file (stdin if omitted or `-`).
        file: Option<PathBuf>,

        /// Print only the SQL text.
        #[arg(long)]
        sql_only: bool,
    },

    /// Render table DDL from a JSON schema description.
    Ddl {
        /// Schema file (stdin if omitted or `-`).
        file: Option<PathBuf>,

        /// Statement to render.
        #[arg(short, long, value_enum, default_value_t = DdlKind::CreateTable)]
        kind: DdlKind,
    },

    /// Describe a table from the live catalog.
    Describe {
        /// Table name.
        table: String,

        /// Catalog schema.
        #[arg(short, long, default_value = sqlkiln_pgsql::introspect::DEFAULT_SCHEMA)]
        schema: String,

        /// Print `CREATE TABLE` in the selected dialect instead of JSON.
        #[arg(long)]
        ddl: bool,
    },

    /// List tables in the live catalog.
    Tables {
        /// Database to list (the connected one if omitted).
        #[arg(long)]
        database: Option<String>,

        /// Catalog schema.
        #[arg(short, long, default_value = sqlkiln_pgsql::introspect::DEFAULT_SCHEMA)]
        schema: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dialect = cli.dialect.build()?;
    debug!(dialect = dialect.name(), "dialect ready");

    match cli.command {
        Commands::Render { file, sql_only } => {
            let input = read_input(file.as_deref())?;
            println!("{}", render_query(&dialect, &input, sql_only)?);
        }

        Commands::Ddl { file, kind } => {
            let input = read_input(file.as_deref())?;
            println!("{}", render_schema(&dialect, &input, kind.into())?);
        }

        Commands::Describe { table, schema, ddl } => {
            let catalog = connect(cli.database_url.as_deref()).await?;
            let database = catalog.current_database().await?;
            let introspector = PgsqlIntrospector::new(
                catalog,
                sqlkiln_pgsql::dialect()?,
                IntrospectConfig::new(database).schema(schema),
            );

            let description = introspector.describe_table(&table).await?;
            if description.columns.is_empty() {
                info!("Table {table} has no columns or does not exist.");
            }
            if ddl {
                println!("{}", dialect.render_ddl(&description, QueryKind::CreateTable)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&description)?);
            }
        }

        Commands::Tables { database, schema } => {
            let catalog = connect(cli.database_url.as_deref()).await?;
            let connected = catalog.current_database().await?;
            let introspector = PgsqlIntrospector::new(
                catalog,
                sqlkiln_pgsql::dialect()?,
                IntrospectConfig::new(connected).schema(schema),
            );

            let tables = introspector.list_tables(database.as_deref()).await?;
            if tables.is_empty() {
                info!("No tables found.");
            }
            for table in tables {
                println!("{table}");
            }
        }
    }

    Ok(())
}

async fn connect(url: Option<&str>) -> anyhow::Result<PgCatalog> {
    let url = url.context("a database URL is required (--database-url or DATABASE_URL)")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(url)
        .await
        .context("failed to connect to PostgreSQL")?;
    Ok(PgCatalog::new(pool))
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Renders a JSON query. Without `sql_only` the output is a JSON object with
/// `sql` and `binds`.
fn render_query(dialect: &Dialect, input: &str, sql_only: bool) -> anyhow::Result<String> {
    let query: Query = serde_json::from_str(input).context("invalid query description")?;
    let (sql, binds) = dialect.render(&query)?;
    if sql_only {
        return Ok(sql);
    }
    Ok(serde_json::to_string_pretty(&json!({ "sql": sql, "binds": binds }))?)
}

/// Renders DDL from a JSON schema description.
///
/// Column flags register their keys the same way programmatic descriptions
/// do, so `"primary": true` on a column is enough for a primary key.
fn render_schema(dialect: &Dialect, input: &str, kind: QueryKind) -> anyhow::Result<String> {
    let mut schema: SchemaDescription =
        serde_json::from_str(input).context("invalid schema description")?;
    for column in std::mem::take(&mut schema.columns) {
        schema.add_column(column);
    }
    Ok(dialect.render_ddl(&schema, kind)?)
}
