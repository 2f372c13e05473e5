use super::{Cli, Command};
use anyhow::{Context, Result};
use jsonlinesdb::{Adapter, AdapterConfig, JsonlError, JsonlFile, LinePolicy, SqlScanParser};
use std::io::Write;
use std::path::Path;

pub struct App {
    config: AdapterConfig,
    parser: SqlScanParser,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        let policy = if cli.skip_invalid {
            LinePolicy::SkipInvalid
        } else {
            LinePolicy::Strict
        };

        Self {
            config: AdapterConfig::new()
                .row_id_column(&cli.row_id_column)
                .line_policy(policy),
            parser: SqlScanParser::new(),
        }
    }

    pub fn run(&self, command: &Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Describe { path } => self.describe(path, out),
            Command::Query { sql } => self.query(sql, out),
        }
    }

    fn open(&self, path: &Path) -> Result<JsonlFile> {
        JsonlFile::open_with_config(path, self.config.clone())
            .with_context(|| format!("failed to open {}", path.display()))
    }

    fn describe(&self, path: &Path, out: &mut impl Write) -> Result<()> {
        let table = self.open(path)?;
        let schema = table.get_columns();

        writeln!(out, "{} ({} rows)", path.display(), table.row_count())?;
        for column in schema.columns() {
            writeln!(
                out,
                "  {:<24} {:<8} {}",
                column.name,
                column.data_type.to_string(),
                column.order
            )?;
        }
        Ok(())
    }

    fn query(&self, sql: &str, out: &mut impl Write) -> Result<()> {
        let query = self.parser.parse(sql).context("failed to parse query")?;
        let table = self.open(Path::new(&query.table))?;

        if let Some(columns) = &query.columns
            && let Some(missing) = columns
                .iter()
                .find(|name| table.get_columns().resolve(name).is_none())
        {
            return Err(JsonlError::ColumnNotFound(missing.clone()).into());
        }

        let rows = table.get_data(&query.bounds, &query.order, query.limit, query.offset)?;
        for row in rows {
            let row = row?;
            let json = match &query.columns {
                Some(columns) => row.project(columns),
                None => row.to_json(),
            };
            writeln!(out, "{}", json)?;
        }
        Ok(())
    }
}
