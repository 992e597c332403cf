//! Postgres-backed source set.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::BaseSourceSet;

pub struct PostgresSourceSet {
    pool: PgPool,
}

impl PostgresSourceSet {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Identifiers are interpolated, so only plain names are accepted.
fn check_identifier(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("Invalid {} identifier: {:?}", kind, value);
    }
    Ok(())
}

fn build_select(table: &str, schema: &str, columns: &[String]) -> Result<String> {
    check_identifier("table", table)?;
    check_identifier("schema", schema)?;
    if columns.is_empty() {
        bail!("At least one column is required to read {}.{}", schema, table);
    }

    let projection = columns
        .iter()
        .map(|column| {
            check_identifier("column", column)?;
            Ok(format!("\"{}\"::text", column))
        })
        .collect::<Result<Vec<_>>>()?
        .join(", ");

    Ok(format!(
        "SELECT {} FROM \"{}\".\"{}\"",
        projection, schema, table
    ))
}

#[async_trait]
impl BaseSourceSet for PostgresSourceSet {
    async fn fetch_all(
        &self,
        table: &str,
        schema: &str,
        columns: &[String],
    ) -> Result<Vec<Vec<String>>> {
        let sql = build_select(table, schema, columns)?;

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to read {}.{}", schema, table))?;

        rows.iter()
            .map(|row| {
                (0..columns.len())
                    .map(|i| {
                        row.try_get::<Option<String>, _>(i)
                            .map(|value| value.unwrap_or_default())
                            .context("Failed to decode source column")
                    })
                    .collect::<Result<Vec<String>>>()
            })
            .collect()
    }
}
