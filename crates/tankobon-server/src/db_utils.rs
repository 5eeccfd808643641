use anyhow::bail;
use sqlx::postgres::PgQueryResult;

/// Confirms exactly one row was changed by a statement that targets a single
/// row
pub fn validate_one_row_affected(sql_result: &PgQueryResult) -> anyhow::Result<()> {
    let rows_affected = sql_result.rows_affected();
    if rows_affected != 1 {
        bail!("expected 1 row to be affected but found {rows_affected}");
    }
    Ok(())
}
