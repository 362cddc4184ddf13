use anyhow::Result;
use diesel::prelude::*;
use diesel::sql_types::Text;

/// Columns that existed before the schema was slimmed down. Databases
/// created from the current migrations never have them; older installs do.
const LEGACY_COLUMNS: &[(&str, &str)] = &[
    ("users", "is_active"),
    ("users", "created_at"),
    ("user_profiles", "last_name"),
    ("user_profiles", "avatar_path"),
    ("user_profiles", "location"),
];

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    column_name: String,
}

fn existing_columns(conn: &mut PgConnection, table: &str) -> QueryResult<Vec<String>> {
    let rows: Vec<ColumnRow> = diesel::sql_query(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = $1",
    )
    .bind::<Text, _>(table)
    .load(conn)?;
    Ok(rows.into_iter().map(|r| r.column_name).collect())
}

/// Drops the legacy columns that are actually present. Each DROP COLUMN is
/// irreversible; there is no rollback path once a statement succeeds.
pub fn drop_legacy_columns(conn: &mut PgConnection, yes: bool) -> Result<()> {
    let mut present: Vec<(&str, &str)> = Vec::new();

    for &(table, column) in LEGACY_COLUMNS {
        let columns = existing_columns(conn, table)?;
        if columns.iter().any(|c| c == column) {
            present.push((table, column));
        }
    }

    if present.is_empty() {
        println!("No legacy columns found; nothing to do.");
        return Ok(());
    }

    println!("Legacy columns present:");
    for (table, column) in &present {
        println!("  {}.{}", table, column);
    }

    if !yes && !crate::confirm("Drop these columns? This cannot be undone.")? {
        println!("Aborted.");
        return Ok(());
    }

    for (table, column) in &present {
        // Identifiers come from the fixed list above, never from input
        diesel::sql_query(format!("ALTER TABLE {} DROP COLUMN {}", table, column))
            .execute(conn)?;
        println!("Dropped {}.{}", table, column);
    }

    Ok(())
}
