use sqlx::PgPool;

/// Every surrogate `id` column is bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_ids_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// Every table carries `created_at` / `updated_at` as timestamptz.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let missing: Vec<(String, String)> = sqlx::query_as(
        "SELECT t.table_name, c.col
         FROM information_schema.tables t
         CROSS JOIN (VALUES ('created_at'), ('updated_at')) AS c(col)
         WHERE t.table_schema = 'public'
           AND t.table_type = 'BASE TABLE'
           AND t.table_name != '_sqlx_migrations'
           AND NOT EXISTS (
               SELECT 1 FROM information_schema.columns ic
               WHERE ic.table_schema = 'public'
                 AND ic.table_name = t.table_name
                 AND ic.column_name = c.col
                 AND ic.data_type = 'timestamp with time zone'
           )
         ORDER BY 1, 2",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(
        missing.is_empty(),
        "Tables missing timestamptz audit columns: {missing:?}"
    );
}

/// TEXT is used instead of VARCHAR everywhere.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "Found VARCHAR columns: {rows:?}");
}

/// Every single-column foreign key is the leading column of some index.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_fks_have_indexes(pool: PgPool) {
    let unindexed: Vec<(String, String)> = sqlx::query_as(
        "SELECT con.conrelid::regclass::TEXT, att.attname::TEXT
         FROM pg_constraint con
         JOIN pg_attribute att
             ON att.attrelid = con.conrelid AND att.attnum = con.conkey[1]
         WHERE con.contype = 'f'
           AND con.connamespace = 'public'::regnamespace
           AND NOT EXISTS (
               SELECT 1 FROM pg_index idx
               WHERE idx.indrelid = con.conrelid
                 AND idx.indkey[0] = con.conkey[1]
           )
         ORDER BY 1, 2",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(unindexed.is_empty(), "FK columns without index: {unindexed:?}");
}

/// Referential rules are deliberate: content and catalog structure is
/// restricted, per-user rows cascade with their owner.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fk_delete_rules(pool: PgPool) {
    let rules: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT tc.table_name, kcu.column_name, rc.delete_rule
         FROM information_schema.referential_constraints rc
         JOIN information_schema.table_constraints tc
             ON rc.constraint_name = tc.constraint_name
             AND rc.constraint_schema = tc.table_schema
         JOIN information_schema.key_column_usage kcu
             ON kcu.constraint_name = tc.constraint_name
             AND kcu.table_schema = tc.table_schema
         WHERE rc.constraint_schema = 'public'
         ORDER BY tc.table_name, kcu.column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    let rule_of = |table: &str, column: &str| {
        rules
            .iter()
            .find(|(t, c, _)| t == table && c == column)
            .map(|(_, _, rule)| rule.as_str())
            .unwrap_or_else(|| panic!("no FK on {table}.{column}"))
    };

    assert_eq!(rule_of("categories", "parent_id"), "RESTRICT");
    assert_eq!(rule_of("courses", "cat_id"), "RESTRICT");
    assert_eq!(rule_of("courses", "instructor_id"), "RESTRICT");
    assert_eq!(rule_of("lessons", "section_id"), "RESTRICT");
    assert_eq!(rule_of("sections", "course_id"), "CASCADE");
    assert_eq!(rule_of("enrollments", "course_id"), "CASCADE");
    assert_eq!(rule_of("progress", "lesson_id"), "CASCADE");

    for (table, column, rule) in &rules {
        assert_ne!(rule, "NO ACTION", "FK {table}.{column} needs an explicit ON DELETE");
    }
}

/// Unique and check constraints follow the `uq_` / `ck_` naming used for
/// error classification.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_constraint_naming(pool: PgPool) {
    let badly_named: Vec<(String, String)> = sqlx::query_as(
        "SELECT conrelid::regclass::TEXT, conname::TEXT
         FROM pg_constraint
         WHERE connamespace = 'public'::regnamespace
           AND ((contype = 'u' AND conname NOT LIKE 'uq\\_%')
             OR (contype = 'c' AND conname NOT LIKE 'ck\\_%'))
         ORDER BY 1, 2",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(badly_named.is_empty(), "Misnamed constraints: {badly_named:?}");
}
