//! SQL schema for the workforce SQLite store.
//!
//! `main_table` is owned by the ingestion pipeline; the DDL here only creates
//! it when opening a fresh database. Derived tables are rebuilt wholesale by
//! [`crate::SqliteStore::materialize_views`].

/// Name of the canonical fact table.
pub const MAIN_TABLE: &str = "main_table";

/// Fact table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const MAIN_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS main_table (
    name                      TEXT    NOT NULL,
    department                TEXT    NOT NULL,
    position                  TEXT    NOT NULL,
    salary                    REAL    NOT NULL,
    productivity_percent      REAL    NOT NULL,   -- 0..100
    feedback_score            REAL    NOT NULL,   -- 0..5
    satisfaction_rate_percent REAL    NOT NULL,   -- 0..100
    projects_completed        INTEGER NOT NULL,
    joining_date              TEXT    NOT NULL    -- YYYY-MM-DD
);
";

/// Reporting indexes on `main_table`. Created only after the table's columns
/// have been validated.
pub const MAIN_INDEXES: &str = "
CREATE INDEX IF NOT EXISTS main_department_idx ON main_table(department);
CREATE INDEX IF NOT EXISTS main_joining_idx    ON main_table(joining_date);
CREATE INDEX IF NOT EXISTS main_dept_join_idx  ON main_table(department, joining_date);
";

/// Materialised derived views. Rows are replaced on every rebuild.
pub const DERIVED_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS employee_tenure (
    name              TEXT    NOT NULL,
    department        TEXT    NOT NULL,
    days_in_company   INTEGER NOT NULL,
    projects_per_year REAL,              -- NULL under one year of tenure
    tenure_quartile   INTEGER NOT NULL,
    as_of             TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS performance_history (
    name                     TEXT    NOT NULL,
    department               TEXT    NOT NULL,
    year                     INTEGER NOT NULL,
    quarter                  INTEGER NOT NULL,
    rolling_avg_productivity REAL    NOT NULL,
    total_projects           INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS salary_bands (
    band_name       TEXT PRIMARY KEY,
    min_salary      REAL NOT NULL,
    max_salary      REAL,                -- NULL for the open-ended top band
    benchmark_ratio REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS history_dept_idx ON performance_history(department, year, quarter);
";
