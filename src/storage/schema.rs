//! Database schema definitions
//!
//! Column types mirror databases created by earlier releases of the
//! application, so existing `insurance.db` files open unchanged.

/// SQL to create the clients table
pub const CREATE_CLIENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id INTEGER NOT NULL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    contact VARCHAR(100),
    email VARCHAR(100)
)
"#;

/// SQL to create the policies table
pub const CREATE_POLICIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS policies (
    id INTEGER NOT NULL PRIMARY KEY,
    client_id INTEGER,
    policy_type VARCHAR(100) NOT NULL,
    company VARCHAR(100) NOT NULL,
    policy_number VARCHAR(50),
    investment_amount FLOAT NOT NULL,
    start_date VARCHAR(20),
    end_date VARCHAR(20),
    FOREIGN KEY(client_id) REFERENCES clients (id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_policies_client_id ON policies(client_id)",
];

/// Per-connection settings; SQLite leaves foreign keys off by default
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_CLIENTS_TABLE, CREATE_POLICIES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
