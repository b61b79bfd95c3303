//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::Result;
use crate::model::{Client, NewPolicy, Policy, PolicyRecord};
use super::schema;

const CLIENT_COLUMNS: &str = "id, name, contact, email";
const POLICY_COLUMNS: &str =
    "id, client_id, policy_type, company, policy_number, investment_amount, start_date, end_date";

/// SQLite-backed storage for clients and policies
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        tracing::debug!("Opened database {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(schema::CONNECTION_PRAGMAS)?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Log every executed statement at debug level on the `insurance::sql` target
    pub fn set_echo(&mut self, enabled: bool) {
        if enabled {
            self.conn.trace(Some(echo_sql));
        } else {
            self.conn.trace(None);
        }
    }

    // ========== Client Operations ==========

    /// Insert a client and return its generated id.
    ///
    /// The insert runs in its own transaction; on any failure the
    /// transaction is dropped uncommitted, which rolls it back.
    pub fn add_client(&mut self, name: &str, contact: Option<&str>, email: Option<&str>) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO clients (name, contact, email) VALUES (?1, ?2, ?3)",
            params![name, contact, email],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::info!(client_id = id, "Added client {:?}", name);
        Ok(id)
    }

    /// Get a client by id
    pub fn get_client(&self, id: i64) -> Result<Option<Client>> {
        self.conn
            .query_row(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"),
                [id],
                row_to_client,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find clients whose name contains `term`, ignoring case.
    ///
    /// Matching happens in Rust with Unicode lowercasing; SQLite's LIKE only
    /// folds ASCII. `term` is a literal substring, never a pattern.
    pub fn find_clients_by_name(&self, term: &str) -> Result<Vec<Client>> {
        let needle = term.to_lowercase();
        let mut stmt = self.conn.prepare(&format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id"))?;

        let clients: Vec<Client> = stmt
            .query_map([], row_to_client)?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect();

        Ok(clients)
    }

    /// Count all clients
    pub fn count_clients(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Policy Operations ==========

    /// Insert a policy for `client_id` and return its generated id
    pub fn add_policy(
        &mut self,
        client_id: i64,
        policy_type: &str,
        company: &str,
        policy_number: &str,
        investment_amount: f64,
    ) -> Result<i64> {
        let policy = NewPolicy::new(client_id, policy_type, company, policy_number, investment_amount);
        self.add_policy_with(&policy)
    }

    /// Insert a fully specified policy and return its generated id.
    ///
    /// Fails with a foreign-key constraint error when the client does not
    /// exist; nothing is persisted in that case.
    pub fn add_policy_with(&mut self, policy: &NewPolicy) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO policies (client_id, policy_type, company, policy_number, investment_amount, start_date, end_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                policy.client_id,
                policy.policy_type,
                policy.company,
                policy.policy_number,
                policy.investment_amount,
                policy.start_date,
                policy.end_date,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::info!(policy_id = id, client_id = policy.client_id, "Added policy {:?}", policy.policy_number);
        Ok(id)
    }

    /// Get a policy by id
    pub fn get_policy(&self, id: i64) -> Result<Option<Policy>> {
        self.conn
            .query_row(
                &format!("SELECT {POLICY_COLUMNS} FROM policies WHERE id = ?1"),
                [id],
                row_to_policy,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All policies owned by a client, in insertion order
    pub fn policies_for_client(&self, client_id: i64) -> Result<Vec<Policy>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {POLICY_COLUMNS} FROM policies WHERE client_id = ?1 ORDER BY id"
        ))?;

        let policies = stmt
            .query_map([client_id], row_to_policy)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(policies)
    }

    /// Count all policies
    pub fn count_policies(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM policies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Search ==========

    /// Every policy of every client whose name contains `term` (case-insensitive).
    ///
    /// Clients without policies produce no rows. Results are ordered by
    /// client id, then policy id.
    pub fn search_clients_by_name(&self, term: &str) -> Result<Vec<PolicyRecord>> {
        let clients = self.find_clients_by_name(term)?;
        tracing::debug!("{} client(s) match {:?}", clients.len(), term);

        let mut records = Vec::new();
        for client in clients {
            for policy in self.policies_for_client(client.id)? {
                records.push(PolicyRecord::new(client.clone(), policy));
            }
        }

        Ok(records)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            clients: self.count_clients()?,
            policies: self.count_policies()?,
        })
    }
}

fn echo_sql(sql: &str) {
    tracing::debug!(target: "insurance::sql", "{}", sql.trim());
}

fn row_to_client(row: &rusqlite::Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        email: row.get(3)?,
    })
}

fn row_to_policy(row: &rusqlite::Row) -> rusqlite::Result<Policy> {
    Ok(Policy {
        id: row.get(0)?,
        client_id: row.get(1)?,
        policy_type: row.get(2)?,
        company: row.get(3)?,
        policy_number: row.get(4)?,
        investment_amount: row.get(5)?,
        start_date: row.get(6)?,
        end_date: row.get(7)?,
    })
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub clients: usize,
    pub policies: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Clients: {}", self.clients)?;
        writeln!(f, "  Policies: {}", self.policies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_jane() -> (SqliteStore, i64) {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let id = store.add_client("Jane Doe", Some("555-1234"), Some("jane@x.com")).unwrap();
        (store, id)
    }

    #[test]
    fn test_client_crud() {
        let (store, id) = store_with_jane();

        let client = store.get_client(id).unwrap().unwrap();
        assert_eq!(client.name, "Jane Doe");
        assert_eq!(client.contact.as_deref(), Some("555-1234"));
        assert_eq!(client.email.as_deref(), Some("jane@x.com"));
        assert!(store.get_client(id + 1).unwrap().is_none());
    }

    #[test]
    fn test_client_ids_are_distinct() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let a = store.add_client("A", None, None).unwrap();
        let b = store.add_client("B", None, None).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.count_clients().unwrap(), 2);
    }

    #[test]
    fn test_policy_requires_existing_client() {
        let (mut store, id) = store_with_jane();

        let err = store.add_policy(id + 100, "Auto", "Acme Co", "POL-1", 10.0).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(store.count_policies().unwrap(), 0);
    }

    #[test]
    fn test_amount_round_trip() {
        let (mut store, id) = store_with_jane();

        let policy_id = store.add_policy(id, "Life", "Acme Co", "POL-2", 1234.5).unwrap();
        let policy = store.get_policy(policy_id).unwrap().unwrap();
        assert_eq!(policy.investment_amount, 1234.5);
        assert_eq!(policy.client_id, id);
        assert_eq!(policy.policy_number.as_deref(), Some("POL-2"));
    }

    #[test]
    fn test_policy_dates_persist() {
        let (mut store, id) = store_with_jane();

        let new_policy = NewPolicy::new(id, "Home", "Acme Co", "H-9", 50.0)
            .with_dates(Some("2024-01-01".into()), Some("2025-01-01".into()));
        let policy_id = store.add_policy_with(&new_policy).unwrap();

        let policy = store.get_policy(policy_id).unwrap().unwrap();
        assert_eq!(policy.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(policy.end_date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let alice = store.add_client("Alice Smith", None, None).unwrap();
        store.add_policy(alice, "Auto", "Acme Co", "A-1", 1.0).unwrap();

        assert_eq!(store.search_clients_by_name("smith").unwrap().len(), 1);
        assert_eq!(store.search_clients_by_name("SMITH").unwrap().len(), 1);
        assert!(store.search_clients_by_name("xyz").unwrap().is_empty());
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let plain = store.add_client("Bob", None, None).unwrap();
        let percent = store.add_client("100% Covered Ltd", None, None).unwrap();
        store.add_policy(plain, "Auto", "Acme Co", "B-1", 1.0).unwrap();
        store.add_policy(percent, "Auto", "Acme Co", "C-1", 1.0).unwrap();

        let hits = store.search_clients_by_name("%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].client.id, percent);
        assert!(store.search_clients_by_name("_").unwrap().is_empty());
    }

    #[test]
    fn test_search_folds_non_ascii_case() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let jose = store.add_client("José Álvarez", None, None).unwrap();
        store.add_policy(jose, "Life", "Acme Co", "J-1", 1.0).unwrap();

        for term in ["álvarez", "ÁLVAREZ", "JOSÉ", "é á"] {
            let hits = store.search_clients_by_name(term).unwrap();
            assert_eq!(hits.len(), 1, "term {term:?}");
            assert_eq!(hits[0].client.id, jose);
        }
    }

    #[test]
    fn test_search_skips_clients_without_policies() {
        let (mut store, jane) = store_with_jane();
        store.add_client("Janet Empty", None, None).unwrap();
        store.add_policy(jane, "Auto", "Acme Co", "POL-1", 1.0).unwrap();
        store.add_policy(jane, "Home", "Acme Co", "POL-2", 2.0).unwrap();

        let hits = store.search_clients_by_name("jan").unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|r| r.client.id == jane));
        assert_eq!(hits[0].policy.policy_number.as_deref(), Some("POL-1"));
        assert_eq!(hits[1].policy.policy_number.as_deref(), Some("POL-2"));
    }

    #[test]
    fn test_scenario_row() {
        let (mut store, id) = store_with_jane();
        store.add_policy(id, "Auto", "Acme Co", "POL-100", 999.99).unwrap();

        let hits = store.search_clients_by_name("jane").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].display_tuple(),
            ("Jane Doe", "Auto", "Acme Co", "POL-100", 999.99, "555-1234", "jane@x.com")
        );
    }

    #[test]
    fn test_reopen_file_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insurance.db");

        let id = {
            let mut store = SqliteStore::open(&path).unwrap();
            let id = store.add_client("Persisted", None, None).unwrap();
            store.add_policy(id, "Auto", "Acme Co", "P-1", 12.0).unwrap();
            id
        };

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_client(id).unwrap().unwrap().name, "Persisted");
        assert_eq!(store.policies_for_client(id).unwrap().len(), 1);
        let stats = store.stats().unwrap();
        assert_eq!((stats.clients, stats.policies), (1, 1));
    }
}
