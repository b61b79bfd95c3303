//! Application logic - input validation and the current-client session
//!
//! `Session` sits between raw user input and the store. It rejects bad
//! input before any SQL runs and remembers which client new policies
//! attach to.

use crate::Result;
use crate::model::{Client, NewPolicy, Policy, PolicyForm, PolicyRecord};
use crate::storage::SqliteStore;

/// User input that fails a precondition. Never reaches the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a search term")]
    BlankSearchTerm,

    #[error("Please enter client name")]
    BlankClientName,

    #[error("Please add or search for a client first")]
    NoCurrentClient,

    #[error("Please enter a valid investment amount")]
    InvalidAmount(String),

    #[error("Please fill all policy fields")]
    MissingPolicyFields,

    #[error("No client with id {0}")]
    UnknownClient(i64),
}

/// A single-user session over the store.
pub struct Session {
    store: SqliteStore,
    current_client: Option<i64>,
}

impl Session {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store,
            current_client: None,
        }
    }

    /// Id of the client that `add_policy` will attach to
    pub fn current_client(&self) -> Option<i64> {
        self.current_client
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Search policies by client name. Does not change the current client.
    pub fn search(&self, term: &str) -> Result<Vec<PolicyRecord>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(reject(ValidationError::BlankSearchTerm));
        }
        self.store.search_clients_by_name(term)
    }

    /// Add a client and make it the current client.
    ///
    /// All three fields are trimmed. A contact or email that is blank after
    /// trimming is stored as NULL and reads back as `None`, not `Some("")`.
    pub fn add_client(&mut self, name: &str, contact: &str, email: &str) -> Result<Client> {
        let name = name.trim();
        if name.is_empty() {
            return Err(reject(ValidationError::BlankClientName));
        }
        let contact = non_blank(contact);
        let email = non_blank(email);

        let id = self.store.add_client(name, contact, email)?;
        self.current_client = Some(id);

        Ok(Client {
            id,
            name: name.to_string(),
            contact: contact.map(str::to_string),
            email: email.map(str::to_string),
        })
    }

    /// Make an existing client current, e.g. one found through `search`.
    pub fn select_client(&mut self, id: i64) -> Result<Client> {
        let client = self
            .store
            .get_client(id)?
            .ok_or_else(|| reject(ValidationError::UnknownClient(id)))?;
        self.current_client = Some(client.id);
        tracing::debug!(client_id = client.id, "Selected current client");
        Ok(client)
    }

    /// Validate the policy form and insert it for the current client.
    ///
    /// Checks run in form order: current client, amount, then text fields.
    pub fn add_policy(&mut self, form: &PolicyForm) -> Result<Policy> {
        let client_id = self
            .current_client
            .ok_or_else(|| reject(ValidationError::NoCurrentClient))?;

        let amount = parse_amount(&form.investment_amount).map_err(reject)?;

        let policy_type = form.policy_type.trim();
        let company = form.company.trim();
        let policy_number = form.policy_number.trim();
        if policy_type.is_empty() || company.is_empty() || policy_number.is_empty() {
            return Err(reject(ValidationError::MissingPolicyFields));
        }

        let new_policy = NewPolicy::new(client_id, policy_type, company, policy_number, amount).with_dates(
            non_blank(&form.start_date).map(str::to_string),
            non_blank(&form.end_date).map(str::to_string),
        );
        let id = self.store.add_policy_with(&new_policy)?;

        Ok(Policy {
            id,
            client_id,
            policy_type: new_policy.policy_type,
            company: new_policy.company,
            policy_number: Some(new_policy.policy_number),
            investment_amount: amount,
            start_date: new_policy.start_date,
            end_date: new_policy.end_date,
        })
    }
}

/// Parse a non-negative, finite investment amount
pub fn parse_amount(raw: &str) -> std::result::Result<f64, ValidationError> {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(ValidationError::InvalidAmount(raw.to_string())),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn reject(err: ValidationError) -> crate::Error {
    tracing::warn!("Rejected input: {}", err);
    err.into()
}
