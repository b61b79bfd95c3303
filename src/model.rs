//! Domain types - clients, policies and search results
//!
//! A `Client` owns zero or more `Policy` records through `Policy::client_id`.
//! Records are created once and never updated or deleted.

use serde::{Deserialize, Serialize};

/// A person or entity holding insurance policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Store-assigned identifier
    pub id: i64,
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
}

/// A single insurance contract owned by exactly one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Store-assigned identifier
    pub id: i64,
    /// Owning client; must exist when the policy is inserted
    pub client_id: i64,
    pub policy_type: String,
    pub company: String,
    pub policy_number: Option<String>,
    pub investment_amount: f64,
    /// Free-form date string, not validated
    pub start_date: Option<String>,
    /// Free-form date string, not validated
    pub end_date: Option<String>,
}

/// A policy ready for insertion (no id yet).
#[derive(Debug, Clone, PartialEq)]
pub struct NewPolicy {
    pub client_id: i64,
    pub policy_type: String,
    pub company: String,
    pub policy_number: String,
    pub investment_amount: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl NewPolicy {
    pub fn new(
        client_id: i64,
        policy_type: impl Into<String>,
        company: impl Into<String>,
        policy_number: impl Into<String>,
        investment_amount: f64,
    ) -> Self {
        Self {
            client_id,
            policy_type: policy_type.into(),
            company: company.into(),
            policy_number: policy_number.into(),
            investment_amount,
            start_date: None,
            end_date: None,
        }
    }

    /// Set the coverage period
    pub fn with_dates(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }
}

/// Raw text as typed into the policy form, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyForm {
    pub policy_type: String,
    pub company: String,
    pub policy_number: String,
    pub investment_amount: String,
    pub start_date: String,
    pub end_date: String,
}

impl PolicyForm {
    pub fn new(
        policy_type: impl Into<String>,
        company: impl Into<String>,
        policy_number: impl Into<String>,
        investment_amount: impl Into<String>,
    ) -> Self {
        Self {
            policy_type: policy_type.into(),
            company: company.into(),
            policy_number: policy_number.into(),
            investment_amount: investment_amount.into(),
            ..Self::default()
        }
    }

    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = start.into();
        self.end_date = end.into();
        self
    }
}

/// One search hit: a policy together with the client that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub client: Client,
    pub policy: Policy,
}

impl PolicyRecord {
    pub fn new(client: Client, policy: Policy) -> Self {
        Self { client, policy }
    }

    /// Display projection: name, type, company, number, amount, contact, email
    pub fn display_tuple(&self) -> (&str, &str, &str, &str, f64, &str, &str) {
        (
            &self.client.name,
            &self.policy.policy_type,
            &self.policy.company,
            self.policy.policy_number.as_deref().unwrap_or(""),
            self.policy.investment_amount,
            self.client.contact.as_deref().unwrap_or(""),
            self.client.email.as_deref().unwrap_or(""),
        )
    }
}
