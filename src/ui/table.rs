use crate::model::PolicyRecord;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// One line of the "Policy Records" table
#[derive(Tabled)]
pub struct PolicyRow {
    #[tabled(rename = "Client Name")]
    pub client_name: String,
    #[tabled(rename = "Policy Type")]
    pub policy_type: String,
    #[tabled(rename = "Company")]
    pub company: String,
    #[tabled(rename = "Policy Number")]
    pub policy_number: String,
    #[tabled(rename = "Investment Amount")]
    pub investment_amount: String,
    #[tabled(rename = "Contact")]
    pub contact: String,
    #[tabled(rename = "Email")]
    pub email: String,
}

impl From<&PolicyRecord> for PolicyRow {
    fn from(record: &PolicyRecord) -> Self {
        let (name, policy_type, company, number, amount, contact, email) = record.display_tuple();
        Self {
            client_name: name.to_string(),
            policy_type: policy_type.to_string(),
            company: company.to_string(),
            policy_number: number.to_string(),
            investment_amount: format_amount(amount),
            contact: contact.to_string(),
            email: email.to_string(),
        }
    }
}

/// Render search results; empty input yields an empty string
pub fn policy_table(records: &[PolicyRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let rows: Vec<PolicyRow> = records.iter().map(PolicyRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Currency display: `$1,234.50`
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Client, Policy};

    fn record(amount: f64) -> PolicyRecord {
        PolicyRecord::new(
            Client {
                id: 1,
                name: "Jane Doe".into(),
                contact: Some("555-1234".into()),
                email: Some("jane@x.com".into()),
            },
            Policy {
                id: 1,
                client_id: 1,
                policy_type: "Auto".into(),
                company: "Acme Co".into(),
                policy_number: Some("POL-100".into()),
                investment_amount: amount,
                start_date: None,
                end_date: None,
            },
        )
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(999.99), "$999.99");
        assert_eq!(format_amount(1234.5), "$1,234.50");
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(format_amount(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_amount(100_000.0), "$100,000.00");
        assert_eq!(format_amount(-42.0), "-$42.00");
    }

    #[test]
    fn test_policy_table_columns() {
        let table = policy_table(&[record(1234.5)]);
        for heading in [
            "Client Name",
            "Policy Type",
            "Company",
            "Policy Number",
            "Investment Amount",
            "Contact",
            "Email",
        ] {
            assert!(table.contains(heading), "missing column {heading}");
        }
        assert!(table.contains("Jane Doe"));
        assert!(table.contains("$1,234.50"));
        assert!(table.contains("jane@x.com"));
    }

    #[test]
    fn test_empty_tables() {
        assert!(policy_table(&[]).is_empty());
        assert!(TableBuilder::new().build().is_empty());
        assert!(stats_table(&[("Clients", "2")]).contains("Clients"));
    }
}
