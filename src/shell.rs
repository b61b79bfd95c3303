//! Interactive shell - the form-driven front end
//!
//! Each command mirrors one panel of the form: `search`, `client` and
//! `policy` prompt for their fields, run one session operation and print
//! the outcome. A failed action prints its message and the loop carries on.

use std::io::{BufRead, Write};
use crate::Result;
use crate::model::PolicyForm;
use crate::session::Session;
use crate::ui::output::{error_line, header_line, info_line, success_line, warn_line};
use crate::ui::{policy_table, stats_table, Theme};

const HELP: &str = "\
Commands:
  search [term]   Search policies by client name
  client          Add a new client (becomes the current client)
  policy          Add a policy for the current client
  select <id>     Make an existing client current
  current         Show the current client
  stats           Show record counts
  help            Show this help
  quit            Leave the shell";

pub struct Shell<'a, R, W> {
    session: &'a mut Session,
    input: R,
    output: W,
    theme: Theme,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(session: &'a mut Session, input: R, output: W, theme: Theme) -> Self {
        Self {
            session,
            input,
            output,
            theme,
        }
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", header_line(&self.theme, "Insurance Policy Manager"))?;
        writeln!(self.output, "Type `help` for commands.")?;

        while let Some(line) = self.prompt("> ")? {
            let (command, rest) = match line.split_once(char::is_whitespace) {
                Some((command, rest)) => (command, rest.trim()),
                None => (line.as_str(), ""),
            };

            let keep_going = match command {
                "" => true,
                "search" => self.search(rest)?,
                "client" => self.add_client()?,
                "policy" => self.add_policy()?,
                "select" => self.select(rest)?,
                "current" => self.current()?,
                "stats" => self.stats()?,
                "help" => {
                    writeln!(self.output, "{HELP}")?;
                    true
                }
                "quit" | "exit" => false,
                other => {
                    let message = format!("Unknown command `{other}` (try `help`)");
                    writeln!(self.output, "{}", warn_line(&self.theme, &message))?;
                    true
                }
            };

            if !keep_going {
                break;
            }
        }
        Ok(())
    }

    /// Print `label` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn search(&mut self, inline: &str) -> Result<bool> {
        let term = if inline.is_empty() {
            match self.prompt("Search term: ")? {
                Some(term) => term,
                None => return Ok(false),
            }
        } else {
            inline.to_string()
        };

        match self.session.search(&term) {
            Ok(records) if records.is_empty() => {
                writeln!(self.output, "{}", info_line(&self.theme, "Info", "No results found"))?;
            }
            Ok(records) => writeln!(self.output, "{}", policy_table(&records))?,
            Err(e) => self.report(&e, "Error searching clients")?,
        }
        Ok(true)
    }

    fn add_client(&mut self) -> Result<bool> {
        let Some(name) = self.prompt("Client Name: ")? else { return Ok(false) };
        let Some(contact) = self.prompt("Contact Number: ")? else { return Ok(false) };
        let Some(email) = self.prompt("Email Address: ")? else { return Ok(false) };

        match self.session.add_client(&name, &contact, &email) {
            Ok(client) => {
                let message = format!("Client added successfully (id {})", client.id);
                writeln!(self.output, "{}", success_line(&self.theme, &message))?;
            }
            Err(e) => self.report(&e, "Error adding client")?,
        }
        Ok(true)
    }

    fn add_policy(&mut self) -> Result<bool> {
        let mut form = PolicyForm::default();
        let fields: [(&str, &mut String); 6] = [
            ("Policy Type: ", &mut form.policy_type),
            ("Insurance Company: ", &mut form.company),
            ("Policy Number: ", &mut form.policy_number),
            ("Investment Amount: ", &mut form.investment_amount),
            ("Start Date (optional): ", &mut form.start_date),
            ("End Date (optional): ", &mut form.end_date),
        ];
        for (label, slot) in fields {
            match self.prompt(label)? {
                Some(value) => *slot = value,
                None => return Ok(false),
            }
        }

        match self.session.add_policy(&form) {
            Ok(policy) => {
                let message = format!("Policy added successfully (id {})", policy.id);
                writeln!(self.output, "{}", success_line(&self.theme, &message))?;
            }
            Err(e) => self.report(&e, "Error adding policy")?,
        }
        Ok(true)
    }

    fn select(&mut self, arg: &str) -> Result<bool> {
        let Ok(id) = arg.parse::<i64>() else {
            writeln!(self.output, "{}", warn_line(&self.theme, "Usage: select <client id>"))?;
            return Ok(true);
        };

        match self.session.select_client(id) {
            Ok(client) => {
                let message = format!("Current client: {} (id {})", client.name, client.id);
                writeln!(self.output, "{}", success_line(&self.theme, &message))?;
            }
            Err(e) => self.report(&e, "Error selecting client")?,
        }
        Ok(true)
    }

    fn current(&mut self) -> Result<bool> {
        let value = match self.session.current_client() {
            Some(id) => match self.session.store().get_client(id) {
                Ok(Some(client)) => format!("{} (id {})", client.name, client.id),
                Ok(None) => format!("id {id}"),
                Err(e) => {
                    self.report(&e, "Error loading client")?;
                    return Ok(true);
                }
            },
            None => "none".to_string(),
        };
        writeln!(self.output, "{}", info_line(&self.theme, "Current client", &value))?;
        Ok(true)
    }

    fn stats(&mut self) -> Result<bool> {
        match self.session.store().stats() {
            Ok(stats) => {
                let clients = stats.clients.to_string();
                let policies = stats.policies.to_string();
                writeln!(self.output, "{}", stats_table(&[("Clients", &clients), ("Policies", &policies)]))?;
            }
            Err(e) => self.report(&e, "Error reading statistics")?,
        }
        Ok(true)
    }

    /// Validation problems are warnings; everything else is an error
    fn report(&mut self, err: &crate::Error, context: &str) -> Result<()> {
        let line = if err.is_validation() {
            warn_line(&self.theme, &err.to_string())
        } else {
            tracing::error!("{}: {}", context, err);
            error_line(&self.theme, &format!("{context}: {err}"))
        };
        writeln!(self.output, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;
    use std::io::Cursor;

    fn run_script(session: &mut Session, script: &str) -> String {
        let mut output = Vec::new();
        Shell::new(session, Cursor::new(script.as_bytes()), &mut output, Theme::plain())
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn session() -> Session {
        Session::new(SqliteStore::open_in_memory().unwrap())
    }

    #[test]
    fn test_client_policy_search_flow() {
        let mut session = session();
        let out = run_script(
            &mut session,
            "client\nJane Doe\n555-1234\njane@x.com\n\
             policy\nAuto\nAcme Co\nPOL-100\n999.99\n\n\n\
             search jane\nquit\n",
        );

        assert!(out.contains("Client added successfully (id 1)"));
        assert!(out.contains("Policy added successfully (id 1)"));
        assert!(out.contains("Jane Doe"));
        assert!(out.contains("$999.99"));
        assert_eq!(session.current_client(), Some(1));
    }

    #[test]
    fn test_errors_keep_shell_running() {
        let mut session = session();
        let out = run_script(
            &mut session,
            "policy\nAuto\nAcme Co\nP-1\n10\n\n\n\
             client\n \n\n\n\
             search\n   \n\
             search nobody\n\
             frobnicate\n\
             current\n",
        );

        assert!(out.contains("Please add or search for a client first"));
        assert!(out.contains("Please enter client name"));
        assert!(out.contains("Please enter a search term"));
        assert!(out.contains("No results found"));
        assert!(out.contains("Unknown command `frobnicate`"));
        assert!(out.contains("Current client: none"));
        assert_eq!(session.store().count_clients().unwrap(), 0);
    }

    #[test]
    fn test_select_then_policy() {
        let mut session = session();
        let alice = session.add_client("Alice", "", "").unwrap();
        session.add_client("Bob", "", "").unwrap();

        let out = run_script(
            &mut session,
            &format!("select {}\npolicy\nLife\nZurich\nL-1\nabc\n\n\nselect x\nselect 99\n", alice.id),
        );

        assert!(out.contains("Current client: Alice"));
        assert!(out.contains("Please enter a valid investment amount"));
        assert!(out.contains("Usage: select <client id>"));
        assert!(out.contains("No client with id 99"));
        assert_eq!(session.current_client(), Some(alice.id));
    }

    #[test]
    fn test_eof_mid_form_ends_quietly() {
        let mut session = session();
        run_script(&mut session, "client\nHalf Typed\n");
        assert_eq!(session.store().count_clients().unwrap(), 0);
    }
}
