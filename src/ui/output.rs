//! Message formatting shared by the one-shot commands and the shell.
//!
//! The `*_line` functions only format; the bare functions print with the
//! process-wide theme.

use crate::ui::{theme, Icons, Theme};
use owo_colors::OwoColorize;

pub fn header_line(theme: &Theme, text: &str) -> String {
    format!("{} {}", Icons::SHIELD, text.style(theme.header.clone()))
}

pub fn success_line(theme: &Theme, label: &str) -> String {
    format!("{} {}", Icons::CHECK, label.style(theme.success.clone()))
}

pub fn error_line(theme: &Theme, label: &str) -> String {
    format!("{} {}", Icons::CROSS, label.style(theme.error.clone()))
}

pub fn warn_line(theme: &Theme, label: &str) -> String {
    format!("{} {}", Icons::WARN, label.style(theme.warn.clone()))
}

pub fn info_line(theme: &Theme, label: &str, value: &str) -> String {
    format!(
        "{} {}: {}",
        Icons::INFO.style(theme.info.clone()),
        label.style(theme.dim.clone()),
        value
    )
}

pub fn header(text: &str) {
    println!("{}", header_line(theme(), text));
}

pub fn success(label: &str) {
    println!("{}", success_line(theme(), label));
}

pub fn error(label: &str) {
    eprintln!("{}", error_line(theme(), label));
}

pub fn warn(label: &str) {
    eprintln!("{}", warn_line(theme(), label));
}

pub fn info(label: &str, value: &str) {
    println!("{}", info_line(theme(), label, value));
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

/// True when the failure is rejected user input rather than a fault
pub fn is_validation_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<crate::Error>()
        .is_some_and(crate::Error::is_validation)
}

/// Print a failed command: rejected input as a warning, anything else as an error
pub fn report_failure(err: &anyhow::Error) {
    if is_validation_failure(err) {
        warn(&err.to_string());
    } else {
        error(&format!("{err:#}"));
    }
}
