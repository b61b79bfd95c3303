pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, report_failure, success, summary_row, warn};
pub use table::{TableBuilder, format_amount, policy_table, stats_table};
pub use theme::{theme, Theme};
