mod output;
mod terminal;

pub use output::{spinner, spinner_error, spinner_success, status_line};
pub use terminal::Terminal;
