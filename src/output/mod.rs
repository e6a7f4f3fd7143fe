pub mod formatter;
pub mod report;

pub use formatter::{
    format_amount, format_assessment, format_breakdown, format_probability, format_schedule,
    should_use_colors,
};
pub use report::{read_report, write_report};
