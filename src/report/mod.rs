pub mod formatters;

pub use formatters::{OutputFormat, format_deployers, format_farms};
