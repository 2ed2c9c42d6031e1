use colored::Colorize;
use serde_json::Value;

/// Pretty-print the calculator output (or a defaults record) to stdout.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{}: could not serialize output: {}", "error".red().bold(), e),
    }
}
