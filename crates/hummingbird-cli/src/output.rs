//! Output formatting for human and JSON modes
//!
//! Human mode writes aligned text for a terminal; JSON mode emits one
//! machine-readable document on stdout and keeps diagnostics on stderr.

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn heading(&self, message: &str);
    fn line(&self, message: &str);
    fn notice(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn heading(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn line(&self, message: &str) {
        println!("  {}", message);
    }
    fn notice(&self, message: &str) {
        println!("\u{2139} {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn print_json(&self, _value: &serde_json::Value) {}
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn heading(&self, _message: &str) {}
    fn line(&self, _message: &str) {}
    fn notice(&self, _message: &str) {}
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter),
    }
}

/// Pads or truncates `text` to exactly `width` characters
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text:<width$}")
    } else if width == 0 {
        String::new()
    } else {
        let mut out: String = text.chars().take(width - 1).collect();
        out.push('\u{2026}');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_short_text() {
        assert_eq!(fit("abc", 6), "abc   ");
    }

    #[test]
    fn test_fit_truncates_long_text() {
        assert_eq!(fit("BERKSHIRE HATHAWAY INC", 10), "BERKSHIRE\u{2026}");
        assert_eq!(fit("BERKSHIRE HATHAWAY INC", 10).chars().count(), 10);
    }

    #[test]
    fn test_fit_exact_and_zero_width() {
        assert_eq!(fit("abc", 3), "abc");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn test_output_format_from_flag() {
        assert!(OutputFormat::from_flag(true).is_json());
        assert_eq!(OutputFormat::from_flag(false), OutputFormat::Human);
    }
}
