//! Plain-text rendering of a [`ValidationReport`].
//!
//! ```text
//! Validation Report
//! ==================
//! Total rows: 2
//! Valid: 1
//! Invalid: 1
//!
//! Invalid Entries
//! --------------
//! Row 3 (ID: event456)
//! Error: "nameFr" is a required property
//!
//! ```
//!
//! Valid rows only appear in the counts. The "Invalid Entries" section is
//! left out entirely when every row passed.

use std::fmt;

use crate::models::ValidationReport;

/// Render the fixed-layout text report.
pub fn render_report(report: &ValidationReport) -> String {
    let mut lines = vec![
        "Validation Report".to_string(),
        "==================".to_string(),
        format!("Total rows: {}", report.total),
        format!("Valid: {}", report.valid),
        format!("Invalid: {}", report.invalid),
        String::new(),
    ];

    if report.invalid > 0 {
        lines.push("Invalid Entries".to_string());
        lines.push("--------------".to_string());

        for item in &report.invalid_items {
            lines.push(format!("Row {} (ID: {})", item.row, item.id));
            lines.push(format!("Error: {}", item.error.as_deref().unwrap_or_default()));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_report(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationOutcome;
    use serde_json::json;

    #[test]
    fn test_clean_report_has_no_invalid_section() {
        let mut report = ValidationReport::new("event");
        report.push(ValidationOutcome::valid(2, "event123", json!({})));

        assert_eq!(
            render_report(&report),
            "Validation Report\n==================\nTotal rows: 1\nValid: 1\nInvalid: 0\n"
        );
    }

    #[test]
    fn test_invalid_rows_listed_in_order() {
        let mut report = ValidationReport::new("event");
        report.push(ValidationOutcome::invalid(2, "a", "first", json!({})));
        report.push(ValidationOutcome::valid(3, "b", json!({})));
        report.push(ValidationOutcome::invalid(4, "unknown", "second", json!({})));

        let expected = "Validation Report\n\
                        ==================\n\
                        Total rows: 3\n\
                        Valid: 1\n\
                        Invalid: 2\n\
                        \n\
                        Invalid Entries\n\
                        --------------\n\
                        Row 2 (ID: a)\n\
                        Error: first\n\
                        \n\
                        Row 4 (ID: unknown)\n\
                        Error: second\n";
        assert_eq!(render_report(&report), expected);
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_valid_rows_not_listed() {
        let mut report = ValidationReport::new("place");
        report.push(ValidationOutcome::valid(2, "place123", json!({})));
        report.push(ValidationOutcome::invalid(3, "place456", "bad", json!({})));

        let text = render_report(&report);
        assert!(!text.contains("place123"));
        assert!(text.contains("Row 3 (ID: place456)"));
    }
}
