//! Rendering of advisory reports for external consumers.

use colored::Colorize;

use crate::rules::{AdvisoryReport, Severity};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Format an advisory report based on output options
pub fn format_report(report: &AdvisoryReport, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(report).unwrap_or_default(),
        OutputFormat::Text => format_text_report(report, opts)
    }
}

fn format_text_report(report: &AdvisoryReport, opts: &OutputOptions) -> String {
    let mut output = String::new();

    if report.findings.is_empty() {
        output.push_str("No findings.\n");
    }

    for finding in &report.findings {
        let tag = format!("[{}]", finding.severity);
        let tag = if opts.colored {
            match finding.severity {
                Severity::Critical => tag.red().bold().to_string(),
                Severity::Warning => tag.yellow().to_string(),
                Severity::Info => tag.cyan().to_string()
            }
        } else {
            tag
        };
        output.push_str(&format!(
            "{} {} {}: {}\n",
            tag, finding.rule_id, finding.rule_name, finding.message
        ));
        if let Some(suggestion) = &finding.suggestion {
            output.push_str(&format!("    suggestion: {}\n", suggestion));
        }
        if opts.verbose {
            output.push_str(&format!(
                "    category: {}, position: {}\n",
                finding.category, finding.position
            ));
        }
    }

    output.push_str(&format!(
        "\n{} critical, {} warning, {} info ({} rules run, {} skipped)\n",
        report.critical_count(),
        report.warning_count(),
        report.info_count(),
        report.rules_run,
        report.rules_skipped
    ));

    output
}
