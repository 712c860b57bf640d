use colored::Colorize;

use safescript_types::{CompileErrors, SafeScriptError, Severity};

/// Formats diagnostics as `file:line:col - <category> <code>: <message>`,
/// followed by the offending source line.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Every stored error, then every stored warning, one block each.
    pub fn render(&self, errors: &CompileErrors) -> String {
        errors
            .errors
            .iter()
            .chain(&errors.warnings)
            .map(|diagnostic| self.format_diagnostic(diagnostic))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_diagnostic(&self, diagnostic: &SafeScriptError) -> String {
        let mut output = format!(
            "{}:{}:{} - {} {}: {}",
            diagnostic.file,
            diagnostic.span.start_line,
            diagnostic.span.start_col,
            self.format_category(diagnostic.severity),
            self.format_code(diagnostic),
            diagnostic.message
        );
        if !diagnostic.source_line.is_empty() {
            output.push_str(&format!(
                "\n  {:>3}   {}",
                diagnostic.span.start_line, diagnostic.source_line
            ));
        }
        if let Some(suggestion) = &diagnostic.suggestion {
            let label = if self.color {
                "  help".dimmed().to_string()
            } else {
                "  help".to_string()
            };
            output.push_str(&format!("\n{label}: {suggestion}"));
        }
        output
    }

    /// Summary line printed after a run, e.g. `Found 2 errors in 1 file.`
    pub fn summary(&self, errors: usize, files: usize) -> String {
        let text = format!(
            "Found {errors} error{} in {files} file{}.",
            if errors == 1 { "" } else { "s" },
            if files == 1 { "" } else { "s" }
        );
        if self.color {
            text.red().bold().to_string()
        } else {
            text
        }
    }

    fn format_category(&self, severity: Severity) -> String {
        let label = severity.prefix();
        if !self.color {
            return label.to_string();
        }
        match severity {
            Severity::Error => label.red().bold().to_string(),
            Severity::Warning => label.yellow().bold().to_string(),
            Severity::Suggestion => label.blue().bold().to_string(),
            Severity::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, diagnostic: &SafeScriptError) -> String {
        let label = diagnostic.code.to_string();
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safescript_types::{ErrorCode, Span};

    fn diagnostic() -> SafeScriptError {
        SafeScriptError::new(
            "app.js",
            ErrorCode::UNEXPECTED_TOKEN,
            "expected ';'",
            Span::new(0, 1, 3, 5, 3, 6),
            "let x = 1 2;",
        )
    }

    #[test]
    fn formats_plain_diagnostic() {
        let reporter = Reporter::new(false);
        assert_eq!(
            reporter.format_diagnostic(&diagnostic()),
            "app.js:3:5 - error E100: expected ';'\n    3   let x = 1 2;"
        );
    }

    #[test]
    fn formats_suggestion_and_severity() {
        let reporter = Reporter::new(false);
        let diagnostic = diagnostic()
            .with_severity(Severity::Warning)
            .with_suggestion("insert ';'");
        let text = reporter.format_diagnostic(&diagnostic);
        assert!(text.starts_with("app.js:3:5 - warning E100"));
        assert!(text.ends_with("\n  help: insert ';'"));
    }

    #[test]
    fn renders_errors_before_warnings() {
        let reporter = Reporter::new(false);
        let mut errors = CompileErrors::empty();
        errors.push(diagnostic().with_severity(Severity::Warning));
        errors.push(diagnostic());
        let text = reporter.render(&errors);
        let first = text.lines().next().unwrap();
        assert!(first.contains("error E100"), "{text}");
    }

    #[test]
    fn summary_pluralizes() {
        let reporter = Reporter::new(false);
        assert_eq!(reporter.summary(1, 1), "Found 1 error in 1 file.");
        assert_eq!(reporter.summary(3, 2), "Found 3 errors in 2 files.");
    }
}
