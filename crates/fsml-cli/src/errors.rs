use colored::*;
use fsml_engine::{CompileError, Engine, EngineError};
use fsml_syntax::Span;
use std::fmt;

/// Error with location, source excerpt and hints, printed to stderr.
pub struct EnhancedError {
    pub message: String,
    pub span: Option<Span>,
    pub file: Option<String>,
    pub source: Option<String>,
    pub suggestion: Option<String>,
    pub help: Option<String>,
}

impl EnhancedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            file: None,
            source: None,
            suggestion: None,
            help: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.message.bold());

        if let Some(file) = &self.file {
            match &self.span {
                Some(span) => eprintln!("  {} {}:{}:{}", "-->".blue().bold(), file, span.line, span.col),
                None => eprintln!("  {} {}", "-->".blue().bold(), file),
            }
        }

        if let (Some(source), Some(span)) = (&self.source, &self.span) {
            eprintln!();
            self.display_source_with_span(source, span);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!();
            eprintln!("{} {}", "suggestion:".green().bold(), suggestion);
        }

        if let Some(help) = &self.help {
            eprintln!();
            eprintln!("{} {}", "help:".cyan().bold(), help);
        }
    }

    fn display_source_with_span(&self, source: &str, span: &Span) {
        let lines: Vec<&str> = source.lines().collect();
        let line_idx = span.line.saturating_sub(1);

        if line_idx >= lines.len() {
            return;
        }

        let max_line = (span.line + 2).min(lines.len());
        let line_num_width = max_line.to_string().len();

        // two lines of context on each side
        let start = line_idx.saturating_sub(2);
        let end = (line_idx + 3).min(lines.len());

        for (i, line) in lines.iter().enumerate().take(end).skip(start) {
            let line_num = i + 1;

            if line_num == span.line {
                eprintln!(
                    "{:>width$} {} {}",
                    line_num.to_string().blue().bold(),
                    "|".blue().bold(),
                    line,
                    width = line_num_width
                );

                let spaces = " ".repeat(span.col.saturating_sub(1));
                let carets = "^".repeat((span.end.saturating_sub(span.start)).max(1));
                eprintln!(
                    "{:>width$} {} {}{}",
                    "",
                    "|".blue().bold(),
                    spaces,
                    carets.red().bold(),
                    width = line_num_width
                );
            } else {
                eprintln!(
                    "{:>width$} {} {}",
                    line_num.to_string().dimmed(),
                    "|".blue().bold(),
                    line,
                    width = line_num_width
                );
            }
        }
    }
}

impl fmt::Display for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnhancedError: {}", self.message)
    }
}

impl std::error::Error for EnhancedError {}

/// One enhanced error per syntax error or validation message.
pub fn enhance_compile_error(err: &CompileError, file: &str, source: &str) -> Vec<EnhancedError> {
    match err {
        CompileError::Syntax(errors) => errors
            .errors()
            .iter()
            .map(|e| {
                let mut enhanced = EnhancedError::new(format!("Syntax error: {}", e))
                    .with_file(file)
                    .with_source(source)
                    .with_help("Every element needs a matching </name> and attributes look like name=\"value\"");
                if let Some(span) = e.span() {
                    enhanced = enhanced.with_span(span);
                }
                enhanced
            })
            .collect(),
        CompileError::Validation(errors) => errors
            .messages()
            .iter()
            .map(|message| with_validation_hint(EnhancedError::new(message.clone()).with_file(file), message))
            .collect(),
        CompileError::Io(e) => vec![EnhancedError::new(format!("Failed to read {}: {}", file, e))],
    }
}

fn with_validation_hint(enhanced: EnhancedError, message: &str) -> EnhancedError {
    if message.starts_with("root node is not") || message == "missing Schema node" {
        enhanced.with_suggestion("Wrap the whole document in <Schema> ... </Schema>")
    } else if message == "missing States node" {
        enhanced.with_suggestion("Declare states as children of <States> directly under <Schema>")
    } else if message.starts_with("Events node") {
        enhanced.with_suggestion("Move <Events> inside the state that fires them")
    } else if message.starts_with("default events") {
        enhanced.with_help("OnBeforeEvent, OnAfterEvent and OnStateSet may appear under <Schema> or directly under a state")
    } else if message.contains("undeclared state") {
        enhanced.with_suggestion("Declare the state under <States> or fix the spelling")
    } else if message.contains("has no targetState") {
        enhanced.with_suggestion("Add targetState=\"...\" to the event")
    } else if message.starts_with("mismatched closing tag") {
        enhanced.with_help("Close each element with a tag of the same name, or drop --strict")
    } else if message.contains("shares its hook key") {
        enhanced.with_help("Events named 'event' and states named 'state' collide with the global hooks; rename them")
    } else if message.contains("reserved tag name") {
        enhanced.with_help("Schema, States, Events, Task, OnBeforeEvent, OnAfterEvent and OnStateSet cannot name a state")
    } else {
        enhanced
    }
}

pub fn enhance_engine_error(err: &EngineError, engine: &Engine) -> EnhancedError {
    let enhanced = EnhancedError::new(err.to_string());
    match err {
        EngineError::NotAdmissible { state, .. } => {
            let events: Vec<&str> = engine.transitions().events_from(state).collect();
            if events.is_empty() {
                enhanced.with_help(format!("State '{}' has no outgoing events", state))
            } else {
                enhanced.with_help(format!("Events available from '{}': {}", state, events.join(", ")))
            }
        }
        EngineError::TaskNotFound { task, .. } => {
            enhanced.with_suggestion(format!("Register a task named '{}' before triggering", task))
        }
        _ => enhanced,
    }
}
