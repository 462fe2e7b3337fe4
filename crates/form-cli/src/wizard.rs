use std::io::BufRead;

use form_spec::{
    AnswerMap, ExternalDataMap, Field, FieldKind, FlattenedScreen, Form, ScreenRef,
    expand_repeater, flatten, next_screen, progress, resolve_defaults, resume_screen,
};
use serde_json::{Number, Value};
use tracing::debug;

use crate::CliResult;

/// How much the wizard prints around each prompt.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Progress counter, screen title and field prompts.
    Clean,
    /// Also the form description, each screen's id, kind and section
    /// placement, and the expected format after a rejected answer.
    Verbose,
}

impl From<bool> for Verbosity {
    fn from(verbose: bool) -> Self {
        if verbose { Self::Verbose } else { Self::Clean }
    }
}

impl Verbosity {
    fn is_verbose(self) -> bool {
        self == Self::Verbose
    }
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// Text wizard walking the navigable screens of a form.
///
/// Starts on the resume screen for the given answers and re-flattens after
/// every screen, since new answers may show or hide later screens.
pub struct WizardSession<'a> {
    form: &'a Form,
    answers: AnswerMap,
    external: &'a ExternalDataMap,
    verbosity: Verbosity,
}

impl<'a> WizardSession<'a> {
    pub fn new(
        form: &'a Form,
        answers: AnswerMap,
        external: &'a ExternalDataMap,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            form,
            answers,
            external,
            verbosity,
        }
    }

    pub fn run<R: BufRead>(&mut self, input: &mut R) -> CliResult<AnswerMap> {
        println!("Form: {}", self.form.title);
        if self.verbosity.is_verbose()
            && let Some(description) = &self.form.description
        {
            println!("Help: {}", description);
        }

        let policy = self.form.policy();
        let screens = flatten(self.form, &self.answers, self.external)?;
        let Some(mut current) = resume_screen(&screens, &self.answers, policy) else {
            println!("No navigable screens are available; check your conditional logic.");
            return Ok(self.answers.clone());
        };

        loop {
            let screens = flatten(self.form, &self.answers, self.external)?;
            if screens[current].is_navigable {
                self.show_screen(&screens, current);
                self.ask_screen(&screens[current], input)?;
            }
            let screens = flatten(self.form, &self.answers, self.external)?;
            match next_screen(&screens, current) {
                Some(next) => current = next,
                None => break,
            }
        }

        println!("Done ✅");
        Ok(self.answers.clone())
    }

    fn show_screen(&self, screens: &[FlattenedScreen<'_>], current: usize) {
        let screen = &screens[current];
        let report = progress(screens, current);
        println!(
            "{}/{} {}",
            report.position,
            report.navigable_total,
            screen.node.title()
        );
        if self.verbosity.is_verbose() {
            println!(
                "Screen: {} [{}] section={:?} sub={:?}",
                screen.id,
                screen.kind_label(),
                screen.section_index,
                screen.sub_section_index
            );
        }
    }

    fn ask_screen<R: BufRead>(
        &mut self,
        screen: &FlattenedScreen<'a>,
        input: &mut R,
    ) -> CliResult<()> {
        match screen.node {
            ScreenRef::Field(field) => self.ask_field(field, &screen.id, input),
            ScreenRef::MultiField(multi) => {
                let prefix = screen
                    .id
                    .strip_suffix(multi.id.as_str())
                    .unwrap_or_default()
                    .to_string();
                for field in &multi.children {
                    let id = format!("{}{}", prefix, field.id);
                    if field.kind.collects_answer() && !screen.answer_ids.contains(&id) {
                        continue;
                    }
                    self.ask_field(field, &id, input)?;
                }
                Ok(())
            }
            ScreenRef::Repeater(repeater) => {
                if self.answers.has_value(&screen.id, self.form.policy()) {
                    return Ok(());
                }
                let count = self.ask_entry_count(&repeater.title, input)?;
                self.answers.insert(
                    &screen.id,
                    Value::Array(vec![Value::Object(Default::default()); count]),
                );
                for entry in 0..count {
                    println!("Entry {} of {}", entry + 1, count);
                    let entry_screens = expand_repeater(
                        self.form,
                        &screen.id,
                        entry,
                        &self.answers,
                        self.external,
                    )?;
                    for entry_screen in entry_screens.iter().filter(|screen| screen.is_navigable) {
                        self.ask_screen(entry_screen, input)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn ask_entry_count<R: BufRead>(&self, title: &str, input: &mut R) -> CliResult<usize> {
        loop {
            println!("How many entries for {}? (integer)", title);
            let line = read_line(input)?;
            match line.trim().parse::<usize>() {
                Ok(count) => return Ok(count),
                Err(_) => eprintln!("Invalid answer: enter a whole number"),
            }
        }
    }

    fn ask_field<R: BufRead>(&mut self, field: &Field, id: &str, input: &mut R) -> CliResult<()> {
        if !field.kind.collects_answer() {
            println!("{}", field.title);
            if let Some(description) = &field.description {
                println!("{}", description);
            }
            return Ok(());
        }
        if self.answers.has_value(id, self.form.policy()) {
            return Ok(());
        }

        let defaults = resolve_defaults(self.form, &self.answers, self.external);
        let default = defaults.get(id).cloned();
        loop {
            println!("{}", prompt_line(field, default.as_ref()));
            if let Some(description) = &field.description {
                println!("{}", description);
            }
            let line = read_line(input)?;
            match parse_answer(field, &line, default.as_ref()) {
                Ok(Some(value)) => {
                    debug!(field = %id, "stored answer");
                    self.answers.insert(id, value);
                    return Ok(());
                }
                Ok(None) => return Ok(()),
                Err(error) => self.show_parse_error(&error),
            }
        }
    }

    fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            eprintln!("  Expected: {}", debug);
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> CliResult<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err("input ended before the form was complete".into());
    }
    Ok(line)
}

fn prompt_line(field: &Field, default: Option<&Value>) -> String {
    let mut line = format!("  {}", field.title);
    if field.required {
        line.push_str(" *");
    }
    if let Some(hint) = kind_hint(field) {
        line.push(' ');
        line.push_str(&hint);
    }
    if let Some(default) = default {
        line.push_str(&format!(" [default: {}]", display_value(default)));
    }
    line
}

fn kind_hint(field: &Field) -> Option<String> {
    match field.kind {
        FieldKind::Checkbox | FieldKind::ExternalDataProvider => {
            Some("(yes/no, y/n, true/false)".to_string())
        }
        FieldKind::Number => Some("(number)".to_string()),
        FieldKind::Date => Some("(YYYY-MM-DD)".to_string()),
        FieldKind::Radio | FieldKind::Select if !field.options.is_empty() => {
            let values: Vec<&str> = field
                .options
                .iter()
                .map(|option| option.value.as_str())
                .collect();
            Some(format!("({})", values.join("/")))
        }
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Converts one line of user input into the answer stored for `field`.
///
/// `Ok(None)` means an optional field was skipped.
pub fn parse_answer(
    field: &Field,
    raw: &str,
    default: Option<&Value>,
) -> Result<Option<Value>, AnswerParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        if let Some(default) = default {
            return Ok(Some(default.clone()));
        }
        if field.required {
            return Err(AnswerParseError::new("an answer is required", None));
        }
        return Ok(None);
    }

    let value = match field.kind {
        FieldKind::Number => {
            if let Ok(integer) = trimmed.parse::<i64>() {
                Value::Number(integer.into())
            } else {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| {
                        AnswerParseError::new("not a number", Some("e.g. 42 or 3.5".into()))
                    })?
            }
        }
        FieldKind::Checkbox => Value::Bool(parse_bool(trimmed).ok_or_else(|| {
            AnswerParseError::new("expected yes or no", Some("yes/no, y/n, true/false".into()))
        })?),
        FieldKind::ExternalDataProvider => {
            let consent = parse_bool(trimmed).ok_or_else(|| {
                AnswerParseError::new("expected yes or no", Some("yes/no, y/n, true/false".into()))
            })?;
            if field.required && !consent {
                return Err(AnswerParseError::new(
                    "consent is required to continue",
                    None,
                ));
            }
            Value::Bool(consent)
        }
        FieldKind::Radio | FieldKind::Select => {
            let by_index = trimmed
                .parse::<usize>()
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| field.options.get(index));
            let option = field
                .options
                .iter()
                .find(|option| option.value == trimmed)
                .or(by_index)
                .ok_or_else(|| {
                    let values: Vec<&str> = field
                        .options
                        .iter()
                        .map(|option| option.value.as_str())
                        .collect();
                    AnswerParseError::new("invalid option", Some(values.join(", ")))
                })?;
            Value::String(option.value.clone())
        }
        _ => Value::String(trimmed.to_string()),
    };
    Ok(Some(value))
}
