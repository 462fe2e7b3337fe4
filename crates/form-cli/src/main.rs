mod wizard;

use clap::{Parser, Subcommand, ValueEnum};
use form_spec::{
    AnswerMap, ExternalDataMap, Form, apply_defaults, build_render_payload, flatten, is_screen_answered,
    locate_with_policy, navigable_sections, render_json_ui, render_text, resume_screen, validate,
};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wizard::{Verbosity, WizardSession};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const LOG_ENV: &str = "FORM_WIZARD_LOG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Inspect and walk multi-step form definitions",
    long_about = "Flattens form definitions into wizard screens, locates the resume screen for saved answers, and runs a text wizard"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
struct Inputs {
    /// Path to the form definition JSON.
    #[arg(long, value_name = "FORM")]
    form: PathBuf,
    /// Optional JSON file containing saved answers.
    #[arg(long, value_name = "ANSWERS")]
    answers: Option<PathBuf>,
    /// Optional JSON file containing external data.
    #[arg(long, value_name = "EXTERNAL")]
    external: Option<PathBuf>,
    /// Fill unanswered fields from their default values before evaluating.
    #[arg(long)]
    with_defaults: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the flattened screens of a form.
    Screens {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the screen a returning user resumes on.
    Locate {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// List the sections shown in the progress sidebar.
    Sections {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Render the current wizard state.
    Render {
        #[command(flatten)]
        inputs: Inputs,
        /// Screen index to display instead of the resume screen.
        #[arg(long)]
        screen: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Report structural defects in a form definition.
    Check {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
    },
    /// Print the JSON Schema of form definitions.
    Schema,
    /// Walk the form one screen at a time in a text shell.
    Wizard {
        #[command(flatten)]
        inputs: Inputs,
        /// Write the collected answers here instead of stdout.
        #[arg(long, value_name = "OUT")]
        out: Option<PathBuf>,
        /// Show verbose output (progress and sidebar).
        #[arg(long, alias = "debug")]
        verbose: bool,
    },
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Screens { inputs, format } => run_screens(&inputs, format),
        Command::Locate { inputs } => run_locate(&inputs),
        Command::Sections { inputs, format } => run_sections(&inputs, format),
        Command::Render {
            inputs,
            screen,
            format,
        } => run_render(&inputs, screen, format),
        Command::Check { form } => run_check(&form),
        Command::Schema => run_schema(),
        Command::Wizard {
            inputs,
            out,
            verbose,
        } => run_wizard(&inputs, out, verbose),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json(path: &Path) -> CliResult<Value> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    let value = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse {}: {}", path.display(), err))?;
    Ok(value)
}

fn load_form(path: &Path) -> CliResult<Form> {
    let value = read_json(path)?;
    let form: Form = serde_json::from_value(value)
        .map_err(|err| format!("invalid form definition {}: {}", path.display(), err))?;
    debug!(form = %form.id, path = %path.display(), "loaded form");
    Ok(form)
}

fn load_map(path: Option<&Path>) -> CliResult<AnswerMap> {
    match path {
        Some(path) => Ok(AnswerMap::from_value(read_json(path)?)),
        None => Ok(AnswerMap::new()),
    }
}

struct Loaded {
    form: Form,
    answers: AnswerMap,
    external: ExternalDataMap,
}

impl Inputs {
    fn load(&self) -> CliResult<Loaded> {
        let form = load_form(&self.form)?;
        let external = load_map(self.external.as_deref())?;
        let mut answers = load_map(self.answers.as_deref())?;
        if self.with_defaults {
            answers = apply_defaults(&form, &answers, &external);
            debug!(form = %form.id, "applied default values");
        }
        Ok(Loaded {
            form,
            answers,
            external,
        })
    }
}

fn index_label(index: Option<usize>) -> String {
    index.map_or_else(|| "-".to_string(), |index| index.to_string())
}

fn run_screens(inputs: &Inputs, format: OutputFormat) -> CliResult<()> {
    let loaded = inputs.load()?;
    let policy = loaded.form.policy();
    let screens = flatten(&loaded.form, &loaded.answers, &loaded.external)?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&screens)?);
        }
        OutputFormat::Text => {
            for (index, screen) in screens.iter().enumerate() {
                let mut flags = Vec::new();
                if !screen.is_navigable {
                    flags.push("hidden");
                }
                if is_screen_answered(screen, &loaded.answers, policy) {
                    flags.push("answered");
                }
                let mut line = format!(
                    "{:>3} {} [{}] section={} sub={}",
                    index,
                    screen.id,
                    screen.kind_label(),
                    index_label(screen.section_index),
                    index_label(screen.sub_section_index)
                );
                if !flags.is_empty() {
                    line.push_str(&format!(" ({})", flags.join(", ")));
                }
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn run_locate(inputs: &Inputs) -> CliResult<()> {
    let loaded = inputs.load()?;
    let policy = loaded.form.policy();
    let screens = flatten(&loaded.form, &loaded.answers, &loaded.external)?;
    let located = locate_with_policy(&screens, &loaded.answers, policy);
    let resume = resume_screen(&screens, &loaded.answers, policy);
    let output = json!({
        "located": located,
        "located_id": screens.get(located).map(|screen| screen.id.clone()),
        "resume": resume,
        "resume_id": resume.map(|index| screens[index].id.clone()),
        "total": screens.len(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_sections(inputs: &Inputs, format: OutputFormat) -> CliResult<()> {
    let loaded = inputs.load()?;
    let sections = navigable_sections(&loaded.form, &loaded.answers, &loaded.external)?;
    match format {
        OutputFormat::Json => {
            let output = sections
                .iter()
                .map(|section| {
                    json!({
                        "index": section.index,
                        "id": section.id(),
                        "title": section.title(),
                        "sub_sections": section
                            .sub_sections
                            .iter()
                            .map(|sub| json!({
                                "index": sub.index,
                                "id": sub.sub_section.id,
                                "title": sub.sub_section.title,
                            }))
                            .collect::<Vec<_>>(),
                    })
                })
                .collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            for section in &sections {
                println!("{} {}", section.index, section.title());
                for sub in &section.sub_sections {
                    println!("  {}.{} {}", section.index, sub.index, sub.sub_section.title);
                }
            }
        }
    }
    Ok(())
}

fn run_render(inputs: &Inputs, screen: Option<usize>, format: OutputFormat) -> CliResult<()> {
    let loaded = inputs.load()?;
    let payload = build_render_payload(&loaded.form, &loaded.answers, &loaded.external, screen)?;
    match format {
        OutputFormat::Text => println!("{}", render_text(&payload)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&render_json_ui(&payload))?
        ),
    }
    Ok(())
}

fn run_check(path: &Path) -> CliResult<()> {
    let form = load_form(path)?;
    let result = validate(&form);
    if result.valid {
        println!("Form '{}' is valid.", form.id);
        return Ok(());
    }
    eprintln!("Validation errors:");
    for error in &result.errors {
        eprintln!(
            "  {}: {} ({})",
            error.node_id.as_deref().unwrap_or("<empty id>"),
            error.message,
            error.code
        );
    }
    Err(format!("form '{}' has {} defect(s)", form.id, result.errors.len()).into())
}

fn run_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(Form);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn run_wizard(inputs: &Inputs, out: Option<PathBuf>, verbose: bool) -> CliResult<()> {
    let loaded = inputs.load()?;
    let stdin = std::io::stdin();
    let mut session = WizardSession::new(
        &loaded.form,
        loaded.answers,
        &loaded.external,
        Verbosity::from(verbose),
    );
    let answers = session.run(&mut stdin.lock())?;
    let pretty = serde_json::to_string_pretty(&answers)?;
    match out {
        Some(path) => {
            fs::write(&path, format!("{}\n", pretty))
                .map_err(|err| format!("failed to write {}: {}", path.display(), err))?;
            println!("Answers written to {}", path.display());
        }
        None => println!("{}", pretty),
    }
    Ok(())
}
