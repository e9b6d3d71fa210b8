//! BloggerAI - plan and draft blog content with a generative model.
//!
//! Turns a keyword list, SEO notes and an ideal-customer profile into a
//! publishing calendar, then writes full articles for the topics you pick.

#![allow(clippy::single_match_else)]

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bloggerai::ai::{create_provider, AIProvider};
use bloggerai::core::{
    calendar_table, find_topic, load_calendar, next_monday, write_article, write_calendar,
    Article, CalendarEntry, CalendarRequest, Config, ExportFormat, NoticeLevel, Session,
};

/// Plan a blog calendar and draft its articles with AI
#[derive(Parser)]
#[command(name = "bloggerai")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a publishing calendar and export it
    Calendar {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        plan: PlanArgs,

        /// Export format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },

    /// Write the article for one topic of an exported calendar
    Article {
        #[command(flatten)]
        inputs: InputArgs,

        /// Calendar file exported by the calendar command (CSV or JSON)
        #[arg(short, long, value_name = "FILE")]
        calendar: PathBuf,

        /// Topic number as shown in the calendar table (1-based)
        #[arg(
            value_parser = clap::value_parser!(u64).range(1..),
            required_unless_present = "topic",
            conflicts_with = "topic"
        )]
        number: Option<u64>,

        /// Pick the topic by fuzzy title match instead of number
        #[arg(short, long)]
        topic: Option<String>,

        /// Directory to write the article to
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Also print the article to stdout
        #[arg(short, long)]
        print: bool,
    },

    /// Generate a calendar, then pick topics to write interactively
    Plan {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Show the configured model provider and whether it is reachable
    Status,

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// The three planning inputs.
#[derive(Args)]
struct InputArgs {
    /// Keywords JSON: an array of strings or {"all_keywords": [...]}
    #[arg(short, long, value_name = "FILE")]
    keywords: PathBuf,

    /// SEO insights text file
    #[arg(short, long, value_name = "FILE")]
    seo: PathBuf,

    /// Ideal customer profile JSON object
    #[arg(short, long, value_name = "FILE")]
    icp: PathBuf,
}

/// Calendar request options.
#[derive(Args)]
struct PlanArgs {
    /// First publishing date, YYYY-MM-DD (default: next Monday)
    #[arg(long, value_name = "DATE")]
    start: Option<NaiveDate>,

    /// Calendar duration in months (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    months: Option<u32>,

    /// Posts per week (1-7)
    #[arg(short = 'w', long, value_parser = clap::value_parser!(u32).range(1..=7))]
    per_week: Option<u32>,

    /// Directory to write exports to
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    // Without --verbose the crate's own events are already shown as notices
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn,bloggerai=off")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    // Handle commands
    match cli.command {
        Commands::Calendar { inputs, plan, format } => {
            cmd_calendar(&inputs, &plan, format)?;
        }
        Commands::Article { inputs, calendar, number, topic, output, print } => {
            let selection = match (number, topic) {
                (Some(number), _) => TopicSelection::Number(number),
                (None, Some(query)) => TopicSelection::Title(query),
                (None, None) => anyhow::bail!("Give a topic number or --topic"),
            };
            cmd_article(&inputs, &calendar, selection, output, print)?;
        }
        Commands::Plan { inputs, plan } => {
            cmd_plan(&inputs, &plan)?;
        }
        Commands::Status => {
            cmd_status()?;
        }
        Commands::Config { path } => {
            cmd_config(path)?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// How the `article` command picks its topic.
enum TopicSelection {
    Number(u64),
    Title(String),
}

/// Generate a calendar and export it.
fn cmd_calendar(inputs: &InputArgs, plan: &PlanArgs, format: ExportFormat) -> Result<()> {
    let config = Config::load()?;
    let mut session = open_session(inputs)?;
    let request = calendar_request(plan, &config)?;
    let provider = create_provider(&config.ai)?;

    let rt = tokio::runtime::Runtime::new()?;
    let entries = generate_calendar(&rt, &mut session, provider.as_ref(), request)?;

    print!("\n{}", calendar_table(&entries));

    let dir = plan.output.clone().unwrap_or_else(|| config.output_dir());
    let path = write_calendar(&entries, &dir, format, &Local::now())?;
    println!("\nCalendar saved to {}", path.display());

    Ok(())
}

/// Generate one article from an exported calendar.
fn cmd_article(
    inputs: &InputArgs,
    calendar: &Path,
    selection: TopicSelection,
    output: Option<PathBuf>,
    print: bool,
) -> Result<()> {
    let config = Config::load()?;
    let mut session = open_session(inputs)?;

    session.set_calendar(load_calendar(calendar)?);
    report(&mut session);

    let index = match selection {
        TopicSelection::Number(number) => usize::try_from(number - 1)?,
        TopicSelection::Title(query) => find_topic(session.calendar(), &query)
            .ok_or_else(|| anyhow::anyhow!("No calendar topic matches '{query}'"))?,
    };

    let provider = create_provider(&config.ai)?;
    let rt = tokio::runtime::Runtime::new()?;

    let Some(article) =
        generate_article(&rt, &mut session, provider.as_ref(), index, config.article.extra_keywords)?
    else {
        return Ok(());
    };

    let dir = output.unwrap_or_else(|| config.output_dir());
    let path = write_article(&article, &dir)?;
    println!("Article saved to {}", path.display());

    if print {
        println!("\n{}", article.to_markdown());
    }

    Ok(())
}

/// Interactive session: one calendar, any number of articles.
fn cmd_plan(inputs: &InputArgs, plan: &PlanArgs) -> Result<()> {
    let config = Config::load()?;
    let mut session = open_session(inputs)?;
    let request = calendar_request(plan, &config)?;
    let provider = create_provider(&config.ai)?;
    let dir = plan.output.clone().unwrap_or_else(|| config.output_dir());

    let rt = tokio::runtime::Runtime::new()?;
    let entries = generate_calendar(&rt, &mut session, provider.as_ref(), request)?;

    print!("\n{}", calendar_table(&entries));
    let path = write_calendar(&entries, &dir, ExportFormat::Csv, &Local::now())?;
    println!("\nCalendar saved to {}", path.display());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nTopic number or title (Enter to quit): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            break;
        }

        let index = if let Ok(number) = input.parse::<usize>() {
            match number.checked_sub(1) {
                Some(index) => index,
                None => {
                    eprintln!("⚠ Topic numbers start at 1");
                    continue;
                }
            }
        } else {
            match find_topic(session.calendar(), input) {
                Some(index) => index,
                None => {
                    eprintln!("⚠ No calendar topic matches '{input}'");
                    continue;
                }
            }
        };

        println!("Writing topic {}...", index + 1);
        match generate_article(
            &rt,
            &mut session,
            provider.as_ref(),
            index,
            config.article.extra_keywords,
        ) {
            Ok(Some(article)) => {
                let path = write_article(&article, &dir)?;
                println!("Article saved to {}", path.display());
            }
            Ok(None) => {}
            Err(e) => eprintln!("✗ {e:#}"),
        }
    }

    println!("\n{} article(s) written this session", session.articles().len());
    Ok(())
}

/// Show the configured provider.
fn cmd_status() -> Result<()> {
    let config = Config::load()?;

    println!("Provider: {}", config.ai.provider);

    let provider = match create_provider(&config.ai) {
        Ok(provider) => provider,
        Err(e) => {
            println!("Status:   not configured ({e})");
            return Ok(());
        }
    };

    println!("Model:    {}", provider.model());

    let rt = tokio::runtime::Runtime::new()?;
    if rt.block_on(provider.is_available()) {
        println!("Status:   available");
    } else {
        println!("Status:   unreachable");
    }

    Ok(())
}

/// Show configuration.
fn cmd_config(show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_dir() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let config = Config::load()?;
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "bloggerai", &mut io::stdout());
}

/// Start a session with the three inputs loaded.
fn open_session(inputs: &InputArgs) -> Result<Session> {
    let mut session = Session::new();
    let result = session.load_inputs(&inputs.keywords, &inputs.seo, &inputs.icp);
    report(&mut session);
    result?;
    Ok(session)
}

fn calendar_request(plan: &PlanArgs, config: &Config) -> Result<CalendarRequest> {
    let start = plan.start.unwrap_or_else(|| next_monday(Local::now().date_naive()));
    let months = plan.months.unwrap_or(config.calendar.duration_months);
    let per_week = plan.per_week.unwrap_or(config.calendar.posts_per_week);
    Ok(CalendarRequest::new(start, months, per_week)?)
}

fn generate_calendar(
    rt: &tokio::runtime::Runtime,
    session: &mut Session,
    provider: &dyn AIProvider,
    request: CalendarRequest,
) -> Result<Vec<CalendarEntry>> {
    println!("Generating a {}-month calendar from {}...", request.duration_months, request.start());
    let result = rt.block_on(session.generate_calendar(provider, request)).map(<[_]>::to_vec);
    report(session);
    Ok(result?)
}

fn generate_article(
    rt: &tokio::runtime::Runtime,
    session: &mut Session,
    provider: &dyn AIProvider,
    index: usize,
    extra_keywords: usize,
) -> Result<Option<Article>> {
    let result = rt
        .block_on(session.generate_article(provider, index, extra_keywords))
        .map(|article| article.cloned());
    report(session);
    Ok(result?)
}

/// Print and drain the session's notices.
fn report(session: &mut Session) {
    for notice in session.take_notices() {
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Info => println!("  {}", notice.message),
            NoticeLevel::Warning => eprintln!("⚠ {}", notice.message),
            // Hard errors are returned to the caller, which reports them
            NoticeLevel::Error => {}
        }
    }
}
