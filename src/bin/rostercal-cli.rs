#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rostercal::{
    filter::FilterMode,
    ical::{IcalOptions, DEFAULT_FILENAME, DEFAULT_PROD_ID},
    io,
    model::{display_date, CalendarEvent},
    session::{Action, Session, StatusKind, PREVIEW_LEN},
    storage::{CalendarSink, FileSink},
};
use std::path::Path;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Convertit un export TRACS (CSV) en calendrier iCal
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le fichier .ics
    Convert {
        /// Export TRACS Enterprise (.csv)
        #[arg(long)]
        input: String,
        #[arg(long, value_enum, default_value_t = FilterMode::All)]
        filter: FilterMode,
        #[arg(long, default_value = DEFAULT_FILENAME)]
        out: String,
        #[arg(long, default_value = DEFAULT_PROD_ID)]
        prod_id: String,
    },

    /// Afficher les premiers événements filtrés
    Preview {
        #[arg(long)]
        input: String,
        #[arg(long, value_enum, default_value_t = FilterMode::All)]
        filter: FilterMode,
        #[arg(long, default_value_t = PREVIEW_LEN)]
        count: usize,
        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Exporter les événements filtrés en CSV (Subject, Start Date, ...)
    ExportCsv {
        #[arg(long)]
        input: String,
        #[arg(long, value_enum, default_value_t = FilterMode::All)]
        filter: FilterMode,
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Convert {
            input,
            filter,
            out,
            prod_id,
        } => {
            let mut session = load_session(&input, filter, IcalOptions { prod_id })?;
            let Some(download) = session.dispatch(Action::Generate) else {
                bail!("{}", status_text(&session));
            };
            FileSink::new(&out).write(&download.content)?;
            println!("{}", status_text(&session));
            println!("Written to {out}");
            exit_code(&session)
        }
        Commands::Preview {
            input,
            filter,
            count,
            json,
        } => {
            let session = load_session(&input, filter, IcalOptions::default())?;
            let events = session.preview(count);
            if json {
                println!("{}", serde_json::to_string_pretty(events)?);
            } else {
                for ev in events {
                    println!("{}", preview_line(ev));
                }
                println!(
                    "{} of {} {}",
                    events.len(),
                    session.filtered().len(),
                    session.filter().event_noun()
                );
            }
            exit_code(&session)
        }
        Commands::ExportCsv { input, filter, out } => {
            let session = load_session(&input, filter, IcalOptions::default())?;
            io::export_events_csv(&out, session.filtered())?;
            println!("{} event(s) written to {out}", session.filtered().len());
            exit_code(&session)
        }
    };

    std::process::exit(code);
}

fn load_session(input: &str, filter: FilterMode, ical: IcalOptions) -> Result<Session> {
    let contents = io::read_roster_file(input)?;
    let file_name = Path::new(input)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.to_string());

    let mut session = Session::with_ical_options(ical);
    session.dispatch(Action::Load {
        file_name,
        contents,
    });
    if let Some(status) = session.status() {
        if status.kind == StatusKind::Error {
            bail!("{}: {}", status.title, status.message);
        }
    }
    session.dispatch(Action::SelectFilter(filter));
    if session.skipped() > 0 {
        eprintln!("Skipped {} unreadable row(s)", session.skipped());
    }
    Ok(session)
}

fn status_text(session: &Session) -> String {
    session
        .status()
        .map(|s| format!("{}: {}", s.title, s.message))
        .unwrap_or_default()
}

// Code 2 = lignes ignorées (WARNING/INCOMPLETE)
fn exit_code(session: &Session) -> i32 {
    if session.skipped() > 0 {
        2
    } else {
        0
    }
}

fn preview_line(ev: &CalendarEvent) -> String {
    let when = match (ev.start_time, ev.end_time) {
        (Some(start), Some(end)) => format!(
            "{} {} → {} {}",
            display_date(ev.start_date),
            start,
            display_date(ev.end_date),
            end
        ),
        _ => format!("{} (all day)", display_date(ev.start_date)),
    };
    format!("{when} | {} | {}", ev.subject, ev.description)
}
