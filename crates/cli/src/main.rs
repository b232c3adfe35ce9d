// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod lesson_file;
mod report;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use klassenbuch::LessonAttendance;
use klassenbuch_audit::{DecodedAnnotation, decode, encode, parse_timestamp};
use klassenbuch_domain::{
    Clock, ClockTime, LessonWindow, SystemClock, Timestamp, default_late_time, minutes_late,
};
use lesson_file::{LessonFile, parse_now};
use report::{AnnotationReport, StatusReport};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match args.run() {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    }
}

/// Klassenbuch - lesson attendance register tools
#[derive(Debug, Parser)]
#[command(name = "klassenbuch", author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// IANA timezone the school's wall clock runs in
    #[arg(
        long,
        global = true,
        env = "KLASSENBUCH_TZ",
        default_value = "Europe/Berlin"
    )]
    timezone: String,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<String> {
        debug!(timezone = %self.timezone, "Resolved configuration");
        self.command.run(&self.timezone)
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Print a lesson's attendance status and counts as JSON
    #[command(visible_alias = "s")]
    Status {
        /// Path to the lesson file
        lesson: PathBuf,

        /// Evaluate at this school-local time (YYYY-MM-DDTHH:MM) instead of now
        #[arg(long)]
        now: Option<String>,
    },

    /// Print the arrival time suggested when marking a student late
    #[command(visible_alias = "lt")]
    LateTime {
        /// Lesson start (HH:MM)
        #[arg(long)]
        start: ClockTime,

        /// Lesson end (HH:MM)
        #[arg(long)]
        end: ClockTime,

        /// Evaluate at this school-local time (HH:MM) instead of now
        #[arg(long)]
        now: Option<ClockTime>,
    },

    /// Work with lesson annotations
    #[command(subcommand)]
    Annotation(AnnotationCommand),
}

#[derive(Clone, Debug, Subcommand)]
enum AnnotationCommand {
    /// Decode a stored annotation and print it as JSON
    Decode {
        /// File holding the annotation; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Encode a body with a provenance header
    Encode {
        /// The free-text body
        #[arg(long)]
        body: String,

        /// Abbreviation of the creator
        #[arg(long)]
        created_by: String,

        /// Creation time (DD.MM.YY, HH:MM)
        #[arg(long, value_parser = register_timestamp)]
        created_at: Timestamp,

        /// Abbreviation of the last editor
        #[arg(long, requires = "edited_at")]
        edited_by: Option<String>,

        /// Time of the last edit (DD.MM.YY, HH:MM)
        #[arg(long, requires = "edited_by", value_parser = register_timestamp)]
        edited_at: Option<Timestamp>,
    },
}

/// The arrival time suggested for a late student.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LateTimeReport {
    arrival_time: ClockTime,
    minutes_late: u16,
}

impl Command {
    fn run(self, timezone: &str) -> Result<String> {
        match self {
            Self::Status { lesson, now } => {
                let now: Timestamp = match now {
                    Some(raw) => parse_now(&raw)?,
                    None => SystemClock::new(timezone)?.now(),
                };
                let state: LessonAttendance = LessonFile::read(&lesson)?
                    .into_attendance(now)
                    .wrap_err_with(|| format!("Invalid lesson file {}", lesson.display()))?;
                info!(
                    lesson = %state.slot.lesson_id,
                    students = state.roster_size(),
                    recorded = state.roster.len(),
                    "Loaded lesson"
                );
                to_json(&StatusReport::new(&state, now))
            }
            Self::LateTime { start, end, now } => {
                let window: LessonWindow = LessonWindow::new(start, end)?;
                let now: ClockTime = match now {
                    Some(now) => now,
                    None => ClockTime::from(SystemClock::new(timezone)?.now().time()),
                };
                let arrival_time: ClockTime = default_late_time(&window, now);
                to_json(&LateTimeReport {
                    arrival_time,
                    minutes_late: minutes_late(arrival_time, &window),
                })
            }
            Self::Annotation(command) => command.run(),
        }
    }
}

impl AnnotationCommand {
    fn run(self) -> Result<String> {
        match self {
            Self::Decode { file } => {
                let raw: String = match file {
                    Some(path) => std::fs::read_to_string(&path)
                        .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
                    None => {
                        let mut raw: String = String::new();
                        std::io::stdin()
                            .read_to_string(&mut raw)
                            .wrap_err("Failed to read annotation from stdin")?;
                        raw
                    }
                };
                let decoded: DecodedAnnotation = decode(&raw);
                debug!(format = ?decoded.format, "Decoded annotation");
                to_json(&AnnotationReport::from(decoded))
            }
            Self::Encode {
                body,
                created_by,
                created_at,
                edited_by,
                edited_at,
            } => {
                let last_edit: Option<(&str, Timestamp)> = edited_by.as_deref().zip(edited_at);
                encode(&body, &created_by, created_at, last_edit).map_err(Into::into)
            }
        }
    }
}

fn register_timestamp(raw: &str) -> Result<Timestamp, String> {
    parse_timestamp(raw).ok_or_else(|| format!("'{raw}' is not a DD.MM.YY, HH:MM timestamp"))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).wrap_err("Failed to serialize output")
}
