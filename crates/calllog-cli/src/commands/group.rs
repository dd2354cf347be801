//! Group command for collapsing call history into rows.
//!
//! This module implements `calllog group`, which reads call records as JSON
//! Lines and prints the resulting rows under day headers (or JSON).

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use calllog_core::{
    CallGroup, CallLogGrouper, CallRecord, DayGroup, DayGroups, GroupingMode, GroupingResult,
    SectionHeader, validate_entries,
};
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use clap::Args;
use serde::Serialize;

use crate::Config;

#[derive(Debug, Args)]
pub struct GroupArgs {
    /// JSON Lines file of call records, most recent first (default: stdin).
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// One row per call instead of merging adjacent calls.
    #[arg(long)]
    pub flat: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Reference time for day groups, ISO 8601 (default: current local time).
    #[arg(long)]
    pub now: Option<String>,

    /// IANA time zone for day boundaries (default: the offset in --now, else
    /// the system zone).
    #[arg(long)]
    pub timezone: Option<String>,
}

/// JSON output of a grouping pass.
#[derive(Debug, Serialize)]
struct GroupReport<'a> {
    generated_at: DateTime<FixedOffset>,
    timezone: String,
    mode: GroupingMode,
    groups: &'a [CallGroup],
    day_groups: &'a DayGroups,
    sections: Vec<SectionHeader>,
}

pub fn run<W: Write>(writer: &mut W, args: &GroupArgs, config: &Config) -> Result<()> {
    let records = match &args.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            parse_records(BufReader::new(file))?
        }
        None => parse_records(io::stdin().lock())?,
    };

    if let Err(err) = validate_entries(&records) {
        tracing::warn!(%err, "call records are not in call-log order, grouping them as given");
    }

    let mode = if args.flat {
        GroupingMode::Flat
    } else {
        config.mode
    };
    let instant = args.now.as_deref().map(parse_now).transpose()?;

    match (args.timezone.as_deref(), instant) {
        (Some(name), instant) => {
            let tz = parse_timezone(name)?;
            let now = instant.map_or_else(Utc::now, |now| now.with_timezone(&Utc));
            let now = now.with_timezone(&tz);
            emit(writer, &records, mode, &now, tz.name().to_string(), args.json)
        }
        (None, Some(now)) => {
            let timezone = now.offset().to_string();
            emit(writer, &records, mode, &now, timezone, args.json)
        }
        (None, None) => {
            let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
            emit(writer, &records, mode, &Local::now(), timezone, args.json)
        }
    }
}

/// Groups `records` against `now` and writes the rows or the JSON report.
///
/// Day boundaries follow `now`'s zone, including its daylight-saving rules.
fn emit<W: Write, Tz: TimeZone>(
    writer: &mut W,
    records: &[CallRecord],
    mode: GroupingMode,
    now: &DateTime<Tz>,
    timezone: String,
    json: bool,
) -> Result<()>
where
    Tz::Offset: Display,
{
    let result = CallLogGrouper::new(mode).group_at(records, now);
    tracing::debug!(
        records = records.len(),
        groups = result.groups.len(),
        mode = mode.as_str(),
        %timezone,
        "grouping complete"
    );

    if json {
        let report = GroupReport {
            generated_at: now.fixed_offset(),
            timezone,
            mode,
            groups: &result.groups,
            day_groups: &result.day_groups,
            sections: result.section_headers(records),
        };
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
    } else {
        write_rows(writer, records, &result, now)?;
    }

    Ok(())
}

fn parse_now(s: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).with_context(|| {
        format!("invalid --now timestamp, expected ISO 8601 (e.g., 2025-01-29T12:00:00Z): {s}")
    })
}

fn parse_timezone(s: &str) -> Result<chrono_tz::Tz> {
    s.parse::<chrono_tz::Tz>()
        .map_err(|err| anyhow!("unknown --timezone {s:?}, expected an IANA name: {err}"))
}

/// Reads call records from JSON Lines, skipping blank lines.
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<CallRecord>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: CallRecord = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid call record on line {}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Writes rows under day headers.
pub fn write_rows<W: Write, Tz: TimeZone>(
    writer: &mut W,
    records: &[CallRecord],
    result: &GroupingResult,
    now: &DateTime<Tz>,
) -> Result<()>
where
    Tz::Offset: Display,
{
    if records.is_empty() {
        writeln!(writer, "No calls.")?;
        return Ok(());
    }

    let headers = result.section_headers(records);
    let mut headers = headers.iter().peekable();

    for row in result.rows(records.len()) {
        let members = &records[row.range()];
        let anchor = &members[0];
        let day_group = result.day_groups.get(anchor.id).unwrap_or(DayGroup::Other);

        if headers.next_if(|h| h.position == row.start).is_some() {
            if row.start > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "{}", day_group.label().to_uppercase())?;
        }

        let number = anchor
            .number
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("(unknown)");
        let count = if row.size > 1 {
            format!("({})", row.size)
        } else {
            String::new()
        };
        let types = members
            .iter()
            .map(|r| r.call_type.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let time = format_call_time(anchor.timestamp, day_group, now);

        writeln!(writer, "  {number:<20} {count:<5} {types:<28} {time}")?;
    }

    Ok(())
}

/// Time of day for recent calls, date and time for older ones.
fn format_call_time<Tz: TimeZone>(
    timestamp: i64,
    day_group: DayGroup,
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: Display,
{
    let Some(started) = now.timezone().timestamp_millis_opt(timestamp).single() else {
        return "?".to_string();
    };
    match day_group {
        DayGroup::Today | DayGroup::Yesterday => started.format("%H:%M").to_string(),
        DayGroup::Other | DayGroup::None => started.format("%b %-d %H:%M").to_string(),
    }
}
