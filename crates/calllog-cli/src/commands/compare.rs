//! Compare command for checking number equivalence.

use std::io::Write;

use anyhow::Result;
use calllog_core::number::{is_uri_number, numbers_equivalent};
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First number or SIP address.
    pub a: String,

    /// Second number or SIP address.
    pub b: String,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Which comparison rules applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    Phone,
    Sip,
}

impl Rule {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Sip => "sip",
        }
    }
}

#[derive(Debug, Serialize)]
struct Comparison<'a> {
    a: &'a str,
    b: &'a str,
    rule: Rule,
    equivalent: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &CompareArgs) -> Result<()> {
    let rule = if is_uri_number(&args.a) || is_uri_number(&args.b) {
        Rule::Sip
    } else {
        Rule::Phone
    };
    let equivalent = numbers_equivalent(Some(args.a.as_str()), Some(args.b.as_str()));
    tracing::debug!(rule = rule.as_str(), equivalent, "compared numbers");

    if args.json {
        let comparison = Comparison {
            a: &args.a,
            b: &args.b,
            rule,
            equivalent,
        };
        serde_json::to_writer(&mut *writer, &comparison)?;
        writeln!(writer)?;
    } else {
        let verdict = if equivalent { "same" } else { "different" };
        writeln!(writer, "{verdict} ({} rules)", rule.as_str())?;
    }

    Ok(())
}
