//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::Write;

use specrun_core::roles::{Matching, ROLES};
use specrun_core::{Cardinality, readable_label, role_matches};

use super::{CliResult, ExitCode};
use crate::reporting::escape;

/// Print the role pattern table.
pub fn print_roles(out: &mut impl Write) -> CliResult<ExitCode> {
    for role in ROLES {
        let cardinality = match role.cardinality {
            Cardinality::Single => "one per type",
            Cardinality::Multi => "any number",
        };
        let matching = match role.matching {
            Matching::Word => "any word of the name",
            Matching::Exact => "the exact name",
        };
        writeln!(
            out,
            "{:<10} {:<32} {:<13} matches {}",
            role.canonical,
            role.keywords.join(", "),
            cardinality,
            matching
        )?;
    }
    Ok(ExitCode::Success)
}

/// Classify each name; exit with failure if any is ambiguous.
pub fn classify_names(out: &mut impl Write, names: &[String]) -> CliResult<ExitCode> {
    let mut ambiguous = false;
    for name in names {
        let roles = role_matches(name);
        let line = match roles.as_slice() {
            [] => format!("{name}: no role"),
            [role] => format!("{name}: {role} \"{}\"", readable_label(name)),
            _ => {
                ambiguous = true;
                let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
                format!("{name}: ambiguous ({})", roles.join(", "))
            }
        };
        writeln!(out, "{line}")?;
    }
    Ok(if ambiguous { ExitCode::Failure } else { ExitCode::Success })
}

/// Print `text` escaped for a TeamCity service message.
pub fn print_escaped(out: &mut impl Write, text: &str) -> CliResult<ExitCode> {
    writeln!(out, "{}", escape(text))?;
    Ok(ExitCode::Success)
}
