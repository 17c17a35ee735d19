//! Human-readable output for `compare` and `dump`.

use std::io::{self, Write};

use owo_colors::OwoColorize;
use schema_check::{DiffKind, Difference, Schema, Summary};

pub fn write_report(out: &mut impl Write, differences: &[Difference], color: bool) -> io::Result<()> {
    if differences.is_empty() {
        let line = "No differences found between the schemas.";
        if color {
            writeln!(out, "{}", line.green())?;
        } else {
            writeln!(out, "{}", line)?;
        }
        return Ok(());
    }

    writeln!(out, "Found {} differences:", differences.len())?;
    writeln!(out)?;
    for difference in differences {
        if color {
            writeln!(
                out,
                "[{}] {}: {}",
                paint(difference.kind()),
                difference.table().bold(),
                difference.message()
            )?;
        } else {
            writeln!(out, "{}", difference)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Summary:")?;
    for (kind, count) in Summary::from_differences(differences).iter() {
        writeln!(out, "  {}: {}", kind, count)?;
    }
    Ok(())
}

pub fn write_schema(out: &mut impl Write, schema: &Schema) -> io::Result<()> {
    write!(out, "{}", schema)
}

/// Red for things the target lacks, yellow for things it adds, cyan for mismatches.
fn paint(kind: DiffKind) -> String {
    match kind {
        DiffKind::MissingTable
        | DiffKind::MissingColumn
        | DiffKind::MissingIndex
        | DiffKind::MissingForeignKey => kind.as_str().red().to_string(),
        DiffKind::ExtraTable
        | DiffKind::ExtraColumn
        | DiffKind::ExtraIndex
        | DiffKind::ExtraForeignKey => kind.as_str().yellow().to_string(),
        _ => kind.as_str().cyan().to_string(),
    }
}
