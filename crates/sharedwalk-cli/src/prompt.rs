//! Interactive prompt flow.
//!
//! Reads from any [`BufRead`] and writes to any [`Write`] so the flow can be
//! driven from tests without a terminal.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use sharedwalk_lib::{Locations, WalkerPair};

use crate::locations::location_label;

/// Two addresses per walker.
pub const MIN_ADDRESSES: usize = 4;

/// Print `message` without a newline and read one trimmed line.
///
/// End of input reads as an empty line.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> Result<String> {
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("failed to read from input")?;
    Ok(line.trim().to_string())
}

/// Ask for addresses until an empty line, labelling them `A`, `B`, `C`...
pub fn read_addresses<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Locations> {
    writeln!(
        out,
        "\nEnter the addresses (press Enter on an empty line to finish):"
    )?;
    writeln!(out, "Format: Street Address, City, State")?;

    let mut locations = Locations::new();
    loop {
        let address = prompt_line(
            input,
            out,
            "\nEnter an address (or press Enter to finish): ",
        )?;
        if address.is_empty() {
            break;
        }
        locations.insert(location_label(locations.len()), address);
    }

    if locations.len() < MIN_ADDRESSES {
        bail!(
            "please enter at least {MIN_ADDRESSES} addresses (2 for each walker), got {}",
            locations.len()
        );
    }

    Ok(locations)
}

/// List the labelled locations.
pub fn write_locations<W: Write>(out: &mut W, locations: &Locations) -> Result<()> {
    writeln!(out, "\nAvailable locations:")?;
    for (id, address) in locations {
        writeln!(out, "{id}: {address}")?;
    }
    Ok(())
}

/// Ask for both walkers' start and end labels and check they exist.
pub fn read_walkers<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    locations: &Locations,
) -> Result<WalkerPair> {
    const START: &str = "Start location (A, B, C, etc.): ";
    const END: &str = "End location (A, B, C, etc.): ";

    writeln!(out, "\nEnter Walker A's locations:")?;
    let start1 = prompt_line(input, out, START)?.to_uppercase();
    let end1 = prompt_line(input, out, END)?.to_uppercase();

    writeln!(out, "\nEnter Walker B's locations:")?;
    let start2 = prompt_line(input, out, START)?.to_uppercase();
    let end2 = prompt_line(input, out, END)?.to_uppercase();

    let walkers = WalkerPair::new(start1, end1, start2, end2);
    let invalid: Vec<&str> = walkers
        .ids()
        .into_iter()
        .filter(|id| !locations.contains_key(*id))
        .collect();
    if !invalid.is_empty() {
        bail!("invalid locations: {}", invalid.join(", "));
    }

    Ok(walkers)
}
