//! Parsing of `--location ID=ADDRESS` arguments.

use anyhow::{bail, Result};

use sharedwalk_lib::{LocationId, Locations};

/// Parse a single `ID=ADDRESS` argument.
///
/// Used as a clap `value_parser`, so errors are plain strings.
pub fn parse_location(raw: &str) -> std::result::Result<(LocationId, String), String> {
    let (id, address) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=ADDRESS, got '{raw}'"))?;

    let id = id.trim();
    let address = address.trim();
    if id.is_empty() {
        return Err(format!("missing identifier in '{raw}'"));
    }
    if address.is_empty() {
        return Err(format!("address for '{id}' is empty"));
    }

    Ok((id.to_string(), address.to_string()))
}

/// Collect parsed arguments into a location map, rejecting duplicates.
pub fn collect_locations(entries: Vec<(LocationId, String)>) -> Result<Locations> {
    let mut locations = Locations::new();
    for (id, address) in entries {
        if locations.contains_key(&id) {
            bail!("location '{id}' was given more than once");
        }
        locations.insert(id, address);
    }
    Ok(locations)
}

/// Label for the `index`-th address entered at the prompt: `A`..`Z`, then
/// `AA`, `AB` and so on.
pub fn location_label(index: usize) -> LocationId {
    let mut n = index;
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}
