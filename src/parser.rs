//! Tokenizer for projected UTM/UPS text:
//! `<zone>[<letter>] <digits>mE <digits>mN [N|S]` or
//! `<A|B|Y|Z> <digits>mE <digits>mN [N|S]`.

use tracing::trace;

use crate::{
    band::{Hemisphere, PolarZone},
    coords::utm::{zonespec, UtmUps},
    resolver::{self, Qualifier},
    Error,
};

/// Projected text always names a grid zone cell, so the number of digits in
/// the easting and northing carries no precision and is not kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Tokens {
    /// `0` for UPS
    pub(crate) zone: i32,
    pub(crate) qualifier: Qualifier,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
    pub(crate) trailing: Option<Hemisphere>,
}

pub(crate) fn parse_utm_ups(text: &str) -> Result<UtmUps, Error> {
    let tokens = tokenize(text)?;
    resolver::resolve(&tokens)
}

pub(crate) fn tokenize(text: &str) -> Result<Tokens, Error> {
    let parts = text.split_whitespace().collect::<Vec<_>>();

    let (zone_part, easting_part, northing_part, trailing_part) = match parts.as_slice() {
        [zone, easting, northing] => (*zone, *easting, *northing, None),
        [zone, easting, northing, trailing] => (*zone, *easting, *northing, Some(*trailing)),
        _ => {
            return Err(Error::MalformedInput(format!(
                "Expected 3 or 4 whitespace separated parts in '{}', found {}",
                text.trim(),
                parts.len(),
            )));
        }
    };

    let (zone, qualifier) = parse_zone(zone_part)?;
    let easting = parse_distance(easting_part, "mE", "easting")?;
    let northing = parse_distance(northing_part, "mN", "northing")?;

    let trailing = trailing_part
        .map(|part| {
            let mut chars = part.chars();
            match (chars.next().and_then(Hemisphere::from_letter), chars.next()) {
                (Some(hemisphere), None) => Ok(hemisphere),
                _ => Err(Error::MalformedInput(format!("'{part}' is not a hemisphere indicator"))),
            }
        })
        .transpose()?;

    trace!(zone, ?qualifier, easting, northing, ?trailing, "tokenized");

    Ok(Tokens {
        zone,
        qualifier,
        easting,
        northing,
        trailing,
    })
}

/// Splits `13`, `13T` or `A` into a zone number and qualifier.
fn parse_zone(part: &str) -> Result<(i32, Qualifier), Error> {
    let split = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    let (digits, letters) = part.split_at(split);

    let mut chars = letters.chars();
    let letter = chars.next();
    if chars.next().is_some() {
        return Err(Error::MalformedInput(format!("Unexpected text after zone letter in '{part}'")));
    }

    if digits.is_empty() {
        let zone = letter
            .and_then(PolarZone::from_letter)
            .ok_or_else(|| {
                Error::MalformedInput(format!("'{part}' is neither a UTM zone nor a polar zone"))
            })?;
        return Ok((zonespec::UPS, Qualifier::Polar(zone)));
    }

    if digits.len() > 2 {
        return Err(Error::MalformedInput(format!("More than 2 digits in zone '{part}'")));
    }

    let zone = digits
        .parse::<i32>()
        .map_err(|_| Error::MalformedInput(format!("Zone '{digits}' is not a number")))?;
    if !(zonespec::MINUTMZONE..=zonespec::MAXUTMZONE).contains(&zone) {
        return Err(Error::MalformedInput(format!("Zone {zone} not in [1,60]")));
    }

    let qualifier = match letter {
        None => Qualifier::Absent,
        Some(letter) => Qualifier::from_utm_letter(letter)
            .ok_or_else(|| {
                Error::MalformedInput(format!("{letter} is not a valid latitude band letter"))
            })?,
    };

    Ok((zone, qualifier))
}

/// Parses `234789mE` style values into metres.
fn parse_distance(part: &str, suffix: &str, label: &str) -> Result<f64, Error> {
    let upper = part.to_ascii_uppercase();
    let digits = upper
        .strip_suffix(&suffix.to_ascii_uppercase())
        .ok_or_else(|| {
            Error::MalformedInput(format!("The {label} '{part}' does not end in {suffix}"))
        })?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedInput(format!(
            "The {label} '{part}' is not a whole number of metres"
        )));
    }

    digits
        .parse::<f64>()
        .map_err(|_| Error::MalformedInput(format!("The {label} '{part}' is not a number")))
}
