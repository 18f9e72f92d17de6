//! NAV V3 frame formatting
use std::io::Write;

use itertools::Itertools;

use crate::{epoch::format_v3, navigation::parsing::FIELD_WIDTH, prelude::{Epoch, SV}};

/// Formats a floating point number the RINEX way, with given
/// mantissa precision and a two digit signed exponent: `-1.654908806086E-04`.
pub(crate) fn format_float(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*E}", precision, value);
    match formatted.split_once('E') {
        Some((mantissa, exponent)) => {
            let exponent = exponent.parse::<i32>().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}E{}{:02}", mantissa, sign, exponent.abs())
        },
        None => formatted,
    }
}

/// Formats one orbit field, in 19 bytes
fn format_field(value: f64) -> String {
    format!("{:>width$}", format_float(value, 12), width = FIELD_WIDTH)
}

/// Writes one NAV V3 frame: the first line describes the satellite,
/// the epoch and the 3 clock terms, each following row is one orbit line.
pub(crate) fn write_frame<W: Write>(
    w: &mut W,
    sv: SV,
    epoch: Epoch,
    rows: &[[f64; 4]],
) -> std::io::Result<()> {
    let mut rows = rows.iter();
    if let Some(clock) = rows.next() {
        writeln!(
            w,
            "{:x} {}{}",
            sv,
            format_v3(epoch),
            clock.iter().take(3).map(|v| format_field(*v)).join("")
        )?;
    }
    for row in rows {
        writeln!(w, "    {}", row.iter().map(|v| format_field(*v)).join(""))?;
    }
    Ok(())
}
