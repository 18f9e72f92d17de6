//! Epoch parsing, formatting and week counter helpers
use crate::{
    constants::{HALF_WEEK_SECONDS, WEEK_SECONDS},
    prelude::{Constellation, Duration, Epoch, ParsingError, TimeScale},
};

use hifitime::Unit;

/// Returns the [TimeScale] navigation frames of this [Constellation] are
/// expressed in. GLONASS frames are referenced to UTC.
pub fn native_timescale(constellation: Constellation) -> Option<TimeScale> {
    match constellation {
        Constellation::GPS => Some(TimeScale::GPST),
        Constellation::QZSS => Some(TimeScale::QZSST),
        Constellation::Galileo => Some(TimeScale::GST),
        Constellation::BeiDou => Some(TimeScale::BDT),
        Constellation::Glonass => Some(TimeScale::UTC),
        _ => None,
    }
}

/// Parses "YYYY MM DD HH MM SS" (V3) or "YY MM DD HH MM SS.S" (V2)
/// descriptors, in given [TimeScale]. A seconds field of 60
/// is tolerated and turned into a one second offset.
pub(crate) fn parse_in_timescale(content: &str, ts: TimeScale) -> Result<Epoch, ParsingError> {
    let err = || ParsingError::Epoch(content.trim().to_string());

    let items = content.split_ascii_whitespace().collect::<Vec<_>>();
    if items.len() != 6 {
        return Err(err());
    }

    let mut y = items[0].parse::<i32>().map_err(|_| err())?;
    // two digit years: 80-99 => 19XX
    if y < 100 {
        if y < 80 {
            y += 2000;
        } else {
            y += 1900;
        }
    }

    let m = items[1].parse::<u8>().map_err(|_| err())?;
    let d = items[2].parse::<u8>().map_err(|_| err())?;
    let hh = items[3].parse::<u8>().map_err(|_| err())?;
    let mm = items[4].parse::<u8>().map_err(|_| err())?;

    let seconds = items[5].parse::<f64>().map_err(|_| err())?;
    if !(0.0..61.0).contains(&seconds) {
        return Err(err());
    }

    let mut ss = seconds.trunc() as u8;
    let mut ns = ((seconds - seconds.trunc()) * 1.0E9).round() as u32;
    if ns >= 1_000_000_000 {
        ns = 0;
        ss += 1;
    }

    let offset = if ss >= 60 {
        let extra = ss - 59;
        ss = 59;
        Duration::from_seconds(f64::from(extra))
    } else {
        Duration::ZERO
    };

    let epoch = Epoch::maybe_from_gregorian(y, m, d, hh, mm, ss, ns, ts).map_err(|_| err())?;
    Ok(epoch + offset)
}

/// Decomposes [Epoch] into its calendar labels, in its own [TimeScale].
pub(crate) fn decompose(t: Epoch) -> (i32, u8, u8, u8, u8, u8, u32) {
    match t.time_scale {
        TimeScale::UTC => t.to_gregorian_utc(),
        ts => {
            // GNSS timescales do not have leap seconds:
            // calendar labels are obtained by counting from a known date.
            let reference = Epoch::from_gregorian(2000, 1, 1, 0, 0, 0, 0, ts);
            let labels = Epoch::from_gregorian_tai(2000, 1, 1, 0, 0, 0, 0) + (t - reference);
            labels.to_gregorian_tai()
        },
    }
}

/// Formats [Epoch] as a "YYYY MM DD HH MM SS" NAV V3 descriptor,
/// in its own [TimeScale].
pub(crate) fn format_v3(t: Epoch) -> String {
    let (y, m, d, hh, mm, ss, _) = decompose(t);
    format!("{:04} {:02} {:02} {:02} {:02} {:02}", y, m, d, hh, mm, ss)
}

/// Start of week zero in this [TimeScale]
pub(crate) fn week_origin(ts: TimeScale) -> Epoch {
    match ts {
        TimeScale::GST => Epoch::from_gregorian(1999, 8, 22, 0, 0, 0, 0, ts),
        TimeScale::BDT => Epoch::from_gregorian(2006, 1, 1, 0, 0, 0, 0, ts),
        _ => Epoch::from_gregorian(1980, 1, 6, 0, 0, 0, 0, ts),
    }
}

/// Builds an [Epoch] from a (week, seconds of week) pair in given [TimeScale].
pub fn from_week_seconds(week: i64, sow: f64, ts: TimeScale) -> Epoch {
    week_origin(ts) + week * Unit::Week + Duration::from_seconds(sow)
}

/// Returns the (week, seconds of week) pair of this [Epoch] in given [TimeScale].
pub fn to_week_seconds(t: Epoch, ts: TimeScale) -> (i64, f64) {
    let elapsed = t - week_origin(ts);
    let week = (elapsed.to_seconds() / WEEK_SECONDS).floor() as i64;
    let sow = (elapsed - week * Unit::Week).to_seconds();
    if sow >= WEEK_SECONDS {
        (week + 1, sow - WEEK_SECONDS)
    } else if sow < 0.0 {
        (week - 1, sow + WEEK_SECONDS)
    } else {
        (week, sow)
    }
}

/// Folds a time difference (s) into ]-half week, +half week]
pub(crate) fn fold_half_week(mut dt: f64) -> f64 {
    while dt > HALF_WEEK_SECONDS {
        dt -= WEEK_SECONDS;
    }
    while dt <= -HALF_WEEK_SECONDS {
        dt += WEEK_SECONDS;
    }
    dt
}
