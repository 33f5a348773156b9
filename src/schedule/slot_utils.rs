use std::collections::{BTreeMap, BTreeSet};
use chrono::{Duration, NaiveTime};
use log::debug;
use crate::error::{InvalidRangeError, ParseTimeError, PeriodGridError};
use super::types::Slot;

/// Parses a time string (HH:MM)
pub fn parse_time(time_str: &str) -> Result<NaiveTime, ParseTimeError> {
    NaiveTime::parse_from_str(time_str.trim(), "%H:%M").map_err(|_| ParseTimeError::new(time_str))
}

/// Formats a time as HH:MM
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses break anchors, keyed by time so that "7:45" and "07:45" collapse
pub fn parse_breaks(breaks: &BTreeMap<String, String>) -> Result<BTreeMap<NaiveTime, String>, ParseTimeError> {
    breaks
        .iter()
        .map(|(anchor, label)| parse_time(anchor).map(|time| (time, label.clone())))
        .collect()
}

/// Splits the school day into periods of `period_minutes` and places the breaks.
///
/// Periods are carved from `start_time` while they end no later than `end_time`.
/// A break whose anchor is a period start is emitted just before that period;
/// the period itself is kept. Anchors the stepping never reaches are appended,
/// then the whole sequence is stably sorted by leading time. Gaps are allowed.
pub fn build_period_grid(
    start_time: &str,
    end_time: &str,
    period_minutes: u32,
    breaks: &BTreeMap<String, String>,
) -> Result<Vec<Slot>, PeriodGridError> {
    let start = parse_time(start_time)?;
    let end = parse_time(end_time)?;
    let breaks = parse_breaks(breaks)?;

    if start >= end {
        return Err(InvalidRangeError::EndNotAfterStart {
            start: format_time(start),
            end: format_time(end),
        }
        .into());
    }
    if period_minutes == 0 {
        return Err(InvalidRangeError::ZeroDuration.into());
    }

    let step = Duration::minutes(i64::from(period_minutes));
    let mut slots = Vec::new();
    let mut reached = BTreeSet::new();
    let mut current = start;

    loop {
        let (period_end, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 || period_end > end {
            break;
        }
        if let Some(label) = breaks.get(&current) {
            slots.push(Slot::Break { anchor: current, label: label.clone() });
            reached.insert(current);
        }
        slots.push(Slot::Period { start: current, end: period_end });
        current = period_end;
    }

    for (anchor, label) in &breaks {
        if reached.contains(anchor) {
            continue;
        }
        let inside_period = slots.iter().any(|slot| match slot {
            Slot::Period { start, end } => start < anchor && anchor < end,
            Slot::Break { .. } => false,
        });
        if inside_period {
            debug!("Break at {} does not line up with a period boundary", format_time(*anchor));
        }
        slots.push(Slot::Break { anchor: *anchor, label: label.clone() });
    }

    slots.sort_by_key(Slot::start);
    Ok(slots)
}

/// Identifiers of a slot sequence, in order
pub fn slot_ids(slots: &[Slot]) -> Vec<String> {
    slots.iter().map(Slot::id).collect()
}

/// Number of teachable (non-break) slots in a day
pub fn count_periods(slots: &[Slot]) -> usize {
    slots.iter().filter(|slot| !slot.is_break()).count()
}
