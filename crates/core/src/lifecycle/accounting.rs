//! Usage accounting
//!
//! Splits the elapsed time of a stop batch into per-process credits.
//! Every process in a batch ends at the same instant, so under wall-clock
//! accounting the union of their intervals is `[earliest start, now]`.

use chrono::{DateTime, Utc};
use quickstart_domain::{elapsed_seconds, ActiveProcess, UsageAccounting};

/// Seconds credited to each process of `processes`, index-aligned.
pub fn credit_batch(
    processes: &[ActiveProcess],
    ended_at: DateTime<Utc>,
    accounting: UsageAccounting,
) -> Vec<i64> {
    match accounting {
        UsageAccounting::ProcessTime => processes
            .iter()
            .map(|process| elapsed_seconds(process.started_at, ended_at))
            .collect(),
        UsageAccounting::WallClock => wall_clock_credits(processes, ended_at),
    }
}

fn wall_clock_credits(processes: &[ActiveProcess], ended_at: DateTime<Utc>) -> Vec<i64> {
    let mut credits = vec![0; processes.len()];

    // The earliest starter covers the whole union; later starters overlap it.
    let earliest = processes
        .iter()
        .enumerate()
        .min_by_key(|(_, process)| (process.started_at, process.id))
        .map(|(index, _)| index);

    if let Some(index) = earliest {
        credits[index] = elapsed_seconds(processes[index].started_at, ended_at);
    }

    credits
}
