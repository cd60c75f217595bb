//! Daily S/I/R time series
//!
//! The engine feeds a [`HistoryRecorder`] once per simulated day; when the
//! run completes the recorder is frozen into a read-only [`History`].

use serde::{Deserialize, Serialize};

use crate::types::{HealthStatus, StatusCounts};

/// Days reserved up front; longer runs grow the buffer as they go
const RESERVED_DAYS: usize = 4096;

/// Population counts at the start of one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub day: u64,
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}

impl HistoryEntry {
    pub fn new(day: u64, counts: StatusCounts) -> Self {
        Self {
            day,
            susceptible: counts.susceptible,
            infected: counts.infected,
            recovered: counts.recovered,
        }
    }

    /// Count for one status
    pub fn count(&self, status: HealthStatus) -> usize {
        match status {
            HealthStatus::Susceptible => self.susceptible,
            HealthStatus::Infected => self.infected,
            HealthStatus::Recovered => self.recovered,
        }
    }

    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.recovered
    }
}

/// Accumulates one [`HistoryEntry`] per day, in order
#[derive(Debug, Clone)]
pub struct HistoryRecorder {
    population: usize,
    entries: Vec<HistoryEntry>,
}

impl HistoryRecorder {
    pub fn new(population: usize, expected_days: usize) -> Self {
        Self {
            population,
            entries: Vec::with_capacity(expected_days.min(RESERVED_DAYS)),
        }
    }

    /// Append the counts for `day`
    pub fn record(&mut self, day: u64, counts: StatusCounts) {
        debug_assert_eq!(counts.total(), self.population, "counts must cover the population");
        debug_assert!(
            self.entries.last().is_none_or(|last| last.day < day),
            "days must be recorded in order"
        );
        self.entries.push(HistoryEntry::new(day, counts));
    }

    /// Entries recorded so far
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Freeze into a read-only history
    pub fn finish(self) -> History {
        History {
            population: self.population,
            entries: self.entries,
        }
    }
}

/// Completed, read-only time series of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    population: usize,
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn population(&self) -> usize {
        self.population
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn final_entry(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Daily counts for one status
    pub fn series(&self, status: HealthStatus) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.count(status)).collect()
    }

    /// Day and size of the largest infected count (earliest on ties)
    pub fn peak(&self) -> Option<(u64, usize)> {
        self.entries
            .iter()
            .fold(None, |best: Option<&HistoryEntry>, entry| match best {
                Some(b) if b.infected >= entry.infected => Some(b),
                _ => Some(entry),
            })
            .map(|entry| (entry.day, entry.infected))
    }

    /// Fraction of the population infected at some point, as of the last
    /// recorded day
    pub fn attack_rate(&self) -> f64 {
        match self.final_entry() {
            Some(last) if self.population > 0 => {
                (last.infected + last.recovered) as f64 / self.population as f64
            }
            _ => 0.0,
        }
    }

    /// Number of epidemic waves in the infected series
    ///
    /// A wave is a rise of at least `tolerance` above the preceding trough
    /// followed by a fall of at least `tolerance` below the crest. A
    /// tolerance of 0 or 1 counts every strict local maximum; larger values
    /// ignore day-to-day noise.
    pub fn waves(&self, tolerance: usize) -> usize {
        let threshold = tolerance.max(1);
        let series = self.series(HealthStatus::Infected);
        let Some((&first, rest)) = series.split_first() else {
            return 0;
        };

        let mut waves = 0;
        let mut climbing = false;
        let mut trough = first;
        let mut crest = first;

        for &value in rest {
            if climbing {
                if value > crest {
                    crest = value;
                } else if crest - value >= threshold {
                    waves += 1;
                    climbing = false;
                    trough = value;
                }
            } else if value < trough {
                trough = value;
            } else if value - trough >= threshold {
                climbing = true;
                crest = value;
            }
        }
        waves
    }
}
