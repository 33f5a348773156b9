use std::collections::VecDeque;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::config::CapacityReport;
use crate::schedule::TimetableVersion;

/// Number of generated versions kept by default
pub const DEFAULT_STORE_CAPACITY: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct StoredTimetable {
    pub id: u64,
    pub class_name: String,
    pub section: String,
    pub generated_at: DateTime<Utc>,
    pub capacity: CapacityReport,
    pub version: TimetableVersion,
}

/// Short listing entry, without the grids
#[derive(Debug, Clone, Serialize)]
pub struct StoredSummary {
    pub id: u64,
    pub class_name: String,
    pub section: String,
    pub version: usize,
    pub generated_at: DateTime<Utc>,
    pub teachers: usize,
}

/// Keeps the most recently generated timetables, oldest evicted first.
/// Lives outside the allocation engine, which never sees it.
#[derive(Debug)]
pub struct VersionStore {
    capacity: usize,
    next_id: u64,
    entries: VecDeque<StoredTimetable>,
}

impl Default for VersionStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_CAPACITY)
    }
}

impl VersionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_id: 1,
            entries: VecDeque::new(),
        }
    }

    /// Stores a version and returns its id
    pub fn push(&mut self, class_name: &str, section: &str, capacity: CapacityReport, version: TimetableVersion) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(StoredTimetable {
            id,
            class_name: class_name.to_string(),
            section: section.to_string(),
            generated_at: Utc::now(),
            capacity,
            version,
        });
        id
    }

    pub fn get(&self, id: u64) -> Option<&StoredTimetable> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn summaries(&self) -> Vec<StoredSummary> {
        self.entries
            .iter()
            .map(|entry| StoredSummary {
                id: entry.id,
                class_name: entry.class_name.clone(),
                section: entry.section.clone(),
                version: entry.version.version,
                generated_at: entry.generated_at,
                teachers: entry.version.timetable.teacher_grid.len(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
