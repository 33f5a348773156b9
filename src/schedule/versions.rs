use log::info;
use serde::{Serialize, Deserialize};
use super::allocation::allocate;
use super::picker::RandomPicker;
use super::types::{Slot, SubjectDemand, TeacherEligibility, Timetable};

/// Everything one allocation run needs, already validated
#[derive(Debug, Clone)]
pub struct PreparedTimetable {
    pub demand: Vec<SubjectDemand>,
    pub eligibility: TeacherEligibility,
    pub days: Vec<String>,
    pub slots: Vec<Slot>,
    pub room: String,
}

/// One independently generated candidate timetable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableVersion {
    /// 1-based
    pub version: usize,
    pub seed: Option<u64>,
    pub timetable: Timetable,
}

/// Runs the allocation `count` times. Runs share no state; with a base seed,
/// version `v` is seeded with `seed + v - 1` and can be regenerated exactly.
pub fn generate_versions(prepared: &PreparedTimetable, count: usize, seed: Option<u64>) -> Vec<TimetableVersion> {
    (1..=count)
        .map(|version| {
            let version_seed = seed.map(|s| s.wrapping_add(version as u64 - 1));
            let mut picker = match version_seed {
                Some(s) => RandomPicker::from_seed(s),
                None => RandomPicker::from_entropy(),
            };
            let timetable = allocate(
                &prepared.demand,
                &prepared.eligibility,
                &prepared.days,
                &prepared.slots,
                &prepared.room,
                &mut picker,
            );
            info!(
                "Generated version {} with {} teachers",
                version,
                timetable.teacher_grid.len()
            );
            TimetableVersion {
                version,
                seed: version_seed,
                timetable,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::slot_utils::build_period_grid;
    use std::collections::BTreeMap;

    fn prepared() -> PreparedTimetable {
        let eligibility: TeacherEligibility = [
            ("Math", vec!["A".to_string(), "B".to_string(), "C".to_string()]),
            ("Science", vec!["D".to_string(), "E".to_string()]),
        ]
        .into_iter()
        .collect();
        PreparedTimetable {
            demand: vec![SubjectDemand::new("Math", 6, 0), SubjectDemand::new("Science", 3, 4)],
            eligibility,
            days: vec!["Mon".into(), "Tue".into(), "Wed".into()],
            slots: build_period_grid("08:00", "13:00", 60, &BTreeMap::new()).unwrap(),
            room: "Room 3".into(),
        }
    }

    #[test]
    fn test_seeded_versions_are_reproducible() {
        let prepared = prepared();
        let first = generate_versions(&prepared, 3, Some(100));
        let second = generate_versions(&prepared, 3, Some(100));
        assert_eq!(first, second);
        let seeds: Vec<Option<u64>> = first.iter().map(|v| v.seed).collect();
        assert_eq!(seeds, vec![Some(100), Some(101), Some(102)]);
        assert_eq!(first[2].version, 3);
    }

    #[test]
    fn test_versions_share_structure() {
        let prepared = prepared();
        let versions = generate_versions(&prepared, 2, None);
        assert_eq!(versions.len(), 2);
        for version in &versions {
            assert_eq!(version.seed, None);
            // teacher choice is random, but the subject layout is not
            assert_eq!(version.timetable.allocations, versions[0].timetable.allocations);
        }
    }
}
