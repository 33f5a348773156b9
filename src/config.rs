use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use log::{info, warn};
use serde::{Serialize, Deserialize};
use crate::error::ConfigError;
use crate::parser::load_teacher_mapping;
use crate::schedule::{build_period_grid, count_periods, PreparedTimetable, SubjectDemand, TeacherEligibility};

/// Most versions generated in one request
pub const MAX_VERSIONS: usize = 3;

/// Weekly period targets accepted per subject
pub const MAX_THEORY_PERIODS: u32 = 45;
pub const MAX_PRACTICAL_PERIODS: u32 = 20;

/// Theory periods assumed for a subject that only appears in the teacher mapping
pub const DEFAULT_THEORY_PERIODS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPreset {
    MonFri,
    MonSat,
}

impl DayPreset {
    pub fn days(self) -> Vec<String> {
        let all = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
        let count = match self {
            DayPreset::MonFri => 5,
            DayPreset::MonSat => 6,
        };
        all[..count].iter().map(|d| d.to_string()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaySelection {
    Preset(DayPreset),
    Custom(Vec<String>),
}

impl Default for DaySelection {
    fn default() -> Self {
        DaySelection::Preset(DayPreset::MonFri)
    }
}

impl DaySelection {
    pub fn days(&self) -> Vec<String> {
        match self {
            DaySelection::Preset(preset) => preset.days(),
            DaySelection::Custom(days) => days.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherMappingEntry {
    pub subject: String,
    pub teachers: Vec<String>,
}

/// Everything needed to generate timetables for one class section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    pub class_name: String,
    pub section: String,
    pub room: String,
    pub days: DaySelection,
    pub start_time: String,
    pub end_time: String,
    pub period_minutes: u32,
    /// HH:MM -> label
    pub breaks: BTreeMap<String, String>,
    pub subjects: Vec<SubjectDemand>,
    pub teachers: Vec<TeacherMappingEntry>,
    pub teacher_csv: Option<PathBuf>,
    pub versions: usize,
    pub seed: Option<u64>,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        let mut breaks = BTreeMap::new();
        breaks.insert("10:00".to_string(), "Short Break (15 min)".to_string());
        breaks.insert("12:00".to_string(), "Lunch Break (30 min)".to_string());
        Self {
            class_name: "Class 5".to_string(),
            section: "A".to_string(),
            room: "Room 101".to_string(),
            days: DaySelection::default(),
            start_time: "07:45".to_string(),
            end_time: "14:30".to_string(),
            period_minutes: 60,
            breaks,
            subjects: Vec::new(),
            teachers: Vec::new(),
            teacher_csv: None,
            versions: 1,
            seed: None,
        }
    }
}

/// How the requested hours compare with what the week can hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityReport {
    pub periods_per_day: usize,
    pub weekly_periods: usize,
    pub available_hours: u32,
    pub requested_hours: u32,
    pub over_subscribed: bool,
}

/// Loads a JSON configuration file. A relative `teacher_csv` is resolved
/// against the configuration file's directory.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TimetableConfig, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mut config: TimetableConfig = serde_json::from_str(&text)?;
    if let (Some(csv), Some(dir)) = (config.teacher_csv.as_ref(), path.parent()) {
        if csv.is_relative() {
            config.teacher_csv = Some(dir.join(csv));
        }
    }
    Ok(config)
}

impl TimetableConfig {
    /// Merges inline teachers with the teacher CSV, if any (CSV rows win)
    pub fn teacher_eligibility(&self) -> Result<TeacherEligibility, Box<dyn std::error::Error>> {
        let mut eligibility: TeacherEligibility = self
            .teachers
            .iter()
            .map(|entry| (entry.subject.clone(), entry.teachers.clone()))
            .collect();
        if let Some(path) = &self.teacher_csv {
            let from_csv = load_teacher_mapping(path)?;
            info!("Loaded {} subjects from {}", from_csv.subjects().len(), path.display());
            eligibility.extend(from_csv);
        }
        Ok(eligibility)
    }

    /// Validates the configuration against an already loaded teacher mapping
    pub fn prepare(&self, eligibility: TeacherEligibility) -> Result<(PreparedTimetable, CapacityReport), ConfigError> {
        if !(1..=MAX_VERSIONS).contains(&self.versions) {
            return Err(ConfigError::InvalidVersionCount(self.versions));
        }

        let days = self.days.days();
        if days.is_empty() {
            return Err(ConfigError::NoDays);
        }
        let mut seen = HashSet::new();
        for day in &days {
            if !seen.insert(day.as_str()) {
                return Err(ConfigError::DuplicateDay(day.clone()));
            }
        }

        let demand = if self.subjects.is_empty() {
            eligibility
                .subjects()
                .iter()
                .map(|subject| SubjectDemand::new(subject.clone(), DEFAULT_THEORY_PERIODS, 0))
                .collect()
        } else {
            self.subjects.clone()
        };
        let mut seen = HashSet::new();
        for subject in &demand {
            if !seen.insert(subject.name.as_str()) {
                return Err(ConfigError::DuplicateSubject(subject.name.clone()));
            }
            if subject.theory > MAX_THEORY_PERIODS || subject.practical > MAX_PRACTICAL_PERIODS {
                return Err(ConfigError::TargetOutOfRange {
                    subject: subject.name.clone(),
                    theory: subject.theory,
                    practical: subject.practical,
                });
            }
        }

        let slots = build_period_grid(&self.start_time, &self.end_time, self.period_minutes, &self.breaks)?;
        let report = capacity_report(&demand, days.len(), count_periods(&slots), self.period_minutes);
        if report.over_subscribed {
            warn!(
                "Requested {} hours but only {} fit in the week; some periods will stay unallocated",
                report.requested_hours, report.available_hours
            );
        }

        let prepared = PreparedTimetable {
            demand,
            eligibility,
            days,
            slots,
            room: self.room.clone(),
        };
        Ok((prepared, report))
    }

    /// File name stem such as `Class 5_A`
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.class_name, self.section)
    }
}

pub fn capacity_report(demand: &[SubjectDemand], day_count: usize, periods_per_day: usize, period_minutes: u32) -> CapacityReport {
    let weekly_periods = periods_per_day * day_count;
    let available_hours = (weekly_periods as u64 * u64::from(period_minutes) / 60) as u32;
    let requested_hours = demand
        .iter()
        .map(SubjectDemand::total)
        .fold(0u32, u32::saturating_add);
    CapacityReport {
        periods_per_day,
        weekly_periods,
        available_hours,
        requested_hours,
        over_subscribed: requested_hours > available_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InvalidRangeError, PeriodGridError};

    fn eligibility() -> TeacherEligibility {
        [
            ("Math", vec!["A".to_string()]),
            ("Science", vec!["B".to_string()]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_defaults_match_reference_school_day() {
        let config = TimetableConfig::default();
        let (prepared, report) = config.prepare(eligibility()).unwrap();
        assert_eq!(prepared.days.len(), 5);
        assert_eq!(prepared.room, "Room 101");
        assert_eq!(report.periods_per_day, 6);
        assert_eq!(report.weekly_periods, 30);
        assert_eq!(report.available_hours, 30);
        // derived demand: 3 theory periods per mapped subject
        assert_eq!(prepared.demand, vec![SubjectDemand::new("Math", 3, 0), SubjectDemand::new("Science", 3, 0)]);
        assert_eq!(report.requested_hours, 6);
        assert!(!report.over_subscribed);
    }

    #[test]
    fn test_parse_json_with_preset_and_custom_days() {
        let config: TimetableConfig = serde_json::from_str(
            r#"{
                "class_name": "Class 9",
                "days": "mon_sat",
                "period_minutes": 45,
                "subjects": [{"name": "Math", "theory": 4}, {"name": "Physics", "theory": 2, "practical": 2}],
                "teachers": [{"subject": "Math", "teachers": ["A", "B"]}],
                "seed": 7
            }"#,
        )
        .unwrap();
        assert_eq!(config.days.days().len(), 6);
        assert_eq!(config.section, "A");
        assert_eq!(config.subjects[0], SubjectDemand::new("Math", 4, 0));
        assert_eq!(config.seed, Some(7));

        let config: TimetableConfig = serde_json::from_str(r#"{"days": ["Sun", "Mon"]}"#).unwrap();
        assert_eq!(config.days.days(), vec!["Sun".to_string(), "Mon".to_string()]);
    }

    #[test]
    fn test_over_subscription_is_reported_not_rejected() {
        let config = TimetableConfig {
            subjects: vec![SubjectDemand::new("Math", 20, 0), SubjectDemand::new("Science", 10, 5)],
            ..TimetableConfig::default()
        };
        let (_, report) = config.prepare(eligibility()).unwrap();
        assert_eq!(report.requested_hours, 35);
        assert!(report.over_subscribed);
    }

    #[test]
    fn test_rejects_bad_configs() {
        let config = TimetableConfig { versions: 4, ..TimetableConfig::default() };
        assert_eq!(config.prepare(eligibility()).unwrap_err(), ConfigError::InvalidVersionCount(4));

        let config = TimetableConfig { days: DaySelection::Custom(Vec::new()), ..TimetableConfig::default() };
        assert_eq!(config.prepare(eligibility()).unwrap_err(), ConfigError::NoDays);

        let config = TimetableConfig {
            days: DaySelection::Custom(vec!["Mon".into(), "Mon".into()]),
            ..TimetableConfig::default()
        };
        assert_eq!(config.prepare(eligibility()).unwrap_err(), ConfigError::DuplicateDay("Mon".into()));

        let config = TimetableConfig {
            subjects: vec![SubjectDemand::new("Math", 1, 0), SubjectDemand::new("Math", 2, 0)],
            ..TimetableConfig::default()
        };
        assert_eq!(config.prepare(eligibility()).unwrap_err(), ConfigError::DuplicateSubject("Math".into()));

        let config = TimetableConfig { end_time: "07:00".into(), ..TimetableConfig::default() };
        assert!(matches!(
            config.prepare(eligibility()).unwrap_err(),
            ConfigError::Grid(PeriodGridError::InvalidRange(InvalidRangeError::EndNotAfterStart { .. }))
        ));
    }

    #[test]
    fn test_rejects_targets_above_caps() {
        let config: TimetableConfig = serde_json::from_str(
            r#"{"subjects": [{"name": "Math", "theory": 4294967295, "practical": 1}]}"#,
        )
        .unwrap();
        assert_eq!(
            config.prepare(eligibility()).unwrap_err(),
            ConfigError::TargetOutOfRange { subject: "Math".into(), theory: u32::MAX, practical: 1 }
        );

        let config = TimetableConfig {
            subjects: vec![SubjectDemand::new("Science", 2, MAX_PRACTICAL_PERIODS + 1)],
            ..TimetableConfig::default()
        };
        assert!(matches!(
            config.prepare(eligibility()).unwrap_err(),
            ConfigError::TargetOutOfRange { practical: 21, .. }
        ));

        let config = TimetableConfig {
            subjects: vec![SubjectDemand::new("Math", MAX_THEORY_PERIODS, MAX_PRACTICAL_PERIODS)],
            ..TimetableConfig::default()
        };
        let (_, report) = config.prepare(eligibility()).unwrap();
        assert_eq!(report.requested_hours, 65);
    }

    #[test]
    fn test_capacity_total_saturates() {
        let demand = vec![SubjectDemand::new("Math", u32::MAX, 1), SubjectDemand::new("Art", 3, 0)];
        assert_eq!(demand[0].total(), u32::MAX);
        let report = capacity_report(&demand, 5, 6, 60);
        assert_eq!(report.requested_hours, u32::MAX);
        assert!(report.over_subscribed);
    }

    #[test]
    fn test_capacity_hours_round_down() {
        let demand = vec![SubjectDemand::new("Math", 5, 0)];
        let report = capacity_report(&demand, 5, 7, 45);
        assert_eq!(report.weekly_periods, 35);
        // 35 * 45 = 1575 minutes
        assert_eq!(report.available_hours, 26);
    }
}
