use std::collections::{BTreeMap, HashMap};
use chrono::NaiveTime;
use serde::{Serialize, Deserialize};

/// Teacher name used when a subject has nobody eligible to teach it
pub const UNASSIGNED_TEACHER: &str = "TBD";

/// One position in the daily sequence, shared by every day of the week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
    Break { anchor: NaiveTime, label: String },
    Period { start: NaiveTime, end: NaiveTime },
}

impl Slot {
    /// Identifier used as the grid column: `HH:MM` for breaks, `HH:MM - HH:MM` for periods
    pub fn id(&self) -> String {
        match self {
            Slot::Break { anchor, .. } => anchor.format("%H:%M").to_string(),
            Slot::Period { start, end } => {
                format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
            }
        }
    }

    /// Leading clock time, used for ordering
    pub fn start(&self) -> NaiveTime {
        match self {
            Slot::Break { anchor, .. } => *anchor,
            Slot::Period { start, .. } => *start,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Slot::Break { .. })
    }

    pub fn break_label(&self) -> Option<&str> {
        match self {
            Slot::Break { label, .. } => Some(label),
            Slot::Period { .. } => None,
        }
    }
}

/// Weekly period targets for one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDemand {
    pub name: String,
    #[serde(default)]
    pub theory: u32,
    #[serde(default)]
    pub practical: u32,
}

impl SubjectDemand {
    pub fn new(name: impl Into<String>, theory: u32, practical: u32) -> Self {
        Self {
            name: name.into(),
            theory,
            practical,
        }
    }

    pub fn total(&self) -> u32 {
        self.theory.saturating_add(self.practical)
    }

    /// Practical sessions are always double periods, so one needs at least two
    pub fn needs_practical_pairs(&self) -> bool {
        self.practical >= 2
    }
}

/// Subject -> eligible teachers, keeping the order subjects were first seen in
#[derive(Debug, Clone)]
pub struct TeacherEligibility {
    subjects: Vec<String>,
    teachers: HashMap<String, Vec<String>>,
    fallback: Vec<String>,
}

fn unassigned_pool() -> Vec<String> {
    vec![UNASSIGNED_TEACHER.to_string()]
}

impl Default for TeacherEligibility {
    fn default() -> Self {
        Self {
            subjects: Vec::new(),
            teachers: HashMap::new(),
            fallback: unassigned_pool(),
        }
    }
}

impl TeacherEligibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the teachers for a subject, replacing any earlier list
    pub fn insert(&mut self, subject: impl Into<String>, teachers: Vec<String>) {
        let subject = subject.into();
        if !self.teachers.contains_key(&subject) {
            self.subjects.push(subject.clone());
        }
        self.teachers.insert(subject, teachers);
    }

    /// Eligible teachers for `subject`; never empty
    pub fn teachers_for(&self, subject: &str) -> &[String] {
        match self.teachers.get(subject) {
            Some(list) if !list.is_empty() => list,
            _ => &self.fallback,
        }
    }

    pub fn has_teachers(&self, subject: &str) -> bool {
        self.teachers.get(subject).is_some_and(|list| !list.is_empty())
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl IntoIterator for TeacherEligibility {
    type Item = (String, Vec<String>);
    type IntoIter = std::vec::IntoIter<(String, Vec<String>)>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.subjects
            .into_iter()
            .map(|subject| {
                let teachers = self.teachers.remove(&subject).unwrap_or_default();
                (subject, teachers)
            })
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<S: Into<String>> Extend<(S, Vec<String>)> for TeacherEligibility {
    fn extend<I: IntoIterator<Item = (S, Vec<String>)>>(&mut self, iter: I) {
        for (subject, teachers) in iter {
            self.insert(subject, teachers);
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for TeacherEligibility {
    fn from_iter<I: IntoIterator<Item = (S, Vec<String>)>>(iter: I) -> Self {
        let mut eligibility = TeacherEligibility::new();
        eligibility.extend(iter);
        eligibility
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Half of a double practical period
    Practical,
    Theory,
    /// Theory period of a subject that also has practical hours
    TheoryWithPractical,
}

/// A subject taught by a teacher in one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub subject: String,
    pub teacher: String,
    pub kind: SessionKind,
}

impl Assignment {
    /// Cell text for the teacher's own grid (no room annotation)
    pub fn teacher_label(&self) -> String {
        match self.kind {
            SessionKind::Practical => format!("{} (PR) ({})", self.subject, self.teacher),
            SessionKind::Theory => format!("{} TH ({})", self.subject, self.teacher),
            SessionKind::TheoryWithPractical => {
                format!("{} TH (PR) ({})", self.subject, self.teacher)
            }
        }
    }

    /// Cell text for the class grid, tagged with the room
    pub fn class_label(&self, room: &str) -> String {
        if room.is_empty() {
            self.teacher_label()
        } else {
            format!("{} [{}]", self.teacher_label(), room)
        }
    }
}

/// Day-by-slot grid for one class. Unfilled cells are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGrid {
    pub days: Vec<String>,
    pub slots: Vec<Slot>,
    /// `cells[day][slot]`, in `days` and `slots` order
    pub cells: Vec<Vec<String>>,
}

impl ClassGrid {
    /// Blank grid with every break cell already labelled
    pub fn new(days: Vec<String>, slots: Vec<Slot>) -> Self {
        let row: Vec<String> = slots
            .iter()
            .map(|slot| slot.break_label().unwrap_or_default().to_string())
            .collect();
        let cells = vec![row; days.len()];
        Self { days, slots, cells }
    }

    pub fn slot_ids(&self) -> Vec<String> {
        self.slots.iter().map(Slot::id).collect()
    }

    pub fn row(&self, day: &str) -> Option<&[String]> {
        let index = self.days.iter().position(|d| d == day)?;
        Some(&self.cells[index])
    }

    pub fn cell(&self, day: &str, slot_id: &str) -> Option<&str> {
        let slot_index = self.slots.iter().position(|s| s.id() == slot_id)?;
        self.row(day).map(|row| row[slot_index].as_str())
    }

    pub(crate) fn set(&mut self, day_index: usize, slot_index: usize, label: String) {
        self.cells[day_index][slot_index] = label;
    }
}

/// One teacher's assignments: day -> slot id -> label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherSchedule {
    pub cells: BTreeMap<String, BTreeMap<String, String>>,
}

impl TeacherSchedule {
    pub fn cell(&self, day: &str, slot_id: &str) -> Option<&str> {
        self.cells.get(day)?.get(slot_id).map(String::as_str)
    }

    /// Number of periods this teacher was given
    pub fn period_count(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }
}

/// Per-teacher grids. A teacher only appears once they receive an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherGrid {
    pub schedules: BTreeMap<String, TeacherSchedule>,
}

impl TeacherGrid {
    pub fn get(&self, teacher: &str) -> Option<&TeacherSchedule> {
        self.schedules.get(teacher)
    }

    pub fn teachers(&self) -> impl Iterator<Item = &str> {
        self.schedules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    pub(crate) fn assign(&mut self, teacher: &str, day: &str, slot_id: String, label: String) {
        self.schedules
            .entry(teacher.to_string())
            .or_default()
            .cells
            .entry(day.to_string())
            .or_default()
            .insert(slot_id, label);
    }
}

/// Final counter for one subject after a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectAllocation {
    pub subject: String,
    pub allocated: u32,
    pub target: u32,
}

impl SubjectAllocation {
    pub fn remaining(&self) -> u32 {
        self.target.saturating_sub(self.allocated)
    }
}

/// Output of one allocation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub class_grid: ClassGrid,
    pub teacher_grid: TeacherGrid,
    pub allocations: Vec<SubjectAllocation>,
}

impl Timetable {
    pub fn allocation(&self, subject: &str) -> Option<&SubjectAllocation> {
        self.allocations.iter().find(|a| a.subject == subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_slot_ids() {
        let period = Slot::Period { start: time(7, 45), end: time(8, 45) };
        let lunch = Slot::Break { anchor: time(12, 0), label: "Lunch".into() };
        assert_eq!(period.id(), "07:45 - 08:45");
        assert_eq!(lunch.id(), "12:00");
        assert!(lunch.is_break());
        assert_eq!(period.break_label(), None);
    }

    #[test]
    fn test_labels_strip_room_for_teacher() {
        let assignment = Assignment {
            subject: "Physics".into(),
            teacher: "Rao".into(),
            kind: SessionKind::TheoryWithPractical,
        };
        assert_eq!(assignment.class_label("Room 101"), "Physics TH (PR) (Rao) [Room 101]");
        assert_eq!(assignment.teacher_label(), "Physics TH (PR) (Rao)");
        assert_eq!(assignment.class_label(""), "Physics TH (PR) (Rao)");
    }

    #[test]
    fn test_eligibility_falls_back_to_sentinel() {
        let mut eligibility = TeacherEligibility::new();
        eligibility.insert("Math", vec!["A".into()]);
        eligibility.insert("Art", Vec::new());
        assert_eq!(eligibility.teachers_for("Math"), ["A".to_string()]);
        assert_eq!(eligibility.teachers_for("Art"), [UNASSIGNED_TEACHER.to_string()]);
        assert_eq!(eligibility.teachers_for("Music"), [UNASSIGNED_TEACHER.to_string()]);
        assert!(!eligibility.has_teachers("Art"));
        assert_eq!(eligibility.subjects(), ["Math".to_string(), "Art".to_string()]);
    }

    #[test]
    fn test_eligibility_keeps_first_seen_order() {
        let mut eligibility: TeacherEligibility =
            [("Math", vec!["A".to_string()]), ("Art", vec!["B".to_string()])].into_iter().collect();
        eligibility.extend([("Math", vec!["C".to_string()]), ("Music", vec!["D".to_string()])]);
        assert_eq!(
            eligibility.subjects(),
            ["Math".to_string(), "Art".to_string(), "Music".to_string()]
        );
        assert_eq!(eligibility.teachers_for("Math"), ["C".to_string()]);
        let pairs: Vec<(String, Vec<String>)> = eligibility.into_iter().collect();
        assert_eq!(pairs[0], ("Math".to_string(), vec!["C".to_string()]));
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_new_grid_prefills_breaks() {
        let slots = vec![
            Slot::Period { start: time(9, 0), end: time(10, 0) },
            Slot::Break { anchor: time(10, 0), label: "Recess".into() },
        ];
        let grid = ClassGrid::new(vec!["Mon".into(), "Tue".into()], slots);
        assert_eq!(grid.cell("Tue", "10:00"), Some("Recess"));
        assert_eq!(grid.cell("Mon", "09:00 - 10:00"), Some(""));
        assert_eq!(grid.cell("Wed", "10:00"), None);
    }
}
