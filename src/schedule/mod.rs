pub mod types;
pub mod slot_utils;
pub mod picker;
pub mod allocation;
pub mod versions;

pub use types::{
    Assignment, ClassGrid, SessionKind, Slot, SubjectAllocation, SubjectDemand, TeacherEligibility,
    TeacherGrid, TeacherSchedule, Timetable, UNASSIGNED_TEACHER,
};
pub use slot_utils::{build_period_grid, count_periods, parse_time, slot_ids};
pub use picker::{FirstTeacher, RandomPicker, TeacherPicker};
pub use allocation::allocate;
pub use versions::{generate_versions, PreparedTimetable, TimetableVersion};
