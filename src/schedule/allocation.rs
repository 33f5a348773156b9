use log::{debug, warn};
use super::picker::TeacherPicker;
use super::types::{
    Assignment, ClassGrid, SessionKind, Slot, SubjectAllocation, SubjectDemand, TeacherEligibility,
    TeacherGrid, Timetable,
};

/// Greedily fills a class timetable for one week.
///
/// Each day is walked left to right. At every non-break slot the first subject
/// (in `demand` order) that can still take a double practical is placed across
/// this slot and the next one, provided the next one is not a break. Otherwise
/// the subject with the largest remaining weekly deficit gets a single period.
/// Once every subject has met its target the rest of that day stays empty.
///
/// Quotas are weekly, so the counters carry over from one day to the next.
/// Demand that does not fit is simply left unallocated.
pub fn allocate<P: TeacherPicker + ?Sized>(
    demand: &[SubjectDemand],
    eligibility: &TeacherEligibility,
    days: &[String],
    slots: &[Slot],
    room: &str,
    picker: &mut P,
) -> Timetable {
    for subject in demand {
        if subject.total() > 0 && !eligibility.has_teachers(&subject.name) {
            warn!("No teacher configured for {}, using a placeholder", subject.name);
        }
    }

    let slot_ids: Vec<String> = slots.iter().map(Slot::id).collect();
    let mut allocated = vec![0u32; demand.len()];
    let mut class_grid = ClassGrid::new(days.to_vec(), slots.to_vec());
    let mut teacher_grid = TeacherGrid::default();

    for (day_index, day) in days.iter().enumerate() {
        let mut cursor = 0;
        while cursor < slots.len() {
            if slots[cursor].is_break() {
                cursor += 1;
                continue;
            }

            let pair_fits = slots.get(cursor + 1).is_some_and(|next| !next.is_break());
            if pair_fits {
                if let Some(subject) = first_practical_pair(demand, &allocated) {
                    let assignment = Assignment {
                        subject: demand[subject].name.clone(),
                        teacher: choose_teacher(eligibility, &demand[subject].name, picker),
                        kind: SessionKind::Practical,
                    };
                    for slot_index in [cursor, cursor + 1] {
                        place(&mut class_grid, &mut teacher_grid, day_index, day, &slot_ids[slot_index], slot_index, &assignment, room);
                    }
                    allocated[subject] += 2;
                    cursor += 2;
                    continue;
                }
            }

            let Some(subject) = largest_deficit(demand, &allocated) else {
                debug!("All subjects scheduled, leaving the rest of {} empty", day);
                break;
            };
            let kind = if demand[subject].practical > 0 {
                SessionKind::TheoryWithPractical
            } else {
                SessionKind::Theory
            };
            let assignment = Assignment {
                subject: demand[subject].name.clone(),
                teacher: choose_teacher(eligibility, &demand[subject].name, picker),
                kind,
            };
            allocated[subject] += 1;
            place(&mut class_grid, &mut teacher_grid, day_index, day, &slot_ids[cursor], cursor, &assignment, room);
            cursor += 1;
        }
    }

    let allocations: Vec<SubjectAllocation> = demand
        .iter()
        .zip(&allocated)
        .map(|(subject, &count)| SubjectAllocation {
            subject: subject.name.clone(),
            allocated: count,
            target: subject.total(),
        })
        .collect();
    for allocation in allocations.iter().filter(|a| a.remaining() > 0) {
        debug!(
            "{} left with {} of {} periods unallocated",
            allocation.subject,
            allocation.remaining(),
            allocation.target
        );
    }

    Timetable {
        class_grid,
        teacher_grid,
        allocations,
    }
}

/// First subject, in demand order, that can still take a double practical.
/// Deliberately not the one with the largest deficit.
fn first_practical_pair(demand: &[SubjectDemand], allocated: &[u32]) -> Option<usize> {
    demand
        .iter()
        .zip(allocated)
        .position(|(subject, &count)| subject.needs_practical_pairs() && count + 2 <= subject.practical)
}

/// Subject furthest from its weekly target; the earliest one wins a tie.
fn largest_deficit(demand: &[SubjectDemand], allocated: &[u32]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, (subject, &count)) in demand.iter().zip(allocated).enumerate() {
        if count >= subject.total() {
            continue;
        }
        let deficit = subject.total() - count;
        if best.map_or(true, |(_, top)| deficit > top) {
            best = Some((index, deficit));
        }
    }
    best.map(|(index, _)| index)
}

fn choose_teacher<P: TeacherPicker + ?Sized>(
    eligibility: &TeacherEligibility,
    subject: &str,
    picker: &mut P,
) -> String {
    let teachers = eligibility.teachers_for(subject);
    let index = picker.pick(teachers.len()).min(teachers.len() - 1);
    teachers[index].clone()
}

#[allow(clippy::too_many_arguments)]
fn place(
    class_grid: &mut ClassGrid,
    teacher_grid: &mut TeacherGrid,
    day_index: usize,
    day: &str,
    slot_id: &str,
    slot_index: usize,
    assignment: &Assignment,
    room: &str,
) {
    class_grid.set(day_index, slot_index, assignment.class_label(room));
    teacher_grid.assign(&assignment.teacher, day, slot_id.to_string(), assignment.teacher_label());
}
