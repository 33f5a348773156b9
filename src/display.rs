use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use csv::Writer;
use crate::config::CapacityReport;
use crate::schedule::{ClassGrid, TeacherSchedule, Timetable, TimetableVersion};

/// Header row followed by one row per day
pub fn class_table(grid: &ClassGrid) -> Vec<Vec<String>> {
    let mut table = Vec::with_capacity(grid.days.len() + 1);
    table.push(header(grid));
    for (day, cells) in grid.days.iter().zip(&grid.cells) {
        let mut row = Vec::with_capacity(cells.len() + 1);
        row.push(day.clone());
        row.extend(cells.iter().cloned());
        table.push(row);
    }
    table
}

/// A teacher's grid laid out like the class grid: break columns keep their
/// label, slots the teacher does not teach are blank
pub fn teacher_table(grid: &ClassGrid, schedule: &TeacherSchedule) -> Vec<Vec<String>> {
    let slot_ids = grid.slot_ids();
    let mut table = Vec::with_capacity(grid.days.len() + 1);
    table.push(header(grid));
    for day in &grid.days {
        let mut row = Vec::with_capacity(slot_ids.len() + 1);
        row.push(day.clone());
        for (slot, slot_id) in grid.slots.iter().zip(&slot_ids) {
            let cell = match slot.break_label() {
                Some(label) => label,
                None => schedule.cell(day, slot_id).unwrap_or(""),
            };
            row.push(cell.to_string());
        }
        table.push(row);
    }
    table
}

fn header(grid: &ClassGrid) -> Vec<String> {
    let mut header = vec!["Day".to_string()];
    header.extend(grid.slot_ids());
    header
}

/// Writes the class grid as CSV
pub fn write_class_csv<W: Write>(grid: &ClassGrid, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for row in class_table(grid) {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes every teacher's grid into one CSV, prefixed with a `Teacher` column
pub fn write_teacher_csv<W: Write>(timetable: &Timetable, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    let grid = &timetable.class_grid;
    let mut header = vec!["Teacher".to_string(), "Day".to_string()];
    header.extend(grid.slot_ids());
    wtr.write_record(&header)?;
    for (teacher, schedule) in &timetable.teacher_grid.schedules {
        for row in teacher_table(grid, schedule).into_iter().skip(1) {
            wtr.write_record(std::iter::once(teacher.as_str()).chain(row.iter().map(String::as_str)))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the class and faculty CSVs for one version into `dir`
pub fn write_version_files(
    dir: &Path,
    file_stem: &str,
    version: &TimetableVersion,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let class_path = dir.join(format!("{}_Timetable_V{}.csv", file_stem, version.version));
    write_class_csv(&version.timetable.class_grid, File::create(&class_path)?)?;
    let faculty_path = dir.join(format!("{}_Faculty_V{}.csv", file_stem, version.version));
    write_teacher_csv(&version.timetable, File::create(&faculty_path)?)?;
    Ok(vec![class_path, faculty_path])
}

pub fn print_capacity(report: &CapacityReport) {
    println!("Total periods per day (excluding breaks): {}", report.periods_per_day);
    println!("Total available teaching hours per week: {} hrs", report.available_hours);
    println!("Total subject hours requested: {} hrs", report.requested_hours);
    if report.over_subscribed {
        println!("⚠️  Total subject hours exceed available weekly hours!");
    }
}

/// Prints a table with padded columns
pub fn print_table(table: &[Vec<String>]) {
    let columns = table.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            table
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    for row in table {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("  {}", line.join(" | ").trim_end());
    }
}

/// Prints the class grid and every teacher's grid for one version
pub fn print_version(title: &str, version: &TimetableVersion) {
    let timetable = &version.timetable;
    println!("\n=== Version {}: {} ===", version.version, title);
    print_table(&class_table(&timetable.class_grid));

    let unmet: Vec<_> = timetable.allocations.iter().filter(|a| a.remaining() > 0).collect();
    if !unmet.is_empty() {
        println!("Unallocated periods ({}):", unmet.len());
        for allocation in unmet {
            println!("  - {}: {} of {}", allocation.subject, allocation.remaining(), allocation.target);
        }
    }

    println!("\n--- Faculty-wise Timetable ---");
    for (teacher, schedule) in &timetable.teacher_grid.schedules {
        println!("\n{} ({} periods)", teacher, schedule.period_count());
        print_table(&teacher_table(&timetable.class_grid, schedule));
    }
}
