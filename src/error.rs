use std::fmt;

/// A clock time that is not in `HH:MM` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseTimeError {
    input: String,
}

impl ParseTimeError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid time '{}', expected HH:MM", self.input)
    }
}

impl std::error::Error for ParseTimeError {}

/// The school day cannot be split into periods.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvalidRangeError {
    EndNotAfterStart { start: String, end: String },
    ZeroDuration,
}

impl fmt::Display for InvalidRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRangeError::EndNotAfterStart { start, end } => {
                write!(f, "End time {} must be after start time {}", end, start)
            }
            InvalidRangeError::ZeroDuration => {
                write!(f, "Period duration must be at least one minute")
            }
        }
    }
}

impl std::error::Error for InvalidRangeError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeriodGridError {
    Parse(ParseTimeError),
    InvalidRange(InvalidRangeError),
}

impl fmt::Display for PeriodGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodGridError::Parse(e) => write!(f, "{}", e),
            PeriodGridError::InvalidRange(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PeriodGridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PeriodGridError::Parse(e) => Some(e),
            PeriodGridError::InvalidRange(e) => Some(e),
        }
    }
}

impl From<ParseTimeError> for PeriodGridError {
    fn from(err: ParseTimeError) -> Self {
        PeriodGridError::Parse(err)
    }
}

impl From<InvalidRangeError> for PeriodGridError {
    fn from(err: InvalidRangeError) -> Self {
        PeriodGridError::InvalidRange(err)
    }
}

/// Rejected timetable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Grid(PeriodGridError),
    NoDays,
    DuplicateDay(String),
    DuplicateSubject(String),
    InvalidVersionCount(usize),
    TargetOutOfRange { subject: String, theory: u32, practical: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Grid(e) => write!(f, "Invalid period grid: {}", e),
            ConfigError::NoDays => write!(f, "At least one working day is required"),
            ConfigError::DuplicateDay(day) => write!(f, "Day '{}' is listed more than once", day),
            ConfigError::DuplicateSubject(subject) => {
                write!(f, "Subject '{}' is listed more than once", subject)
            }
            ConfigError::InvalidVersionCount(count) => write!(
                f,
                "Cannot generate {} versions, expected 1 to {}",
                count,
                crate::config::MAX_VERSIONS
            ),
            ConfigError::TargetOutOfRange { subject, theory, practical } => write!(
                f,
                "Subject '{}' asks for {} theory and {} practical periods, at most {} and {} are allowed",
                subject,
                theory,
                practical,
                crate::config::MAX_THEORY_PERIODS,
                crate::config::MAX_PRACTICAL_PERIODS
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PeriodGridError> for ConfigError {
    fn from(err: PeriodGridError) -> Self {
        ConfigError::Grid(err)
    }
}
