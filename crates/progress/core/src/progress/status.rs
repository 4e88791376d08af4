/// Four-way status shared by every level of the hierarchy.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Locked,
}

impl ProgressStatus {
    /// The status rule every level applies:
    /// locked wins, then all-complete, then any activity.
    pub const fn classify(locked: bool, completed: usize, total: usize, started: bool) -> Self {
        if locked {
            Self::Locked
        } else if total > 0 && completed == total {
            Self::Completed
        } else if started || completed > 0 {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }

    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Completed-out-of-total counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    pub completed: usize,
    pub total: usize,
}

impl Tally {
    pub const fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    pub const fn percentage(self) -> u8 {
        percentage(self.completed, self.total)
    }
}

impl core::ops::Add for Tally {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            completed: self.completed + rhs.completed,
            total: self.total + rhs.total,
        }
    }
}

impl core::ops::AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl core::iter::Sum for Tally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, tally| acc + tally)
    }
}

/// Presentation record for one node: its children completed, rounded
/// percentage, and status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total: usize,
    /// 0..=100, rounded half up.
    pub percentage: u8,
    pub status: ProgressStatus,
}

impl ProgressSnapshot {
    pub const fn new(tally: Tally, locked: bool, started: bool) -> Self {
        Self {
            completed: tally.completed,
            total: tally.total,
            percentage: tally.percentage(),
            status: ProgressStatus::classify(locked, tally.completed, tally.total, started),
        }
    }
}

/// `completed / total` as a 0..=100 integer, rounded half up. Empty totals read
/// as zero.
pub const fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = if completed > total { total } else { completed };
    ((completed * 100 + total / 2) / total) as u8
}
