use crate::errors::ApiError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days are days of a month.
pub const MAX_DAYS_IN_PERIOD: u32 = 31;

pub type HabitId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub habit_id: HabitId,
    pub day: u32,
    pub completed: bool,
}

/// Initial dashboard state as served by the habit backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContext {
    pub current_day: u32,
    #[serde(default)]
    pub days_in_period: u32,
    #[serde(default)]
    pub daily_progress: Vec<u8>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub entries: Vec<DailyEntry>,
}

impl PageContext {
    /// No habits, tracked through `today` within its month.
    pub fn empty_for(today: NaiveDate) -> Self {
        Self {
            current_day: today.day(),
            days_in_period: days_in_month(today),
            ..Default::default()
        }
    }

    /// Period length, falling back to `current_day` when the backend omits it.
    pub fn period_days(&self) -> u32 {
        if self.days_in_period == 0 {
            self.current_day
        } else {
            self.days_in_period
        }
    }

    /// Refuse day bounds outside `1 <= current_day <= days_in_period <= 31`.
    pub fn validate(&self) -> Result<(), ApiError> {
        let days = self.period_days();
        if self.current_day == 0 || self.current_day > days || days > MAX_DAYS_IN_PERIOD {
            return Err(ApiError::InvalidPage(format!(
                "current_day {} of {} days",
                self.current_day, self.days_in_period
            )));
        }
        Ok(())
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitLogRequest {
    pub habit_id: HabitId,
    pub day: u32,
    pub status: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitLogResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_today: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_progress: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitNameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TodayProgress {
    pub completed: u32,
    pub total: u32,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitProgress {
    pub habit_id: HabitId,
    pub name: String,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub today: TodayProgress,
    pub daily: Vec<u8>,
    pub per_habit: Vec<HabitProgress>,
    pub month_percentage: u8,
}

impl ProgressSnapshot {
    pub fn habit_percentages(&self) -> Vec<u8> {
        self.per_habit.iter().map(|habit| habit.percentage).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub habit_id: HabitId,
    pub day: u32,
    pub checked: bool,
}
