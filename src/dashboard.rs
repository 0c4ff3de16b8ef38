use crate::charts::ChartSet;
use crate::errors::{ApiError, DashboardError};
use crate::grid::CheckboxGrid;
use crate::models::{HabitId, HabitLogRequest, HabitLogResponse, PageContext, ProgressSnapshot};
use crate::notify::{Notifications, Toast, ToastKind};
use crate::progress::{build_snapshot, initial_snapshot};
use crate::theme::Theme;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Controls that can have a request in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Control {
    Cell { habit_id: HabitId, day: u32 },
    AddHabit,
    EditHabit(HabitId),
    DeleteHabit(HabitId),
}

/// A toggle that has been applied locally and is waiting on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    pub habit_id: HabitId,
    pub day: u32,
    pub previous: bool,
    pub checked: bool,
}

impl PendingToggle {
    pub fn request(&self) -> HabitLogRequest {
        HabitLogRequest {
            habit_id: self.habit_id,
            day: self.day,
            status: self.checked,
        }
    }

    fn control(&self) -> Control {
        Control::Cell {
            habit_id: self.habit_id,
            day: self.day,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub habit_id: HabitId,
    pub day: u32,
    pub checked: bool,
    pub accepted: bool,
    pub snapshot: ProgressSnapshot,
    pub charts: ChartSet,
    pub toast: Toast,
}

/// Everything the page shows, rebuilt from a `PageContext` on every load.
#[derive(Debug, Clone)]
pub struct Dashboard {
    current_day: u32,
    grid: CheckboxGrid,
    snapshot: ProgressSnapshot,
    charts: ChartSet,
    theme: Theme,
    notifications: Notifications,
    in_flight: BTreeSet<Control>,
}

impl Dashboard {
    pub fn new(page: &PageContext, theme: Theme) -> Self {
        let grid = CheckboxGrid::from_page(page);
        let snapshot = initial_snapshot(page, &grid);
        let charts = ChartSet::new(&snapshot, grid.habits(), theme);
        Self {
            current_day: page.current_day,
            grid,
            snapshot,
            charts,
            theme,
            notifications: Notifications::default(),
            in_flight: BTreeSet::new(),
        }
    }

    /// Rebuild from fresh backend state, keeping theme, toast and any
    /// controls still in flight.
    pub fn reload(&mut self, page: &PageContext) {
        let notifications = std::mem::take(&mut self.notifications);
        let in_flight = std::mem::take(&mut self.in_flight);
        *self = Self::new(page, self.theme);
        self.notifications = notifications;
        self.in_flight = in_flight;
        info!(
            habits = self.grid.habits().len(),
            current_day = self.current_day,
            "dashboard reloaded"
        );
    }

    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    pub fn grid(&self) -> &CheckboxGrid {
        &self.grid
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    pub fn charts(&self) -> &ChartSet {
        &self.charts
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) -> Toast {
        self.notifications.show(message, kind)
    }

    pub fn is_in_flight(&self, control: Control) -> bool {
        self.in_flight.contains(&control)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.charts.apply_theme(theme);
    }

    /// Apply a checkbox change locally and mark the cell as in flight.
    pub fn begin_toggle(
        &mut self,
        habit_id: HabitId,
        day: u32,
        checked: bool,
    ) -> Result<PendingToggle, DashboardError> {
        if self.grid.habit(habit_id).is_none() {
            return Err(DashboardError::UnknownHabit(habit_id));
        }
        if day == 0 || day > self.current_day {
            return Err(DashboardError::DayOutOfRange {
                day,
                current_day: self.current_day,
            });
        }

        let pending = PendingToggle {
            habit_id,
            day,
            previous: self.grid.is_checked(habit_id, day),
            checked,
        };
        if !self.in_flight.insert(pending.control()) {
            return Err(DashboardError::Busy);
        }

        self.grid.set(habit_id, day, checked);
        Ok(pending)
    }

    /// Settle a toggle with the backend's answer: keep on success, revert on
    /// any failure, recompute either way.
    pub fn settle_toggle(
        &mut self,
        pending: PendingToggle,
        result: Result<HabitLogResponse, ApiError>,
    ) -> ToggleOutcome {
        self.in_flight.remove(&pending.control());

        let (accepted, toast) = match result {
            Ok(response) => {
                debug!(
                    completed_today = ?response.completed_today,
                    today_progress = ?response.today_progress,
                    "habit log saved"
                );
                self.recalculate();
                (true, self.notifications.show("✓", ToastKind::Success))
            }
            Err(ApiError::Rejected(message)) => {
                warn!(
                    habit_id = pending.habit_id,
                    day = pending.day,
                    message = message.as_deref().unwrap_or(""),
                    "habit log rejected, reverting"
                );
                self.revert(&pending);
                (false, self.notifications.show("✗", ToastKind::Failure))
            }
            Err(err) => {
                warn!(
                    habit_id = pending.habit_id,
                    day = pending.day,
                    "habit log failed, reverting: {err}"
                );
                self.revert(&pending);
                (false, self.notifications.show("Error", ToastKind::Failure))
            }
        };

        ToggleOutcome {
            habit_id: pending.habit_id,
            day: pending.day,
            checked: self.grid.is_checked(pending.habit_id, pending.day),
            accepted,
            snapshot: self.snapshot.clone(),
            charts: self.charts.clone(),
            toast,
        }
    }

    pub fn begin_submit(&mut self, control: Control) -> Result<(), DashboardError> {
        if self.in_flight.insert(control) {
            Ok(())
        } else {
            Err(DashboardError::Busy)
        }
    }

    pub fn end_submit(&mut self, control: Control) {
        self.in_flight.remove(&control);
    }

    /// A reload may have dropped the cell while its request was in flight.
    fn revert(&mut self, pending: &PendingToggle) {
        if self.grid.contains(pending.habit_id, pending.day) {
            self.grid.set(pending.habit_id, pending.day, pending.previous);
        }
        self.recalculate();
    }

    fn recalculate(&mut self) {
        self.snapshot = build_snapshot(&self.grid, self.current_day);
        self.charts.update(&self.snapshot);
    }
}
