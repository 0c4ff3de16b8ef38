use crate::models::{DailyEntry, Habit, HabitId, PageContext};
use std::collections::BTreeMap;

/// Checkbox state for every (habit, day) cell on the dashboard.
///
/// Every habit has one cell per day in `1..=days_in_period`; cells without an
/// entry start unchecked.
#[derive(Debug, Clone, Default)]
pub struct CheckboxGrid {
    habits: Vec<Habit>,
    days_in_period: u32,
    cells: BTreeMap<(HabitId, u32), bool>,
}

impl CheckboxGrid {
    pub fn new(habits: Vec<Habit>, days_in_period: u32) -> Self {
        Self {
            habits,
            days_in_period,
            cells: BTreeMap::new(),
        }
    }

    pub fn from_page(page: &PageContext) -> Self {
        let days = page.days_in_period.max(page.current_day);
        let mut grid = Self::new(page.habits.clone(), days);
        for entry in &page.entries {
            if grid.contains(entry.habit_id, entry.day) {
                grid.set(entry.habit_id, entry.day, entry.completed);
            }
        }
        grid
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, habit_id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == habit_id)
    }

    pub fn days_in_period(&self) -> u32 {
        self.days_in_period
    }

    pub fn contains(&self, habit_id: HabitId, day: u32) -> bool {
        day >= 1 && day <= self.days_in_period && self.habit(habit_id).is_some()
    }

    pub fn is_checked(&self, habit_id: HabitId, day: u32) -> bool {
        self.cells.get(&(habit_id, day)).copied().unwrap_or(false)
    }

    pub fn set(&mut self, habit_id: HabitId, day: u32, checked: bool) {
        if checked {
            self.cells.insert((habit_id, day), true);
        } else {
            self.cells.remove(&(habit_id, day));
        }
    }

    /// Completed cells for one day across all habits.
    pub fn completed_on(&self, day: u32) -> u32 {
        self.habits
            .iter()
            .filter(|habit| self.is_checked(habit.id, day))
            .count() as u32
    }

    /// Completed cells for one habit over days `1..=through_day`.
    pub fn completed_for(&self, habit_id: HabitId, through_day: u32) -> u32 {
        let last = through_day.min(self.days_in_period);
        if last == 0 {
            return 0;
        }
        self.cells
            .range((habit_id, 1)..=(habit_id, last))
            .filter(|(_, checked)| **checked)
            .count() as u32
    }

    pub fn entries(&self) -> Vec<DailyEntry> {
        self.cells
            .iter()
            .map(|(&(habit_id, day), &completed)| DailyEntry {
                habit_id,
                day,
                completed,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habits() -> Vec<Habit> {
        vec![
            Habit { id: 1, name: "Read".into() },
            Habit { id: 2, name: "Walk".into() },
        ]
    }

    #[test]
    fn from_page_ignores_entries_outside_the_grid() {
        let page = PageContext {
            current_day: 3,
            days_in_period: 30,
            habits: habits(),
            entries: vec![
                DailyEntry { habit_id: 1, day: 2, completed: true },
                DailyEntry { habit_id: 9, day: 2, completed: true },
                DailyEntry { habit_id: 2, day: 31, completed: true },
            ],
            ..Default::default()
        };

        let grid = CheckboxGrid::from_page(&page);
        assert!(grid.is_checked(1, 2));
        assert!(!grid.is_checked(9, 2));
        assert!(!grid.is_checked(2, 31));
        assert_eq!(grid.entries().len(), 1);
    }

    #[test]
    fn period_is_at_least_current_day() {
        let page = PageContext {
            current_day: 5,
            habits: habits(),
            ..Default::default()
        };
        let grid = CheckboxGrid::from_page(&page);
        assert_eq!(grid.days_in_period(), 5);
        assert!(grid.contains(2, 5));
        assert!(!grid.contains(2, 0));
        assert!(!grid.contains(2, 6));
    }

    #[test]
    fn counts_follow_cell_state() {
        let mut grid = CheckboxGrid::new(habits(), 10);
        grid.set(1, 1, true);
        grid.set(1, 2, true);
        grid.set(1, 7, true);
        grid.set(2, 2, true);

        assert_eq!(grid.completed_on(2), 2);
        assert_eq!(grid.completed_on(3), 0);
        assert_eq!(grid.completed_for(1, 3), 2);
        assert_eq!(grid.completed_for(1, 10), 3);

        grid.set(1, 2, false);
        assert_eq!(grid.completed_on(2), 1);
        assert_eq!(grid.completed_for(1, 3), 1);
    }
}
