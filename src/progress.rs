use crate::grid::CheckboxGrid;
use crate::models::{HabitProgress, PageContext, ProgressSnapshot, TodayProgress};

/// Rounded completion percentage, half-up, 0 when there is nothing to complete.
pub fn percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = u64::from(completed.min(total));
    let total = u64::from(total);
    ((200 * completed + total) / (2 * total)) as u8
}

pub fn build_snapshot(grid: &CheckboxGrid, current_day: u32) -> ProgressSnapshot {
    let habit_count = grid.habits().len() as u32;

    let daily = (1..=current_day)
        .map(|day| percentage(grid.completed_on(day), habit_count))
        .collect();

    let completed_today = if current_day == 0 {
        0
    } else {
        grid.completed_on(current_day)
    };
    let today = TodayProgress {
        completed: completed_today,
        total: habit_count,
        percentage: percentage(completed_today, habit_count),
    };

    let tracked_days = current_day.min(grid.days_in_period());
    let mut month_done = 0u32;
    let per_habit = grid
        .habits()
        .iter()
        .map(|habit| {
            let done = grid.completed_for(habit.id, current_day);
            month_done = month_done.saturating_add(done);
            HabitProgress {
                habit_id: habit.id,
                name: habit.name.clone(),
                percentage: percentage(done, tracked_days),
            }
        })
        .collect();

    ProgressSnapshot {
        today,
        daily,
        per_habit,
        month_percentage: percentage(month_done, habit_count.saturating_mul(tracked_days)),
    }
}

/// Snapshot shown right after load: the trend comes from the page's own
/// daily array, everything else from the grid.
pub fn initial_snapshot(page: &PageContext, grid: &CheckboxGrid) -> ProgressSnapshot {
    let mut snapshot = build_snapshot(grid, page.current_day);
    let mut daily: Vec<u8> = page
        .daily_progress
        .iter()
        .take(page.current_day as usize)
        .map(|value| (*value).min(100))
        .collect();
    daily.resize(page.current_day as usize, 0);
    snapshot.daily = daily;
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyEntry, Habit};

    fn grid_with(habits: &[(u64, &str)], days: u32, done: &[(u64, u32)]) -> CheckboxGrid {
        let habits = habits
            .iter()
            .map(|(id, name)| Habit { id: *id, name: name.to_string() })
            .collect();
        let mut grid = CheckboxGrid::new(habits, days);
        for (habit_id, day) in done {
            grid.set(*habit_id, *day, true);
        }
        grid
    }

    #[test]
    fn percentage_rounds_half_up_and_handles_zero_total() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn percentage_stays_in_range_for_every_split() {
        for total in 0..=60u32 {
            for completed in 0..=total {
                let value = percentage(completed, total);
                assert!(value <= 100);
                if total == 0 {
                    assert_eq!(value, 0);
                } else {
                    let expected = (100.0 * completed as f64 / total as f64).round() as u8;
                    assert_eq!(value, expected, "{completed}/{total}");
                }
            }
        }
    }

    #[test]
    fn per_habit_progress_through_current_day() {
        let grid = grid_with(&[(1, "A"), (2, "B")], 30, &[(1, 1), (1, 2), (2, 2), (2, 5)]);
        let snapshot = build_snapshot(&grid, 2);

        assert_eq!(snapshot.habit_percentages(), vec![100, 50]);
        assert_eq!(snapshot.daily, vec![50, 100]);
        assert_eq!(
            snapshot.today,
            TodayProgress { completed: 2, total: 2, percentage: 100 }
        );
        assert_eq!(snapshot.month_percentage, 75);
    }

    #[test]
    fn no_habits_means_zero_everywhere() {
        let grid = grid_with(&[], 30, &[]);
        let snapshot = build_snapshot(&grid, 4);
        assert_eq!(snapshot.daily, vec![0, 0, 0, 0]);
        assert_eq!(snapshot.today.percentage, 0);
        assert_eq!(snapshot.today.total, 0);
        assert!(snapshot.per_habit.is_empty());
        assert_eq!(snapshot.month_percentage, 0);
    }

    #[test]
    fn day_zero_yields_empty_series() {
        let grid = grid_with(&[(1, "A")], 30, &[(1, 1)]);
        let snapshot = build_snapshot(&grid, 0);
        assert!(snapshot.daily.is_empty());
        assert_eq!(snapshot.habit_percentages(), vec![0]);
    }

    #[test]
    fn initial_snapshot_uses_page_trend() {
        let page = PageContext {
            current_day: 3,
            days_in_period: 30,
            daily_progress: vec![50, 100, 0],
            habits: vec![Habit { id: 1, name: "A".into() }],
            entries: vec![DailyEntry { habit_id: 1, day: 3, completed: true }],
        };
        let grid = CheckboxGrid::from_page(&page);
        let snapshot = initial_snapshot(&page, &grid);
        assert_eq!(snapshot.daily, vec![50, 100, 0]);
        assert_eq!(snapshot.today.percentage, 100);
    }

    #[test]
    fn initial_snapshot_pads_and_truncates_trend() {
        let mut page = PageContext {
            current_day: 4,
            daily_progress: vec![10, 20],
            ..Default::default()
        };
        let grid = CheckboxGrid::from_page(&page);
        assert_eq!(initial_snapshot(&page, &grid).daily, vec![10, 20, 0, 0]);

        page.current_day = 1;
        assert_eq!(initial_snapshot(&page, &grid).daily, vec![10]);
    }
}
