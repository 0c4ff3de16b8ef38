//! Chart.js configurations for the three dashboard charts.
//!
//! The configurations are built once per load and then patched in place:
//! progress changes only touch `data`, theme changes only touch colors.

use crate::models::{Habit, ProgressSnapshot};
use crate::theme::Theme;
use serde::Serialize;
use serde_json::{Value, json};

const COMPLETED_COLOR: &str = "#198754";
const PRIMARY_COLOR: &str = "#0d6efd";
const LABEL_LIMIT: usize = 12;

#[derive(Debug, Clone, Serialize)]
pub struct ChartSet {
    pub donut: Value,
    pub trend: Value,
    pub habits: Value,
}

impl ChartSet {
    pub fn new(snapshot: &ProgressSnapshot, habits: &[Habit], theme: Theme) -> Self {
        let palette = theme.palette();
        let today = snapshot.today.percentage;

        let donut = json!({
            "type": "doughnut",
            "data": {
                "labels": ["Completed", "Remaining"],
                "datasets": [{
                    "data": [today, 100 - today],
                    "backgroundColor": [COMPLETED_COLOR, palette.donut_remaining],
                    "borderWidth": 0
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": true,
                "plugins": {
                    "legend": {
                        "position": "bottom",
                        "labels": { "padding": 10, "font": { "size": 10 }, "color": palette.text }
                    }
                },
                "cutout": "65%",
                "animation": { "duration": 0 }
            }
        });

        let trend = json!({
            "type": "line",
            "data": {
                "labels": day_labels(snapshot.daily.len()),
                "datasets": [{
                    "label": "Daily %",
                    "data": snapshot.daily,
                    "fill": true,
                    "tension": 0.4,
                    "backgroundColor": "rgba(13, 110, 253, 0.15)",
                    "borderColor": PRIMARY_COLOR,
                    "pointBackgroundColor": PRIMARY_COLOR,
                    "pointBorderColor": "#fff",
                    "pointBorderWidth": 1,
                    "pointRadius": 2,
                    "pointHoverRadius": 4,
                    "borderWidth": 2
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": { "display": false } },
                "scales": {
                    "x": {
                        "grid": { "display": false },
                        "ticks": {
                            "font": { "size": 9 },
                            "maxRotation": 0,
                            "autoSkip": true,
                            "maxTicksLimit": 10,
                            "color": palette.text
                        }
                    },
                    "y": {
                        "min": 0,
                        "max": 100,
                        "grid": { "color": palette.grid },
                        "ticks": { "stepSize": 25, "font": { "size": 9 }, "color": palette.text }
                    }
                },
                "animation": { "duration": 0 }
            }
        });

        let labels: Vec<String> = habits.iter().map(|habit| short_label(&habit.name)).collect();
        let habits = json!({
            "type": "bar",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": "%",
                    "data": snapshot.habit_percentages(),
                    "backgroundColor": PRIMARY_COLOR,
                    "borderRadius": 3,
                    "barThickness": 15
                }]
            },
            "options": {
                "indexAxis": "y",
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": { "display": false } },
                "scales": {
                    "x": {
                        "min": 0,
                        "max": 100,
                        "grid": { "color": palette.grid },
                        "ticks": { "stepSize": 50, "font": { "size": 9 }, "color": palette.text }
                    },
                    "y": {
                        "grid": { "display": false },
                        "ticks": { "font": { "size": 8 }, "color": palette.text }
                    }
                },
                "animation": { "duration": 0 }
            }
        });

        Self { donut, trend, habits }
    }

    /// Replace the datasets with a fresh snapshot, leaving options alone.
    pub fn update(&mut self, snapshot: &ProgressSnapshot) {
        let today = snapshot.today.percentage;
        set(&mut self.donut, "/data/datasets/0/data", json!([today, 100 - today]));
        set(&mut self.trend, "/data/labels", json!(day_labels(snapshot.daily.len())));
        set(&mut self.trend, "/data/datasets/0/data", json!(snapshot.daily));
        set(
            &mut self.habits,
            "/data/datasets/0/data",
            json!(snapshot.habit_percentages()),
        );
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        let palette = theme.palette();
        set(&mut self.trend, "/options/scales/x/ticks/color", json!(palette.text));
        set(&mut self.trend, "/options/scales/y/ticks/color", json!(palette.text));
        set(&mut self.trend, "/options/scales/y/grid/color", json!(palette.grid));
        set(&mut self.habits, "/options/scales/x/ticks/color", json!(palette.text));
        set(&mut self.habits, "/options/scales/y/ticks/color", json!(palette.text));
        set(&mut self.habits, "/options/scales/x/grid/color", json!(palette.grid));
        set(
            &mut self.donut,
            "/options/plugins/legend/labels/color",
            json!(palette.text),
        );
        set(
            &mut self.donut,
            "/data/datasets/0/backgroundColor/1",
            json!(palette.donut_remaining),
        );
    }

    pub fn donut_data(&self) -> Vec<u8> {
        numbers(&self.donut, "/data/datasets/0/data")
    }

    pub fn trend_data(&self) -> Vec<u8> {
        numbers(&self.trend, "/data/datasets/0/data")
    }

    pub fn habit_data(&self) -> Vec<u8> {
        numbers(&self.habits, "/data/datasets/0/data")
    }
}

/// Bar labels are cut to keep the axis readable.
pub fn short_label(name: &str) -> String {
    if name.chars().count() > LABEL_LIMIT {
        let head: String = name.chars().take(LABEL_LIMIT).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

fn day_labels(days: usize) -> Vec<usize> {
    (1..=days).collect()
}

fn set(config: &mut Value, pointer: &str, value: Value) {
    if let Some(slot) = config.pointer_mut(pointer) {
        *slot = value;
    }
}

fn numbers(config: &Value, pointer: &str) -> Vec<u8> {
    config
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_u64)
                .map(|value| value.min(100) as u8)
                .collect()
        })
        .unwrap_or_default()
}
