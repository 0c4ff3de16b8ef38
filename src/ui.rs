use crate::dashboard::Dashboard;
use crate::forms::MAX_NAME_LEN;
use serde_json::json;
use std::fmt::Write;

pub fn render_index(dashboard: &Dashboard) -> String {
    let snapshot = dashboard.snapshot();
    let theme = dashboard.theme();
    let bootstrap = json!({
        "currentDay": dashboard.current_day(),
        "theme": theme,
        "charts": dashboard.charts(),
    });

    INDEX_HTML
        .replace("{{THEME}}", theme.as_str())
        .replace("{{THEME_ICON}}", theme.icon())
        .replace("{{COMPLETED_TODAY}}", &snapshot.today.completed.to_string())
        .replace("{{TOTAL_TODAY}}", &snapshot.today.total.to_string())
        .replace("{{TODAY_PROGRESS}}", &snapshot.today.percentage.to_string())
        .replace("{{MONTH_PROGRESS}}", &snapshot.month_percentage.to_string())
        .replace("{{MAX_NAME_LEN}}", &MAX_NAME_LEN.to_string())
        .replace("{{HABIT_TABLE}}", &render_table(dashboard))
        .replace("{{BOOTSTRAP}}", &script_json(&bootstrap.to_string()))
}

fn render_table(dashboard: &Dashboard) -> String {
    let grid = dashboard.grid();
    let current_day = dashboard.current_day();
    let mut html = String::from("<table class=\"habits\"><thead><tr><th>Habit</th>");
    for day in 1..=grid.days_in_period() {
        let class = if day == current_day { " class=\"today\"" } else { "" };
        let _ = write!(html, "<th{class}>{day}</th>");
    }
    html.push_str("<th></th></tr></thead><tbody>");

    if grid.habits().is_empty() {
        let span = grid.days_in_period() + 2;
        let _ = write!(
            html,
            "<tr><td class=\"empty\" colspan=\"{span}\">No habits yet. Add one to start tracking.</td></tr>"
        );
    }

    for habit in grid.habits() {
        let name = escape_html(&habit.name);
        let _ = write!(html, "<tr><th scope=\"row\">{name}</th>");
        for day in 1..=grid.days_in_period() {
            let checked = if grid.is_checked(habit.id, day) { " checked" } else { "" };
            let disabled = if day > current_day { " disabled" } else { "" };
            let _ = write!(
                html,
                "<td><input type=\"checkbox\" class=\"habit-checkbox\" data-habit=\"{}\" data-day=\"{day}\"{checked}{disabled} /></td>",
                habit.id
            );
        }
        let _ = write!(
            html,
            "<td class=\"row-actions\"><button type=\"button\" class=\"edit-btn\" data-habit-id=\"{id}\" data-habit-name=\"{name}\">Edit</button><button type=\"button\" class=\"delete-btn\" data-habit-id=\"{id}\">Delete</button></td></tr>",
            id = habit.id
        );
    }

    html.push_str("</tbody></table>");
    html
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// JSON embedded in a `<script>` block must not close the block early.
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" data-theme="{{THEME}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Dashboard</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.3/font/bootstrap-icons.min.css" />
  <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
  <style>
    :root {
      --bg: #f4f6f9;
      --card: #ffffff;
      --ink: #212529;
      --muted: #6c757d;
      --line: rgba(0, 0, 0, 0.08);
      --accent: #0d6efd;
      --ok: #198754;
      --bad: #dc3545;
    }

    [data-theme="dark"] {
      --bg: #1f2228;
      --card: #2a2e36;
      --ink: #e8eaed;
      --muted: #9aa0a6;
      --line: rgba(255, 255, 255, 0.1);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
      padding: 24px;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      margin-bottom: 20px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    button {
      border: 1px solid var(--line);
      background: var(--card);
      color: var(--ink);
      border-radius: 8px;
      padding: 6px 12px;
      cursor: pointer;
    }

    button:disabled {
      opacity: 0.6;
      cursor: progress;
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
      margin-bottom: 20px;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 16px;
    }

    .card .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    .card .value {
      font-size: 1.8rem;
      font-weight: 600;
    }

    .charts {
      display: grid;
      grid-template-columns: 1fr 2fr 1.5fr;
      gap: 16px;
      margin-bottom: 20px;
    }

    .chart-box {
      position: relative;
      height: 220px;
    }

    .table-wrap {
      overflow-x: auto;
    }

    table.habits {
      border-collapse: collapse;
      font-size: 0.85rem;
      width: 100%;
    }

    table.habits th,
    table.habits td {
      border-bottom: 1px solid var(--line);
      padding: 4px;
      text-align: center;
    }

    table.habits th[scope="row"] {
      text-align: left;
      white-space: nowrap;
    }

    table.habits th.today {
      color: var(--accent);
    }

    .habit-checkbox.loading {
      opacity: 0.4;
    }

    .row-actions {
      white-space: nowrap;
    }

    form.add {
      display: flex;
      gap: 8px;
      margin-top: 16px;
      align-items: flex-start;
    }

    form.add input,
    dialog input {
      padding: 6px 10px;
      border-radius: 8px;
      border: 1px solid var(--line);
      min-width: 240px;
    }

    .is-invalid {
      border-color: var(--bad) !important;
    }

    .field-error {
      color: var(--bad);
      font-size: 0.85rem;
      min-height: 1.2em;
    }

    dialog {
      background: var(--card);
      color: var(--ink);
      border: 1px solid var(--line);
      border-radius: 12px;
    }

    #toast {
      position: fixed;
      right: 24px;
      bottom: 24px;
      padding: 10px 16px;
      border-radius: 8px;
      color: #fff;
      display: none;
    }

    #toast[data-kind="success"] {
      display: block;
      background: var(--ok);
    }

    #toast[data-kind="failure"] {
      display: block;
      background: var(--bad);
    }

    @media (max-width: 900px) {
      .charts {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <header>
    <h1>Habit Dashboard</h1>
    <form method="post" action="/theme/toggle" id="theme-form">
      <button type="submit" id="theme-toggle" aria-label="Toggle theme"><i id="theme-icon" class="{{THEME_ICON}}"></i></button>
    </form>
  </header>

  <section class="stats">
    <div class="card">
      <div class="label">Completed today</div>
      <div class="value"><span id="completed-today">{{COMPLETED_TODAY}}</span> / <span id="total-today">{{TOTAL_TODAY}}</span></div>
    </div>
    <div class="card">
      <div class="label">Today</div>
      <div class="value" id="today-progress">{{TODAY_PROGRESS}}%</div>
    </div>
    <div class="card">
      <div class="label">This month</div>
      <div class="value" id="month-progress">{{MONTH_PROGRESS}}%</div>
    </div>
  </section>

  <section class="charts">
    <div class="card"><div class="chart-box"><canvas id="circleChart"></canvas></div></div>
    <div class="card"><div class="chart-box"><canvas id="areaChart"></canvas></div></div>
    <div class="card"><div class="chart-box"><canvas id="barChart"></canvas></div></div>
  </section>

  <section class="card">
    <div class="table-wrap">{{HABIT_TABLE}}</div>
    <form class="add" id="add-form">
      <div>
        <input id="habit-name" name="name" maxlength="{{MAX_NAME_LEN}}" placeholder="New habit" />
        <div class="field-error" id="add-error"></div>
      </div>
      <button type="submit" id="add-btn">Add Habit</button>
    </form>
  </section>

  <dialog id="edit-dialog">
    <form method="dialog" id="edit-form">
      <input type="hidden" id="edit-id" />
      <input id="edit-name" maxlength="{{MAX_NAME_LEN}}" />
      <div class="field-error" id="edit-error"></div>
      <button type="button" id="edit-cancel">Cancel</button>
      <button type="submit" id="edit-btn">Update Habit</button>
    </form>
  </dialog>

  <div id="toast" role="status"></div>

  <script>
    const BOOTSTRAP = {{BOOTSTRAP}};
    const TOAST_DELAY = 2000;

    const charts = {
      donut: new Chart(document.getElementById('circleChart'), BOOTSTRAP.charts.donut),
      trend: new Chart(document.getElementById('areaChart'), BOOTSTRAP.charts.trend),
      habits: new Chart(document.getElementById('barChart'), BOOTSTRAP.charts.habits)
    };

    const toastEl = document.getElementById('toast');
    let toastTimer = null;

    const showToast = (toast) => {
      if (!toast) {
        return;
      }
      toastEl.textContent = toast.message;
      toastEl.dataset.kind = toast.kind;
      clearTimeout(toastTimer);
      toastTimer = setTimeout(() => { toastEl.dataset.kind = ''; }, TOAST_DELAY);
    };

    const applyChart = (chart, config, withOptions) => {
      chart.data.labels = config.data.labels;
      chart.data.datasets[0].data = config.data.datasets[0].data;
      if (withOptions) {
        chart.data.datasets[0].backgroundColor = config.data.datasets[0].backgroundColor;
        chart.options = config.options;
      }
      chart.update('none');
    };

    const applyCharts = (configs, withOptions) => {
      applyChart(charts.donut, configs.donut, withOptions);
      applyChart(charts.trend, configs.trend, withOptions);
      applyChart(charts.habits, configs.habits, withOptions);
    };

    const applySnapshot = (snapshot) => {
      document.getElementById('completed-today').textContent = snapshot.today.completed;
      document.getElementById('total-today').textContent = snapshot.today.total;
      document.getElementById('today-progress').textContent = snapshot.today.percentage + '%';
      document.getElementById('month-progress').textContent = snapshot.month_percentage + '%';
    };

    const postJson = async (url, method, body) => {
      const res = await fetch(url, {
        method,
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    document.querySelectorAll('.habit-checkbox').forEach((checkbox) => {
      checkbox.addEventListener('change', async () => {
        const checked = checkbox.checked;
        checkbox.disabled = true;
        checkbox.classList.add('loading');
        try {
          const outcome = await postJson('/api/toggle', 'POST', {
            habit_id: Number(checkbox.dataset.habit),
            day: Number(checkbox.dataset.day),
            checked
          });
          checkbox.checked = outcome.checked;
          applySnapshot(outcome.snapshot);
          applyCharts(outcome.charts, false);
          showToast(outcome.toast);
        } catch (err) {
          checkbox.checked = !checked;
          showToast({ message: 'Error', kind: 'failure' });
        } finally {
          checkbox.disabled = false;
          checkbox.classList.remove('loading');
        }
      });
    });

    document.getElementById('theme-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      try {
        const result = await postJson('/api/theme', 'POST');
        document.documentElement.setAttribute('data-theme', result.theme);
        document.getElementById('theme-icon').className = result.icon;
        applyCharts(result.charts, true);
      } catch (err) {
        showToast({ message: err.message, kind: 'failure' });
      }
    });

    const bindNameForm = (form, input, errorEl, button, busyLabel, send) => {
      input.addEventListener('input', () => {
        input.classList.remove('is-invalid');
        errorEl.textContent = '';
      });
      form.addEventListener('submit', async (event) => {
        event.preventDefault();
        const name = input.value.trim();
        if (!name) {
          input.classList.add('is-invalid');
          errorEl.textContent = 'Please enter a habit name';
          return;
        }
        const idleLabel = button.textContent;
        button.disabled = true;
        button.textContent = busyLabel;
        try {
          const outcome = await send(name);
          if (outcome.reload) {
            window.location.reload();
            return;
          }
          input.classList.add('is-invalid');
          errorEl.textContent = outcome.error || 'Request failed';
        } catch (err) {
          input.classList.add('is-invalid');
          errorEl.textContent = err.message || 'Network error';
        } finally {
          button.disabled = false;
          button.textContent = idleLabel;
        }
      });
    };

    bindNameForm(
      document.getElementById('add-form'),
      document.getElementById('habit-name'),
      document.getElementById('add-error'),
      document.getElementById('add-btn'),
      'Adding...',
      (name) => postJson('/api/habits', 'POST', { name })
    );

    const editDialog = document.getElementById('edit-dialog');
    const editId = document.getElementById('edit-id');
    const editName = document.getElementById('edit-name');

    bindNameForm(
      document.getElementById('edit-form'),
      editName,
      document.getElementById('edit-error'),
      document.getElementById('edit-btn'),
      'Updating...',
      (name) => postJson(`/api/habits/${editId.value}`, 'PUT', { name })
    );

    document.getElementById('edit-cancel').addEventListener('click', () => editDialog.close());

    document.querySelectorAll('.edit-btn').forEach((button) => {
      button.addEventListener('click', () => {
        editId.value = button.dataset.habitId;
        editName.value = button.dataset.habitName;
        editName.classList.remove('is-invalid');
        editDialog.showModal();
      });
    });

    document.querySelectorAll('.delete-btn').forEach((button) => {
      button.addEventListener('click', async () => {
        if (!confirm('Are you sure you want to delete this habit? All tracking data will be lost.')) {
          return;
        }
        button.disabled = true;
        try {
          const outcome = await postJson(`/api/habits/${button.dataset.habitId}`, 'DELETE');
          showToast(outcome.toast);
          if (outcome.reload) {
            setTimeout(() => window.location.reload(), 1000);
          }
        } catch (err) {
          showToast({ message: 'Network error', kind: 'failure' });
        } finally {
          button.disabled = false;
        }
      });
    });
  </script>
</body>
</html>
"#;
