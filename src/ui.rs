use crate::models::{CheckIn, CheckInStatus, SavingsResponse, Stats, UserProfile, MOOD_EMOJIS};
use chrono::NaiveDate;

pub struct DashboardView<'a> {
    pub user_id: &'a str,
    pub today: NaiveDate,
    pub profile: &'a UserProfile,
    pub stats: &'a Stats,
    pub savings: &'a SavingsResponse,
    pub today_check_in: Option<&'a CheckIn>,
}

pub fn render_index(view: &DashboardView<'_>) -> String {
    let stats = view.stats;
    let today_status = match view.today_check_in {
        Some(check_in) if check_in.status == CheckInStatus::Success => {
            format!("Checked in today {}", check_in.mood_emoji())
        }
        Some(check_in) => format!("Slip logged today {}", check_in.mood_emoji()),
        None if stats.current_streak > 0 => "Not checked in yet, keep the streak going".to_string(),
        None => "Not checked in yet".to_string(),
    };
    let mood_options: String = MOOD_EMOJIS
        .iter()
        .enumerate()
        .map(|(index, emoji)| {
            let selected = if index == 2 { " selected" } else { "" };
            format!(r#"<option value="{index}"{selected}>{emoji}</option>"#)
        })
        .collect();
    let comparisons: String = view
        .savings
        .comparisons
        .iter()
        .map(|c| format!("<li><span>{}</span><strong>{}</strong></li>", c.item, c.amount))
        .collect();
    let projection = view
        .savings
        .projection_31_days
        .map(|amount| format!("Keep going for 31 days and you could save ${amount:.2}."))
        .unwrap_or_default();

    INDEX_HTML
        .replace("{{USER_ID}}", &escape_html(view.user_id))
        .replace("{{NAME}}", &escape_html(&view.profile.display_name))
        .replace("{{TODAY}}", &view.today.to_string())
        .replace("{{TODAY_STATUS}}", &today_status)
        .replace("{{DISABLED}}", if view.today_check_in.is_some() { "disabled" } else { "" })
        .replace("{{CURRENT}}", &stats.current_streak.to_string())
        .replace("{{LONGEST}}", &stats.longest_streak.to_string())
        .replace("{{DAYS}}", &stats.total_days_completed.to_string())
        .replace("{{UNITS}}", &format!("{}", stats.total_units_avoided))
        .replace("{{SAVED}}", &format!("{:.2}", stats.total_money_saved))
        .replace("{{PRICE}}", &format!("{:.2}", view.profile.price_per_unit))
        .replace("{{PROGRESS}}", &format!("{:.0}", view.savings.progress_percent))
        .replace("{{GOAL}}", &format!("{:.0}", view.savings.goal))
        .replace("{{COMPARISONS}}", &comparisons)
        .replace("{{PROJECTION}}", &projection)
        .replace("{{MOOD_OPTIONS}}", &mood_options)
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker</title>
  <style>
    :root {
      --bg: #eef4f1;
      --ink: #1f2a2e;
      --success: #2d7a4b;
      --slip: #c63b2b;
      --accent: #2f4858;
      --muted: #6b645d;
      --card: #ffffff;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #f8fbf9 70%);
      color: var(--ink);
      font-family: "Inter", "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 16px 48px;
    }

    .app { width: min(920px, 100%); display: grid; gap: 24px; }
    h1 { margin: 0; font-size: clamp(1.8rem, 4vw, 2.4rem); }
    h2 { margin: 0 0 12px; font-size: 1.2rem; }
    .subtitle { margin: 4px 0 0; color: var(--muted); }

    .card {
      background: var(--card);
      border-radius: 18px;
      padding: 20px;
      box-shadow: 0 12px 32px rgba(47, 72, 88, 0.1);
    }

    .hero {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
    }

    .hero .label {
      display: block;
      font-size: 0.8rem;
      letter-spacing: 0.1em;
      text-transform: uppercase;
      color: var(--muted);
    }

    .hero .value { display: block; font-size: 1.8rem; font-weight: 700; color: var(--accent); }
    .hero .value.money { color: var(--success); }

    form.checkin { display: grid; gap: 12px; }
    form.checkin .row { display: flex; flex-wrap: wrap; gap: 12px; align-items: center; }
    textarea { width: 100%; min-height: 70px; border-radius: 10px; padding: 8px; }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    button:disabled { opacity: 0.5; cursor: default; }

    .calendar { display: grid; grid-template-columns: repeat(7, 1fr); gap: 6px; }
    .calendar div { border-radius: 8px; padding: 6px; min-height: 44px; font-size: 0.85rem; background: #f3f5f4; }
    .calendar .success { background: #d9f0e1; }
    .calendar .slip { background: #f7dcd8; }

    .progress { height: 12px; border-radius: 999px; background: #e3e8e6; overflow: hidden; }
    .progress span { display: block; height: 100%; background: var(--success); }
    ul.comparisons { list-style: none; padding: 0; margin: 12px 0 0; display: grid; gap: 6px; }
    ul.comparisons li { display: flex; justify-content: space-between; }

    #mood-chart { width: 100%; height: 200px; display: block; }
    #mood-chart path { fill: none; stroke: var(--accent); stroke-width: 3; }
    #mood-chart text { font-size: 11px; fill: var(--muted); }

    .status { min-height: 1.2em; color: var(--muted); }
    .status[data-type="error"] { color: var(--slip); }
    .status[data-type="ok"] { color: var(--success); }
  </style>
</head>
<body>
  <main class="app" data-user="{{USER_ID}}">
    <header>
      <h1>Hi, {{NAME}}</h1>
      <p class="subtitle">{{TODAY}} &middot; {{TODAY_STATUS}}</p>
    </header>

    <section class="hero">
      <div class="card"><span class="label">Current streak</span><span class="value">{{CURRENT}}</span></div>
      <div class="card"><span class="label">Longest streak</span><span class="value">{{LONGEST}}</span></div>
      <div class="card"><span class="label">Days completed</span><span class="value">{{DAYS}}</span></div>
      <div class="card"><span class="label">Money saved</span><span class="value money">${{SAVED}}</span></div>
    </section>

    <section class="card">
      <h2>Daily check-in</h2>
      <form class="checkin" id="checkin-form">
        <div class="row">
          <label><input type="radio" name="status" value="success" checked /> Success</label>
          <label><input type="radio" name="status" value="slip" /> Slip</label>
          <label>Mood <select name="mood_index">{{MOOD_OPTIONS}}</select></label>
          <label>Units avoided <input type="number" name="units_avoided" min="0" max="100" value="2" /></label>
        </div>
        <textarea name="notes" maxlength="500" placeholder="Notes (optional)"></textarea>
        <button type="submit" {{DISABLED}}>Check in</button>
      </form>
      <div class="status" id="status"></div>
    </section>

    <section class="card">
      <h2 id="calendar-title">Calendar</h2>
      <div class="calendar" id="calendar"></div>
    </section>

    <section class="card">
      <h2>Mood, last 14 check-ins</h2>
      <svg id="mood-chart" viewBox="0 0 600 200" role="img" aria-label="Mood chart"></svg>
    </section>

    <section class="card">
      <h2>Money saved</h2>
      <p>{{UNITS}} units avoided at ${{PRICE}} each.</p>
      <p>Progress to ${{GOAL}}: {{PROGRESS}}%</p>
      <div class="progress"><span style="width: {{PROGRESS}}%"></span></div>
      <ul class="comparisons">{{COMPARISONS}}</ul>
      <p>{{PROJECTION}}</p>
    </section>
  </main>

  <script>
    const user = encodeURIComponent(document.querySelector('.app').dataset.user);
    const base = `/api/users/${user}`;
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const loadCalendar = async () => {
      const now = new Date();
      const year = now.getFullYear();
      const month = now.getMonth() + 1;
      const res = await fetch(`${base}/check-ins/month?year=${year}&month=${month}`);
      if (!res.ok) {
        throw new Error('Unable to load calendar');
      }
      const checkIns = await res.json();
      const byDate = new Map(checkIns.map((c) => [c.date, c]));
      const days = new Date(year, month, 0).getDate();
      const calendar = document.getElementById('calendar');
      calendar.replaceChildren();
      for (let day = 1; day <= days; day += 1) {
        const key = `${year}-${String(month).padStart(2, '0')}-${String(day).padStart(2, '0')}`;
        const entry = byDate.get(key);
        const cell = document.createElement('div');
        cell.textContent = String(day);
        if (entry) {
          // notes are free text, never markup
          cell.className = entry.status;
          cell.title = entry.notes;
        }
        calendar.appendChild(cell);
      }
      document.getElementById('calendar-title').textContent = `Calendar ${year}-${String(month).padStart(2, '0')}`;
    };

    const loadMood = async () => {
      const res = await fetch(`${base}/mood`);
      if (!res.ok) {
        throw new Error('Unable to load mood');
      }
      const points = await res.json();
      const chart = document.getElementById('mood-chart');
      if (!points.length) {
        chart.innerHTML = '<text x="50%" y="50%" text-anchor="middle">No check-ins yet</text>';
        return;
      }
      const step = points.length > 1 ? 520 / (points.length - 1) : 0;
      const x = (i) => 40 + i * step;
      const y = (mood) => 170 - (mood - 1) * 35;
      const path = points.map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i)} ${y(p.mood)}`).join(' ');
      const labels = points
        .map((p, i) => `<text x="${x(i)}" y="${y(p.mood) - 8}" text-anchor="middle">${p.emoji}</text>`)
        .join('');
      chart.innerHTML = `<path d="${path}" />${labels}`;
    };

    document.getElementById('checkin-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      setStatus('Saving...', 'info');
      const res = await fetch(`${base}/check-ins`, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          status: form.get('status'),
          mood_index: Number(form.get('mood_index')),
          units_avoided: Number(form.get('units_avoided')),
          notes: form.get('notes')
        })
      });
      if (!res.ok) {
        setStatus((await res.text()) || 'Request failed', 'error');
        return;
      }
      setStatus('Saved', 'ok');
      window.location.reload();
    });

    Promise.all([loadCalendar(), loadMood()]).catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
