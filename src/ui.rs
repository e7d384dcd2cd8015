use crate::models::Selection;

/// Stays outside this range are left off the histogram.
const STAY_DOMAIN: (u32, u32) = (2, 15);

pub fn render_index(defaults: &Selection) -> String {
    INDEX_HTML
        .replace("{{YEAR}}", &defaults.year.to_string())
        .replace("{{MONTH}}", &defaults.month.to_string())
        .replace("{{METRIC}}", defaults.metric.label())
        .replace("{{STAY_MIN}}", &STAY_DOMAIN.0.to_string())
        .replace("{{STAY_MAX}}", &STAY_DOMAIN.1.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Super Hotel Management</title>
  <style>
    :root {
      --bg: #f4f6f8;
      --panel: #e9ecef;
      --ink: #212529;
      --average: #537aaa;
      --current: #f9a200;
      --card: white;
      --shadow: 0 10px 30px rgba(33, 37, 41, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Helvetica Neue", Arial, sans-serif;
      padding: 12px 18px 32px;
    }

    h1 {
      background: var(--panel);
      margin: 10px 0;
      padding: 10px;
      font-size: 48px;
      border-radius: 5px;
    }

    .layout {
      display: grid;
      grid-template-columns: 220px 1fr;
      gap: 12px;
    }

    .controls {
      background: var(--panel);
      border-radius: 5px;
      padding: 10px;
      display: grid;
      align-content: start;
      gap: 8px;
    }

    .controls h6 {
      margin: 12px 0 4px;
      font-size: 0.95rem;
    }

    .controls select {
      width: 100%;
      padding: 6px;
      border-radius: 4px;
      border: 1px solid #ced4da;
    }

    .controls label {
      display: block;
      margin: 2px 0;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(380px, 1fr));
      gap: 12px;
    }

    .card {
      background: var(--card);
      border-radius: 8px;
      box-shadow: var(--shadow);
      padding: 16px;
      display: grid;
      gap: 6px;
    }

    .card h2 {
      margin: 0;
      font-size: 1.3rem;
      text-align: center;
    }

    svg {
      width: 100%;
      height: 260px;
      display: block;
    }

    .stat-line {
      margin: 0;
      text-align: center;
      font-weight: bold;
    }

    .stat-line.current {
      color: var(--current);
    }

    .stat-line.all {
      color: var(--average);
    }

    .chart-grid {
      stroke: rgba(33, 37, 41, 0.08);
    }

    .chart-label {
      fill: #6c757d;
      font-size: 11px;
    }

    .line-average {
      fill: none;
      stroke: var(--average);
      stroke-width: 2.5;
    }

    .line-current {
      fill: none;
      stroke: var(--current);
      stroke-width: 2.5;
    }

    .point-average {
      fill: var(--average);
    }

    .point-current {
      fill: var(--current);
    }

    .bar {
      fill: var(--current);
    }

    .legend {
      font-size: 12px;
    }

    .status {
      color: #c63b2b;
      min-height: 1.2em;
    }

    @media (max-width: 800px) {
      .layout {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <h1>Super Hotel Management</h1>
  <div class="layout">
    <aside class="controls">
      <h5>Global controls</h5>
      <h6>Select variable to plot</h6>
      <select id="metric"></select>
      <h6>Select year</h6>
      <select id="year"></select>
      <h6>Select month</h6>
      <select id="month"></select>
      <h6>Select Hotel Type</h6>
      <div id="hotel"></div>
    </aside>

    <main class="grid">
      <section class="card">
        <h2 id="year-title"></h2>
        <svg id="year-chart" viewBox="0 0 600 260" role="img" aria-label="Yearly chart"></svg>
        <p class="stat-line current" id="year-stats-current"></p>
        <p class="stat-line all" id="year-stats-all"></p>
      </section>
      <section class="card">
        <h2 id="month-title"></h2>
        <svg id="month-chart" viewBox="0 0 600 260" role="img" aria-label="Monthly chart"></svg>
        <p class="stat-line current" id="month-stats-current"></p>
        <p class="stat-line all" id="month-stats-all"></p>
      </section>
      <section class="card">
        <h2 id="countries-title"></h2>
        <svg id="countries-chart" viewBox="0 0 600 260" role="img" aria-label="Countries of origin"></svg>
      </section>
      <section class="card">
        <h2 id="stays-title"></h2>
        <svg id="stays-chart" viewBox="0 0 600 260" role="img" aria-label="Lengths of stay"></svg>
      </section>
    </main>
  </div>
  <div class="status" id="status"></div>

  <script>
    const defaults = { metric: '{{METRIC}}', year: {{YEAR}}, month: {{MONTH}}, hotel: 'All' };
    const stayDomain = [{{STAY_MIN}}, {{STAY_MAX}}];

    const metricEl = document.getElementById('metric');
    const yearEl = document.getElementById('year');
    const monthEl = document.getElementById('month');
    const hotelEl = document.getElementById('hotel');
    const statusEl = document.getElementById('status');

    const text = (id, value) => {
      document.getElementById(id).textContent = value;
    };

    const escapeHtml = (value) =>
      String(value).replace(/[&<>"]/g, (c) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' }[c]));

    const formatAxisValue = (value) => {
      const rounded = Math.round(value * 10) / 10;
      return Number.isInteger(rounded) ? rounded.toString() : rounded.toFixed(1);
    };

    const selection = () => {
      const checked = hotelEl.querySelector('input:checked');
      return {
        metric: metricEl.value,
        year: yearEl.value,
        month: monthEl.value,
        hotel: checked ? checked.value : 'All'
      };
    };

    const query = (params) => new URLSearchParams(params).toString();

    const fillSelect = (el, entries, selected) => {
      el.innerHTML = entries
        .map((entry) => {
          const isSelected = String(entry.value) === String(selected) ? ' selected' : '';
          return `<option value="${escapeHtml(entry.value)}"${isSelected}>${escapeHtml(entry.label)}</option>`;
        })
        .join('');
    };

    const renderLineChart = (chartEl, series) => {
      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 24;

      const values = series.flatMap((line) => line.points.map((p) => p.value)).filter((v) => v !== null);
      if (!values.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data</text>';
        return;
      }

      let min = Math.min(0, ...values);
      let max = Math.max(0, ...values);
      if (min === max) {
        max += 1;
      }

      const count = series[0].points.length;
      const range = max - min;
      const xStep = count > 1 ? (width - paddingX * 2) / (count - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
      }

      const lines = series
        .map((line, lineIndex) => {
          const kind = lineIndex === 0 ? 'average' : 'current';
          let path = '';
          let pen = 'M';
          line.points.forEach((point, index) => {
            if (point.value === null) {
              pen = 'M';
              return;
            }
            path += `${pen} ${x(index).toFixed(2)} ${y(point.value).toFixed(2)} `;
            pen = 'L';
          });
          const circles = line.points
            .map((point, index) => {
              if (point.value === null) {
                return '';
              }
              const tip = point.note ? `${point.value.toFixed(2)} (${point.note})` : point.value.toFixed(2);
              return `<circle class="point-${kind}" cx="${x(index)}" cy="${y(point.value)}" r="3"><title>${escapeHtml(tip)}</title></circle>`;
            })
            .join('');
          const legend = `<text class="legend point-${kind}" x="${width - paddingX}" y="${12 + lineIndex * 14}" text-anchor="end">${escapeHtml(line.name)}</text>`;
          return `<path class="line-${kind}" d="${path}" />${circles}${legend}`;
        })
        .join('');

      const labelEvery = count > 12 ? 3 : 1;
      const xLabels = series[0].points
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${escapeHtml(point.label)}</text>`;
        })
        .join('');

      chartEl.innerHTML = `${grid}${lines}${xLabels}`;
    };

    const renderBarChart = (chartEl, bars, horizontal) => {
      const width = 600;
      const height = 260;
      const padding = 44;
      if (!bars.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data</text>';
        return;
      }
      const max = Math.max(...bars.map((bar) => bar.value)) || 1;
      let body = '';
      if (horizontal) {
        const step = (height - padding) / bars.length;
        bars.forEach((bar, index) => {
          const barWidth = ((width - padding * 2) * bar.value) / max;
          const yPos = 10 + index * step;
          body += `<text class="chart-label" x="${padding - 6}" y="${yPos + step / 2 + 4}" text-anchor="end">${escapeHtml(bar.label)}</text>`;
          body += `<rect class="bar" x="${padding}" y="${yPos + 2}" width="${barWidth}" height="${Math.max(step - 4, 2)}"><title>${escapeHtml(bar.label)}: ${bar.value}</title></rect>`;
        });
      } else {
        const step = (width - padding * 2) / bars.length;
        bars.forEach((bar, index) => {
          const barHeight = ((height - padding * 2) * bar.value) / max;
          const xPos = padding + index * step;
          body += `<rect class="bar" x="${xPos + 2}" y="${height - padding - barHeight}" width="${Math.max(step - 4, 2)}" height="${barHeight}"><title>${bar.value.toFixed(1)}%</title></rect>`;
          body += `<text class="chart-label" x="${xPos + step / 2}" y="${height - padding + 16}" text-anchor="middle">${escapeHtml(bar.label)}</text>`;
        });
      }
      chartEl.innerHTML = body;
    };

    const fetchJson = async (path) => {
      const res = await fetch(path);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || `Request to ${path} failed`);
      }
      return res.json();
    };

    const refreshYear = async () => {
      const { metric, year, hotel } = selection();
      const data = await fetchJson(`/api/year?${query({ metric, year, hotel })}`);
      text('year-title', data.title);
      text('year-stats-current', data.stats_current);
      text('year-stats-all', data.stats_all);
      renderLineChart(document.getElementById('year-chart'), [data.table.average, data.table.current]);
    };

    const refreshMonth = async () => {
      const data = await fetchJson(`/api/month?${query(selection())}`);
      text('month-title', data.title);
      text('month-stats-current', data.stats_current);
      text('month-stats-all', data.stats_all);
      renderLineChart(document.getElementById('month-chart'), [data.table.average, data.table.current]);
    };

    const refreshHistograms = async () => {
      const { year, month, hotel } = selection();
      const params = query({ year, month, hotel });
      const [countries, stays] = await Promise.all([
        fetchJson(`/api/countries?${params}`),
        fetchJson(`/api/stays?${params}`)
      ]);
      text('countries-title', countries.title);
      renderBarChart(
        document.getElementById('countries-chart'),
        countries.countries.map((c) => ({ label: c.country, value: c.count })),
        true
      );
      text('stays-title', stays.title);
      renderBarChart(
        document.getElementById('stays-chart'),
        stays.stays
          .filter((s) => s.nights >= stayDomain[0] && s.nights <= stayDomain[1])
          .map((s) => ({ label: String(s.nights), value: s.percent })),
        false
      );
    };

    const refresh = () => {
      statusEl.textContent = '';
      Promise.all([refreshYear(), refreshMonth(), refreshHistograms()]).catch((err) => {
        statusEl.textContent = err.message;
      });
    };

    const loadOptions = async () => {
      const options = await fetchJson('/api/options');
      fillSelect(metricEl, options.metrics, defaults.metric);
      fillSelect(yearEl, options.years.map((y) => ({ label: y, value: y })), options.default_year);
      fillSelect(monthEl, options.months, options.default_month);
      hotelEl.innerHTML = options.hotels
        .map((hotel) => {
          const checked = hotel.value === defaults.hotel ? ' checked' : '';
          return `<label><input type="radio" name="hotel" value="${escapeHtml(hotel.value)}"${checked} /> ${escapeHtml(hotel.label)}</label>`;
        })
        .join('');
    };

    [metricEl, yearEl, monthEl].forEach((el) => el.addEventListener('change', refresh));
    hotelEl.addEventListener('change', refresh);

    loadOptions()
      .then(refresh)
      .catch((err) => {
        statusEl.textContent = err.message;
      });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_embeds_default_selection() {
        let html = render_index(&Selection::default());
        assert!(html.contains("metric: 'Reservations', year: 2016, month: 1"));
        assert!(html.contains("const stayDomain = [2, 15];"));
        assert!(!html.contains("{{"));
    }
}
