use crate::models::{
    ChartData, ChartPoint, ChartSeries, DerivedMetrics, StateSnapshot, TimeSeriesPoint,
};

const SECONDS_PER_DAY: i64 = 86_400;

/// Compute the display statistics for a populated snapshot. Pure; the
/// pipeline guarantees both series are non-empty before this is called, but
/// an empty series still degrades to zeroed fields rather than panicking.
pub fn derive_metrics(snapshot: &StateSnapshot) -> DerivedMetrics {
    let (latest_epi_deaths, epi_as_of_date) = latest(&snapshot.epi_series);
    let (latest_breakthrough_deaths, breakthrough_as_of_date) =
        latest(&snapshot.breakthrough_series);

    let breakthrough_percentage = if latest_epi_deaths == 0 {
        None
    } else {
        Some(latest_breakthrough_deaths as f64 / latest_epi_deaths as f64 * 100.0)
    };

    DerivedMetrics {
        latest_epi_deaths,
        epi_as_of_date,
        epi_deaths_last_30_days: deaths_in_last_30_days(&snapshot.epi_series),
        latest_breakthrough_deaths,
        breakthrough_as_of_date,
        breakthrough_deaths_last_30_days: deaths_in_last_30_days(&snapshot.breakthrough_series),
        breakthrough_percentage,
    }
}

fn latest(series: &[TimeSeriesPoint]) -> (u64, String) {
    match series.last() {
        Some(point) => (point.cumulative_deaths, point.iso_date()),
        None => (0, String::new()),
    }
}

/// Delta between the latest cumulative count and the count at the earliest
/// point still within 30 whole days of the latest point. The scan runs
/// oldest-first and stops at the first qualifying point; 0 when none
/// qualifies.
pub fn deaths_in_last_30_days(series: &[TimeSeriesPoint]) -> u64 {
    let Some(last) = series.last() else {
        return 0;
    };
    for point in series {
        if (last.date - point.date) / SECONDS_PER_DAY <= 30 {
            return last.cumulative_deaths.saturating_sub(point.cumulative_deaths);
        }
    }
    0
}

/// Build the two plot series. The breakthrough series maps 1:1; the epi
/// series drops every point newer than the last breakthrough point so the
/// two lines cover overlapping date ranges.
pub fn build_chart_series(snapshot: &StateSnapshot) -> ChartData {
    let last_breakthrough_ts = snapshot
        .breakthrough_series
        .last()
        .map(|point| point.date)
        .unwrap_or(0);

    let breakthrough_points = snapshot
        .breakthrough_series
        .iter()
        .map(chart_point)
        .collect();
    let epi_points = snapshot
        .epi_series
        .iter()
        .filter(|point| point.date <= last_breakthrough_ts)
        .map(|point| chart_point(point))
        .collect();

    let human = &snapshot.metadata.human_label;
    ChartData {
        epi: ChartSeries {
            label: format!("{human} who have died from covid, cumulative"),
            points: epi_points,
        },
        breakthrough: ChartSeries {
            label: format!("{human} who have died from breakthrough infections, cumulative"),
            points: breakthrough_points,
        },
    }
}

fn chart_point(point: &TimeSeriesPoint) -> ChartPoint {
    ChartPoint {
        x: point.iso_date(),
        y: point.cumulative_deaths,
    }
}
