use statedash_core::{
    build_chart_series, deaths_in_last_30_days, derive_metrics, StateMetadata, StateSnapshot,
    TimeSeriesPoint,
};

const DAY: i64 = 86_400;
// 2022-01-01 00:00:00 UTC
const BASE_TS: i64 = 1_640_995_200;

fn point(date: i64, cumulative_deaths: u64) -> TimeSeriesPoint {
    TimeSeriesPoint {
        date,
        cumulative_deaths,
    }
}

fn snapshot(
    epi_series: Vec<TimeSeriesPoint>,
    breakthrough_series: Vec<TimeSeriesPoint>,
) -> StateSnapshot {
    StateSnapshot {
        metadata: StateMetadata {
            state_code: "wa".into(),
            state_label: "WA".into(),
            human_label: "Washingtonians".into(),
            epi_series_url: "http://example.com/epi.json".into(),
            breakthrough_series_url: "http://example.com/breakthrough.json".into(),
        },
        epi_series,
        breakthrough_series,
    }
}

#[test]
fn thirty_day_window_takes_earliest_qualifying_point() {
    // t2 - t0 = 29 days, t2 - t1 = 10 days: the scan stops at t0, the
    // earliest point still inside the window, not the one closest to 30
    // days back.
    let series = vec![
        point(BASE_TS, 10),
        point(BASE_TS + 19 * DAY, 40),
        point(BASE_TS + 29 * DAY, 100),
    ];
    assert_eq!(deaths_in_last_30_days(&series), 90);
}

#[test]
fn thirty_day_window_boundaries() {
    // Exactly 30 whole days back still qualifies; 31 does not.
    let at_30 = vec![point(BASE_TS, 50), point(BASE_TS + 30 * DAY, 80)];
    assert_eq!(deaths_in_last_30_days(&at_30), 30);

    let at_31 = vec![
        point(BASE_TS, 50),
        point(BASE_TS + 25 * DAY, 70),
        point(BASE_TS + 31 * DAY, 80),
    ];
    // The 31-day-old point is skipped; the 6-day-old point wins.
    assert_eq!(deaths_in_last_30_days(&at_31), 10);
}

#[test]
fn thirty_day_window_empty_series_is_zero() {
    assert_eq!(deaths_in_last_30_days(&[]), 0);
}

#[test]
fn latest_values_come_from_the_last_point() {
    let mut epi = vec![point(BASE_TS, 100), point(BASE_TS + DAY, 150)];
    let snap = snapshot(epi.clone(), vec![point(BASE_TS, 3)]);
    let metrics = derive_metrics(&snap);
    assert_eq!(metrics.latest_epi_deaths, 150);
    assert_eq!(metrics.epi_as_of_date, "2022-01-02");
    assert_eq!(metrics.latest_breakthrough_deaths, 3);
    assert_eq!(metrics.breakthrough_as_of_date, "2022-01-01");

    // Appending newer data never decreases the latest value.
    epi.push(point(BASE_TS + 2 * DAY, 160));
    let grown = derive_metrics(&snapshot(epi, vec![point(BASE_TS, 3)]));
    assert!(grown.latest_epi_deaths >= metrics.latest_epi_deaths);
}

#[test]
fn percentage_is_formatted_to_two_decimals() {
    let snap = snapshot(vec![point(BASE_TS, 200)], vec![point(BASE_TS, 5)]);
    let metrics = derive_metrics(&snap);
    assert_eq!(metrics.breakthrough_percentage_display(), "2.50%");
}

#[test]
fn percentage_is_guarded_when_epi_count_is_zero() {
    let snap = snapshot(vec![point(BASE_TS, 0)], vec![point(BASE_TS, 5)]);
    let metrics = derive_metrics(&snap);
    assert_eq!(metrics.breakthrough_percentage, None);
    assert_eq!(metrics.breakthrough_percentage_display(), "N/A");
}

#[test]
fn percentage_uses_each_series_own_latest_date() {
    // The two "latest" points fall on different calendar dates; the ratio
    // still uses both as-is.
    let snap = snapshot(
        vec![point(BASE_TS, 100), point(BASE_TS + 40 * DAY, 400)],
        vec![point(BASE_TS, 8)],
    );
    let metrics = derive_metrics(&snap);
    assert_eq!(metrics.breakthrough_percentage_display(), "2.00%");
    assert_ne!(metrics.epi_as_of_date, metrics.breakthrough_as_of_date);
}

#[test]
fn chart_epi_series_is_truncated_to_breakthrough_range() {
    let snap = snapshot(
        vec![
            point(BASE_TS, 10),
            point(BASE_TS + 5 * DAY, 20),
            point(BASE_TS + 10 * DAY, 30),
            point(BASE_TS + 15 * DAY, 40),
        ],
        vec![point(BASE_TS + 2 * DAY, 1), point(BASE_TS + 10 * DAY, 2)],
    );
    let chart = build_chart_series(&snap);

    assert_eq!(chart.breakthrough.points.len(), snap.breakthrough_series.len());
    assert_eq!(chart.epi.points.len(), 3);
    let last_breakthrough_date = snap.breakthrough_series.last().unwrap().iso_date();
    for p in &chart.epi.points {
        assert!(p.x.as_str() <= last_breakthrough_date.as_str());
    }
    assert_eq!(chart.breakthrough.points[0].x, "2022-01-03");
    assert_eq!(chart.breakthrough.points[0].y, 1);
    assert!(chart.epi.label.contains("Washingtonians"));
}
