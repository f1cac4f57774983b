#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use semesterplan::{Cell, Class, Extractor, Plan, PlanStore, ScheduleEvent, SqlitePlanStore, Table};
use tempfile::NamedTempFile;

fn row(texts: &[&str]) -> Vec<Cell> {
    texts.iter().map(|text| Cell::new(*text)).collect()
}

#[test]
fn sqlite_store_round_trip_plan() {
    let file = NamedTempFile::new().unwrap();
    let store = SqlitePlanStore::new(file.path()).unwrap();

    let table: Table = vec![
        row(&["", "2016/KW 9"]),
        row(&["Gruppe", "29.02-05.03"]),
        vec![
            Cell::new("FS151+BSc (FST) d").with_color("#FFCC00"),
            Cell::new("Mo/Mi 08:00/10:15 [A101] Mathematik"),
        ],
    ]
    .into_iter()
    .collect();
    let plan = Extractor::default().extract_collecting(&table).unwrap().plan;
    assert_eq!(plan.len(), 2);

    store.save_plan(&plan).unwrap();
    let loaded = store.load_plan().unwrap().expect("plan stored");

    assert_eq!(loaded, plan);
    assert_eq!(
        loaded.events()[1].start,
        NaiveDate::from_ymd_opt(2016, 3, 2).unwrap().and_hms_opt(10, 15, 0).unwrap()
    );
}

#[test]
fn empty_store_has_no_plan() {
    let file = NamedTempFile::new().unwrap();
    let store = SqlitePlanStore::new(file.path()).unwrap();

    assert!(store.load_plan().unwrap().is_none());
}

#[test]
fn saving_replaces_previous_plan() {
    let file = NamedTempFile::new().unwrap();
    let store = SqlitePlanStore::new(file.path()).unwrap();
    let start = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();

    let mut first = Plan::new("Entwurf");
    first.push_event(ScheduleEvent::new("BWL", start, Class::with_year(2015)));
    first.push_event(ScheduleEvent::new("Recht", start, Class::with_year(2015)));
    store.save_plan(&first).unwrap();

    let mut second = Plan::new("Final");
    second.add_class(Class::with_year(2016));
    second.push_event(ScheduleEvent::new("Statistik", start, Class::with_year(2016)));
    store.save_plan(&second).unwrap();

    let reopened = SqlitePlanStore::new(file.path()).unwrap();
    let loaded = reopened.load_plan().unwrap().unwrap();
    assert_eq!(loaded.name(), "Final");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded, second);
}
