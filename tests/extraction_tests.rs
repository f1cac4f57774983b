use chrono::{NaiveDate, NaiveDateTime};
use semesterplan::{
    AnchorPolicy, Cell, Class, DiagnosticKind, EventMarker, ExtractError, Extractor,
    ExtractorConfig, ParsedCell, Table,
};

const COHORT: &str = "#FFCC00";
const PRAXIS: &str = "#00FF00";

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn row(texts: &[&str]) -> Vec<Cell> {
    texts.iter().map(|text| Cell::new(*text)).collect()
}

fn legend_rows() -> Vec<Vec<Cell>> {
    let mut rows: Vec<Vec<Cell>> = (0..15).map(|_| vec![Cell::default(); 9]).collect();
    rows[0][1] = Cell::new("Abkürzung");
    rows[0][4] = Cell::new("Dozentenkürzel");
    rows[0][5] = Cell::new("Name");
    rows[1][4] = Cell::new("XY");
    rows[1][5] = Cell::new("Xaver Yilmaz");
    rows[2][4] = Cell::new("ZZ");
    rows[2][5] = Cell::new("Zora Zimmermann");
    rows[12][7] = Cell::default().with_color(PRAXIS);
    rows[12][8] = Cell::new("Praxisphase");
    rows[13][7] = Cell::default().with_color("#FF0000");
    rows[13][8] = Cell::new("Prüfungswoche");
    rows
}

fn plan_rows() -> Vec<Vec<Cell>> {
    vec![
        row(&["", "2016/KW 9", "2016/KW 10"]),
        row(&["Gruppe", "29.02-05.03", "07.03-12.03"]),
        vec![
            Cell::new("FS151+BSc (FST) d").with_color(COHORT),
            Cell::new("Mi 10:15 [A101] Mathematik - XY"),
            Cell::new("Praxis").with_color(PRAXIS),
        ],
        vec![
            Cell::new("FS152+BA (FSK) e").with_color(COHORT),
            Cell::new("Di 08:00 BWL (d/x)"),
            Cell::new("Do 2h Seminar (alle)"),
        ],
        vec![
            Cell::default().with_color(COHORT),
            Cell::new("Fr Recht").with_comment("B.Sc. Prüfung"),
        ],
        row(&["", "2016/KW 11", "2016/KW 12"]),
        row(&["Gruppe", "14.03-19.03", "21.03-26.03"]),
        vec![
            Cell::new("FS161+BSc (FST) a").with_color(COHORT),
            Cell::new("Mo 08:00-09:30 Statistik - QQ"),
            Cell::default(),
        ],
    ]
}

fn sample_table() -> Table {
    plan_rows().into_iter().chain(legend_rows()).collect()
}

fn class(name: &str) -> Class {
    Class::from_full_name(name).unwrap()
}

#[test]
fn extracts_events_in_traversal_order() {
    let extraction = Extractor::default()
        .extract_collecting(&sample_table())
        .unwrap();
    let events = extraction.plan.events();

    let titles: Vec<String> = events.iter().map(|event| event.display_title()).collect();
    assert_eq!(
        titles,
        vec![
            "Mathematik",
            "Praxisphase",
            "Praxis",
            "Statistik",
            "BWL",
            "Seminar (alle)",
            "Recht",
            "Recht",
        ]
    );

    let math = &events[0];
    assert_eq!(math.start, dt(2016, 3, 2, 10, 15));
    assert_eq!(math.room.as_deref(), Some("A101"));
    assert_eq!(math.lecturer, "Xaver Yilmaz");
    assert_eq!(math.class, class("FS151+BSc (FST) d"));
    assert_eq!(math.duration_hours, 3.25);
    assert_eq!(math.marker, None);
}

#[test]
fn second_wrap_uses_its_own_anchors_and_cohort() {
    let plan = Extractor::default().extract_collecting(&sample_table()).unwrap().plan;
    let statistik = &plan.events()[3];

    assert_eq!(statistik.start, dt(2016, 3, 14, 8, 0));
    assert_eq!(statistik.duration_hours, 1.5);
    assert_eq!(statistik.class, class("FS161+BSc (FST) a"));
    // Unknown abbreviations are kept as written.
    assert_eq!(statistik.lecturer, "QQ");
}

#[test]
fn categorical_color_adds_full_week_event() {
    let plan = Extractor::default().extract_collecting(&sample_table()).unwrap().plan;

    let praxisphase = &plan.events()[1];
    assert_eq!(praxisphase.title, "Praxisphase");
    assert!(praxisphase.is_full_week());
    assert_eq!(praxisphase.room, None);
    assert_eq!(praxisphase.start, dt(2016, 3, 7, 0, 0));
    assert_eq!(praxisphase.class, class("FS151+BSc (FST) d"));

    // The cell text still yields its own event.
    let praxis = &plan.events()[2];
    assert_eq!(praxis.title, "Praxis");
    assert_eq!(praxis.marker, Some(EventMarker::FullWeek));
}

#[test]
fn entry_without_days_is_single_monday_full_week_event() {
    let plan = Extractor::default().extract_collecting(&sample_table()).unwrap().plan;
    let praxis: Vec<_> = plan.events().iter().filter(|e| e.title == "Praxis").collect();

    assert_eq!(praxis.len(), 1);
    assert_eq!(praxis[0].start, dt(2016, 3, 7, 0, 0));
    assert!(praxis[0].is_full_week());
}

#[test]
fn group_tokens_expand_to_registered_classes() {
    let extraction = Extractor::default()
        .extract_collecting(&sample_table())
        .unwrap();
    let bwl: Vec<_> = extraction
        .plan
        .events()
        .iter()
        .filter(|event| event.title == "BWL")
        .collect();

    assert_eq!(bwl.len(), 1);
    assert_eq!(bwl[0].class, class("FS151+BSc (FST) d"));
    assert_eq!(bwl[0].start, dt(2016, 3, 1, 8, 0));
}

#[test]
fn unregistered_group_is_diagnosed_without_events() {
    let extraction = Extractor::default()
        .extract_collecting(&sample_table())
        .unwrap();

    assert_eq!(extraction.diagnostics.len(), 1);
    let diagnostic = &extraction.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::UnresolvedGroup);
    assert_eq!(diagnostic.token, "x");
    assert_eq!((diagnostic.row, diagnostic.wrap, diagnostic.column), (3, 0, 1));
}

#[test]
fn group_registered_further_down_is_not_known_yet() {
    let mut rows = plan_rows();
    rows[2][1] = Cell::new("Mo 08:00 Chemie (e)");
    let table: Table = rows.into_iter().chain(legend_rows()).collect();

    let extraction = Extractor::default().extract_collecting(&table).unwrap();

    assert!(extraction.plan.events().iter().all(|event| event.title != "Chemie"));
    assert!(extraction
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnresolvedGroup && d.token == "e" && d.row == 2));
}

#[test]
fn literal_group_text_becomes_note_on_cohort() {
    let plan = Extractor::default().extract_collecting(&sample_table()).unwrap().plan;
    let seminar = &plan.events()[5];

    assert_eq!(seminar.title, "Seminar");
    assert_eq!(seminar.note.as_deref(), Some("alle"));
    assert_eq!(seminar.class, Class::with_year(2015));
    assert_eq!(seminar.duration_hours, 2.0);
    assert_eq!(seminar.start, dt(2016, 3, 10, 0, 0));
}

#[test]
fn bachelor_comment_adds_degree_event() {
    let plan = Extractor::default().extract_collecting(&sample_table()).unwrap().plan;
    let recht: Vec<_> = plan.events().iter().filter(|e| e.title == "Recht").collect();

    assert_eq!(recht.len(), 2);
    assert_eq!(recht[0].class, Class::with_year(2015));
    assert_eq!(recht[1].class, Class::with_year(2015).with_course("BSc"));
    assert_eq!(recht[0].start, dt(2016, 3, 4, 0, 0));
    assert_eq!(recht[0].start, recht[1].start);
}

#[test]
fn classes_are_collected_once() {
    let plan = Extractor::default().extract_collecting(&sample_table()).unwrap().plan;
    let names: Vec<String> = plan.classes().iter().map(|c| c.to_string()).collect();

    assert_eq!(
        names,
        vec!["2015-FS151-BSc-FST-d", "2015-FS152-BA-FSK-e", "2016-FS161-BSc-FST-a"]
    );
    assert_eq!(plan.events_for(&class("FS151+BSc (FST) d")).count(), 4);
}

#[test]
fn extraction_is_deterministic() {
    let extractor = Extractor::default();
    let first = extractor.extract_collecting(&sample_table()).unwrap();
    let second = extractor.extract_collecting(&sample_table()).unwrap();

    assert_eq!(first.plan, second.plan);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn rows_with_unknown_cohort_color_are_skipped() {
    let mut rows = plan_rows();
    rows[4][0] = Cell::default().with_color("#123456");
    let table: Table = rows.into_iter().chain(legend_rows()).collect();

    let plan = Extractor::default().extract_collecting(&table).unwrap().plan;
    assert!(plan.events().iter().all(|event| event.title != "Recht"));
}

#[test]
fn configured_duration_replaces_default() {
    let config = ExtractorConfig {
        default_duration_hours: 1.5,
        ..ExtractorConfig::default()
    };
    let plan = Extractor::new(config).extract_collecting(&sample_table()).unwrap().plan;

    assert_eq!(plan.events()[0].duration_hours, 1.5);
    // Stated durations win.
    assert_eq!(plan.events()[5].duration_hours, 2.0);
}

fn table_with_broken_range() -> Table {
    let mut rows = plan_rows();
    rows[1][2] = Cell::new("irgendwann");
    rows.into_iter().chain(legend_rows()).collect()
}

#[test]
fn malformed_anchor_skips_column_by_default() {
    let extraction = Extractor::default()
        .extract_collecting(&table_with_broken_range())
        .unwrap();

    let malformed: Vec<_> = extraction
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::MalformedAnchor)
        .collect();
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].column, 2);
    assert_eq!(malformed[0].token, "irgendwann");

    let titles: Vec<&str> = extraction.plan.events().iter().map(|e| e.title.as_str()).collect();
    assert!(!titles.contains(&"Praxis"));
    assert!(!titles.contains(&"Praxisphase"));
    assert!(!titles.contains(&"Seminar"));
    assert!(titles.contains(&"Mathematik"));
}

#[test]
fn malformed_anchor_aborts_when_configured() {
    let config = ExtractorConfig {
        anchor_policy: AnchorPolicy::Abort,
        ..ExtractorConfig::default()
    };
    let err = Extractor::new(config)
        .extract_collecting(&table_with_broken_range())
        .unwrap_err();

    match err {
        ExtractError::MalformedAnchor { wrap, column, .. } => {
            assert_eq!((wrap, column), (0, 2));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_weekday_from_custom_grammar_is_diagnosed() {
    let grammar = |text: &str| -> ParsedCell {
        ParsedCell {
            days: vec!["Xx".into(), "Di".into()],
            subjects: vec![text.to_string()],
            ..ParsedCell::default()
        }
    };
    let table: Table = vec![
        row(&["", "2016/KW 9"]),
        row(&["Gruppe", "29.02-05.03"]),
        vec![
            Cell::new("FS151+BSc (FST) d").with_color(COHORT),
            Cell::new("Labor"),
        ],
    ]
    .into_iter()
    .collect();

    let extractor = Extractor::with_grammar(ExtractorConfig::default(), grammar);
    let extraction = extractor.extract_collecting(&table).unwrap();

    assert_eq!(extraction.diagnostics.len(), 1);
    assert_eq!(extraction.diagnostics[0].kind, DiagnosticKind::UnknownWeekday);
    assert_eq!(extraction.diagnostics[0].token, "Xx");
    assert_eq!(extraction.plan.len(), 1);
    assert_eq!(extraction.plan.events()[0].start, dt(2016, 3, 1, 0, 0));
}

#[test]
fn empty_table_gives_empty_plan() {
    let extraction = Extractor::default().extract_collecting(&Table::default()).unwrap();
    assert!(extraction.plan.is_empty());
    assert!(extraction.diagnostics.is_empty());
}

/// Two classes of group `d` registered in reverse name order, then `entry`
/// on a row without a class of its own.
fn group_table(entry: Cell) -> Table {
    vec![
        row(&["", "2016/KW 9"]),
        row(&["Gruppe", "29.02-05.03"]),
        vec![Cell::new("FS152+BA (FSK) d").with_color(COHORT), Cell::default()],
        vec![Cell::new("FS151+BSc (FST) d").with_color(COHORT), Cell::default()],
        vec![Cell::default().with_color(COHORT), entry],
    ]
    .into_iter()
    .collect()
}

#[test]
fn group_expands_in_registration_order() {
    let table = group_table(Cell::new("Mo 08:00 BWL (d)"));
    let extraction = Extractor::default().extract_collecting(&table).unwrap();

    let names: Vec<&str> = extraction
        .plan
        .events()
        .iter()
        .map(|event| event.class.full_name.as_deref().unwrap())
        .collect();
    assert_eq!(names, vec!["FS152", "FS151"]);
    assert!(extraction
        .plan
        .events()
        .iter()
        .all(|event| event.start == dt(2016, 2, 29, 8, 0)));
    assert!(extraction.diagnostics.is_empty());
}

#[test]
fn unknown_group_on_several_days_is_reported_once() {
    let table = group_table(Cell::new("Mo/Do 08:00 BWL (x)"));
    let extraction = Extractor::default().extract_collecting(&table).unwrap();

    assert!(extraction.plan.is_empty());
    assert_eq!(extraction.diagnostics.len(), 1);
    assert_eq!(extraction.diagnostics[0].kind, DiagnosticKind::UnresolvedGroup);
    assert_eq!(extraction.diagnostics[0].token, "x");
}

#[test]
fn group_part_applies_to_every_class_and_is_collected() {
    let table = group_table(Cell::new("Mo/Do 08:00 Labor (d1)"));
    let plan = Extractor::default().extract_collecting(&table).unwrap().plan;

    let fs152 = class("FS152+BA (FSK) d").with_part("1");
    let fs151 = class("FS151+BSc (FST) d").with_part("1");
    let classes: Vec<&Class> = plan.events().iter().map(|event| &event.class).collect();
    assert_eq!(classes, vec![&fs152, &fs151, &fs152, &fs151]);
    assert_eq!(plan.events()[2].start, dt(2016, 3, 3, 8, 0));

    assert!(plan.classes().contains(&fs152));
    assert!(plan.classes().contains(&fs151));
    assert_eq!(plan.classes().len(), 4);
}

#[test]
fn bachelor_of_arts_comment_adds_degree_event() {
    let table = group_table(Cell::new("Fr Klausur").with_comment("B.A. Prüfung"));
    let plan = Extractor::default().extract_collecting(&table).unwrap().plan;

    let classes: Vec<Class> = plan.events().iter().map(|event| event.class.clone()).collect();
    assert_eq!(
        classes,
        vec![Class::with_year(2015), Class::with_year(2015).with_course("BA")]
    );
}

#[test]
fn both_degree_markers_add_one_event_each() {
    let table = group_table(Cell::new("Fr Klausur").with_comment("BA und BSc"));
    let plan = Extractor::default().extract_collecting(&table).unwrap().plan;

    let courses: Vec<Option<&str>> = plan
        .events()
        .iter()
        .map(|event| event.class.course.as_deref())
        .collect();
    assert_eq!(courses, vec![None, Some("BSc"), Some("BA")]);
    assert!(plan.events().iter().all(|event| event.start == dt(2016, 3, 4, 0, 0)));
}
