use chrono::NaiveDate;
use reading_parser::reading::item::Item;
use reading_parser::reading::loader::{ErrorPolicy, LogParser};
use reading_stats::{run, QueryError, Ranked, StatsOutput, Value};

const LOG: &str = "\
\\------ HISTORY
5|📕Tom Holland - Rubicon||2020/03/01|2020/03/20|history|400p
3|🔊Yuval Harari - Sapiens||2021/01/01|2021/02/01|history, science|15:00
4|📕Mary Beard - SPQR||2021/05/01||history|600p
\\------ FICTION
|📕Tom Holt - Goatsong||||fiction|280p
";

fn items() -> Vec<Item> {
    let today = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    LogParser::with_defaults(today)
        .parse_str(LOG, ErrorPolicy::Abort)
        .unwrap()
        .items
}

#[test]
fn counts_by_status() {
    let items = items();
    assert_eq!(run("count status=done", &items, 35).unwrap(), StatsOutput::Single(Value::Count(2)));
    assert_eq!(
        run("count status=in-progress", &items, 35).unwrap(),
        StatsOutput::Single(Value::Count(1))
    );
    assert_eq!(
        run("count status=planned", &items, 35).unwrap(),
        StatsOutput::Single(Value::Count(1))
    );
}

#[test]
fn average_rating_of_rated_history() {
    let items = items();
    assert_eq!(
        run("average-rating genre=history", &items, 35).unwrap(),
        StatsOutput::Single(Value::Number(Some(4.0)))
    );
}

#[test]
fn bottom_rating_ignores_unrated() {
    let items = items();
    assert_eq!(
        run("bottom-rating 1", &items, 35).unwrap(),
        StatsOutput::Single(Value::Ranking(vec![Ranked {
            title: "Sapiens".to_string(),
            value: 3.0
        }]))
    );
}

#[test]
fn finished_by_year() {
    let items = items();
    let StatsOutput::Grouped(groups) = run("count status=done by year", &items, 35).unwrap() else {
        panic!("expected grouped output");
    };
    assert_eq!(groups["2020"], Value::Count(1));
    assert_eq!(groups["2021"], Value::Count(1));
}

#[test]
fn author_substring() {
    let items = items();
    assert_eq!(
        run("count author~holt", &items, 35).unwrap(),
        StatsOutput::Single(Value::Count(1))
    );
}

#[test]
fn grouped_output_serializes_as_a_map() {
    let items = items();
    let output = run("count by format", &items, 35).unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json, serde_json::json!({"audiobook": 1, "print": 3}));
}

#[test]
fn rejects_unknown_operation() {
    assert_eq!(
        run("median", &[], 35).unwrap_err(),
        QueryError::UnknownOperation("median".to_string())
    );
}
