use jsonlinesdb::{
    Adapter, Filter, JsonlError, JsonlFile, Range, Row, ScanQuery, SortKey, SqlScanParser, Value,
};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn weather(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("weather.jsonl");
    let lines = [
        json!({"index": 10, "temperature": 15.2, "site": "Diamond_St"}),
        json!({"index": 11, "temperature": 13.1, "site": "Blacktail_Loop"}),
        json!({"index": 12, "temperature": 13.3, "site": "Platinum_St"}),
        json!({"index": 13, "temperature": 12.1, "site": "Kodiak_Trail"}),
    ];
    let text: String = lines.iter().map(|line| format!("{}\n", line)).collect();
    fs::write(&path, text).unwrap();
    path
}

fn run(sql: &str) -> jsonlinesdb::Result<Vec<Row>> {
    let query = SqlScanParser::new().parse(sql)?;
    let table = JsonlFile::open(&query.table)?;
    table
        .get_data(&query.bounds, &query.order, query.limit, query.offset)?
        .collect()
}

fn ids(rows: &[Row]) -> Vec<usize> {
    rows.iter().map(Row::row_id).collect()
}

#[test]
fn test_sql_range_filter() {
    let dir = TempDir::new().unwrap();
    let path = weather(&dir);

    let rows = run(&format!(r#"SELECT * FROM "{}" WHERE "index" > 11"#, path.display())).unwrap();
    assert_eq!(ids(&rows), vec![2, 3]);
}

#[test]
fn test_sql_conjunction() {
    let dir = TempDir::new().unwrap();
    let path = weather(&dir);

    let rows = run(&format!(
        r#"SELECT * FROM "{}" WHERE "index" <= 11 AND temperature > 14"#,
        path.display()
    ))
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("index").unwrap().into_owned(), Value::Integer(10));
}

#[test]
fn test_sql_order_limit_offset() {
    let dir = TempDir::new().unwrap();
    let path = weather(&dir);

    let rows = run(&format!(
        r#"SELECT * FROM "{}" WHERE temperature >= 12 ORDER BY temperature DESC LIMIT 2 OFFSET 1"#,
        path.display()
    ))
    .unwrap();
    assert_eq!(ids(&rows), vec![2, 1]);
}

#[test]
fn test_sql_row_id_and_between() {
    let dir = TempDir::new().unwrap();
    let path = weather(&dir);

    let rows = run(&format!(
        r#"SELECT * FROM "{}" WHERE "rowid" BETWEEN 1 AND 2 AND (site <> 'Platinum_St')"#,
        path.display()
    ))
    .unwrap();
    assert_eq!(ids(&rows), vec![1]);
}

#[test]
fn test_sql_contradiction_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let path = weather(&dir);

    let rows = run(&format!(
        r#"SELECT * FROM "{}" WHERE "index" > 12 AND "index" < 11"#,
        path.display()
    ))
    .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_sql_unknown_column() {
    let dir = TempDir::new().unwrap();
    let path = weather(&dir);

    let result = run(&format!(r#"SELECT * FROM "{}" WHERE altitude > 1"#, path.display()));
    assert!(matches!(result, Err(JsonlError::ColumnNotFound(name)) if name == "altitude"));
}

#[test]
fn test_parsed_query_shape() {
    let query = SqlScanParser::new()
        .parse(r#"SELECT site FROM "w.jsonl" WHERE temperature >= -1.5 ORDER BY site LIMIT 10"#)
        .unwrap();

    let mut expected = ScanQuery::new("w.jsonl");
    expected.columns = Some(vec!["site".to_string()]);
    expected.bounds.insert(
        "temperature".to_string(),
        Filter::Range(Range::at_least(-1.5)),
    );
    expected.order = vec![SortKey::ascending("site")];
    expected.limit = Some(10);

    assert_eq!(query, expected);
}

#[test]
fn test_or_is_not_pushed_down() {
    let result = SqlScanParser::new()
        .parse(r#"SELECT * FROM "w.jsonl" WHERE "index" = 1 OR "index" = 2"#);
    assert!(matches!(result, Err(JsonlError::UnsupportedOperation(_))));
}
