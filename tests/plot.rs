use std::fs;

use datalog_plotter::{plot, MissingFieldPolicy, PlotConfig, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

const SETTINGS: &str = r#"{
    "series": [
        { "name": "power", "group": "ch1", "y_label": "W", "decimation": 2,
          "expression": "$V $I MUL" },
        { "name": "rms", "group": "ch1", "expression": "$V $V MUL SQR" },
        { "name": "gain", "normalize": true, "expression": "$V 2 MUL" },
        { "name": "broken", "expression": "$V $Missing ADD" }
    ]
}"#;

fn folder() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(
        data.join("dut0.dat"),
        "#V\tI\n#----\n1\t2\n3\t2\n5\t2\n7\t2\n9\t2\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_render_folder() {
    let dir = folder();
    let config: PlotConfig = SETTINGS.parse().unwrap();
    let report = plot::render(&config, dir.path()).unwrap();
    assert_eq!(report.files.len(), 1);
    assert!(report.failures.is_empty());
    assert_eq!(report.failure_count(), 1);

    let file = &report.files[0];
    assert_eq!(file.groups.len(), 2);
    assert_eq!(file.groups[0].key, "ch1");
    assert_eq!(file.groups[0].y_label, "W");
    assert_eq!(file.groups[0].series[0].value, Value::Series(vec![4.0, 12.0]));
    assert_eq!(file.groups[0].series[1].value, Value::Series(vec![1.0, 3.0, 5.0, 7.0, 9.0]));
    assert_eq!(file.groups[1].key, "gain");
    assert_eq!(file.groups[1].series[0].value, Value::Series(vec![0.2, 0.6, 1.0, 1.4, 1.8]));

    assert_eq!(
        serde_json::to_value(&file.failures).unwrap(),
        json!([{ "name": "broken", "error": "missing field `Missing`" }])
    );
}

#[test]
fn test_lenient_policy_from_settings() {
    let dir = folder();
    let mut config: PlotConfig = SETTINGS.parse().unwrap();
    config.missing_fields = MissingFieldPolicy::Zero;
    let report = plot::render(&config, dir.path()).unwrap();
    assert_eq!(report.failure_count(), 0);
    let broken = &report.files[0].groups[2].series[0];
    assert_eq!(broken.name, "broken");
    assert_eq!(broken.value, Value::Series(vec![1.0, 3.0, 5.0, 7.0, 9.0]));
}

#[test]
fn test_bad_file_does_not_hide_good_ones() {
    let dir = folder();
    fs::write(dir.path().join("data").join("dut1.dat"), "#V\tI\n#----\n1\tx\n").unwrap();
    let config: PlotConfig = SETTINGS.parse().unwrap();

    let report = plot::render(&config, dir.path()).unwrap();
    assert_eq!(report.files.len(), 1);
    assert!(report.files[0].file.ends_with("dut0.dat"));
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].file.ends_with("dut1.dat"));

    let json = serde_json::to_value(&report).unwrap();
    let message = json["failures"][0]["error"].as_str().unwrap();
    assert!(message.ends_with("dut1.dat:3: `x` is not a number"), "{message}");
}

#[test]
fn test_missing_folder_is_an_error() {
    let config: PlotConfig = SETTINGS.parse().unwrap();
    assert!(plot::render(&config, std::path::Path::new("Cat")).is_err());
}
