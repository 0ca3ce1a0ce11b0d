use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use deckgen::model::{ChartKind, Milestone, Rgb, TimeSeriesPoint, TrendSeries};
use deckgen::{DeckError, GeneratorConfig, Pipeline, ReportContent, RunSummary};
use quick_xml::events::Event;
use quick_xml::Reader;
use sha2::{Digest, Sha256};

const CHART_FILES: [&str; 3] = [
    "chart_directorio.svg",
    "chart_vision.svg",
    "chart_roadmap.svg",
];
const DECK_FILE: &str = "Presentacion_Final_Casia.html";

fn config_for(dir: &Path) -> GeneratorConfig {
    GeneratorConfig {
        output_dir: dir.to_path_buf(),
        open_viewer: false,
        ..GeneratorConfig::default()
    }
}

fn generate(dir: &Path, content: ReportContent) -> RunSummary {
    Pipeline::new(config_for(dir), content)
        .run()
        .expect("generation succeeds")
}

/// Attributes of every `tag` element in an SVG or HTML document.
fn elements(document: &str, tag: &str) -> Vec<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().check_end_names = false;

    let mut found = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == tag.as_bytes() => {
                let attrs = e
                    .attributes()
                    .map(|attr| {
                        let attr = attr.expect("well-formed attribute");
                        (
                            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                            String::from_utf8_lossy(&attr.value).into_owned(),
                        )
                    })
                    .collect();
                found.push(attrs);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => panic!("unparseable markup at {}: {err}", reader.buffer_position()),
        }
    }
    found
}

fn with_class<'a>(
    elements: &'a [BTreeMap<String, String>],
    class: &'a str,
) -> impl Iterator<Item = &'a BTreeMap<String, String>> {
    elements
        .iter()
        .filter(move |attrs| attrs.get("class").map(String::as_str) == Some(class))
}

fn sha256(path: &Path) -> [u8; 32] {
    Sha256::digest(fs::read(path).expect("readable artifact")).into()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("readable output dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn writes_three_charts_and_the_deck() {
    let dir = tempfile::tempdir().unwrap();
    let summary = generate(dir.path(), ReportContent::builtin());

    let written: Vec<PathBuf> = summary.artifacts().map(|a| a.path().to_path_buf()).collect();
    let mut expected: Vec<PathBuf> = CHART_FILES.iter().map(|name| dir.path().join(name)).collect();
    expected.push(dir.path().join(DECK_FILE));
    assert_eq!(written, expected);

    let mut names = CHART_FILES.map(str::to_owned).to_vec();
    names.push(DECK_FILE.to_owned());
    names.sort();
    assert_eq!(file_names(dir.path()), names);
}

#[test]
fn regenerating_overwrites_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let first = generate(dir.path(), ReportContent::builtin());
    let second = generate(dir.path(), ReportContent::builtin());

    assert_eq!(first, second);
    assert_eq!(file_names(dir.path()).len(), 4);
}

#[test]
fn deck_references_each_chart_once_by_file_name() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path(), ReportContent::builtin());

    let html = fs::read_to_string(dir.path().join(DECK_FILE)).unwrap();
    let mut sources: Vec<String> = elements(&html, "img")
        .into_iter()
        .filter_map(|attrs| attrs.get("src").cloned())
        .collect();
    sources.sort();

    let mut expected = CHART_FILES.map(str::to_owned).to_vec();
    expected.sort();
    assert_eq!(sources, expected);
}

#[test]
fn trend_chart_carries_the_revenue_points_in_order() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path(), ReportContent::builtin());

    let svg = fs::read_to_string(dir.path().join("chart_vision.svg")).unwrap();
    let circles = elements(&svg, "circle");
    let points: Vec<(String, f64)> = with_class(&circles, "data-point")
        .map(|attrs| {
            (
                attrs["data-period"].clone(),
                attrs["data-value"].parse().expect("numeric value"),
            )
        })
        .collect();

    assert_eq!(
        points,
        vec![
            ("2026".to_owned(), 10.4),
            ("2027".to_owned(), 16.0),
            ("2028".to_owned(), 20.0),
        ]
    );

    let xs: Vec<f64> = with_class(&circles, "data-point")
        .map(|attrs| attrs["cx"].parse().unwrap())
        .collect();
    assert!(xs.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn timeline_has_one_marker_per_milestone() {
    let dir = tempfile::tempdir().unwrap();
    let content = ReportContent::builtin();
    let expected: Vec<String> = content.milestones.iter().map(|m| m.label().to_owned()).collect();
    generate(dir.path(), content);

    let svg = fs::read_to_string(dir.path().join("chart_roadmap.svg")).unwrap();
    let circles = elements(&svg, "circle");
    let labels: Vec<String> = with_class(&circles, "milestone-marker")
        .map(|attrs| attrs["data-label"].clone())
        .collect();
    assert_eq!(labels, expected);
}

#[test]
fn alignment_chart_draws_every_box() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path(), ReportContent::builtin());

    let svg = fs::read_to_string(dir.path().join("chart_directorio.svg")).unwrap();
    let groups = elements(&svg, "g");
    assert_eq!(with_class(&groups, "category-box").count(), 3);
}

#[test]
fn deleted_outputs_are_recreated() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path(), ReportContent::builtin());

    let trend = dir.path().join("chart_vision.svg");
    let deck = dir.path().join(DECK_FILE);
    fs::remove_file(&trend).unwrap();
    fs::remove_file(&deck).unwrap();

    generate(dir.path(), ReportContent::builtin());
    assert!(trend.is_file());
    assert!(deck.is_file());
}

#[test]
fn output_path_occupied_by_a_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-directory");
    fs::write(&blocker, b"occupied").unwrap();

    let err = Pipeline::new(config_for(&blocker), ReportContent::builtin())
        .run()
        .unwrap_err();
    assert!(err.is_io(), "unexpected error: {err}");
    assert_eq!(fs::read(&blocker).unwrap(), b"occupied");
}

#[test]
fn failed_deck_write_leaves_no_partial_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        deck_file: "missing/deck.html".to_owned(),
        ..config_for(dir.path())
    };

    let err = Pipeline::new(config, ReportContent::builtin())
        .run()
        .unwrap_err();
    match &err {
        DeckError::Io { path, .. } => assert!(path.ends_with("missing/deck.html")),
        other => panic!("expected an I/O error, got {other}"),
    }

    let mut charts = CHART_FILES.map(str::to_owned).to_vec();
    charts.sort();
    assert_eq!(file_names(dir.path()), charts);
}

#[test]
fn output_is_byte_for_byte_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    generate(first.path(), ReportContent::builtin());
    generate(second.path(), ReportContent::builtin());

    for name in CHART_FILES.iter().chain([&DECK_FILE]) {
        assert_eq!(
            sha256(&first.path().join(name)),
            sha256(&second.path().join(name)),
            "{name} differs between runs"
        );
    }
}

#[test]
fn dumped_content_drives_identical_output() {
    let builtin_dir = tempfile::tempdir().unwrap();
    generate(builtin_dir.path(), ReportContent::builtin());

    let json_dir = tempfile::tempdir().unwrap();
    let content_path = json_dir.path().join("content.json");
    fs::write(&content_path, ReportContent::builtin().to_json().unwrap()).unwrap();
    let loaded = ReportContent::from_json_file(&content_path).unwrap();

    let out = json_dir.path().join("out");
    generate(&out, loaded);

    for name in CHART_FILES.iter().chain([&DECK_FILE]) {
        assert_eq!(sha256(&builtin_dir.path().join(name)), sha256(&out.join(name)));
    }
}

#[test]
fn custom_content_changes_the_charts() {
    let dir = tempfile::tempdir().unwrap();
    let mut content = ReportContent::builtin();
    content.revenue = TrendSeries::new(vec![
        TimeSeriesPoint::new("Q1", 3.0),
        TimeSeriesPoint::new("Q2", 1.0),
    ]);
    content.milestones = vec![Milestone::new(
        "Kickoff",
        chrono::NaiveDate::from_ymd_opt(2027, 1, 4).unwrap(),
        Rgb(0x22, 0xc5, 0x5e),
    )];
    content.deck.variables.insert("client".to_owned(), "ACME".to_owned());
    generate(dir.path(), content);

    let trend = fs::read_to_string(dir.path().join("chart_vision.svg")).unwrap();
    assert_eq!(with_class(&elements(&trend, "circle"), "data-point").count(), 2);
    let timeline = fs::read_to_string(dir.path().join("chart_roadmap.svg")).unwrap();
    assert_eq!(
        with_class(&elements(&timeline, "circle"), "milestone-marker").count(),
        1
    );
    let html = fs::read_to_string(dir.path().join(DECK_FILE)).unwrap();
    assert!(html.contains("<title>Sesión Validación ACME</title>"));
}

#[test]
fn chart_file_names_follow_the_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path());
    config
        .chart_files
        .insert(ChartKind::Trend, "revenue.svg".to_owned());
    Pipeline::new(config, ReportContent::builtin()).run().unwrap();

    assert!(dir.path().join("revenue.svg").is_file());
    assert!(!dir.path().join("chart_vision.svg").exists());
    let html = fs::read_to_string(dir.path().join(DECK_FILE)).unwrap();
    let sources: Vec<String> = elements(&html, "img")
        .into_iter()
        .filter_map(|attrs| attrs.get("src").cloned())
        .collect();
    assert!(sources.contains(&"revenue.svg".to_owned()));
}
