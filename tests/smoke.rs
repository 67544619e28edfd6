mod common;

use std::fs;

use assert_cmd::Command;
use genesup::nlp::mention::{MentionKind, OutputRecord};
use tempfile::TempDir;

fn genesup() -> Command {
    let mut cmd = Command::cargo_bin("genesup").expect("binary exists");
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn write_dicts(dir: &TempDir) {
    fs::write(dir.path().join("genes.tsv"), "BRCA1\tBRCA1\np53\tTP53\n").unwrap();
    fs::write(dir.path().join("english.txt"), "the\ngene\npromotes\nrepair\n").unwrap();
    fs::write(dir.path().join("stopwords.txt"), "the\n").unwrap();
    fs::write(dir.path().join("long_names.tsv"), "TP53\ttumor protein p53\n").unwrap();
}

fn parse_output(text: &str) -> Vec<OutputRecord> {
    text.lines()
        .map(|line| OutputRecord::from_line(line).expect("valid output line"))
        .collect()
}

#[test]
fn cli_help_runs() {
    genesup().arg("--help").assert().success();
}

#[test]
fn dicts_reports_counts() {
    let dir = TempDir::new().unwrap();
    write_dicts(&dir);
    let output = genesup()
        .arg("dicts")
        .arg("--dicts")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["gene_phrases"], 2);
    assert_eq!(stats["long_names"], 1);
}

#[test]
fn extract_skips_malformed_lines() {
    let dir = TempDir::new().unwrap();
    write_dicts(&dir);
    let input = dir.path().join("sentences.tsv");
    let good = common::record_line(&common::brca1_tokens(), None);
    fs::write(&input, format!("{good}\nnot a record\n\n{good}\n")).unwrap();
    let out_path = dir.path().join("out.jsonl");

    genesup()
        .arg("extract")
        .arg("--dicts")
        .arg(dir.path())
        .arg("-o")
        .arg(&out_path)
        .arg(&input)
        .assert()
        .success();

    let records = parse_output(&fs::read_to_string(&out_path).unwrap());
    assert_eq!(records.len(), 6);
    assert_eq!(records[0].kind, MentionKind::Gene);
    assert_eq!(records[0].mention_id, "doc1_7_1_1");
    assert_eq!(records[0].is_correct, None);
    assert!(records[1..3].iter().all(|r| r.is_correct == Some(true)));
    assert_eq!(records[..3], records[3..]);
}

#[test]
fn parallel_workers_preserve_input_order() {
    let dir = TempDir::new().unwrap();
    write_dicts(&dir);
    let lines: Vec<String> = (0..20)
        .map(|i| {
            let line = common::record_line(&common::brca1_tokens(), None);
            line.replacen("\t7\t", &format!("\t{i}\t"), 1)
        })
        .collect();
    let stdin = lines.join("\n");

    let serial = genesup()
        .args(["extract", "--workers", "1", "--dicts"])
        .arg(dir.path())
        .write_stdin(stdin.clone())
        .output()
        .unwrap();
    let parallel = genesup()
        .args(["extract", "--workers", "4", "--dicts"])
        .arg(dir.path())
        .write_stdin(stdin)
        .output()
        .unwrap();
    assert!(serial.status.success());
    assert!(parallel.status.success());
    assert_eq!(serial.stdout, parallel.stdout);

    let records = parse_output(&String::from_utf8(parallel.stdout).unwrap());
    let ids: Vec<i64> = records.iter().step_by(3).map(|r| r.sent_id).collect();
    assert_eq!(ids, (0..20).collect::<Vec<_>>());
}

#[test]
fn missing_dictionaries_fail() {
    let dir = TempDir::new().unwrap();
    genesup()
        .arg("dicts")
        .arg("--dicts")
        .arg(dir.path().join("absent"))
        .assert()
        .failure();
}
