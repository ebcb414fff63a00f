//! End-to-end tests for the recondoc binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn recondoc() -> Command {
    Command::cargo_bin("recondoc").unwrap()
}

fn write_po(dir: &TempDir, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, json).unwrap();
    path
}

const PO_JSON: &str = r#"{
  "vendor": "Acme Corp",
  "items": [
    {"name": "Widget", "quantity": 2, "unit_price": "9.99"},
    {"name": "Gadget", "quantity": 1, "unit_price": "120.50"}
  ],
  "total_amount": "140.48",
  "terms": "Net 30"
}"#;

#[test]
fn test_render_writes_pdf() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", PO_JSON);
    let pdf_path = dir.path().join("po.pdf");

    recondoc()
        .arg("render")
        .arg(&po_path)
        .arg("-o")
        .arg(&pdf_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Purchase order written"));

    let bytes = std::fs::read(&pdf_path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_render_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", PO_JSON);
    let first = dir.path().join("a.pdf");
    let second = dir.path().join("b.pdf");

    for out in [&first, &second] {
        recondoc()
            .arg("render")
            .arg(&po_path)
            .arg("-o")
            .arg(out)
            .assert()
            .success();
    }

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn test_render_rejects_bad_json() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", "{not json");

    recondoc()
        .arg("render")
        .arg(&po_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid purchase order record"));
}

#[test]
fn test_extract_round_trips_vendor_and_items() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", PO_JSON);
    let pdf_path = dir.path().join("po.pdf");

    recondoc()
        .arg("render")
        .arg(&po_path)
        .arg("-o")
        .arg(&pdf_path)
        .assert()
        .success();

    let output = recondoc()
        .arg("extract")
        .arg(&pdf_path)
        .arg("--text-only")
        .output()
        .unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["vendor"], "Acme Corp");
    let items = record["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Widget");
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["unit_price"], "9.99");
}

#[test]
fn test_extract_raw_contains_labels() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", PO_JSON);
    let pdf_path = dir.path().join("po.pdf");

    recondoc()
        .arg("render")
        .arg(&po_path)
        .arg("-o")
        .arg(&pdf_path)
        .assert()
        .success();

    recondoc()
        .arg("extract")
        .arg(&pdf_path)
        .arg("--text-only")
        .arg("--raw")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vendor: Acme Corp"))
        .stdout(predicate::str::contains("2 x Widget @ $9.99"));
}

#[test]
fn test_extract_garbage_warns_and_emits_empty_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bogus.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    let output = recondoc()
        .arg("extract")
        .arg(&path)
        .arg("--text-only")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not be opened"));

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["items"].as_array().unwrap().len(), 0);
}

#[test]
fn test_extract_missing_file_fails() {
    recondoc()
        .arg("extract")
        .arg("/nonexistent/file.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_validate_matching_records() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", PO_JSON);
    let receipt_path = write_po(
        &dir,
        "receipt.json",
        r#"{
          "vendor": "Acme Corp",
          "items": [
            {"name": "widget", "quantity": 2, "unit_price": "9.99"},
            {"name": "Gadget", "quantity": 1, "unit_price": "120.50"}
          ]
        }"#,
    );

    recondoc()
        .arg("validate")
        .arg("--receipt")
        .arg(&receipt_path)
        .arg("--po")
        .arg(&po_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("matches purchase order"));
}

#[test]
fn test_validate_reports_discrepancies() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", PO_JSON);
    let receipt_path = write_po(
        &dir,
        "receipt.json",
        r#"{
          "vendor": "Globex",
          "items": [
            {"name": "Widget", "quantity": 3, "unit_price": "9.99"}
          ]
        }"#,
    );

    let output = recondoc()
        .arg("validate")
        .arg("--receipt")
        .arg(&receipt_path)
        .arg("--po")
        .arg(&po_path)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["valid"], false);
    let discrepancies = result["discrepancies"].as_array().unwrap();
    assert_eq!(
        discrepancies[0],
        "Vendor mismatch: Globex != Acme Corp"
    );
    assert_eq!(
        discrepancies[1],
        "Item Widget mismatch: PO 2 x 9.99 != Receipt 3 x 9.99"
    );
    assert_eq!(discrepancies[2], "Item Gadget missing in receipt");
}

#[test]
fn test_validate_strict_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", PO_JSON);
    let receipt_path = write_po(&dir, "receipt.json", r#"{"vendor": "Globex", "items": []}"#);

    recondoc()
        .arg("validate")
        .arg("--receipt")
        .arg(&receipt_path)
        .arg("--po")
        .arg(&po_path)
        .arg("--strict")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Vendor mismatch"));
}

#[test]
fn test_validate_pdf_receipt_against_json_po() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", PO_JSON);
    let receipt_pdf = dir.path().join("receipt.pdf");

    // Render the PO and treat the output as the receipt: vendor and items
    // round-trip, so only the total (which rendering relabels) differs,
    // and totals are not part of reconciliation.
    recondoc()
        .arg("render")
        .arg(&po_path)
        .arg("-o")
        .arg(&receipt_pdf)
        .assert()
        .success();

    recondoc()
        .arg("validate")
        .arg("--receipt")
        .arg(&receipt_pdf)
        .arg("--po")
        .arg(&po_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("matches purchase order"));
}

#[test]
fn test_batch_processes_directory() {
    let dir = TempDir::new().unwrap();
    let po_path = write_po(&dir, "po.json", PO_JSON);

    for name in ["a.pdf", "b.pdf"] {
        recondoc()
            .arg("render")
            .arg(&po_path)
            .arg("-o")
            .arg(dir.path().join(name))
            .assert()
            .success();
    }

    let out_dir = dir.path().join("out");
    let summary = dir.path().join("summary.csv");

    recondoc()
        .arg("batch")
        .arg(format!("{}/*.pdf", dir.path().display()))
        .arg("--output-dir")
        .arg(&out_dir)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 document(s)"));

    assert!(out_dir.join("a.json").exists());
    assert!(out_dir.join("b.json").exists());

    let csv = std::fs::read_to_string(&summary).unwrap();
    assert!(csv.starts_with("file,vendor,total_amount,item_name,quantity,unit_price"));
    assert!(csv.contains("Widget"));
}

#[test]
fn test_batch_no_matches_fails() {
    let dir = TempDir::new().unwrap();

    recondoc()
        .arg("batch")
        .arg(format!("{}/*.pdf", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files matched"));
}

#[test]
fn test_config_show_prints_defaults() {
    recondoc()
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("patterns"));
}
