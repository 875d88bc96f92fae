//! 階層ソースの統合テスト
//!
//! CSV / CMS order file の読み込みと起動失敗ケースを検証

use nadana_map::context::{self, SourceSettings};
use nadana_map::error::MapperError;
use nadana_map::hierarchy::{open_source, SourceFormat};
use tempfile::tempdir;

fn order_line(order: u32, code: &str, billable: bool, short: &str, long: &str) -> String {
    format!(
        "{:05} {:<7} {} {:<60} {}",
        order,
        code,
        if billable { 1 } else { 0 },
        short,
        long
    )
}

/// 存在しない参照テーブルは起動失敗
#[test]
fn test_missing_reference_is_fatal() {
    let settings = SourceSettings {
        path: Some("/nonexistent/path/icd10.csv".into()),
        top_k: 3,
        ..Default::default()
    };

    let err = context::load_with_progress(&settings).err().expect("エラーになるべき");
    assert!(matches!(err, MapperError::FileNotFound(_)));
    assert!(err.is_fatal_startup());
}

/// ヘッダだけのCSVは起動失敗
#[test]
fn test_header_only_csv_is_fatal() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "code,description\n").unwrap();

    let source = open_source(Some(&path), SourceFormat::Csv, false).unwrap();
    let settings = SourceSettings { top_k: 3, ..Default::default() };
    let err = context::build(source.as_ref(), &settings).err().expect("エラーになるべき");

    assert!(matches!(err, MapperError::EmptyReference(_)));
    assert!(err.is_fatal_startup());
}

/// 説明文の無いコードも登録される
#[test]
fn test_csv_empty_description_kept() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("icd10.csv");
    std::fs::write(&path, "Code,Description\nR05,Cough\nZ99.89,\n").unwrap();

    let settings = SourceSettings {
        path: Some(path),
        top_k: 3,
        ..Default::default()
    };
    let (_source, ctx) = context::load_with_progress(&settings).unwrap();

    assert_eq!(ctx.table().len(), 2);
    assert_eq!(ctx.table().stats().empty_descriptions, 1);
    assert_eq!(ctx.lookup("cough", 1).unwrap()[0].code, "R05");
}

/// order file を読み込んで照合できる
#[test]
fn test_cms_order_file_lookup() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("icd10cm_order.txt");
    let content = [
        order_line(1, "E11", false, "Type 2 diabetes mellitus", "Type 2 diabetes mellitus"),
        order_line(
            2,
            "E119",
            true,
            "Type 2 diabetes mellitus without complications",
            "Type 2 diabetes mellitus without complications",
        ),
        order_line(3, "I10", true, "Essential (primary) hypertension", "Essential (primary) hypertension"),
    ]
    .join("\n");
    std::fs::write(&path, content).unwrap();

    let settings = SourceSettings {
        path: Some(path),
        format: SourceFormat::CmsOrder,
        top_k: 2,
        ..Default::default()
    };
    let (source, ctx) = context::load_with_progress(&settings).unwrap();

    assert_eq!(ctx.table().len(), 3);
    assert_eq!(source.ancestors("E11.9"), vec!["E11".to_string()]);

    let matches = ctx.lookup_default("type 2 diabetes without complications").unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].code, "E11.9");
}

/// billable_only で見出し行を除外
#[test]
fn test_cms_order_billable_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("icd10cm_order.txt");
    let content = [
        order_line(1, "R05", false, "Cough", "Cough"),
        order_line(2, "R051", true, "Acute cough", "Acute cough"),
    ]
    .join("\n");
    std::fs::write(&path, content).unwrap();

    let source = open_source(Some(&path), SourceFormat::CmsOrder, true).unwrap();
    assert_eq!(source.all_codes(), vec!["R05.1".to_string()]);
}

/// order file 形式でないファイルは起動失敗
#[test]
fn test_cms_order_wrong_format_is_fatal() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("icd10.csv");
    std::fs::write(&path, "code,description\nR05,Cough\n").unwrap();

    let err = open_source(Some(&path), SourceFormat::CmsOrder, false)
        .err()
        .expect("エラーになるべき");
    assert!(matches!(err, MapperError::ReferenceLoad(_)));
}
