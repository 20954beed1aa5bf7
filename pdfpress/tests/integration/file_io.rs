//! Integration tests for the load, process, write flow used by the CLI.

use std::path::PathBuf;

use pdfpress::error::PdfPressError;
use pdfpress::io::{PdfReader, PdfWriter};
use pdfpress::merge::merge_pdfs;
use pdfpress::split::split_pdf;
use tempfile::TempDir;

use crate::common::{labelled_pdf, page_labels, pdf_with_pages, temp_output_path, LETTER};

#[tokio::test]
async fn test_merge_files_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let mut paths = Vec::new();
    for label in ["first", "second", "third"] {
        let path = temp_dir.path().join(format!("{label}.pdf"));
        std::fs::write(&path, labelled_pdf(label, &[LETTER])).unwrap();
        paths.push(path);
    }

    let (results, stats) = PdfReader::new().load_all(&paths, 2).await;
    assert_eq!(stats.success_count, 3);
    let sources: Vec<Vec<u8>> = results.into_iter().map(|r| r.unwrap().bytes).collect();

    let output = temp_output_path();
    let merged = merge_pdfs(&sources).unwrap();
    PdfWriter::new().save(merged, &output).await.unwrap();

    let written = std::fs::read(&output).unwrap();
    assert_eq!(page_labels(&written), vec!["first 1", "second 1", "third 1"]);
}

#[tokio::test]
async fn test_split_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.pdf");
    std::fs::write(&input, pdf_with_pages(4)).unwrap();

    let loaded = PdfReader::new().load(&input).await.unwrap();
    let bytes = split_pdf(&loaded.bytes, "2,4").unwrap();

    let output = temp_dir.path().join("pages.pdf");
    let stats = PdfWriter::new().save_with_stats(bytes, &output).await.unwrap();

    assert_eq!(stats.file_size, std::fs::metadata(&output).unwrap().len());
    assert_eq!(
        page_labels(&std::fs::read(&output).unwrap()),
        vec!["Page 2", "Page 4"]
    );
}

#[tokio::test]
async fn test_missing_input_file() {
    let result = PdfReader::new()
        .load(&PathBuf::from("/nonexistent/file.pdf"))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, PdfPressError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_non_pdf_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.pdf");
    std::fs::write(&path, "plain text, not a document").unwrap();

    let err = PdfReader::new().load(&path).await.unwrap_err();

    assert!(matches!(err, PdfPressError::CorruptDocument { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_load_all_keeps_failures_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.pdf");
    std::fs::write(&good, pdf_with_pages(1)).unwrap();
    let paths = vec![good.clone(), temp_dir.path().join("missing.pdf"), good];

    let (results, stats) = PdfReader::new().load_all(&paths, 3).await;

    assert_eq!(stats.success_count, 2);
    assert_eq!(stats.failure_count, 1);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
}

#[tokio::test]
async fn test_write_into_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("no-such-dir").join("out.pdf");

    let writer = PdfWriter::new();
    assert!(writer.can_write(&output).await.is_err());

    let err = writer.save(pdf_with_pages(1), &output).await.unwrap_err();
    assert_eq!(err.exit_code(), 5);
}
