//! Integration tests for merging.

use pdfpress::document::SourceDocument;
use pdfpress::error::PdfPressError;
use pdfpress::merge::{Merger, merge_pdfs};

use crate::common::{A4, LETTER, labelled_pdf, page_labels, page_sizes, pdf_with_pages};

#[test]
fn test_merge_preserves_source_and_page_order() {
    let a = labelled_pdf("A", &[LETTER, LETTER]);
    let b = labelled_pdf("B", &[A4]);
    let c = labelled_pdf("C", &[LETTER, LETTER, LETTER]);

    let merged = merge_pdfs(&[a, b, c]).unwrap();

    assert_eq!(
        page_labels(&merged),
        vec!["A 1", "A 2", "B 1", "C 1", "C 2", "C 3"]
    );
}

#[test]
fn test_merge_keeps_page_geometry() {
    let merged = merge_pdfs(&[labelled_pdf("A", &[LETTER]), labelled_pdf("B", &[A4])]).unwrap();

    assert_eq!(page_sizes(&merged), vec![(612.0, 792.0), (595.0, 842.0)]);
}

#[test]
fn test_merge_page_count_is_sum_of_inputs() {
    let sources = vec![pdf_with_pages(2), pdf_with_pages(5), pdf_with_pages(1)];

    let result = Merger::new().merge(&sources).unwrap();

    assert_eq!(result.statistics.files_merged, 3);
    assert_eq!(result.statistics.total_pages, 8);
    assert_eq!(
        SourceDocument::parse(&result.bytes).unwrap().page_count(),
        8
    );
}

#[test]
fn test_merge_same_source_twice() {
    let source = labelled_pdf("X", &[LETTER, LETTER]);

    let merged = merge_pdfs(&[source.clone(), source]).unwrap();

    assert_eq!(page_labels(&merged), vec!["X 1", "X 2", "X 1", "X 2"]);
}

#[test]
fn test_merge_single_source_is_equivalent() {
    let source = labelled_pdf("Only", &[LETTER, A4]);

    let merged = merge_pdfs(&[source.clone()]).unwrap();

    assert_eq!(page_labels(&merged), page_labels(&source));
    assert_eq!(page_sizes(&merged), page_sizes(&source));
}

#[test]
fn test_merge_output_can_be_merged_again() {
    let first = merge_pdfs(&[labelled_pdf("A", &[LETTER]), labelled_pdf("B", &[LETTER])]).unwrap();
    let second = merge_pdfs(&[first, labelled_pdf("C", &[LETTER])]).unwrap();

    assert_eq!(page_labels(&second), vec!["A 1", "B 1", "C 1"]);
}

#[test]
fn test_merge_reports_failing_source_index() {
    let sources = vec![
        pdf_with_pages(1),
        pdf_with_pages(1),
        b"%PDF-1.4\nthis is not a pdf".to_vec(),
    ];

    let err = merge_pdfs(&sources).unwrap_err();

    match err {
        PdfPressError::CorruptDocument { source_index, .. } => {
            assert_eq!(source_index, Some(2));
        }
        other => panic!("expected CorruptDocument, got {other:?}"),
    }
}

#[test]
fn test_merge_empty_input_list() {
    let sources: Vec<Vec<u8>> = Vec::new();
    assert!(matches!(merge_pdfs(&sources), Err(PdfPressError::NoInput)));
}
