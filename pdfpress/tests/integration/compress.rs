//! Integration tests for compression with in-memory rasterizers.

use pdfpress::compress::{CompressProgress, CompressionOutcome, Compressor, compress};
use pdfpress::config::CompressionLevel;
use pdfpress::document::SourceDocument;
use pdfpress::error::PdfPressError;
use pdfpress::raster::JpegEncoder;

use crate::common::{
    A4, FailingRasterizer, Fill, LETTER, MediaBoxRasterizer, labelled_pdf, padded_pdf,
    page_labels, page_sizes, pdf_with_pages,
};

fn compressor(fill: Fill) -> Compressor<MediaBoxRasterizer, JpegEncoder> {
    Compressor::new(MediaBoxRasterizer { fill }, JpegEncoder::new())
}

#[test]
fn test_low_keeps_text_content() {
    let source = labelled_pdf("Doc", &[LETTER, A4]);

    let result = compress(&source, "low").unwrap();

    assert_eq!(result.outcome, CompressionOutcome::Structural);
    assert_eq!(result.level, CompressionLevel::Low);
    assert_eq!(page_labels(&result.bytes), vec!["Doc 1", "Doc 2"]);
    assert_eq!(page_sizes(&result.bytes), page_sizes(&source));
}

#[test]
fn test_low_is_case_insensitive() {
    let source = pdf_with_pages(1);

    let result = compress(&source, "  LOW ").unwrap();

    assert_eq!(result.level, CompressionLevel::Low);
}

#[test]
fn test_high_rebuilds_pages_from_images() {
    let source = labelled_pdf("Doc", &[LETTER, (600, 800)]);

    let result = compressor(Fill::Noise)
        .compress(&source, CompressionLevel::High)
        .unwrap();

    assert_eq!(result.outcome, CompressionOutcome::Rasterized);
    assert_eq!(
        page_sizes(&result.bytes),
        vec![(428.0, 554.0), (420.0, 560.0)]
    );
    // Text is gone; each page is a single image draw.
    assert_eq!(page_labels(&result.bytes), vec!["", ""]);
}

#[test]
fn test_medium_accepts_smaller_output() {
    let source = padded_pdf(2, 400_000);

    let result = compressor(Fill::White)
        .compress(&source, CompressionLevel::Medium)
        .unwrap();

    assert_eq!(result.outcome, CompressionOutcome::Rasterized);
    assert!(result.new_size < result.original_size);
    assert_eq!(
        page_sizes(&result.bytes),
        vec![(551.0, 713.0), (551.0, 713.0)]
    );
}

#[test]
fn test_medium_reverts_to_exact_input_when_larger() {
    let source = pdf_with_pages(2);

    let result = compressor(Fill::Noise)
        .compress(&source, CompressionLevel::Medium)
        .unwrap();

    assert_eq!(result.outcome, CompressionOutcome::RevertedToOriginal);
    assert_eq!(result.bytes, source);
    assert_eq!(result.new_size, result.original_size);
}

#[test]
fn test_unknown_level_behaves_like_medium() {
    let source = pdf_with_pages(1);

    let result = compressor(Fill::Noise)
        .compress(&source, CompressionLevel::from_name("ultra"))
        .unwrap();

    assert_eq!(result.level, CompressionLevel::Medium);
    assert_eq!(result.bytes, source);
}

#[test]
fn test_progress_is_reported_in_page_order() {
    let source = pdf_with_pages(3);
    let mut seen = Vec::new();

    compressor(Fill::White)
        .compress_with_progress(&source, CompressionLevel::High, |p| seen.push(p))
        .unwrap();

    let expected: Vec<CompressProgress> = (1..=3)
        .map(|page| CompressProgress {
            page,
            total_pages: 3,
        })
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_render_failure_aborts_without_output() {
    let source = pdf_with_pages(3);
    let compressor = Compressor::new(FailingRasterizer { fail_on: 3 }, JpegEncoder::new());
    let mut pages_done = 0;

    let err = compressor
        .compress_with_progress(&source, CompressionLevel::High, |_| pages_done += 1)
        .unwrap_err();

    assert!(matches!(err, PdfPressError::Render { page: 3, .. }));
    assert_eq!(pages_done, 2);
}

#[test]
fn test_rasterized_output_is_a_valid_source() {
    let source = pdf_with_pages(2);

    let result = compressor(Fill::White)
        .compress(&source, CompressionLevel::High)
        .unwrap();

    let reparsed = SourceDocument::parse(&result.bytes).unwrap();
    assert_eq!(reparsed.page_count(), 2);
}

#[test]
fn test_corrupt_source_is_rejected_before_rendering() {
    let compressor = Compressor::new(FailingRasterizer { fail_on: 1 }, JpegEncoder::new());

    let err = compressor
        .compress(b"garbage", CompressionLevel::High)
        .unwrap_err();

    assert!(matches!(err, PdfPressError::CorruptDocument { .. }));
}
