#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfpress::document::SourceDocument;
use pdfpress::split::split_pdf;

// Arbitrary bytes must produce an error or a document, never a panic.
fuzz_target!(|data: &[u8]| {
    let Ok(source) = SourceDocument::parse(data) else {
        return;
    };
    let last = source.page_count();

    if let Ok(bytes) = split_pdf(data, &format!("1-{last}")) {
        let reparsed = SourceDocument::parse(&bytes).expect("split output parses");
        assert_eq!(reparsed.page_count(), last);
    }
});
