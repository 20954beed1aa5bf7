#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfpress::range::parse_page_range;

fuzz_target!(|data: &[u8]| {
    let Some((&count, expr)) = data.split_first() else {
        return;
    };
    let expr = String::from_utf8_lossy(expr);
    let page_count = usize::from(count);

    if let Ok(pages) = parse_page_range(&expr, page_count) {
        let indices = pages.as_slice();
        assert!(!indices.is_empty());
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(indices.iter().all(|&index| index < page_count));
    }
});
