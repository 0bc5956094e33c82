#![no_main]

use libfuzzer_sys::fuzz_target;
use specrun::reporting::escape;
use specrun_core::{classify_name, readable_label};

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let _ = classify_name(name);
        let _ = readable_label(name);
        let escaped = escape(name);
        assert!(escaped.is_ascii() && !escaped.contains('\n'));
    }
});
