#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        // Name mapping and eligibility are total functions - never panic
        let _ = sasscade::css_file_name(name);
        let _ = sasscade::is_compilable(name);
    }
});
