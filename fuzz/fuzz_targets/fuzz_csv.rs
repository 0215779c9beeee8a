#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any byte string must produce a series or an error, never a panic.
    if let Ok(series) = case_trend::io::read_csv_from_bytes(data, 2020) {
        assert_eq!(series.dates().len(), series.counts().len());
    }
});
