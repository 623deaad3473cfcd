#![no_main]

use abdash::{AnalysisReport, Dataset};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Loading and analyzing arbitrary bytes must never panic
    if let Ok(dataset) = Dataset::from_reader(data) {
        let _ = AnalysisReport::build(&dataset, 0.05);
    }
});
