//! Fuzz target for record list JSON parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the record list parser,
//! checking for panics, crashes, or hangs. Parsed lists are also validated
//! and rendered, since both must accept anything the parser does.

#![no_main]

use annorect::engine::{Annotator, HeadlessAnnotator, Options};
use annorect::model::io_json::from_json_slice;
use annorect::model::{Bounds, RecordInput};
use annorect::validation::{validate_records, ValidateOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(records) = from_json_slice(data) else {
        return;
    };
    let _ = validate_records(&records, &ValidateOptions::default());

    let mut annotator: HeadlessAnnotator = Annotator::headless(
        Bounds::new(0.0, 0.0, 640.0, 480.0),
        Options::default(),
        (),
    );
    annotator.render_all(records.into_iter().map(RecordInput::from).collect(), None);
});
