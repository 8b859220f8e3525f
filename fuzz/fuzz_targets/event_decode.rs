//! Fuzz target for motbwa_proto::decode
//!
//! Feeds arbitrary bytes to the inbound frame decoder:
//! - Invalid UTF-8 and malformed JSON
//! - Missing or mistyped fields
//! - Non-UUID room identifiers and unparsable dates
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error,
//! and every accepted event must encode again.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(event) = motbwa_proto::decode(data) {
        let encoded = motbwa_proto::encode_event(&event);
        assert!(encoded.is_ok(), "decoded event failed to encode: {event:?}");
    }
});
