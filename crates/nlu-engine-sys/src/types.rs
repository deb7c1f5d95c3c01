//! FFI-safe type definitions
//!
//! All types in this module mirror the C layout of the records exchanged
//! with the engine library. Field order is part of the binary contract.

use std::os::raw::{c_char, c_float, c_int, c_void};

/// Status code returned by every fallible native call
pub type StatusCode = c_int;

/// The only status code meaning success
pub const STATUS_OK: StatusCode = 1;

/// Status code used by the engine to signal a failure
pub const STATUS_KO: StatusCode = 0;

/// Sentinel stored in `range_start` when a slot carries no range
pub const NO_RANGE: c_int = -1;

/// Opaque engine client, only ever handled through a pointer
pub type CClient = c_void;

/// Top-level result of `nlu_engine_run_parse`
#[repr(C)]
#[derive(Debug)]
pub struct CIntentParserResult {
    /// The parsed input text
    pub input: *const c_char,
    /// Classified intent, null when no intent was recognized
    pub intent: *const CIntentClassifierResult,
    /// Slots of the classified intent, null when there are none
    pub slots: *const CSlotList,
}

/// Intent classification part of a parse result
#[repr(C)]
#[derive(Debug)]
pub struct CIntentClassifierResult {
    /// Name of the recognized intent
    pub intent_name: *const c_char,
    /// Classification probability in `[0, 1]`
    pub probability: c_float,
}

/// Array descriptor for the slots of a parse result
#[repr(C)]
#[derive(Debug)]
pub struct CSlotList {
    /// First record of a contiguous run of `size` slots
    pub slots: *const CSlot,
    /// Number of records; `<= 0` means empty
    pub size: c_int,
}

/// A single slot record
#[repr(C)]
#[derive(Debug)]
pub struct CSlot {
    /// Slot value text
    pub value: *const c_char,
    /// Range start, or [`NO_RANGE`]
    pub range_start: c_int,
    /// Range end, ignored when `range_start` is [`NO_RANGE`]
    pub range_end: c_int,
    /// Entity type name
    pub entity: *const c_char,
    /// Slot name
    pub slot_name: *const c_char,
}

/// Top-level result of `nlu_engine_run_tag`
#[repr(C)]
#[derive(Debug)]
pub struct CTaggedEntityList {
    /// First record of a contiguous run of `size` entities
    pub entities: *const CTaggedEntity,
    /// Number of records; `<= 0` means empty
    pub size: c_int,
}

/// A single tagged entity record, laid out exactly like [`CSlot`]
#[repr(C)]
#[derive(Debug)]
pub struct CTaggedEntity {
    /// Entity value text
    pub value: *const c_char,
    /// Range start, or [`NO_RANGE`]
    pub range_start: c_int,
    /// Range end, ignored when `range_start` is [`NO_RANGE`]
    pub range_end: c_int,
    /// Entity type name
    pub entity: *const c_char,
    /// Slot name
    pub slot_name: *const c_char,
}

/// Returns true when `status` is the success code
pub fn is_ok(status: StatusCode) -> bool {
    status == STATUS_OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, offset_of, size_of};

    const PTR: usize = size_of::<*const c_void>();

    #[test]
    fn test_parser_result_layout() {
        assert_eq!(offset_of!(CIntentParserResult, input), 0);
        assert_eq!(offset_of!(CIntentParserResult, intent), PTR);
        assert_eq!(offset_of!(CIntentParserResult, slots), 2 * PTR);
        assert_eq!(size_of::<CIntentParserResult>(), 3 * PTR);
    }

    #[test]
    fn test_classifier_result_layout() {
        assert_eq!(offset_of!(CIntentClassifierResult, intent_name), 0);
        assert_eq!(offset_of!(CIntentClassifierResult, probability), PTR);
        assert_eq!(align_of::<CIntentClassifierResult>(), align_of::<*const c_char>());
    }

    #[test]
    fn test_slot_record_layout() {
        assert_eq!(offset_of!(CSlot, value), 0);
        assert_eq!(offset_of!(CSlot, range_start), PTR);
        assert_eq!(offset_of!(CSlot, range_end), PTR + 4);
        assert_eq!(offset_of!(CSlot, entity), PTR + 8);
        assert_eq!(offset_of!(CSlot, slot_name), 2 * PTR + 8);
    }

    #[test]
    fn test_tagged_entity_matches_slot_layout() {
        assert_eq!(size_of::<CTaggedEntity>(), size_of::<CSlot>());
        assert_eq!(offset_of!(CTaggedEntity, range_start), offset_of!(CSlot, range_start));
        assert_eq!(offset_of!(CTaggedEntity, range_end), offset_of!(CSlot, range_end));
        assert_eq!(offset_of!(CTaggedEntity, entity), offset_of!(CSlot, entity));
        assert_eq!(offset_of!(CTaggedEntity, slot_name), offset_of!(CSlot, slot_name));
    }

    #[test]
    fn test_list_descriptor_layout() {
        assert_eq!(offset_of!(CSlotList, slots), 0);
        assert_eq!(offset_of!(CSlotList, size), PTR);
        assert_eq!(offset_of!(CTaggedEntityList, entities), 0);
        assert_eq!(offset_of!(CTaggedEntityList, size), PTR);
    }

    #[test]
    fn test_status_codes() {
        assert!(is_ok(STATUS_OK));
        assert!(!is_ok(STATUS_KO));
        assert!(!is_ok(-1));
    }
}
