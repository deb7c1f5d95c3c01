//! Memory management for values handed across the ABI
//!
//! Everything allocated here is released by exactly one of the exported
//! destroy functions. Result graphs are converted to owned C strings first,
//! so a conversion error never leaves a half-leaked graph behind.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

use nlu_engine_sys::{
    CIntentClassifierResult, CIntentParserResult, CSlot, CSlotList, CTaggedEntity,
    CTaggedEntityList, NO_RANGE,
};

use crate::assistant::{ParsedQuery, SpanMatch};
use crate::error::MockError;
use crate::stats;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Set the last error message for the current thread
pub fn set_last_error<S: Into<String>>(err: S) {
    stats::record(|s| s.errors_raised += 1);
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(err.into()));
}

/// Remove and return the last error message of the current thread
pub fn take_last_error() -> Option<String> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Allocate a standalone string; released by `nlu_engine_destroy_string`
pub fn allocate_string(s: &str) -> Result<*mut c_char, MockError> {
    let raw = CString::new(s)?.into_raw();
    stats::record(|s| s.strings_allocated += 1);
    Ok(raw)
}

/// Release a string from [`allocate_string`]
///
/// # Safety
/// `s` must come from [`allocate_string`] and not have been released yet.
pub unsafe fn free_string(s: *mut c_char) {
    drop(CString::from_raw(s));
    stats::record(|s| s.strings_destroyed += 1);
}

/// Convert a caller C string to a Rust string
///
/// # Safety
/// `s` must be a valid NUL-terminated string.
pub unsafe fn c_str_to_string(s: *const c_char, what: &'static str) -> Result<String, MockError> {
    if s.is_null() {
        return Err(MockError::NullPointer(what));
    }
    CStr::from_ptr(s)
        .to_str()
        .map(str::to_owned)
        .map_err(|source| MockError::Utf8 { what, source })
}

/// Slot or entity fields converted to C strings, not yet leaked
struct OwnedSpan {
    value: CString,
    range: (c_int, c_int),
    entity: CString,
    slot_name: CString,
}

impl OwnedSpan {
    fn new(span: &SpanMatch) -> Result<Self, MockError> {
        let range = match span.range {
            Some((start, end)) => (to_c_int(start)?, to_c_int(end)?),
            None => (NO_RANGE, NO_RANGE),
        };
        Ok(Self {
            value: CString::new(span.value.as_str())?,
            range,
            entity: CString::new(span.entity.as_str())?,
            slot_name: CString::new(span.slot_name.as_str())?,
        })
    }

    fn into_slot(self) -> CSlot {
        CSlot {
            value: self.value.into_raw(),
            range_start: self.range.0,
            range_end: self.range.1,
            entity: self.entity.into_raw(),
            slot_name: self.slot_name.into_raw(),
        }
    }

    fn into_tagged_entity(self) -> CTaggedEntity {
        CTaggedEntity {
            value: self.value.into_raw(),
            range_start: self.range.0,
            range_end: self.range.1,
            entity: self.entity.into_raw(),
            slot_name: self.slot_name.into_raw(),
        }
    }
}

fn to_c_int(offset: usize) -> Result<c_int, MockError> {
    c_int::try_from(offset).map_err(|_| MockError::OffsetOverflow(offset))
}

/// Leak `records` as a contiguous array; empty vectors become null
fn leak_array<T>(records: Vec<T>) -> *const T {
    if records.is_empty() {
        return ptr::null();
    }
    Box::into_raw(records.into_boxed_slice()) as *const T
}

unsafe fn free_array<T>(ptr: *const T, size: c_int) -> Vec<T> {
    if ptr.is_null() || size <= 0 {
        return Vec::new();
    }
    let slice = ptr::slice_from_raw_parts_mut(ptr as *mut T, size as usize);
    Box::from_raw(slice).into_vec()
}

unsafe fn free_c_string(s: *const c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s as *mut c_char));
    }
}

/// Build the record graph returned by `nlu_engine_run_parse`
pub fn allocate_parser_result(parsed: ParsedQuery) -> Result<*mut CIntentParserResult, MockError> {
    let input = CString::new(parsed.input)?;
    let intent = match parsed.intent {
        Some((name, probability)) => Some((CString::new(name)?, probability)),
        None => None,
    };
    let spans = parsed
        .slots
        .iter()
        .map(OwnedSpan::new)
        .collect::<Result<Vec<_>, _>>()?;
    let size = to_c_int(spans.len())?;

    // Nothing below can fail
    let intent = match intent {
        Some((name, probability)) => Box::into_raw(Box::new(CIntentClassifierResult {
            intent_name: name.into_raw(),
            probability,
        })) as *const CIntentClassifierResult,
        None => ptr::null(),
    };
    let slots = if spans.is_empty() {
        ptr::null()
    } else {
        let records: Vec<CSlot> = spans.into_iter().map(OwnedSpan::into_slot).collect();
        let slots = leak_array(records);
        Box::into_raw(Box::new(CSlotList { slots, size })) as *const CSlotList
    };

    stats::record(|s| s.results_allocated += 1);
    Ok(Box::into_raw(Box::new(CIntentParserResult {
        input: input.into_raw(),
        intent,
        slots,
    })))
}

/// Release a graph from [`allocate_parser_result`]
///
/// # Safety
/// `result` must come from [`allocate_parser_result`] and not have been
/// released yet.
pub unsafe fn free_parser_result(result: *mut CIntentParserResult) {
    let result = Box::from_raw(result);
    free_c_string(result.input);

    if !result.intent.is_null() {
        let intent = Box::from_raw(result.intent as *mut CIntentClassifierResult);
        free_c_string(intent.intent_name);
    }

    if !result.slots.is_null() {
        let list = Box::from_raw(result.slots as *mut CSlotList);
        for slot in free_array(list.slots, list.size) {
            free_c_string(slot.value);
            free_c_string(slot.entity);
            free_c_string(slot.slot_name);
        }
    }

    stats::record(|s| s.results_destroyed += 1);
}

/// Build the record graph returned by `nlu_engine_run_tag`
pub fn allocate_entity_list(entities: &[SpanMatch]) -> Result<*mut CTaggedEntityList, MockError> {
    let spans = entities
        .iter()
        .map(OwnedSpan::new)
        .collect::<Result<Vec<_>, _>>()?;
    let size = to_c_int(spans.len())?;
    let records: Vec<CTaggedEntity> = spans
        .into_iter()
        .map(OwnedSpan::into_tagged_entity)
        .collect();
    let entities = leak_array(records);

    stats::record(|s| s.results_allocated += 1);
    Ok(Box::into_raw(Box::new(CTaggedEntityList { entities, size })))
}

/// Release a graph from [`allocate_entity_list`]
///
/// # Safety
/// `list` must come from [`allocate_entity_list`] and not have been released
/// yet.
pub unsafe fn free_entity_list(list: *mut CTaggedEntityList) {
    let list = Box::from_raw(list);
    for entity in free_array(list.entities, list.size) {
        free_c_string(entity.value);
        free_c_string(entity.entity);
        free_c_string(entity.slot_name);
    }
    stats::record(|s| s.results_destroyed += 1);
}
