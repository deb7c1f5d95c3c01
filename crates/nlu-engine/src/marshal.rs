//! Decoding of native result records
//!
//! Each decoder reads one field at a time in declared order, checks pointers
//! before following them and copies every string out. None of them releases
//! anything: the caller holds the top-level record in a guard that runs the
//! record's destroy function afterwards.

use std::os::raw::{c_char, c_int};

use nlu_engine_sys::{
    CIntentClassifierResult, CIntentParserResult, CSlot, CSlotList, CTaggedEntity,
    CTaggedEntityList, NO_RANGE,
};

use crate::error::{Error, Result};
use crate::memory::copy_c_str;
use crate::model::{IntentClassifierResult, IntentParserResult, Range, Slot, TaggedEntity};

/// Decode the record returned by `nlu_engine_run_parse`
///
/// # Safety
/// Every non-null pointer reachable from `raw` must point to live memory
/// laid out as declared in `nlu_engine_sys`.
pub(crate) unsafe fn decode_parser_result(raw: &CIntentParserResult) -> Result<IntentParserResult> {
    let input = copy_c_str(raw.input, "input")?;

    let intent = match raw.intent.as_ref() {
        Some(intent) => Some(decode_intent(intent)?),
        None => None,
    };

    let slots = match raw.slots.as_ref() {
        Some(list) => decode_slot_list(list)?,
        None => Vec::new(),
    };

    Ok(IntentParserResult {
        input,
        intent,
        slots,
    })
}

/// Decode the record returned by `nlu_engine_run_tag`
///
/// # Safety
/// Same contract as [`decode_parser_result`].
pub(crate) unsafe fn decode_tagged_entity_list(raw: &CTaggedEntityList) -> Result<Vec<TaggedEntity>> {
    decode_records(raw.entities, raw.size, "tagged entities", |e| unsafe {
        decode_tagged_entity(e)
    })
}

unsafe fn decode_intent(raw: &CIntentClassifierResult) -> Result<IntentClassifierResult> {
    let intent_name = copy_c_str(raw.intent_name, "intent_name")?;
    let probability = raw.probability;
    if !(0.0..=1.0).contains(&probability) {
        return Err(Error::protocol(format!(
            "probability {} of intent '{}' is outside [0, 1]",
            probability, intent_name
        )));
    }

    Ok(IntentClassifierResult {
        intent_name,
        probability,
    })
}

unsafe fn decode_slot_list(raw: &CSlotList) -> Result<Vec<Slot>> {
    decode_records(raw.slots, raw.size, "slots", |s| unsafe { decode_slot(s) })
}

unsafe fn decode_slot(raw: &CSlot) -> Result<Slot> {
    let span = decode_span(raw.value, raw.range_start, raw.range_end, raw.entity, raw.slot_name)?;
    Ok(Slot {
        value: span.value,
        range: span.range,
        entity: span.entity,
        slot_name: span.slot_name,
    })
}

unsafe fn decode_tagged_entity(raw: &CTaggedEntity) -> Result<TaggedEntity> {
    let span = decode_span(raw.value, raw.range_start, raw.range_end, raw.entity, raw.slot_name)?;
    Ok(TaggedEntity {
        value: span.value,
        range: span.range,
        entity: span.entity,
        slot_name: span.slot_name,
    })
}

/// Fields shared by slot and tagged entity records
struct Span {
    value: String,
    range: Option<Range>,
    entity: String,
    slot_name: String,
}

unsafe fn decode_span(
    value: *const c_char,
    range_start: c_int,
    range_end: c_int,
    entity: *const c_char,
    slot_name: *const c_char,
) -> Result<Span> {
    Ok(Span {
        value: copy_c_str(value, "value")?,
        range: decode_range(range_start, range_end)?,
        entity: copy_c_str(entity, "entity")?,
        slot_name: copy_c_str(slot_name, "slot_name")?,
    })
}

/// Walk `size` contiguous records starting at `ptr`
///
/// `size <= 0` yields an empty list without looking at `ptr`.
///
/// # Safety
/// When `size > 0` and `ptr` is non-null, `ptr` must point to `size`
/// initialized records.
pub(crate) unsafe fn decode_records<R, T>(
    ptr: *const R,
    size: c_int,
    what: &str,
    decode: impl Fn(&R) -> Result<T>,
) -> Result<Vec<T>> {
    if size <= 0 {
        return Ok(Vec::new());
    }
    if ptr.is_null() {
        return Err(Error::protocol(format!(
            "{} pointer is null but size is {}",
            what, size
        )));
    }

    std::slice::from_raw_parts(ptr, size as usize)
        .iter()
        .map(decode)
        .collect()
}

/// Decode a wire range; `start == -1` means no range
pub(crate) fn decode_range(start: c_int, end: c_int) -> Result<Option<Range>> {
    if start == NO_RANGE {
        return Ok(None);
    }
    if start < 0 {
        return Err(Error::protocol(format!("invalid range start {}", start)));
    }
    if end < start {
        return Err(Error::protocol(format!(
            "range end {} is before start {}",
            end, start
        )));
    }

    Ok(Some(Range {
        start: start as usize,
        end: end as usize,
    }))
}
