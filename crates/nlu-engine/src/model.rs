//! Owned value objects decoded from engine results

use serde::{Deserialize, Serialize};

/// Half-open character interval `[start, end)` over the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// First character covered
    pub start: usize,
    /// One past the last character covered
    pub end: usize,
}

impl Range {
    /// Number of characters covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the range covers no character
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when both ranges share at least one character
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Characters of `text` covered by this range
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        let mut indices = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()));
        let start = indices.nth(self.start)?;
        let end = if self.is_empty() {
            start
        } else {
            indices.nth(self.len() - 1)?
        };
        text.get(start..end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    fn from(range: Range) -> Self {
        range.start..range.end
    }
}

/// A slot filled while parsing an input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Text of the slot value
    pub value: String,
    /// Where the value occurs in the input, if it occurs literally
    pub range: Option<Range>,
    /// Entity type of the value
    pub entity: String,
    /// Name of the slot in the intent
    pub slot_name: String,
}

/// An entity found while tagging an input against a given intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedEntity {
    /// Text of the entity
    pub value: String,
    /// Where the entity occurs in the input, if it occurs literally
    pub range: Option<Range>,
    /// Entity type
    pub entity: String,
    /// Slot the entity fills
    pub slot_name: String,
}

impl TaggedEntity {
    /// True when `slot` covers the same span with the same entity type
    pub fn matches_slot(&self, slot: &Slot) -> bool {
        self.range == slot.range && self.entity == slot.entity && self.slot_name == slot.slot_name
    }
}

/// Classified intent of an input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassifierResult {
    /// Name of the intent
    pub intent_name: String,
    /// Classification probability in `[0, 1]`
    pub probability: f32,
}

/// Full result of parsing an input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentParserResult {
    /// The parsed input
    pub input: String,
    /// Recognized intent, `None` when nothing matched
    pub intent: Option<IntentClassifierResult>,
    /// Slots in the order reported by the engine
    pub slots: Vec<Slot>,
}

impl IntentParserResult {
    /// Name of the recognized intent
    pub fn intent_name(&self) -> Option<&str> {
        self.intent.as_ref().map(|i| i.intent_name.as_str())
    }

    /// Slots whose entity type is `entity`
    pub fn slots_for_entity<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a Slot> + 'a {
        self.slots.iter().filter(move |s| s.entity == entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_slice_counts_characters() {
        let text = "café au lait";
        let range = Range { start: 5, end: 7 };
        assert_eq!(range.slice(text), Some("au"));
        assert_eq!(Range { start: 0, end: 4 }.slice(text), Some("café"));
        assert_eq!(Range { start: 8, end: 12 }.slice(text), Some("lait"));
        assert_eq!(Range { start: 8, end: 13 }.slice(text), None);
        assert_eq!(Range { start: 3, end: 3 }.slice(text), Some(""));
    }

    #[test]
    fn test_range_overlap() {
        let a = Range { start: 0, end: 4 };
        assert!(a.overlaps(&Range { start: 3, end: 6 }));
        assert!(!a.overlaps(&Range { start: 4, end: 6 }));
        assert_eq!(a.len(), 4);
        assert_eq!(std::ops::Range::from(a), 0..4);
    }

    #[test]
    fn test_tagged_entity_matches_slot() {
        let slot = Slot {
            value: "blue".to_string(),
            range: Some(Range { start: 30, end: 34 }),
            entity: "color".to_string(),
            slot_name: "objectColor".to_string(),
        };
        let entity = TaggedEntity {
            value: "blue".to_string(),
            range: Some(Range { start: 30, end: 34 }),
            entity: "color".to_string(),
            slot_name: "objectColor".to_string(),
        };
        assert!(entity.matches_slot(&slot));

        let moved = TaggedEntity {
            range: Some(Range { start: 0, end: 4 }),
            ..entity
        };
        assert!(!moved.matches_slot(&slot));
    }
}
