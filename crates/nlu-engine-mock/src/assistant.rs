//! Toy assistant model: keyword-scored intents and gazetteer slots
//!
//! A model bundle is a JSON document. On disk it is stored as
//! `assistant.json` inside the model directory; in memory the same bytes
//! are passed as the archive.
//!
//! ```json
//! {
//!   "language": "en",
//!   "intents": [{
//!     "name": "ActivateLightColor",
//!     "keywords": ["set", "color", "lights"],
//!     "slots": [{ "name": "objectColor", "entity": "color", "values": ["blue", "red"] }]
//!   }]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::MockError;

/// Name of the model file inside a model directory
pub const MODEL_FILE: &str = "assistant.json";

/// A loaded model bundle
#[derive(Debug, Clone, Deserialize)]
pub struct Assistant {
    /// Language code, informational only
    #[serde(default)]
    pub language: Option<String>,
    /// Known intents, in priority order for ties
    pub intents: Vec<IntentModel>,
}

/// One intent of the model
#[derive(Debug, Clone, Deserialize)]
pub struct IntentModel {
    /// Intent name reported to callers
    pub name: String,
    /// Words whose presence votes for this intent
    pub keywords: Vec<String>,
    /// Slots filled when this intent is recognized or tagged
    #[serde(default)]
    pub slots: Vec<SlotModel>,
}

/// One slot of an intent
#[derive(Debug, Clone, Deserialize)]
pub struct SlotModel {
    /// Slot name
    pub name: String,
    /// Entity type of the values
    pub entity: String,
    /// Accepted values, matched as whole words regardless of case
    pub values: Vec<String>,
    /// Value reported without a range when no value occurs in the input
    #[serde(default)]
    pub default: Option<String>,
}

/// A slot value found in (or defaulted for) an input
#[derive(Debug, Clone, PartialEq)]
pub struct SpanMatch {
    /// Matched value, or the slot default
    pub value: String,
    /// Character range `[start, end)` in the input
    pub range: Option<(usize, usize)>,
    /// Entity type of the slot
    pub entity: String,
    /// Slot the value belongs to
    pub slot_name: String,
}

/// Outcome of parsing one input
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// The parsed input
    pub input: String,
    /// Intent name and probability
    pub intent: Option<(String, f32)>,
    /// Slots of the recognized intent
    pub slots: Vec<SpanMatch>,
}

impl Assistant {
    /// Load `assistant.json` from a model directory
    pub fn from_dir(dir: &Path) -> Result<Self, MockError> {
        let path = dir.join(MODEL_FILE);
        let bytes = fs::read(&path).map_err(|source| MockError::Io { path, source })?;
        Self::from_bytes(&bytes)
    }

    /// Load a model from its serialized bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MockError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Classify `input` and fill the slots of the best intent
    pub fn parse(&self, input: &str) -> ParsedQuery {
        match self.classify(input) {
            Some((intent, probability)) => ParsedQuery {
                input: input.to_string(),
                intent: Some((intent.name.clone(), probability)),
                slots: extract_slots(intent, input),
            },
            None => ParsedQuery {
                input: input.to_string(),
                intent: None,
                slots: Vec::new(),
            },
        }
    }

    /// Fill the slots of `intent_name` for `input`
    pub fn tag(&self, input: &str, intent_name: &str) -> Result<Vec<SpanMatch>, MockError> {
        let intent = self
            .intents
            .iter()
            .find(|i| i.name == intent_name)
            .ok_or_else(|| MockError::UnknownIntent(intent_name.to_string()))?;
        Ok(extract_slots(intent, input))
    }

    /// Best intent by share of keywords present; earlier intents win ties
    fn classify(&self, input: &str) -> Option<(&IntentModel, f32)> {
        let tokens = tokenize(input);
        let mut best: Option<(&IntentModel, f32)> = None;

        for intent in &self.intents {
            if intent.keywords.is_empty() {
                continue;
            }
            let hits = intent
                .keywords
                .iter()
                .filter(|k| tokens.contains(&k.to_lowercase()))
                .count();
            if hits == 0 {
                continue;
            }
            let score = hits as f32 / intent.keywords.len() as f32;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((intent, score));
            }
        }

        best
    }
}

fn tokenize(input: &str) -> HashSet<String> {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// One lowercase char per input char, so indices stay character offsets
fn fold(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

fn extract_slots(intent: &IntentModel, input: &str) -> Vec<SpanMatch> {
    let chars: Vec<char> = input.chars().collect();
    let folded = fold(input);
    let mut matches = Vec::new();

    for slot in &intent.slots {
        let before = matches.len();
        for value in &slot.values {
            for start in find_words(&folded, &fold(value)) {
                let end = start + value.chars().count();
                matches.push(SpanMatch {
                    value: chars[start..end].iter().collect(),
                    range: Some((start, end)),
                    entity: slot.entity.clone(),
                    slot_name: slot.name.clone(),
                });
            }
        }
        if matches.len() == before {
            if let Some(default) = &slot.default {
                matches.push(SpanMatch {
                    value: default.clone(),
                    range: None,
                    entity: slot.entity.clone(),
                    slot_name: slot.name.clone(),
                });
            }
        }
    }

    // Stable: defaults keep their slot order after the located matches
    matches.sort_by_key(|m| m.range.map_or(usize::MAX, |(start, _)| start));
    matches
}

/// Start offsets where `needle` occurs in `haystack` as whole words
fn find_words(haystack: &[char], needle: &[char]) -> Vec<usize> {
    let n = needle.len();
    if n == 0 || n > haystack.len() {
        return Vec::new();
    }

    (0..=haystack.len() - n)
        .filter(|&i| haystack[i..i + n] == *needle)
        .filter(|&i| i == 0 || !haystack[i - 1].is_alphanumeric())
        .filter(|&i| i + n == haystack.len() || !haystack[i + n].is_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHTS: &str = r#"{
        "language": "en",
        "intents": [
            {
                "name": "ActivateLightColor",
                "keywords": ["set", "color", "lights", "change"],
                "slots": [
                    { "name": "objectColor", "entity": "color", "values": ["blue", "red"] },
                    { "name": "room", "entity": "room", "values": ["kitchen"], "default": "living room" }
                ]
            },
            {
                "name": "TurnLightsOff",
                "keywords": ["turn", "off", "lights"],
                "slots": []
            }
        ]
    }"#;

    fn assistant() -> Assistant {
        Assistant::from_bytes(LIGHTS.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_picks_best_intent() {
        let parsed = assistant().parse("Set the color of the lights to blue");
        assert_eq!(parsed.intent, Some(("ActivateLightColor".to_string(), 0.75)));
        assert_eq!(parsed.slots.len(), 2);
        assert_eq!(parsed.slots[0].value, "blue");
        assert_eq!(parsed.slots[0].range, Some((31, 35)));
        assert_eq!(parsed.slots[1].value, "living room");
        assert_eq!(parsed.slots[1].range, None);
    }

    #[test]
    fn test_parse_without_intent() {
        let parsed = assistant().parse("What time is it?");
        assert_eq!(parsed.intent, None);
        assert!(parsed.slots.is_empty());
    }

    #[test]
    fn test_values_match_whole_words_only() {
        let parsed = assistant().parse("Change the lights to reddish");
        assert!(parsed.slots.iter().all(|s| s.value != "red"));
    }

    #[test]
    fn test_ranges_are_character_offsets() {
        let found = assistant().tag("Mets la lumière en Blue", "ActivateLightColor").unwrap();
        assert_eq!(found[0].value, "Blue");
        assert_eq!(found[0].range, Some((19, 23)));
    }

    #[test]
    fn test_tag_unknown_intent() {
        let err = assistant().tag("anything", "OrderCoffee").unwrap_err();
        assert_eq!(err.to_string(), "Unknown intent 'OrderCoffee'");
    }

    #[test]
    fn test_corrupt_model() {
        let err = Assistant::from_bytes(b"PK\x03\x04 definitely not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid model archive"));
    }
}
