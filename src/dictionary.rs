//! Lookup against the free dictionaryapi.dev service.
//!
//! The service returns an array of entries; we take the first entry and
//! offer one candidate per meaning: the meaning's part of speech, its
//! first definition, and the meaning-level synonym/antonym lists.

use serde::Deserialize;
use thiserror::Error;

const API_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Error performing a dictionary lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("no definitions found")]
    NoDefinitions,
}

/// One selectable definition for a looked-up word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionCandidate {
    pub part_of_speech: String,
    pub definition: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(rename = "partOfSpeech")]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<DefinitionBody>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DefinitionBody {
    definition: String,
}

/// Fetch candidate definitions for `word`.
pub async fn lookup(
    client: &reqwest::Client,
    word: &str,
) -> Result<Vec<DefinitionCandidate>, LookupError> {
    let url = format!("{}{}", API_BASE, word.trim());
    let resp = client.get(&url).send().await?.error_for_status()?;
    let entries: Vec<Entry> = resp.json().await?;

    let candidates = candidates_from_entries(entries);
    if candidates.is_empty() {
        return Err(LookupError::NoDefinitions);
    }

    Ok(candidates)
}

fn candidates_from_entries(entries: Vec<Entry>) -> Vec<DefinitionCandidate> {
    let Some(first) = entries.into_iter().next() else {
        return Vec::new();
    };

    first
        .meanings
        .into_iter()
        .filter_map(|meaning| {
            let definition = meaning.definitions.into_iter().next()?.definition;
            Some(DefinitionCandidate {
                part_of_speech: meaning.part_of_speech,
                definition,
                synonyms: meaning.synonyms,
                antonyms: meaning.antonyms,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
      {
        "word": "ebb",
        "meanings": [
          {
            "partOfSpeech": "noun",
            "definitions": [
              {"definition": "The receding movement of the tide.", "synonyms": [], "antonyms": []},
              {"definition": "A gradual decline.", "synonyms": [], "antonyms": []}
            ],
            "synonyms": ["decline"],
            "antonyms": ["flood"]
          },
          {
            "partOfSpeech": "verb",
            "definitions": [
              {"definition": "To flow back or recede."}
            ],
            "synonyms": [],
            "antonyms": []
          },
          {
            "partOfSpeech": "adjective",
            "definitions": []
          }
        ]
      },
      {
        "word": "ebb",
        "meanings": [
          {"partOfSpeech": "noun", "definitions": [{"definition": "ignored second entry"}]}
        ]
      }
    ]"#;

    #[test]
    fn test_first_entry_one_candidate_per_meaning() {
        let entries: Vec<Entry> = serde_json::from_str(SAMPLE).unwrap();
        let candidates = candidates_from_entries(entries);

        // Third meaning has no definitions and is skipped; the second
        // entry is ignored entirely.
        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].part_of_speech, "noun");
        assert_eq!(
            candidates[0].definition,
            "The receding movement of the tide."
        );
        assert_eq!(candidates[0].synonyms, vec!["decline"]);
        assert_eq!(candidates[0].antonyms, vec!["flood"]);

        assert_eq!(candidates[1].part_of_speech, "verb");
        assert_eq!(candidates[1].definition, "To flow back or recede.");
        assert!(candidates[1].synonyms.is_empty());
    }

    #[test]
    fn test_empty_response_yields_no_candidates() {
        let candidates = candidates_from_entries(Vec::new());
        assert!(candidates.is_empty());
    }
}
