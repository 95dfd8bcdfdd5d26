//! Persistent document types shared by client and server.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grouping of words. Works like a tag: a word can belong to any
/// number of albums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: Uuid,
    pub name: String,
}

/// A stored vocabulary word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDoc {
    pub id: Uuid,
    pub word: String,
    pub definition: String,
    pub part_of_speech: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub notes: String,
    /// Ids of the albums this word belongs to.
    pub albums: Vec<Uuid>,
}

impl WordDoc {
    /// Whether the word is a member of the given album.
    pub fn in_album(&self, album_id: Uuid) -> bool {
        self.albums.contains(&album_id)
    }
}

/// A word as submitted by a client. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDraft {
    pub word: String,
    pub definition: String,
    pub part_of_speech: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub notes: String,
    pub albums: Vec<Uuid>,
}

impl WordDraft {
    /// Attach the server-assigned id, producing the stored document.
    pub fn into_doc(self, id: Uuid) -> WordDoc {
        WordDoc {
            id,
            word: self.word,
            definition: self.definition,
            part_of_speech: self.part_of_speech,
            synonyms: self.synonyms,
            antonyms: self.antonyms,
            notes: self.notes,
            albums: self.albums,
        }
    }
}
