//! The document store: accounts and their word and album collections.
//!
//! Everything lives in memory and is written back to a single JSON file
//! after each mutation (temp file plus rename). A missing file simply
//! means an empty store.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Album, WordDoc, WordDraft};
use crate::protocol::{validate_album_name, validate_email, validate_password};

/// Error loading or persisting the store file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt store file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Error signing up or signing in.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Invalid(&'static str),

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    BadCredentials,
}

/// Error applying a write for an authenticated account.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("{0}")]
    InvalidName(&'static str),

    #[error("Album not found")]
    AlbumNotFound,
}

#[derive(Debug, Serialize, Deserialize)]
struct Account {
    id: Uuid,
    email: String,
    salt: String,
    password_hash: String,
    words: HashMap<Uuid, WordDoc>,
    albums: HashMap<Uuid, Album>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    accounts: Vec<Account>,
}

/// The store, bound to its backing file.
pub struct Store {
    path: PathBuf,
    accounts: HashMap<Uuid, Account>,
}

impl Store {
    /// Load the store from `path`; a missing file yields an empty store.
    pub fn load(path: PathBuf) -> Result<Self, StoreError> {
        let accounts = match fs::read_to_string(&path) {
            Ok(contents) => {
                let data: StoreData = serde_json::from_str(&contents)?;
                data.accounts.into_iter().map(|a| (a.id, a)).collect()
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, accounts })
    }

    /// Write the store back to its file via a temp file and rename.
    pub fn persist(&self) -> Result<(), StoreError> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.email.cmp(&b.email));

        #[derive(Serialize)]
        struct StoreDataRef<'a> {
            accounts: Vec<&'a Account>,
        }

        let json = serde_json::to_string_pretty(&StoreDataRef { accounts })?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Email of the given account, if it exists.
    pub fn email(&self, user: Uuid) -> Option<&str> {
        self.accounts.get(&user).map(|a| a.email.as_str())
    }

    /// Create an account. The email is trimmed and lowercased.
    pub fn sign_up(&mut self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        validate_email(email).map_err(AuthError::Invalid)?;
        validate_password(password).map_err(AuthError::Invalid)?;

        let email = normalize_email(email);
        if self.accounts.values().any(|a| a.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let salt = generate_salt();
        let password_hash = hash_password(&salt, password);
        let id = Uuid::new_v4();
        self.accounts.insert(
            id,
            Account {
                id,
                email,
                salt,
                password_hash,
                words: HashMap::new(),
                albums: HashMap::new(),
            },
        );

        Ok(id)
    }

    /// Check credentials. The error never says which part was wrong.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        let email = normalize_email(email);
        let account = self
            .accounts
            .values()
            .find(|a| a.email == email)
            .ok_or(AuthError::BadCredentials)?;

        if hash_password(&account.salt, password) != account.password_hash {
            return Err(AuthError::BadCredentials);
        }

        Ok(account.id)
    }

    /// All words of the account, sorted by word text.
    pub fn words_snapshot(&self, user: Uuid) -> Vec<WordDoc> {
        let Some(account) = self.accounts.get(&user) else {
            return Vec::new();
        };
        let mut words: Vec<WordDoc> = account.words.values().cloned().collect();
        words.sort_by(|a, b| a.word.cmp(&b.word));
        words
    }

    /// All albums of the account, sorted by name.
    pub fn albums_snapshot(&self, user: Uuid) -> Vec<Album> {
        let Some(account) = self.accounts.get(&user) else {
            return Vec::new();
        };
        let mut albums: Vec<Album> = account.albums.values().cloned().collect();
        albums.sort_by(|a, b| a.name.cmp(&b.name));
        albums
    }

    /// Store a new word document, returning its assigned id.
    pub fn add_word(&mut self, user: Uuid, draft: WordDraft) -> Option<Uuid> {
        let account = self.accounts.get_mut(&user)?;
        let id = Uuid::new_v4();
        account.words.insert(id, draft.into_doc(id));
        Some(id)
    }

    /// Delete the given words outright. Unknown ids are ignored.
    pub fn delete_words(&mut self, user: Uuid, ids: &[Uuid]) {
        if let Some(account) = self.accounts.get_mut(&user) {
            for id in ids {
                account.words.remove(id);
            }
        }
    }

    /// Remove `album_id` from each of the given words' album sets.
    pub fn remove_words_from_album(&mut self, user: Uuid, ids: &[Uuid], album_id: Uuid) {
        if let Some(account) = self.accounts.get_mut(&user) {
            for id in ids {
                if let Some(word) = account.words.get_mut(id) {
                    word.albums.retain(|a| *a != album_id);
                }
            }
        }
    }

    /// Create an album, returning its assigned id.
    pub fn create_album(&mut self, user: Uuid, name: &str) -> Result<Uuid, WriteError> {
        validate_album_name(name).map_err(WriteError::InvalidName)?;
        let account = self.accounts.get_mut(&user).ok_or(WriteError::AlbumNotFound)?;

        let id = Uuid::new_v4();
        account.albums.insert(
            id,
            Album {
                id,
                name: name.trim().to_string(),
            },
        );
        Ok(id)
    }

    /// Field-level rename of an album.
    pub fn rename_album(&mut self, user: Uuid, id: Uuid, name: &str) -> Result<(), WriteError> {
        validate_album_name(name).map_err(WriteError::InvalidName)?;
        let account = self.accounts.get_mut(&user).ok_or(WriteError::AlbumNotFound)?;
        let album = account.albums.get_mut(&id).ok_or(WriteError::AlbumNotFound)?;
        album.name = name.trim().to_string();
        Ok(())
    }

    /// Delete an album, either deleting its member words or stripping the
    /// album id from them. Applied as one in-memory batch.
    pub fn delete_album(
        &mut self,
        user: Uuid,
        id: Uuid,
        delete_words: bool,
    ) -> Result<(), WriteError> {
        let account = self.accounts.get_mut(&user).ok_or(WriteError::AlbumNotFound)?;
        if account.albums.remove(&id).is_none() {
            return Err(WriteError::AlbumNotFound);
        }

        if delete_words {
            account.words.retain(|_, w| !w.in_album(id));
        } else {
            for word in account.words.values_mut() {
                word.albums.retain(|a| *a != id);
            }
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    to_hex(&bytes)
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> Store {
        let path = std::env::temp_dir().join(format!("wordbook-test-{}.json", Uuid::new_v4()));
        Store::load(path).unwrap()
    }

    fn draft(text: &str, albums: Vec<Uuid>) -> WordDraft {
        WordDraft {
            word: text.to_string(),
            definition: format!("definition of {}", text),
            part_of_speech: "noun".to_string(),
            synonyms: vec!["synonym".to_string()],
            antonyms: Vec::new(),
            notes: String::new(),
            albums,
        }
    }

    #[test]
    fn test_sign_up_and_sign_in() {
        let mut store = temp_store();
        let id = store.sign_up("Me@Example.com", "secret").unwrap();

        assert_eq!(store.email(id), Some("me@example.com"));
        assert_eq!(store.sign_in("me@example.com", "secret"), Ok(id));
        assert_eq!(
            store.sign_in("me@example.com", "wrong"),
            Err(AuthError::BadCredentials)
        );
        assert_eq!(
            store.sign_in("other@example.com", "secret"),
            Err(AuthError::BadCredentials)
        );
    }

    #[test]
    fn test_sign_up_rejections() {
        let mut store = temp_store();
        assert_eq!(
            store.sign_up("not-an-email", "secret"),
            Err(AuthError::Invalid("Invalid email address"))
        );
        assert_eq!(
            store.sign_up("a@b.com", "short"),
            Err(AuthError::Invalid("Password must be at least 6 characters"))
        );

        store.sign_up("a@b.com", "secret").unwrap();
        assert_eq!(
            store.sign_up("A@B.COM", "secret2"),
            Err(AuthError::EmailTaken)
        );
    }

    #[test]
    fn test_words_snapshot_sorted() {
        let mut store = temp_store();
        let user = store.sign_up("a@b.com", "secret").unwrap();

        store.add_word(user, draft("zeal", Vec::new())).unwrap();
        store.add_word(user, draft("abate", Vec::new())).unwrap();
        store.add_word(user, draft("mire", Vec::new())).unwrap();

        let words: Vec<String> = store
            .words_snapshot(user)
            .into_iter()
            .map(|w| w.word)
            .collect();
        assert_eq!(words, vec!["abate", "mire", "zeal"]);
    }

    #[test]
    fn test_delete_words() {
        let mut store = temp_store();
        let user = store.sign_up("a@b.com", "secret").unwrap();

        let keep = store.add_word(user, draft("keep", Vec::new())).unwrap();
        let gone = store.add_word(user, draft("gone", Vec::new())).unwrap();

        store.delete_words(user, &[gone, Uuid::new_v4()]);

        let words = store.words_snapshot(user);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].id, keep);
    }

    #[test]
    fn test_album_membership() {
        let mut store = temp_store();
        let user = store.sign_up("a@b.com", "secret").unwrap();

        let album = store.create_album(user, "GRE").unwrap();
        let inside = store.add_word(user, draft("inside", vec![album])).unwrap();
        store.add_word(user, draft("outside", Vec::new())).unwrap();

        let member_words: Vec<Uuid> = store
            .words_snapshot(user)
            .into_iter()
            .filter(|w| w.in_album(album))
            .map(|w| w.id)
            .collect();
        assert_eq!(member_words, vec![inside]);

        // Keep the word, drop the membership.
        store.remove_words_from_album(user, &[inside], album);
        let words = store.words_snapshot(user);
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| !w.in_album(album)));
    }

    #[test]
    fn test_album_create_and_rename_validation() {
        let mut store = temp_store();
        let user = store.sign_up("a@b.com", "secret").unwrap();

        assert!(matches!(
            store.create_album(user, "   "),
            Err(WriteError::InvalidName(_))
        ));

        let album = store.create_album(user, "  Travel  ").unwrap();
        assert_eq!(store.albums_snapshot(user)[0].name, "Travel");

        store.rename_album(user, album, "Trips").unwrap();
        assert_eq!(store.albums_snapshot(user)[0].name, "Trips");

        assert_eq!(
            store.rename_album(user, Uuid::new_v4(), "Nope"),
            Err(WriteError::AlbumNotFound)
        );
    }

    #[test]
    fn test_delete_album_keeping_words() {
        let mut store = temp_store();
        let user = store.sign_up("a@b.com", "secret").unwrap();

        let album = store.create_album(user, "GRE").unwrap();
        store.add_word(user, draft("abate", vec![album])).unwrap();

        store.delete_album(user, album, false).unwrap();

        assert!(store.albums_snapshot(user).is_empty());
        let words = store.words_snapshot(user);
        assert_eq!(words.len(), 1);
        assert!(words[0].albums.is_empty());
    }

    #[test]
    fn test_delete_album_with_words() {
        let mut store = temp_store();
        let user = store.sign_up("a@b.com", "secret").unwrap();

        let album = store.create_album(user, "GRE").unwrap();
        store.add_word(user, draft("abate", vec![album])).unwrap();
        store.add_word(user, draft("zeal", Vec::new())).unwrap();

        store.delete_album(user, album, true).unwrap();

        assert!(store.albums_snapshot(user).is_empty());
        let words = store.words_snapshot(user);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "zeal");

        assert_eq!(
            store.delete_album(user, album, true),
            Err(WriteError::AlbumNotFound)
        );
    }

    #[test]
    fn test_persist_and_reload() {
        let path = std::env::temp_dir().join(format!("wordbook-test-{}.json", Uuid::new_v4()));

        let mut store = Store::load(path.clone()).unwrap();
        let user = store.sign_up("a@b.com", "secret").unwrap();
        let album = store.create_album(user, "GRE").unwrap();
        store.add_word(user, draft("abate", vec![album])).unwrap();
        store.persist().unwrap();

        let reloaded = Store::load(path.clone()).unwrap();
        assert_eq!(reloaded.account_count(), 1);
        assert_eq!(reloaded.sign_in("a@b.com", "secret"), Ok(user));
        let words = reloaded.words_snapshot(user);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "abate");
        assert!(words[0].in_album(album));

        let _ = fs::remove_file(path);
    }
}
