//! Protocol messages for client-server communication.
//!
//! All messages are serialized as JSON over WebSocket.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Album, WordDoc, WordDraft};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Create an account and sign in.
    SignUp { email: String, password: String },

    /// Sign in to an existing account.
    SignIn { email: String, password: String },

    /// End the authenticated session, keeping the connection open.
    SignOut,

    /// Store a new word document.
    AddWord { draft: WordDraft },

    /// Delete the given word documents outright.
    DeleteWords { ids: Vec<Uuid> },

    /// Remove an album id from each of the given words. The words survive.
    RemoveWordsFromAlbum { ids: Vec<Uuid>, album_id: Uuid },

    /// Create a new, empty album.
    CreateAlbum { name: String },

    /// Change an album's name.
    RenameAlbum { id: Uuid, name: String },

    /// Delete an album. With `delete_words` the member words are deleted
    /// too; otherwise they only lose the album id.
    DeleteAlbum { id: Uuid, delete_words: bool },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Connection accepted, waiting for SignUp or SignIn.
    ConnectionAck,

    /// Authentication succeeded; snapshots follow.
    AuthAccepted { email: String },

    /// Authentication failed.
    AuthRejected { reason: String },

    /// Full word collection for the signed-in account, sorted by word text.
    WordsSnapshot { words: Vec<WordDoc> },

    /// Full album collection for the signed-in account, sorted by name.
    AlbumsSnapshot { albums: Vec<Album> },

    /// A write was rejected or failed.
    WriteFailed { reason: String },

    /// Sign-out acknowledged.
    SignedOut,

    /// Server is shutting down.
    ServerClosing,
}

/// Minimum password length accepted at sign-up.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Maximum length of an album name.
pub const ALBUM_NAME_MAX_LENGTH: usize = 75;

/// Default server port.
pub const DEFAULT_PORT: u16 = 8931;

/// Validates an email address for account creation.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err("Email cannot be blank");
    }

    // Enough to catch typos; real verification is out of scope.
    let Some(at) = trimmed.find('@') else {
        return Err("Invalid email address");
    };
    if at == 0 || at == trimmed.len() - 1 {
        return Err("Invalid email address");
    }

    Ok(())
}

/// Validates a password for account creation.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < PASSWORD_MIN_LENGTH {
        return Err("Password must be at least 6 characters");
    }

    Ok(())
}

/// Validates an album name for creation or rename.
pub fn validate_album_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("Name cannot be blank");
    }

    if trimmed.chars().count() > ALBUM_NAME_MAX_LENGTH {
        return Err("Name must be at most 75 characters");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("  a@b.com  ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("nodomain").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok()); // 6 chars
        assert!(validate_password("shrt").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_album_name() {
        assert!(validate_album_name("Travel words").is_ok());
        assert!(validate_album_name("   ").is_err());
        assert!(validate_album_name(&"x".repeat(75)).is_ok());
        assert!(validate_album_name(&"x".repeat(76)).is_err());
    }

    #[test]
    fn test_message_serialization() {
        let msg = ClientMessage::SignIn {
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"SignIn\""));

        let msg = ServerMessage::AuthRejected {
            reason: "Invalid email or password".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"AuthRejected\""));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let album = crate::models::Album {
            id: Uuid::new_v4(),
            name: "GRE".to_string(),
        };
        let msg = ServerMessage::AlbumsSnapshot {
            albums: vec![album.clone()],
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ServerMessage = serde_json::from_str(&json).unwrap();
        match back {
            ServerMessage::AlbumsSnapshot { albums } => assert_eq!(albums, vec![album]),
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
