//! Wire protocol between client and server.

mod messages;

pub use messages::{
    validate_album_name, validate_email, validate_password, ClientMessage, ServerMessage,
    ALBUM_NAME_MAX_LENGTH, DEFAULT_PORT, PASSWORD_MIN_LENGTH,
};
