//! WebSocket server implementation.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use crate::protocol::{ClientMessage, ServerMessage};

use super::store::Store;

/// Shared server state wrapped in Arc<Mutex> for async access.
type SharedState = Arc<Mutex<ServerState>>;

/// A connected client session.
struct Session {
    /// Account this session is signed in to, if any.
    user: Option<Uuid>,
    /// Channel to send messages to this client.
    sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Session {
    fn send(&self, msg: ServerMessage) {
        let _ = self.sender.send(msg);
    }
}

struct ServerState {
    store: Store,
    sessions: HashMap<Uuid, Session>,
}

impl ServerState {
    /// Push fresh word and album snapshots to every live session of the
    /// given account.
    fn broadcast_account(&self, user: Uuid) {
        let words = self.store.words_snapshot(user);
        let albums = self.store.albums_snapshot(user);

        for session in self.sessions.values() {
            if session.user == Some(user) {
                session.send(ServerMessage::WordsSnapshot {
                    words: words.clone(),
                });
                session.send(ServerMessage::AlbumsSnapshot {
                    albums: albums.clone(),
                });
            }
        }
    }

    /// Persist the store, logging instead of failing the connection.
    fn persist(&self) {
        if let Err(e) = self.store.persist() {
            error!("failed to persist store: {}", e);
        }
    }
}

/// Run the document-store server.
pub async fn run(port: u16, data: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let store = Store::load(data)?;
    info!("loaded store with {} accounts", store.account_count());

    let state = Arc::new(Mutex::new(ServerState {
        store,
        sessions: HashMap::new(),
    }));

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        let state = Arc::clone(&state);
                        tokio::spawn(handle_connection(stream, addr, state));
                    }
                    Err(e) => {
                        warn!("failed to accept connection: {}", e);
                    }
                }
            }
            _ = signal::ctrl_c() => {
                info!("shutting down");
                let state = state.lock().await;
                for session in state.sessions.values() {
                    session.send(ServerMessage::ServerClosing);
                }
                break;
            }
        }
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(stream: TcpStream, addr: SocketAddr, state: SharedState) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Channel for sending messages to this client.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let session_id = Uuid::new_v4();
    {
        let mut state = state.lock().await;
        state.sessions.insert(
            session_id,
            Session {
                user: None,
                sender: tx.clone(),
            },
        );
    }
    let _ = tx.send(ServerMessage::ConnectionAck);
    info!("session {} connected from {}", session_id, addr);

    // Forward messages from the channel to the WebSocket.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(_) => continue,
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Process incoming messages.
    while let Some(msg) = ws_receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text.to_string(),
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => continue,
        };

        let client_msg: ClientMessage = match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(_) => continue,
        };

        handle_client_message(session_id, client_msg, &state).await;
    }

    {
        let mut state = state.lock().await;
        state.sessions.remove(&session_id);
    }
    info!("session {} disconnected", session_id);

    send_task.abort();
}

/// Handle a single client message.
async fn handle_client_message(session_id: Uuid, msg: ClientMessage, state: &SharedState) {
    let mut state = state.lock().await;

    match msg {
        ClientMessage::SignUp { email, password } => {
            match state.store.sign_up(&email, &password) {
                Ok(user) => {
                    state.persist();
                    authenticate(&mut state, session_id, user);
                }
                Err(e) => {
                    if let Some(session) = state.sessions.get(&session_id) {
                        session.send(ServerMessage::AuthRejected {
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        ClientMessage::SignIn { email, password } => {
            match state.store.sign_in(&email, &password) {
                Ok(user) => authenticate(&mut state, session_id, user),
                Err(e) => {
                    if let Some(session) = state.sessions.get(&session_id) {
                        session.send(ServerMessage::AuthRejected {
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        ClientMessage::SignOut => {
            if let Some(session) = state.sessions.get_mut(&session_id) {
                session.user = None;
                session.send(ServerMessage::SignedOut);
            }
            info!("session {} signed out", session_id);
        }
        other => handle_write(&mut state, session_id, other),
    }
}

/// Mark the session authenticated and send the initial snapshots.
fn authenticate(state: &mut ServerState, session_id: Uuid, user: Uuid) {
    let email = state.store.email(user).unwrap_or_default().to_string();

    let Some(session) = state.sessions.get_mut(&session_id) else {
        return;
    };
    session.user = Some(user);
    session.send(ServerMessage::AuthAccepted {
        email: email.clone(),
    });
    session.send(ServerMessage::WordsSnapshot {
        words: state.store.words_snapshot(user),
    });
    session.send(ServerMessage::AlbumsSnapshot {
        albums: state.store.albums_snapshot(user),
    });

    info!("session {} signed in as {}", session_id, email);
}

/// Apply a write for an authenticated session, persist, and push fresh
/// snapshots to every session of the account.
fn handle_write(state: &mut ServerState, session_id: Uuid, msg: ClientMessage) {
    let Some(user) = state.sessions.get(&session_id).and_then(|s| s.user) else {
        if let Some(session) = state.sessions.get(&session_id) {
            session.send(ServerMessage::WriteFailed {
                reason: "Not signed in".to_string(),
            });
        }
        return;
    };

    let result = match msg {
        ClientMessage::AddWord { draft } => {
            let _ = state.store.add_word(user, draft);
            Ok(())
        }
        ClientMessage::DeleteWords { ids } => {
            state.store.delete_words(user, &ids);
            Ok(())
        }
        ClientMessage::RemoveWordsFromAlbum { ids, album_id } => {
            state.store.remove_words_from_album(user, &ids, album_id);
            Ok(())
        }
        ClientMessage::CreateAlbum { name } => {
            state.store.create_album(user, &name).map(|_| ())
        }
        ClientMessage::RenameAlbum { id, name } => state.store.rename_album(user, id, &name),
        ClientMessage::DeleteAlbum { id, delete_words } => {
            state.store.delete_album(user, id, delete_words)
        }
        // Auth messages are handled before we get here.
        _ => Ok(()),
    };

    match result {
        Ok(()) => {
            state.persist();
            state.broadcast_account(user);
        }
        Err(e) => {
            if let Some(session) = state.sessions.get(&session_id) {
                session.send(ServerMessage::WriteFailed {
                    reason: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordDraft;

    fn test_state() -> ServerState {
        let path = std::env::temp_dir().join(format!("wordbook-server-test-{}.json", Uuid::new_v4()));
        ServerState {
            store: Store::load(path).unwrap(),
            sessions: HashMap::new(),
        }
    }

    fn add_session(
        state: &mut ServerState,
        user: Option<Uuid>,
    ) -> (Uuid, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        state.sessions.insert(id, Session { user, sender: tx });
        (id, rx)
    }

    fn draft(text: &str) -> WordDraft {
        WordDraft {
            word: text.to_string(),
            definition: format!("definition of {}", text),
            part_of_speech: "noun".to_string(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            notes: String::new(),
            albums: Vec::new(),
        }
    }

    #[test]
    fn test_write_before_authentication_is_rejected() {
        let mut state = test_state();
        let user = state.store.sign_up("a@b.com", "secret").unwrap();
        let word = state.store.add_word(user, draft("abate")).unwrap();

        let (session_id, mut rx) = add_session(&mut state, None);
        handle_write(
            &mut state,
            session_id,
            ClientMessage::DeleteWords { ids: vec![word] },
        );

        match rx.try_recv().unwrap() {
            ServerMessage::WriteFailed { reason } => assert_eq!(reason, "Not signed in"),
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
        // The store is untouched.
        assert_eq!(state.store.words_snapshot(user).len(), 1);
    }

    #[test]
    fn test_write_broadcasts_snapshots_to_account_sessions() {
        let mut state = test_state();
        let user = state.store.sign_up("a@b.com", "secret").unwrap();
        let other = state.store.sign_up("b@c.com", "secret").unwrap();

        let (writer, mut writer_rx) = add_session(&mut state, Some(user));
        let (_watcher, mut watcher_rx) = add_session(&mut state, Some(user));
        let (_stranger, mut stranger_rx) = add_session(&mut state, Some(other));

        handle_write(
            &mut state,
            writer,
            ClientMessage::AddWord {
                draft: draft("abate"),
            },
        );

        // Every session of the account gets both snapshots, the writer
        // included.
        for rx in [&mut writer_rx, &mut watcher_rx] {
            match rx.try_recv().unwrap() {
                ServerMessage::WordsSnapshot { words } => {
                    assert_eq!(words.len(), 1);
                    assert_eq!(words[0].word, "abate");
                }
                other => panic!("unexpected message: {:?}", other),
            }
            assert!(matches!(
                rx.try_recv().unwrap(),
                ServerMessage::AlbumsSnapshot { .. }
            ));
        }

        // Sessions of other accounts hear nothing.
        assert!(stranger_rx.try_recv().is_err());
    }

    #[test]
    fn test_authenticate_sends_snapshots() {
        let mut state = test_state();
        let user = state.store.sign_up("a@b.com", "secret").unwrap();
        let _ = state.store.add_word(user, draft("abate"));

        let (session_id, mut rx) = add_session(&mut state, None);
        authenticate(&mut state, session_id, user);

        match rx.try_recv().unwrap() {
            ServerMessage::AuthAccepted { email } => assert_eq!(email, "a@b.com"),
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(matches!(
            rx.try_recv().unwrap(),
            ServerMessage::WordsSnapshot { .. }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            ServerMessage::AlbumsSnapshot { .. }
        ));
        assert_eq!(state.sessions[&session_id].user, Some(user));
    }
}
