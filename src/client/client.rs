//! WebSocket client implementation.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use crate::dictionary;
use crate::protocol::{validate_album_name, ClientMessage, ServerMessage};
use crate::quiz::{self, QuizGame};
use crate::terminal;

use super::state::{
    AddWordForm, AlbumPageView, AlbumsView, ClientApp, Confirm, ConfirmKind, NameModal, QuizView,
    Screen, WordListView,
};
use super::ui;

/// Shared client app state.
type SharedApp = Arc<Mutex<ClientApp>>;

/// Channel of messages bound for the server.
type Outgoing = mpsc::UnboundedSender<ClientMessage>;

/// Run the wordbook client.
pub async fn run(host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = Arc::new(Mutex::new(ClientApp::new(host.clone(), port)));

    let url = format!("ws://{}:{}", host, port);
    println!("Connecting to {}...", url);

    let (ws_stream, _) = match tokio_tungstenite::connect_async(&url).await {
        Ok(result) => result,
        Err(e) => {
            return Err(format!("Failed to connect to server: {}", e).into());
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Channel for outgoing messages.
    let (tx, mut rx) = mpsc::unbounded_channel::<ClientMessage>();

    // Forward outgoing messages to the socket.
    tokio::spawn(async move {
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

    // Apply incoming messages to the shared state.
    let app_clone = Arc::clone(&app);
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_receiver.next().await {
            let text = match msg {
                Ok(Message::Text(text)) => text.to_string(),
                Ok(Message::Close(_)) => {
                    let mut app = app_clone.lock().await;
                    app.disconnect("Connection closed by server".to_string());
                    break;
                }
                Err(e) => {
                    let mut app = app_clone.lock().await;
                    app.disconnect(format!("Connection error: {}", e));
                    break;
                }
                _ => continue,
            };

            let server_msg: ServerMessage = match serde_json::from_str(&text) {
                Ok(m) => m,
                Err(_) => continue,
            };

            let mut app = app_clone.lock().await;
            handle_server_message(&mut app, server_msg);
        }
    });

    run_tui(app, tx).await?;

    recv_task.abort();

    Ok(())
}

/// Handle a message from the server.
fn handle_server_message(app: &mut ClientApp, msg: ServerMessage) {
    match msg {
        ServerMessage::ConnectionAck => {
            if matches!(app.screen, Screen::Connecting) {
                app.enter_sign_in();
            }
        }
        ServerMessage::AuthAccepted { email } => {
            app.enter_home(email);
        }
        ServerMessage::AuthRejected { reason } => {
            app.set_auth_error(reason);
        }
        ServerMessage::WordsSnapshot { words } => {
            app.set_words(words);
        }
        ServerMessage::AlbumsSnapshot { albums } => {
            app.set_albums(albums);
        }
        ServerMessage::WriteFailed { reason } => {
            app.set_status(reason);
        }
        ServerMessage::SignedOut => {
            app.signed_out();
        }
        ServerMessage::ServerClosing => {
            app.disconnect("Server is shutting down".to_string());
        }
    }
}

/// Run the client TUI.
async fn run_tui(app: SharedApp, tx: Outgoing) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = terminal::init()?;
    let http = reqwest::Client::new();

    loop {
        {
            let app = app.lock().await;
            if app.should_quit {
                break;
            }
        }

        {
            let app = app.lock().await;
            terminal.draw(|frame| ui::render(frame, &app))?;
        }

        // Handle input with a timeout so snapshot updates repaint promptly.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let mut guard = app.lock().await;
                handle_input(&mut guard, &app, &http, &tx, key.code);
            }
        }
    }

    terminal::restore()?;
    Ok(())
}

/// Handle keyboard input for the current screen.
fn handle_input(
    app: &mut ClientApp,
    shared: &SharedApp,
    http: &reqwest::Client,
    tx: &Outgoing,
    key: KeyCode,
) {
    match &app.screen {
        Screen::Connecting => {
            if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
                app.should_quit = true;
            }
        }
        Screen::SignIn(_) => handle_sign_in(app, tx, key),
        Screen::SignUp(_) => handle_sign_up(app, tx, key),
        Screen::Words(_) => handle_words(app, tx, key),
        Screen::Albums(_) => handle_albums(app, tx, key),
        Screen::AlbumPage(_) => handle_album_page(app, tx, key),
        Screen::AddWord(_) => handle_add_word(app, shared, http, tx, key),
        Screen::Quiz(_) => handle_quiz(app, key),
        Screen::Disconnected(_) => {
            if matches!(
                key,
                KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter
            ) {
                app.should_quit = true;
            }
        }
    }
}

fn handle_sign_in(app: &mut ClientApp, tx: &Outgoing, key: KeyCode) {
    let Screen::SignIn(form) = &mut app.screen else {
        return;
    };

    match key {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Tab => {
            app.enter_sign_up();
        }
        KeyCode::Up | KeyCode::Down | KeyCode::BackTab => form.next_field(),
        KeyCode::Enter => {
            if form.email.is_empty() || form.password.is_empty() {
                form.error = Some("Enter email and password".to_string());
            } else {
                let _ = tx.send(ClientMessage::SignIn {
                    email: form.email.clone(),
                    password: form.password.clone(),
                });
            }
        }
        KeyCode::Char(c) => form.push(c),
        KeyCode::Backspace => form.pop(),
        _ => {}
    }
}

fn handle_sign_up(app: &mut ClientApp, tx: &Outgoing, key: KeyCode) {
    let Screen::SignUp(form) = &mut app.screen else {
        return;
    };

    match key {
        KeyCode::Esc | KeyCode::Tab => {
            app.enter_sign_in();
        }
        KeyCode::Up | KeyCode::Down | KeyCode::BackTab => form.next_field(),
        KeyCode::Enter => match form.validate() {
            Err(reason) => form.error = Some(reason.to_string()),
            Ok(()) => {
                let _ = tx.send(ClientMessage::SignUp {
                    email: form.email.clone(),
                    password: form.password.clone(),
                });
            }
        },
        KeyCode::Char(c) => form.push(c),
        KeyCode::Backspace => form.pop(),
        _ => {}
    }
}

fn handle_words(app: &mut ClientApp, tx: &Outgoing, key: KeyCode) {
    let word_ids: Vec<Uuid> = app.store.words.iter().map(|w| w.id).collect();
    let cursor_word = |cursor: usize| word_ids.get(cursor).copied();

    let mut next: Option<Screen> = None;
    let mut status: Option<String> = None;

    let Screen::Words(view) = &mut app.screen else {
        return;
    };

    if view.detail.is_some() {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            view.detail = None;
        }
        return;
    }

    if let Some(confirm) = &mut view.confirm {
        match key {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => confirm.previous(),
            KeyCode::Right | KeyCode::Down | KeyCode::Char('j') => confirm.next(),
            KeyCode::Esc => view.confirm = None,
            KeyCode::Enter => {
                let cancelled = confirm.is_cancel();
                view.confirm = None;
                if !cancelled {
                    let ids: Vec<Uuid> = view.selected.drain().collect();
                    status = Some(format!("Deleted {} words", ids.len()));
                    let _ = tx.send(ClientMessage::DeleteWords { ids });
                }
            }
            _ => {}
        }
        if status.is_some() {
            app.status = status;
        }
        return;
    }

    match key {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => next = Some(Screen::Albums(AlbumsView::default())),
        KeyCode::Char('s') => {
            let _ = tx.send(ClientMessage::SignOut);
        }
        KeyCode::Down | KeyCode::Char('j') => view.move_down(word_ids.len()),
        KeyCode::Up | KeyCode::Char('k') => view.move_up(),
        KeyCode::Char('e') => view.toggle_edit(),
        KeyCode::Char(' ') if view.edit => {
            if let Some(id) = cursor_word(view.cursor) {
                view.toggle_selected(id);
            }
        }
        KeyCode::Enter => {
            if let Some(id) = cursor_word(view.cursor) {
                if view.edit {
                    view.toggle_selected(id);
                } else {
                    view.detail = Some(id);
                }
            }
        }
        KeyCode::Char('a') => {
            if view.edit {
                view.toggle_select_all(word_ids.iter().copied());
            } else {
                next = Some(Screen::AddWord(AddWordForm::new(None)));
            }
        }
        KeyCode::Char('d') if view.edit => {
            if view.selected.is_empty() {
                status = Some("Select a word first".to_string());
            } else {
                view.confirm = Some(Confirm::new(ConfirmKind::DeleteSelected));
            }
        }
        KeyCode::Esc if view.edit => view.toggle_edit(),
        _ => {}
    }

    if let Some(screen) = next {
        app.screen = screen;
    }
    if status.is_some() {
        app.status = status;
    }
}

fn handle_albums(app: &mut ClientApp, tx: &Outgoing, key: KeyCode) {
    let album_ids: Vec<Uuid> = app.store.albums.iter().map(|a| a.id).collect();

    let mut next: Option<Screen> = None;
    let mut status: Option<String> = None;

    let Screen::Albums(view) = &mut app.screen else {
        return;
    };

    if let Some(modal) = &mut view.add_modal {
        match key {
            KeyCode::Esc => view.add_modal = None,
            KeyCode::Enter => match validate_album_name(&modal.input) {
                Err(reason) => modal.error = Some(reason.to_string()),
                Ok(()) => {
                    let _ = tx.send(ClientMessage::CreateAlbum {
                        name: modal.input.clone(),
                    });
                    status = Some("Album added".to_string());
                    view.add_modal = None;
                }
            },
            KeyCode::Char(c) => modal.push(c),
            KeyCode::Backspace => modal.pop(),
            _ => {}
        }
        if status.is_some() {
            app.status = status;
        }
        return;
    }

    match key {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => next = Some(Screen::Quiz(QuizView::new(None))),
        KeyCode::Char('s') => {
            let _ = tx.send(ClientMessage::SignOut);
        }
        KeyCode::Down | KeyCode::Char('j') => view.move_down(album_ids.len()),
        KeyCode::Up | KeyCode::Char('k') => view.move_up(),
        KeyCode::Char('a') => view.add_modal = Some(NameModal::default()),
        KeyCode::Enter => {
            if let Some(id) = album_ids.get(view.cursor).copied() {
                next = Some(Screen::AlbumPage(AlbumPageView::new(id)));
            }
        }
        _ => {}
    }

    if let Some(screen) = next {
        app.screen = screen;
    }
}

fn handle_album_page(app: &mut ClientApp, tx: &Outgoing, key: KeyCode) {
    let scoped_ids: Vec<Uuid> = match &app.screen {
        Screen::AlbumPage(page) => app
            .store
            .album_words(page.album_id)
            .iter()
            .map(|w| w.id)
            .collect(),
        _ => return,
    };

    let mut next: Option<Screen> = None;
    let mut status: Option<String> = None;

    let Screen::AlbumPage(page) = &mut app.screen else {
        return;
    };
    let album_id = page.album_id;

    if let Some(modal) = &mut page.rename_modal {
        match key {
            KeyCode::Esc => page.rename_modal = None,
            KeyCode::Enter => match validate_album_name(&modal.input) {
                Err(reason) => modal.error = Some(reason.to_string()),
                Ok(()) => {
                    let _ = tx.send(ClientMessage::RenameAlbum {
                        id: album_id,
                        name: modal.input.clone(),
                    });
                    page.rename_modal = None;
                }
            },
            KeyCode::Char(c) => modal.push(c),
            KeyCode::Backspace => modal.pop(),
            _ => {}
        }
        return;
    }

    let view = &mut page.list;

    if view.detail.is_some() {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            view.detail = None;
        }
        return;
    }

    if let Some(confirm) = &mut view.confirm {
        match key {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => confirm.previous(),
            KeyCode::Right | KeyCode::Down | KeyCode::Char('j') => confirm.next(),
            KeyCode::Esc => view.confirm = None,
            KeyCode::Enter => {
                let kind = confirm.kind.clone();
                let choice = confirm.cursor;
                let cancelled = confirm.is_cancel();
                view.confirm = None;

                if !cancelled {
                    match kind {
                        ConfirmKind::DeleteSelectedFromAlbum => {
                            let ids: Vec<Uuid> = view.selected.drain().collect();
                            if choice == 0 {
                                // Keep the words, drop the membership.
                                let _ = tx.send(ClientMessage::RemoveWordsFromAlbum {
                                    ids,
                                    album_id,
                                });
                            } else {
                                let _ = tx.send(ClientMessage::DeleteWords { ids });
                            }
                        }
                        ConfirmKind::DeleteAlbum => {
                            let _ = tx.send(ClientMessage::DeleteAlbum {
                                id: album_id,
                                delete_words: choice == 1,
                            });
                            status = Some("Album deleted".to_string());
                            next = Some(Screen::Albums(AlbumsView::default()));
                        }
                        ConfirmKind::DeleteSelected => {}
                    }
                }
            }
            _ => {}
        }
    } else {
        match key {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Esc => {
                if view.edit {
                    view.toggle_edit();
                } else {
                    next = Some(Screen::Albums(AlbumsView::default()));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => view.move_down(scoped_ids.len()),
            KeyCode::Up | KeyCode::Char('k') => view.move_up(),
            KeyCode::Char('e') => view.toggle_edit(),
            KeyCode::Char(' ') if view.edit => {
                if let Some(id) = scoped_ids.get(view.cursor).copied() {
                    view.toggle_selected(id);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = scoped_ids.get(view.cursor).copied() {
                    if view.edit {
                        view.toggle_selected(id);
                    } else {
                        view.detail = Some(id);
                    }
                }
            }
            KeyCode::Char('a') => {
                if view.edit {
                    view.toggle_select_all(scoped_ids.iter().copied());
                } else {
                    next = Some(Screen::AddWord(AddWordForm::new(Some(album_id))));
                }
            }
            KeyCode::Char('d') if view.edit => {
                if view.selected.is_empty() {
                    status = Some("Select a word first".to_string());
                } else {
                    view.confirm = Some(Confirm::new(ConfirmKind::DeleteSelectedFromAlbum));
                }
            }
            KeyCode::Char('r') if view.edit => page.rename_modal = Some(NameModal::default()),
            KeyCode::Char('x') if view.edit => {
                page.list.confirm = Some(Confirm::new(ConfirmKind::DeleteAlbum));
            }
            KeyCode::Char('p') => next = Some(Screen::Quiz(QuizView::new(Some(album_id)))),
            _ => {}
        }
    }

    if let Some(screen) = next {
        app.screen = screen;
    }
    if status.is_some() {
        app.status = status;
    }
}

fn handle_add_word(
    app: &mut ClientApp,
    shared: &SharedApp,
    http: &reqwest::Client,
    tx: &Outgoing,
    key: KeyCode,
) {
    use super::state::AddWordField;

    let mut next: Option<Screen> = None;
    let mut status: Option<String> = None;

    let Screen::AddWord(form) = &mut app.screen else {
        return;
    };
    let back = match form.album_id {
        Some(id) => Screen::AlbumPage(AlbumPageView::new(id)),
        None => Screen::Words(WordListView::default()),
    };

    match key {
        KeyCode::Esc => next = Some(back),
        KeyCode::Tab => form.next_field(),
        KeyCode::Enter => match form.focus {
            AddWordField::Word => {
                let word = form.word.trim().to_string();
                if word.is_empty() {
                    form.error = Some("Enter a word first".to_string());
                } else {
                    form.error = None;
                    form.looking_up = true;
                    spawn_lookup(shared, http, word);
                }
            }
            AddWordField::Definition | AddWordField::Notes => match form.draft() {
                None => form.error = Some("Enter a word first".to_string()),
                Some(draft) => {
                    status = Some(format!("Added {}", draft.word));
                    let _ = tx.send(ClientMessage::AddWord { draft });
                    next = Some(back);
                }
            },
        },
        KeyCode::Down | KeyCode::Char('j') if form.focus == AddWordField::Definition => {
            form.select_next();
        }
        KeyCode::Up | KeyCode::Char('k') if form.focus == AddWordField::Definition => {
            form.select_previous();
        }
        KeyCode::Char(c) => match form.focus {
            AddWordField::Word => form.push_word(c),
            AddWordField::Notes => form.notes.push(c),
            AddWordField::Definition => {}
        },
        KeyCode::Backspace => match form.focus {
            AddWordField::Word => form.pop_word(),
            AddWordField::Notes => {
                form.notes.pop();
            }
            AddWordField::Definition => {}
        },
        _ => {}
    }

    if let Some(screen) = next {
        app.screen = screen;
    }
    if status.is_some() {
        app.status = status;
    }
}

fn handle_quiz(app: &mut ClientApp, key: KeyCode) {
    let scope = match &app.screen {
        Screen::Quiz(view) => match view.album_id {
            Some(id) => app.store.album_words(id),
            None => app.store.words.clone(),
        },
        _ => return,
    };

    let mut next: Option<Screen> = None;

    let Screen::Quiz(view) = &mut app.screen else {
        return;
    };
    let back = match view.album_id {
        Some(id) => Screen::AlbumPage(AlbumPageView::new(id)),
        None => Screen::Words(WordListView::default()),
    };

    let mut rng = rand::thread_rng();

    match &mut view.game {
        None => match key {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Esc => next = Some(back),
            KeyCode::Tab if view.album_id.is_none() => {
                next = Some(Screen::Words(WordListView::default()));
            }
            KeyCode::Enter => {
                view.game = QuizGame::new(scope, &mut rng);
                view.cursor = 0;
            }
            _ => {}
        },
        Some(game) if game.is_over() => match key {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Esc => next = Some(back),
            KeyCode::Char('r') => {
                game.restart(&mut rng);
                view.cursor = 0;
            }
            _ => {}
        },
        Some(game) => match key {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Esc => next = Some(back),
            KeyCode::Down | KeyCode::Char('j') => {
                view.cursor = (view.cursor + 1) % quiz::NUM_CHOICES;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                view.cursor = (view.cursor + quiz::NUM_CHOICES - 1) % quiz::NUM_CHOICES;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let resolved = game.round().is_some_and(|r| r.is_resolved());
                if resolved {
                    game.advance(&mut rng);
                    view.cursor = 0;
                } else {
                    game.guess(view.cursor);
                }
            }
            _ => {}
        },
    }

    if let Some(screen) = next {
        app.screen = screen;
    }
}

/// Fetch definitions off the UI task, then fill the form if the word is
/// unchanged by the time the response lands.
fn spawn_lookup(app: &SharedApp, http: &reqwest::Client, word: String) {
    let app = Arc::clone(app);
    let http = http.clone();

    tokio::spawn(async move {
        let result = dictionary::lookup(&http, &word).await;

        let mut app = app.lock().await;
        let Screen::AddWord(form) = &mut app.screen else {
            return;
        };
        if form.word.trim() != word {
            return;
        }

        form.looking_up = false;
        match result {
            Ok(candidates) => {
                form.candidates = candidates;
                form.selected = 0;
                form.error = None;
            }
            Err(_) => {
                form.error = Some("Unable to get word".to_string());
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Album;

    fn app_on_album_page(edit: bool) -> ClientApp {
        let album = Album {
            id: Uuid::new_v4(),
            name: "GRE".to_string(),
        };
        let mut app = ClientApp::new("localhost".to_string(), 1234);
        app.store.albums = vec![album.clone()];
        let mut page = AlbumPageView::new(album.id);
        page.list.edit = edit;
        app.screen = Screen::AlbumPage(page);
        app
    }

    #[test]
    fn test_album_rename_and_delete_require_edit_mode() {
        let (tx, _rx) = mpsc::unbounded_channel();

        let mut app = app_on_album_page(false);
        handle_album_page(&mut app, &tx, KeyCode::Char('r'));
        handle_album_page(&mut app, &tx, KeyCode::Char('x'));
        let Screen::AlbumPage(page) = &app.screen else {
            panic!("left album page");
        };
        assert!(page.rename_modal.is_none());
        assert!(page.list.confirm.is_none());

        let mut app = app_on_album_page(true);
        handle_album_page(&mut app, &tx, KeyCode::Char('x'));
        let Screen::AlbumPage(page) = &app.screen else {
            panic!("left album page");
        };
        assert!(page.list.confirm.is_some());

        let mut app = app_on_album_page(true);
        handle_album_page(&mut app, &tx, KeyCode::Char('r'));
        let Screen::AlbumPage(page) = &app.screen else {
            panic!("left album page");
        };
        assert!(page.rename_modal.is_some());
    }
}

