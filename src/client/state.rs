//! Client state management: the screen machine, the local mirror of the
//! remote collections, and per-screen view state.

use std::collections::HashSet;

use uuid::Uuid;

use crate::dictionary::DefinitionCandidate;
use crate::models::{Album, WordDoc, WordDraft};
use crate::protocol::ALBUM_NAME_MAX_LENGTH;
use crate::quiz::QuizGame;

/// Local mirror of the signed-in account's remote collections, refreshed
/// wholesale from server snapshots.
#[derive(Debug, Default)]
pub struct MirrorStore {
    /// Words, sorted by word text (server order).
    pub words: Vec<WordDoc>,
    /// Albums, sorted by name (server order).
    pub albums: Vec<Album>,
}

impl MirrorStore {
    pub fn album(&self, id: Uuid) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn word(&self, id: Uuid) -> Option<&WordDoc> {
        self.words.iter().find(|w| w.id == id)
    }

    /// The words belonging to the given album, in list order.
    pub fn album_words(&self, album_id: Uuid) -> Vec<WordDoc> {
        self.words
            .iter()
            .filter(|w| w.in_album(album_id))
            .cloned()
            .collect()
    }
}

/// Which input line of an auth form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
    Confirm,
}

/// The sign-in form.
#[derive(Debug)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub focus: AuthField,
    pub error: Option<String>,
}

impl SignInForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: AuthField::Email,
            error: None,
        }
    }

    pub fn push(&mut self, c: char) {
        self.error = None;
        match self.focus {
            AuthField::Password => self.password.push(c),
            _ => self.email.push(c),
        }
    }

    pub fn pop(&mut self) {
        self.error = None;
        match self.focus {
            AuthField::Password => {
                self.password.pop();
            }
            _ => {
                self.email.pop();
            }
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            AuthField::Email => AuthField::Password,
            _ => AuthField::Email,
        };
    }
}

/// The create-account form.
#[derive(Debug)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub focus: AuthField,
    pub error: Option<String>,
}

impl SignUpForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            focus: AuthField::Email,
            error: None,
        }
    }

    pub fn push(&mut self, c: char) {
        self.error = None;
        match self.focus {
            AuthField::Password => self.password.push(c),
            AuthField::Confirm => self.confirm.push(c),
            AuthField::Email => self.email.push(c),
        }
    }

    pub fn pop(&mut self) {
        self.error = None;
        match self.focus {
            AuthField::Password => {
                self.password.pop();
            }
            AuthField::Confirm => {
                self.confirm.pop();
            }
            AuthField::Email => {
                self.email.pop();
            }
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            AuthField::Email => AuthField::Password,
            AuthField::Password => AuthField::Confirm,
            AuthField::Confirm => AuthField::Email,
        };
    }

    /// Client-side check before the form is sent.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.password != self.confirm {
            return Err("Passwords do not match");
        }
        Ok(())
    }
}

/// A pending destructive action awaiting the user's choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmKind {
    /// Delete the selected words outright (all-words list).
    DeleteSelected,
    /// Selected words on an album page: keep in library or delete.
    DeleteSelectedFromAlbum,
    /// Delete the album, keeping or deleting its words.
    DeleteAlbum,
}

impl ConfirmKind {
    /// The options shown, last one always Cancel.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            ConfirmKind::DeleteSelected => &["Delete", "Cancel"],
            ConfirmKind::DeleteSelectedFromAlbum => &["Keep", "Delete", "Cancel"],
            ConfirmKind::DeleteAlbum => &["Keep Words", "Delete Words", "Cancel"],
        }
    }
}

/// A confirmation dialog with a highlighted option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirm {
    pub kind: ConfirmKind,
    pub cursor: usize,
}

impl Confirm {
    pub fn new(kind: ConfirmKind) -> Self {
        Self { kind, cursor: 0 }
    }

    pub fn next(&mut self) {
        self.cursor = (self.cursor + 1) % self.kind.options().len();
    }

    pub fn previous(&mut self) {
        let len = self.kind.options().len();
        self.cursor = (self.cursor + len - 1) % len;
    }

    /// Whether the highlighted option is the trailing Cancel.
    pub fn is_cancel(&self) -> bool {
        self.cursor == self.kind.options().len() - 1
    }
}

/// State of a scrollable word list (the all-words tab and album pages).
#[derive(Debug, Default)]
pub struct WordListView {
    pub cursor: usize,
    pub edit: bool,
    pub selected: HashSet<Uuid>,
    pub detail: Option<Uuid>,
    pub confirm: Option<Confirm>,
}

impl WordListView {
    pub fn move_down(&mut self, len: usize) {
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Enter or leave edit mode; leaving clears the selection.
    pub fn toggle_edit(&mut self) {
        self.edit = !self.edit;
        if !self.edit {
            self.selected.clear();
        }
    }

    pub fn toggle_selected(&mut self, id: Uuid) {
        if !self.selected.insert(id) {
            self.selected.remove(&id);
        }
    }

    /// Select every listed word, or clear the selection if everything is
    /// already selected.
    pub fn toggle_select_all(&mut self, ids: impl Iterator<Item = Uuid>) {
        let all: HashSet<Uuid> = ids.collect();
        if self.selected == all {
            self.selected.clear();
        } else {
            self.selected = all;
        }
    }

    /// Drop state that refers to words no longer in the list.
    pub fn prune(&mut self, words: &[WordDoc]) {
        let ids: HashSet<Uuid> = words.iter().map(|w| w.id).collect();
        self.selected.retain(|id| ids.contains(id));
        if self.detail.is_some_and(|id| !ids.contains(&id)) {
            self.detail = None;
        }
        if !words.is_empty() && self.cursor >= words.len() {
            self.cursor = words.len() - 1;
        }
    }
}

/// Text input modal for naming or renaming an album.
#[derive(Debug, Default)]
pub struct NameModal {
    pub input: String,
    pub error: Option<String>,
}

impl NameModal {
    pub fn push(&mut self, c: char) {
        self.error = None;
        if self.input.chars().count() < ALBUM_NAME_MAX_LENGTH {
            self.input.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.error = None;
        self.input.pop();
    }
}

/// The albums tab.
#[derive(Debug, Default)]
pub struct AlbumsView {
    pub cursor: usize,
    pub add_modal: Option<NameModal>,
}

impl AlbumsView {
    pub fn move_down(&mut self, len: usize) {
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}

/// One album's word list.
#[derive(Debug)]
pub struct AlbumPageView {
    pub album_id: Uuid,
    pub list: WordListView,
    pub rename_modal: Option<NameModal>,
}

impl AlbumPageView {
    pub fn new(album_id: Uuid) -> Self {
        Self {
            album_id,
            list: WordListView::default(),
            rename_modal: None,
        }
    }
}

/// Which input of the add-word form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddWordField {
    Word,
    Definition,
    Notes,
}

/// The add-word form.
#[derive(Debug)]
pub struct AddWordForm {
    /// Album the new word is filed into, when adding from an album page.
    pub album_id: Option<Uuid>,
    pub word: String,
    pub notes: String,
    pub candidates: Vec<DefinitionCandidate>,
    pub selected: usize,
    pub focus: AddWordField,
    pub error: Option<String>,
    pub looking_up: bool,
}

impl AddWordForm {
    pub fn new(album_id: Option<Uuid>) -> Self {
        Self {
            album_id,
            word: String::new(),
            notes: String::new(),
            candidates: Vec::new(),
            selected: 0,
            focus: AddWordField::Word,
            error: None,
            looking_up: false,
        }
    }

    /// Any edit of the word text invalidates fetched definitions.
    pub fn push_word(&mut self, c: char) {
        self.word.push(c);
        self.clear_candidates();
    }

    pub fn pop_word(&mut self) {
        self.word.pop();
        self.clear_candidates();
    }

    fn clear_candidates(&mut self) {
        self.candidates.clear();
        self.selected = 0;
        self.error = None;
        // An in-flight lookup for the old text will be discarded, so stop
        // showing its progress.
        self.looking_up = false;
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            AddWordField::Word => AddWordField::Definition,
            AddWordField::Definition => AddWordField::Notes,
            AddWordField::Notes => AddWordField::Word,
        };
    }

    pub fn select_next(&mut self) {
        if !self.candidates.is_empty() {
            self.selected = (self.selected + 1) % self.candidates.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.candidates.is_empty() {
            self.selected = (self.selected + self.candidates.len() - 1) % self.candidates.len();
        }
    }

    /// Build the draft from the chosen candidate, or `None` when no
    /// definition has been fetched yet.
    pub fn draft(&self) -> Option<WordDraft> {
        let candidate = self.candidates.get(self.selected)?;
        Some(WordDraft {
            word: self.word.trim().to_string(),
            definition: candidate.definition.clone(),
            part_of_speech: candidate.part_of_speech.clone(),
            synonyms: candidate.synonyms.clone(),
            antonyms: candidate.antonyms.clone(),
            notes: self.notes.clone(),
            albums: self.album_id.into_iter().collect(),
        })
    }
}

/// The quiz screen, over all words or one album.
#[derive(Debug)]
pub struct QuizView {
    pub album_id: Option<Uuid>,
    pub game: Option<QuizGame>,
    pub cursor: usize,
}

impl QuizView {
    pub fn new(album_id: Option<Uuid>) -> Self {
        Self {
            album_id,
            game: None,
            cursor: 0,
        }
    }
}

/// Current screen of the client.
#[derive(Debug)]
pub enum Screen {
    /// Connecting to the server.
    Connecting,

    /// Signing in.
    SignIn(SignInForm),

    /// Creating an account.
    SignUp(SignUpForm),

    /// The all-words tab.
    Words(WordListView),

    /// The albums tab.
    Albums(AlbumsView),

    /// The quiz tab or an album-scoped quiz.
    Quiz(QuizView),

    /// One album's word list.
    AlbumPage(AlbumPageView),

    /// The add-word form.
    AddWord(AddWordForm),

    /// Disconnected from server.
    Disconnected(String),
}

/// Client application state.
pub struct ClientApp {
    pub screen: Screen,
    pub store: MirrorStore,
    /// Email of the signed-in account.
    pub email: Option<String>,
    /// Transient status line.
    pub status: Option<String>,
    pub should_quit: bool,
    pub host: String,
    pub port: u16,
}

impl ClientApp {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            screen: Screen::Connecting,
            store: MirrorStore::default(),
            email: None,
            status: None,
            should_quit: false,
            host,
            port,
        }
    }

    /// The server address string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn enter_sign_in(&mut self) {
        self.screen = Screen::SignIn(SignInForm::new());
    }

    pub fn enter_sign_up(&mut self) {
        self.screen = Screen::SignUp(SignUpForm::new());
    }

    /// Move to the all-words tab after authentication.
    pub fn enter_home(&mut self, email: String) {
        self.email = Some(email);
        self.status = None;
        self.screen = Screen::Words(WordListView::default());
    }

    /// Local side of a sign-out: clear the mirror and return to sign-in.
    pub fn signed_out(&mut self) {
        self.email = None;
        self.store = MirrorStore::default();
        self.status = None;
        self.enter_sign_in();
    }

    pub fn disconnect(&mut self, message: String) {
        self.screen = Screen::Disconnected(message);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Apply a words snapshot, dropping view state that referred to
    /// removed words.
    pub fn set_words(&mut self, words: Vec<WordDoc>) {
        self.store.words = words;
        match &mut self.screen {
            Screen::Words(view) => view.prune(&self.store.words),
            Screen::AlbumPage(page) => {
                let scoped = self.store.album_words(page.album_id);
                page.list.prune(&scoped);
            }
            _ => {}
        }
    }

    /// Apply an albums snapshot. If the currently open album is gone,
    /// fall back to the albums tab.
    pub fn set_albums(&mut self, albums: Vec<Album>) {
        self.store.albums = albums;

        let open_album = match &self.screen {
            Screen::AlbumPage(page) => Some(page.album_id),
            Screen::Quiz(view) => view.album_id,
            Screen::AddWord(form) => form.album_id,
            _ => None,
        };
        if let Some(id) = open_album {
            if self.store.album(id).is_none() {
                self.screen = Screen::Albums(AlbumsView::default());
                return;
            }
        }

        if let Screen::Albums(view) = &mut self.screen {
            if !self.store.albums.is_empty() && view.cursor >= self.store.albums.len() {
                view.cursor = self.store.albums.len() - 1;
            }
        }
    }

    /// Set the error line on whichever auth form is showing.
    pub fn set_auth_error(&mut self, reason: String) {
        match &mut self.screen {
            Screen::SignIn(form) => form.error = Some(reason),
            Screen::SignUp(form) => form.error = Some(reason),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, albums: Vec<Uuid>) -> WordDoc {
        WordDoc {
            id: Uuid::new_v4(),
            word: text.to_string(),
            definition: String::new(),
            part_of_speech: "noun".to_string(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            notes: String::new(),
            albums,
        }
    }

    #[test]
    fn test_selection_toggles() {
        let mut view = WordListView::default();
        let id = Uuid::new_v4();

        view.toggle_selected(id);
        assert!(view.selected.contains(&id));
        view.toggle_selected(id);
        assert!(view.selected.is_empty());
    }

    #[test]
    fn test_select_all_round_trip() {
        let mut view = WordListView::default();
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        view.toggle_select_all(ids.iter().copied());
        assert_eq!(view.selected.len(), 3);

        // Everything selected: toggling again clears.
        view.toggle_select_all(ids.iter().copied());
        assert!(view.selected.is_empty());

        // Partial selection gets completed, not cleared.
        view.toggle_selected(ids[0]);
        view.toggle_select_all(ids.iter().copied());
        assert_eq!(view.selected.len(), 3);
    }

    #[test]
    fn test_leaving_edit_mode_clears_selection() {
        let mut view = WordListView::default();
        view.toggle_edit();
        view.toggle_selected(Uuid::new_v4());

        view.toggle_edit();
        assert!(!view.edit);
        assert!(view.selected.is_empty());
    }

    #[test]
    fn test_prune_drops_stale_state() {
        let kept = word("kept", Vec::new());
        let gone = word("gone", Vec::new());

        let mut view = WordListView::default();
        view.cursor = 5;
        view.toggle_selected(kept.id);
        view.toggle_selected(gone.id);
        view.detail = Some(gone.id);

        view.prune(&[kept.clone()]);

        assert_eq!(view.selected.len(), 1);
        assert!(view.selected.contains(&kept.id));
        assert!(view.detail.is_none());
        assert_eq!(view.cursor, 0);
    }

    #[test]
    fn test_album_page_falls_back_when_album_deleted() {
        let album = Album {
            id: Uuid::new_v4(),
            name: "GRE".to_string(),
        };
        let mut app = ClientApp::new("localhost".to_string(), 1234);
        app.store.albums = vec![album.clone()];
        app.screen = Screen::AlbumPage(AlbumPageView::new(album.id));

        app.set_albums(Vec::new());

        assert!(matches!(app.screen, Screen::Albums(_)));
        assert!(app.store.albums.is_empty());
    }

    #[test]
    fn test_editing_word_clears_candidates() {
        let mut form = AddWordForm::new(None);
        form.push_word('e');
        form.candidates = vec![DefinitionCandidate {
            part_of_speech: "noun".to_string(),
            definition: "something".to_string(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
        }];
        form.selected = 0;

        form.push_word('b');
        assert!(form.candidates.is_empty());
        assert_eq!(form.selected, 0);
        assert!(form.draft().is_none());
    }

    #[test]
    fn test_editing_word_cancels_pending_lookup() {
        let mut form = AddWordForm::new(None);
        form.push_word('e');
        form.looking_up = true;

        form.pop_word();
        assert!(!form.looking_up);
    }

    #[test]
    fn test_add_word_draft_carries_album() {
        let album = Uuid::new_v4();
        let mut form = AddWordForm::new(Some(album));
        for c in "ebb".chars() {
            form.push_word(c);
        }
        form.candidates = vec![DefinitionCandidate {
            part_of_speech: "noun".to_string(),
            definition: "The receding movement of the tide.".to_string(),
            synonyms: vec!["decline".to_string()],
            antonyms: Vec::new(),
        }];

        let draft = form.draft().unwrap();
        assert_eq!(draft.word, "ebb");
        assert_eq!(draft.albums, vec![album]);
        assert_eq!(draft.part_of_speech, "noun");
    }

    #[test]
    fn test_sign_up_password_mismatch() {
        let mut form = SignUpForm::new();
        form.email = "a@b.com".to_string();
        form.password = "secret".to_string();
        form.confirm = "secret2".to_string();

        assert_eq!(form.validate(), Err("Passwords do not match"));

        form.confirm = "secret".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_name_modal_caps_length() {
        let mut modal = NameModal::default();
        for _ in 0..100 {
            modal.push('x');
        }
        assert_eq!(modal.input.chars().count(), ALBUM_NAME_MAX_LENGTH);
    }

    #[test]
    fn test_confirm_cursor_wraps() {
        let mut confirm = Confirm::new(ConfirmKind::DeleteSelectedFromAlbum);
        assert_eq!(confirm.kind.options().len(), 3);

        confirm.previous();
        assert_eq!(confirm.cursor, 2);
        assert!(confirm.is_cancel());
        confirm.next();
        assert_eq!(confirm.cursor, 0);
    }
}
