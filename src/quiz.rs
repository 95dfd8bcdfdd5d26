//! The multiple-choice quiz engine.
//!
//! A game is played over a pool of words. Each round shows one word's
//! definition and four word choices; answering a word correctly removes
//! it from the pool, and the game ends when the pool is empty.

use std::collections::HashSet;

use rand::Rng;
use uuid::Uuid;

use crate::models::WordDoc;

/// Number of choices shown per round.
pub const NUM_CHOICES: usize = 4;

/// Minimum number of distinct word texts needed to play: one answer plus
/// three distractors.
pub const MIN_QUIZ_WORDS: usize = 4;

/// Whether the given words are enough to start a game.
pub fn has_enough_words(words: &[WordDoc]) -> bool {
    let texts: HashSet<&str> = words.iter().map(|w| w.word.as_str()).collect();
    texts.len() >= MIN_QUIZ_WORDS
}

/// Outcome of a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess hit the correct word; the round is resolved.
    Correct,
    /// The guess was wrong; the round continues.
    Wrong,
    /// The guess was ignored (no active round, already-revealed choice,
    /// or the round is already resolved).
    Ignored,
}

/// One quiz round: a definition and four word choices.
#[derive(Debug, Clone)]
pub struct Round {
    word_id: Uuid,
    /// The word being asked about.
    pub word: String,
    /// The definition shown as the prompt.
    pub definition: String,
    /// The four choices, always `NUM_CHOICES` long.
    pub choices: Vec<String>,
    /// Index of the correct choice.
    pub correct_index: usize,
    /// Choices revealed by guesses so far, in guess order.
    pub revealed: Vec<usize>,
    wrong_guesses: usize,
    resolved: bool,
}

impl Round {
    /// Whether the correct choice has been found.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Whether the given choice has already been guessed.
    pub fn is_revealed(&self, choice: usize) -> bool {
        self.revealed.contains(&choice)
    }
}

/// A playthrough over a fixed set of words.
#[derive(Debug)]
pub struct QuizGame {
    words: Vec<WordDoc>,
    pool: Vec<WordDoc>,
    score: usize,
    attempts: usize,
    round: Option<Round>,
    over: bool,
}

impl QuizGame {
    /// Start a new game over `words`. Returns `None` when there are fewer
    /// than [`MIN_QUIZ_WORDS`] distinct word texts.
    pub fn new<R: Rng>(words: Vec<WordDoc>, rng: &mut R) -> Option<Self> {
        if !has_enough_words(&words) {
            return None;
        }

        let pool = words.clone();
        let round = generate_round(&words, &pool, rng);

        Some(Self {
            words,
            pool,
            score: 0,
            attempts: 0,
            round: Some(round),
            over: false,
        })
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Words left in the pool.
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Score as a rounded percentage of attempts.
    pub fn percentage(&self) -> u32 {
        if self.attempts == 0 {
            return 0;
        }
        ((self.score as f64 / self.attempts as f64) * 100.0).round() as u32
    }

    /// Submit a guess for the current round.
    ///
    /// A correct first guess counts toward both score and attempts; the
    /// first wrong guess on a round counts one attempt and nothing more.
    /// A correct guess always removes the word from the pool.
    pub fn guess(&mut self, choice: usize) -> GuessOutcome {
        let Some(round) = &mut self.round else {
            return GuessOutcome::Ignored;
        };
        if round.resolved || choice >= round.choices.len() || round.is_revealed(choice) {
            return GuessOutcome::Ignored;
        }

        round.revealed.push(choice);

        if choice == round.correct_index {
            if round.wrong_guesses == 0 {
                self.score += 1;
                self.attempts += 1;
            }
            round.resolved = true;
            let id = round.word_id;
            self.pool.retain(|w| w.id != id);
            GuessOutcome::Correct
        } else {
            round.wrong_guesses += 1;
            if round.wrong_guesses == 1 {
                self.attempts += 1;
            }
            GuessOutcome::Wrong
        }
    }

    /// Move past a resolved round: generate the next one, or enter
    /// game-over when the pool is exhausted. Does nothing while the
    /// current round is unresolved.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        if self.over {
            return;
        }
        let resolved = self.round.as_ref().is_some_and(|r| r.resolved);
        if !resolved {
            return;
        }

        if self.pool.is_empty() {
            self.over = true;
            self.round = None;
        } else {
            self.round = Some(generate_round(&self.words, &self.pool, rng));
        }
    }

    /// Reset score, attempts, and the pool to the full word set, and
    /// start a fresh round.
    pub fn restart<R: Rng>(&mut self, rng: &mut R) {
        self.pool = self.words.clone();
        self.score = 0;
        self.attempts = 0;
        self.over = false;
        self.round = Some(generate_round(&self.words, &self.pool, rng));
    }
}

/// Build one round: a random pool word as the answer and three distinct
/// distractor texts drawn from the full word set.
fn generate_round<R: Rng>(words: &[WordDoc], pool: &[WordDoc], rng: &mut R) -> Round {
    let correct = &pool[rng.gen_range(0..pool.len())];

    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(correct.word.as_str());
    let mut candidates: Vec<&WordDoc> = words
        .iter()
        .filter(|w| seen.insert(w.word.as_str()))
        .collect();

    let mut choices: Vec<String> = Vec::with_capacity(NUM_CHOICES);
    for _ in 0..NUM_CHOICES - 1 {
        let idx = rng.gen_range(0..candidates.len());
        choices.push(candidates.swap_remove(idx).word.clone());
    }

    let correct_index = rng.gen_range(0..NUM_CHOICES);
    choices.insert(correct_index, correct.word.clone());

    Round {
        word_id: correct.id,
        word: correct.word.clone(),
        definition: correct.definition.clone(),
        choices,
        correct_index,
        revealed: Vec::new(),
        wrong_guesses: 0,
        resolved: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn word(text: &str) -> WordDoc {
        WordDoc {
            id: Uuid::new_v4(),
            word: text.to_string(),
            definition: format!("definition of {}", text),
            part_of_speech: "noun".to_string(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            notes: String::new(),
            albums: Vec::new(),
        }
    }

    fn words(n: usize) -> Vec<WordDoc> {
        (0..n).map(|i| word(&format!("word{}", i))).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_needs_four_distinct_texts() {
        let mut rng = rng();
        assert!(QuizGame::new(words(3), &mut rng).is_none());
        assert!(QuizGame::new(words(4), &mut rng).is_some());

        // Duplicate texts don't count twice.
        let mut dup = words(3);
        dup.push(word("word0"));
        assert!(!has_enough_words(&dup));
        assert!(QuizGame::new(dup, &mut rng).is_none());
    }

    #[test]
    fn test_round_has_four_distinct_choices() {
        let mut rng = rng();
        let game = QuizGame::new(words(10), &mut rng).unwrap();
        let round = game.round().unwrap();

        assert_eq!(round.choices.len(), NUM_CHOICES);
        let distinct: HashSet<&str> = round.choices.iter().map(String::as_str).collect();
        assert_eq!(distinct.len(), NUM_CHOICES);
        assert_eq!(round.choices[round.correct_index], round.word);
        assert!(round.definition.contains(&round.word));
    }

    #[test]
    fn test_perfect_playthrough() {
        let mut rng = rng();
        let mut game = QuizGame::new(words(5), &mut rng).unwrap();

        for _ in 0..5 {
            let correct = game.round().unwrap().correct_index;
            assert_eq!(game.guess(correct), GuessOutcome::Correct);
            game.advance(&mut rng);
        }

        assert!(game.is_over());
        assert!(game.round().is_none());
        assert_eq!(game.score(), 5);
        assert_eq!(game.attempts(), 5);
        assert_eq!(game.percentage(), 100);
    }

    #[test]
    fn test_wrong_then_correct_counts_one_attempt_no_score() {
        let mut rng = rng();
        let mut game = QuizGame::new(words(4), &mut rng).unwrap();

        let correct = game.round().unwrap().correct_index;
        let wrong = (correct + 1) % NUM_CHOICES;

        assert_eq!(game.guess(wrong), GuessOutcome::Wrong);
        assert_eq!(game.attempts(), 1);
        assert_eq!(game.score(), 0);

        // Further wrong guesses change nothing.
        let wrong2 = (correct + 2) % NUM_CHOICES;
        assert_eq!(game.guess(wrong2), GuessOutcome::Wrong);
        assert_eq!(game.attempts(), 1);

        // The eventual correct guess scores nothing but still removes
        // the word from the pool.
        assert_eq!(game.guess(correct), GuessOutcome::Correct);
        assert_eq!(game.score(), 0);
        assert_eq!(game.attempts(), 1);
        assert_eq!(game.remaining(), 3);
    }

    #[test]
    fn test_repeated_and_post_resolution_guesses_ignored() {
        let mut rng = rng();
        let mut game = QuizGame::new(words(4), &mut rng).unwrap();

        let correct = game.round().unwrap().correct_index;
        let wrong = (correct + 1) % NUM_CHOICES;

        game.guess(wrong);
        assert_eq!(game.guess(wrong), GuessOutcome::Ignored);
        assert_eq!(game.attempts(), 1);

        game.guess(correct);
        assert_eq!(game.guess((correct + 2) % NUM_CHOICES), GuessOutcome::Ignored);
        assert_eq!(game.guess(NUM_CHOICES + 1), GuessOutcome::Ignored);
    }

    #[test]
    fn test_advance_requires_resolution() {
        let mut rng = rng();
        let mut game = QuizGame::new(words(4), &mut rng).unwrap();

        let before = game.round().unwrap().definition.clone();
        game.advance(&mut rng);
        assert_eq!(game.round().unwrap().definition, before);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut rng = rng();
        let mut game = QuizGame::new(words(4), &mut rng).unwrap();

        for _ in 0..4 {
            let correct = game.round().unwrap().correct_index;
            game.guess(correct);
            game.advance(&mut rng);
        }
        assert!(game.is_over());

        game.restart(&mut rng);
        assert!(!game.is_over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.attempts(), 0);
        assert_eq!(game.remaining(), 4);
        assert!(game.round().is_some());
    }

    #[test]
    fn test_percentage_with_misses() {
        let mut rng = rng();
        let mut game = QuizGame::new(words(4), &mut rng).unwrap();

        // One miss, then correct: 0/1. Then three clean rounds: 3/4.
        let correct = game.round().unwrap().correct_index;
        game.guess((correct + 1) % NUM_CHOICES);
        game.guess(correct);
        game.advance(&mut rng);

        for _ in 0..3 {
            let correct = game.round().unwrap().correct_index;
            game.guess(correct);
            game.advance(&mut rng);
        }

        assert!(game.is_over());
        assert_eq!(game.score(), 3);
        assert_eq!(game.attempts(), 4);
        assert_eq!(game.percentage(), 75);
    }
}
