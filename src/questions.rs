//! The twenty questions program.
//!
//! The player thinks of something; the machine walks its [`KnowledgeTree`] asking yes/no
//! questions until it reaches a guess. When the guess is wrong the player teaches it a new
//! question, and the grown tree is saved through a [`KnowledgeStore`].
//!
//! All text goes through a [`QuestionsDisplay`]. Player input comes back in through
//! [`QuestionsGame::respond`].

use log::{debug, error};

use crate::config::QuestionsConfig;
use crate::knowledge::node::Answer;
use crate::knowledge::store::{JsonFileStore, KnowledgeStore, load_knowledge};
use crate::knowledge::tree::{Correction, KnowledgeTree, Resolution};

const WELCOME: &str = "Welcome to 20 Questions!";
const NO_KNOWLEDGE: &str = "I don't know anything yet, so let's start from scratch.";
const KNOWLEDGE_FOUND: &str = "I remember what you taught me before!";
const PROMPT_NEW_OR_EXISTING: &str =
    "Play with what I already know? Type 'yes'. Or should I forget everything? Type 'no'.";
const FORGETTING: &str = "Forgetting... everything...";
const NOT_UNDERSTOOD: &str = "I don't understand. Please answer yes or no.";
const LOST_TRACK: &str = "I lost my place there. Let me ask again.";
const EMPTY_TEXT: &str = "I didn't catch that. Please type something.";
const PROMPT_SEED_QUESTION: &str = "Enter a question to start with:";
const PROMPT_SEED_YES: &str = "Interesting! Now enter a guess for when the answer is yes.";
const PROMPT_SEED_NO: &str = "And a guess for when the answer is no.";
const ENTERING_ANSWERS: &str =
    "Tip: start a name with a capital letter, and leave out the article.";
const NEW_KNOWLEDGE: &str = "I've stored my new knowledge.";
const PROMPT_PLAY_AFTER_NEW: &str = "Now I can play! Shall we?";
const PLAYER_WINS: &str = "You win! What were you thinking of?";
const GIVE_UP: &str = "So many questions... I give up! You win!";
const MACHINE_WINS: &str = "Knew it!";
const LEARNED: &str = "One step closer to knowing everything!";
const PROMPT_PLAY_AGAIN: &str = "That was fun! Play again?";
const BYE: &str = "Bye! Thanks for playing!";

const YES_REPLIES: [&str; 6] = ["yes", "y", "yea", "yeah", "uhu", "yash"];
const NO_REPLIES: [&str; 6] = ["no", "n", "na", "nah", "nope", "nein"];

/// Presentation side of the program, implemented by the host.
pub trait QuestionsDisplay {
    /// Shows a line of text that needs no reply.
    fn show_message(&mut self, text: &str);

    /// Asks something the player must answer with yes or no.
    fn prompt_yes_no(&mut self, text: &str);

    /// Asks for free text.
    fn prompt_text(&mut self, text: &str);

    /// The program has ended.
    fn close(&mut self) {}
}

/// A player's reply to a yes/no prompt.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Reply {
    Yes,
    No,
    Other,
}

impl Reply {
    /// Classifies free text, case-insensitively, against the accepted yes and no words.
    pub fn classify(input: &str) -> Reply {
        let input = input.trim().to_lowercase();
        if YES_REPLIES.contains(&input.as_str()) {
            Reply::Yes
        } else if NO_REPLIES.contains(&input.as_str()) {
            Reply::No
        } else {
            Reply::Other
        }
    }

    fn answer(self) -> Option<Answer> {
        match self {
            Reply::Yes => Some(Answer::Yes),
            Reply::No => Some(Answer::No),
            Reply::Other => None,
        }
    }
}

/// Prefixes `word` with "a" or "an". Capitalized words are names and get no article.
pub fn with_article(word: &str) -> String {
    match word.chars().next() {
        None => String::new(),
        Some(first) if first.is_uppercase() => word.to_string(),
        Some(first) if "aeiou".contains(first.to_ascii_lowercase()) => format!("an {word}"),
        Some(_) => format!("a {word}"),
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QuestionsState {
    /// Not started yet.
    Opening,
    /// Play with stored knowledge, or forget it?
    NewOrExisting,
    /// Walking the tree; the current question is on screen.
    Asking,
    /// The machine has guessed and waits to hear if it was right.
    ConfirmGuess,
    /// The player types what they were thinking of.
    EnterAnswer,
    /// The player types a question separating their answer from the wrong guess.
    EnterQuestion,
    /// Is the player's answer the yes or the no side of their question?
    EnterBranchForAnswer,
    /// Seeding a new tree: its first question.
    EnterSeedQuestion,
    /// Seeding a new tree: the guess for yes.
    EnterSeedYesAnswer,
    /// Seeding a new tree: the guess for no.
    EnterSeedNoAnswer,
    /// Another round?
    PlayAgain,
    /// The program has ended.
    Ended,
}

/// An owned copy of a `Resolution`, so the display can be used while it is shown.
enum Prompt {
    Question(String),
    Guess(String),
    GiveUp,
}

/// Text collected over several prompts before it turns into knowledge.
#[derive(Debug, Default)]
struct Draft {
    question: String,
    yes_answer: String,
    answer: String,
}

/// The twenty questions dialogue.
pub struct QuestionsGame<D: QuestionsDisplay, S: KnowledgeStore> {
    display: D,
    store: S,
    config: QuestionsConfig,
    state: QuestionsState,
    tree: Option<KnowledgeTree>,
    draft: Draft,
    /// The yes/no prompt on screen, repeated when a reply is not understood.
    pending_yes_no: String,
}

impl<D: QuestionsDisplay, S: KnowledgeStore> QuestionsGame<D, S> {
    pub fn new(display: D, store: S, config: QuestionsConfig) -> Self {
        Self {
            display,
            store,
            config,
            state: QuestionsState::Opening,
            tree: None,
            draft: Draft::default(),
            pending_yes_no: String::new(),
        }
    }

    pub fn state(&self) -> QuestionsState {
        self.state
    }

    pub fn tree(&self) -> Option<&KnowledgeTree> {
        self.tree.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Greets the player and either offers the stored knowledge or starts seeding a new tree.
    pub fn start_up(&mut self) {
        self.display.show_message(WELCOME);

        match load_knowledge(&self.store) {
            Some(tree) => {
                self.tree = Some(tree.with_question_limit(self.config.max_questions));
                self.display.show_message(KNOWLEDGE_FOUND);
                self.prompt_new_or_existing();
            }
            None => {
                self.display.show_message(NO_KNOWLEDGE);
                self.start_seeding();
            }
        }
    }

    /// Hands player input to whatever the current prompt is waiting for.
    ///
    /// Yes/no prompts classify the input with [`Reply::classify`]; anything unrecognised
    /// repeats the prompt.
    pub fn respond(&mut self, input: &str) {
        match self.state {
            QuestionsState::NewOrExisting
            | QuestionsState::Asking
            | QuestionsState::ConfirmGuess
            | QuestionsState::EnterBranchForAnswer
            | QuestionsState::PlayAgain => self.reply(Reply::classify(input)),
            QuestionsState::EnterAnswer
            | QuestionsState::EnterQuestion
            | QuestionsState::EnterSeedQuestion
            | QuestionsState::EnterSeedYesAnswer
            | QuestionsState::EnterSeedNoAnswer => self.enter_text(input),
            QuestionsState::Opening | QuestionsState::Ended => {}
        }
    }

    /// Answers the current yes/no prompt. Ignored when the game is waiting for free text.
    pub fn reply(&mut self, reply: Reply) {
        let Some(answer) = reply.answer() else {
            if self.is_awaiting_reply() {
                self.display.show_message(NOT_UNDERSTOOD);
                self.repeat_yes_no();
            }
            return;
        };

        match self.state {
            QuestionsState::NewOrExisting => match answer {
                Answer::Yes => self.start_round(),
                Answer::No => {
                    self.display.show_message(FORGETTING);
                    self.forget();
                    self.start_seeding();
                }
            },
            QuestionsState::Asking => {
                let Some(tree) = self.tree.as_mut() else {
                    self.start_seeding();
                    return;
                };
                match tree.advance(answer) {
                    Ok(()) => self.resolve_current(),
                    Err(err) => {
                        error!("could not follow the {answer:?} branch: {err}");
                        self.display.show_message(LOST_TRACK);
                        self.repeat_yes_no();
                    }
                }
            }
            QuestionsState::ConfirmGuess => match answer {
                Answer::Yes => {
                    self.display.show_message(MACHINE_WINS);
                    self.prompt_play_again(PROMPT_PLAY_AGAIN);
                }
                Answer::No => {
                    self.draft = Draft::default();
                    self.display.show_message(PLAYER_WINS);
                    self.display.prompt_text(ENTERING_ANSWERS);
                    self.go_to(QuestionsState::EnterAnswer);
                }
            },
            QuestionsState::EnterBranchForAnswer => self.learn(answer),
            QuestionsState::PlayAgain => match answer {
                Answer::Yes => {
                    if let Some(tree) = self.tree.as_mut() {
                        tree.end_traversal();
                    }
                    self.prompt_new_or_existing();
                }
                Answer::No => {
                    self.display.show_message(BYE);
                    self.go_to(QuestionsState::Ended);
                    self.display.close();
                }
            },
            _ => {}
        }
    }

    fn is_awaiting_reply(&self) -> bool {
        matches!(
            self.state,
            QuestionsState::NewOrExisting
                | QuestionsState::Asking
                | QuestionsState::ConfirmGuess
                | QuestionsState::EnterBranchForAnswer
                | QuestionsState::PlayAgain
        )
    }

    fn enter_text(&mut self, input: &str) {
        let text = input.trim();
        if text.is_empty() {
            self.display.prompt_text(EMPTY_TEXT);
            return;
        }

        match self.state {
            QuestionsState::EnterSeedQuestion => {
                self.draft.question = text.to_string();
                self.display
                    .prompt_text(&format!("{PROMPT_SEED_YES} {ENTERING_ANSWERS}"));
                self.go_to(QuestionsState::EnterSeedYesAnswer);
            }
            QuestionsState::EnterSeedYesAnswer => {
                self.draft.yes_answer = text.to_string();
                self.display.prompt_text(PROMPT_SEED_NO);
                self.go_to(QuestionsState::EnterSeedNoAnswer);
            }
            QuestionsState::EnterSeedNoAnswer => self.finish_seeding(text),
            QuestionsState::EnterAnswer => {
                self.draft.answer = text.to_string();
                let guess = self.current_text().unwrap_or_default();
                self.display.prompt_text(&format!(
                    "How could I have told that apart from {}? Please enter a question.",
                    with_article(&guess)
                ));
                self.go_to(QuestionsState::EnterQuestion);
            }
            QuestionsState::EnterQuestion => {
                self.draft.question = text.to_string();
                let prompt = format!(
                    "If you were thinking of {}, what would the answer to that question be?",
                    with_article(&self.draft.answer)
                );
                self.ask_yes_no(&prompt);
                self.go_to(QuestionsState::EnterBranchForAnswer);
            }
            _ => {}
        }
    }

    fn ask_yes_no(&mut self, text: &str) {
        self.pending_yes_no = text.to_string();
        self.display.prompt_yes_no(text);
    }

    fn repeat_yes_no(&mut self) {
        self.display.prompt_yes_no(&self.pending_yes_no);
    }

    fn go_to(&mut self, state: QuestionsState) {
        debug!("twenty questions: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn current_text(&self) -> Option<String> {
        self.tree
            .as_ref()
            .and_then(|tree| tree.current_node())
            .map(|node| node.text.clone())
    }

    fn prompt_new_or_existing(&mut self) {
        self.ask_yes_no(PROMPT_NEW_OR_EXISTING);
        self.go_to(QuestionsState::NewOrExisting);
    }

    fn prompt_play_again(&mut self, text: &str) {
        self.ask_yes_no(text);
        self.go_to(QuestionsState::PlayAgain);
    }

    fn forget(&mut self) {
        self.tree = None;
        if let Err(err) = self.store.delete() {
            error!("could not delete stored knowledge: {err}");
        }
    }

    fn start_seeding(&mut self) {
        self.tree = None;
        self.draft = Draft::default();
        self.display.prompt_text(PROMPT_SEED_QUESTION);
        self.go_to(QuestionsState::EnterSeedQuestion);
    }

    fn finish_seeding(&mut self, no_answer: &str) {
        match KnowledgeTree::seed(&self.draft.question, &self.draft.yes_answer, no_answer) {
            Ok(tree) => {
                let tree = tree.with_question_limit(self.config.max_questions);
                self.save(&tree);
                self.tree = Some(tree);
                self.display.show_message(NEW_KNOWLEDGE);
                self.prompt_play_again(PROMPT_PLAY_AFTER_NEW);
            }
            Err(err) => {
                error!("could not seed knowledge: {err}");
                self.start_seeding();
            }
        }
    }

    fn start_round(&mut self) {
        let Some(tree) = self.tree.as_mut() else {
            self.start_seeding();
            return;
        };

        tree.start_traversal();
        self.go_to(QuestionsState::Asking);
        self.resolve_current();
    }

    /// Shows the question or guess under the cursor, or gives up past the question limit.
    fn resolve_current(&mut self) {
        let Some(tree) = self.tree.as_ref() else {
            self.start_seeding();
            return;
        };

        let next = match tree.resolve_current() {
            Ok(Resolution::Question(text)) => Ok(Prompt::Question(text.to_string())),
            Ok(Resolution::Guess(text)) => Ok(Prompt::Guess(text.to_string())),
            Ok(Resolution::GiveUp) => Ok(Prompt::GiveUp),
            Err(err) => Err(err),
        };

        match next {
            Ok(Prompt::Question(text)) => self.ask_yes_no(&text),
            Ok(Prompt::Guess(text)) => {
                self.ask_yes_no(&format!("Are you thinking of {}?", with_article(&text)));
                self.go_to(QuestionsState::ConfirmGuess);
            }
            Ok(Prompt::GiveUp) => {
                self.display.show_message(GIVE_UP);
                self.prompt_play_again(PROMPT_PLAY_AGAIN);
            }
            Err(err) => {
                error!("cannot resolve the knowledge cursor: {err}");
                self.prompt_play_again(PROMPT_PLAY_AGAIN);
            }
        }
    }

    fn learn(&mut self, answer_branch: Answer) {
        let correction = Correction {
            question: std::mem::take(&mut self.draft.question),
            answer: std::mem::take(&mut self.draft.answer),
            answer_branch,
        };

        let Some(mut tree) = self.tree.take() else {
            self.start_seeding();
            return;
        };
        match tree.learn(correction) {
            Ok(()) => {
                self.save(&tree);
                self.display.show_message(LEARNED);
            }
            Err(err) => error!("could not learn from the correction: {err}"),
        }
        self.tree = Some(tree);
        self.prompt_play_again(PROMPT_PLAY_AGAIN);
    }

    fn save(&self, tree: &KnowledgeTree) {
        if let Err(err) = self.store.save(tree) {
            error!("could not save knowledge: {err}");
        }
    }
}

impl<D: QuestionsDisplay> QuestionsGame<D, JsonFileStore> {
    /// A game that keeps its knowledge at `config.knowledge_path`.
    pub fn with_file_store(display: D, config: QuestionsConfig) -> Self {
        let store = JsonFileStore::from_config(&config);
        Self::new(display, store, config)
    }
}
