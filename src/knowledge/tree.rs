use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::knowledge::node::{Answer, KnowledgeNode};

/// Questions allowed in one round before the machine gives up.
pub const DEFAULT_QUESTION_LIMIT: u32 = 20;

fn default_question_limit() -> u32 {
    DEFAULT_QUESTION_LIMIT
}

/// What the cursor is pointing at.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Resolution<'a> {
    /// The cursor reached an answer; the machine guesses it.
    Guess(&'a str),
    /// The next question to ask.
    Question(&'a str),
    /// Too many questions have been asked; the player wins.
    GiveUp,
}

/// What the player taught the machine after a wrong guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// Question telling the wrong guess apart from `answer`.
    pub question: String,
    /// What the player was really thinking of.
    pub answer: String,
    /// The reply to `question` that leads to `answer`. The wrong guess goes on the other branch.
    pub answer_branch: Answer,
}

/// A binary tree of yes/no questions with guesses at the leaves, plus a cursor for walking it
/// during a round.
///
/// Only the nodes are persisted; the cursor and the question limit are per-session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeTree {
    root: KnowledgeNode,
    /// Path from the root to the current node. `None` while no traversal is running.
    #[serde(skip)]
    cursor: Option<Vec<Answer>>,
    #[serde(skip)]
    question_count: u32,
    #[serde(skip, default = "default_question_limit")]
    question_limit: u32,
}

impl PartialEq for KnowledgeTree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for KnowledgeTree {}

impl KnowledgeTree {
    /// Creates a fresh tree: one question with a guess on each branch.
    pub fn seed(question: &str, yes_answer: &str, no_answer: &str) -> Result<Self> {
        let root = KnowledgeNode::question(
            normalize_question(question)?,
            KnowledgeNode::answer(normalize_answer(yes_answer)?),
            KnowledgeNode::answer(normalize_answer(no_answer)?),
        );
        info!("seeded knowledge with {:?}", root.text);
        Ok(Self::from_node(root))
    }

    /// Wraps an existing node hierarchy, rejecting it if it is not a well-formed tree.
    pub fn from_root(root: KnowledgeNode) -> Result<Self> {
        let tree = Self::from_node(root);
        tree.validate()?;
        Ok(tree)
    }

    fn from_node(root: KnowledgeNode) -> Self {
        Self {
            root,
            cursor: None,
            question_count: 0,
            question_limit: DEFAULT_QUESTION_LIMIT,
        }
    }

    pub fn with_question_limit(mut self, limit: u32) -> Self {
        self.question_limit = limit;
        self
    }

    pub fn set_question_limit(&mut self, limit: u32) {
        self.question_limit = limit;
    }

    pub fn root(&self) -> &KnowledgeNode {
        &self.root
    }

    pub fn question_limit(&self) -> u32 {
        self.question_limit
    }

    /// Questions asked so far this round, counting the one being asked.
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn is_traversing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Checks the shape invariants: the root is a question, every node has either no children
    /// or both, and no text is blank.
    pub fn validate(&self) -> Result<()> {
        if self.root.is_answer() {
            return Err(Error::MalformedKnowledge {
                message: "the root must be a question".to_string(),
            });
        }

        let mut pending = vec![&self.root];
        while let Some(node) = pending.pop() {
            if node.text.trim().is_empty() {
                return Err(Error::MalformedKnowledge {
                    message: "a node has empty text".to_string(),
                });
            }

            match (node.yes.as_deref(), node.no.as_deref()) {
                (None, None) => {}
                (Some(yes), Some(no)) => {
                    pending.push(yes);
                    pending.push(no);
                }
                _ => {
                    return Err(Error::MalformedKnowledge {
                        message: format!("{:?} has only one branch", node.text),
                    });
                }
            }
        }

        Ok(())
    }

    /// Puts the cursor on the root and starts counting questions from one.
    pub fn start_traversal(&mut self) {
        self.cursor = Some(Vec::new());
        self.question_count = 1;
    }

    /// Forgets the cursor.
    pub fn end_traversal(&mut self) {
        self.cursor = None;
        self.question_count = 0;
    }

    /// The node under the cursor.
    pub fn current_node(&self) -> Option<&KnowledgeNode> {
        let path = self.cursor.as_ref()?;
        let mut node = &self.root;
        for &answer in path {
            node = node.child(answer)?;
        }
        Some(node)
    }

    fn current_node_mut(&mut self) -> Option<&mut KnowledgeNode> {
        let path = self.cursor.as_ref()?;
        let mut node = &mut self.root;
        for &answer in path {
            node = node.child_mut(answer)?;
        }
        Some(node)
    }

    /// Follows the branch for `answer` and counts one more question.
    ///
    /// Fails without moving if no traversal is running or the cursor is already on an answer.
    pub fn advance(&mut self, answer: Answer) -> Result<()> {
        let Some(node) = self.current_node() else {
            error!("cannot advance the knowledge cursor before starting a traversal");
            return Err(Error::TraversalNotStarted);
        };
        if node.is_answer() {
            error!("cannot advance the knowledge cursor past the answer {:?}", node.text);
            return Err(Error::AdvanceFromAnswer);
        }

        if let Some(path) = self.cursor.as_mut() {
            path.push(answer);
        }
        self.question_count += 1;
        Ok(())
    }

    /// Decides what to present for the cursor position.
    ///
    /// An answer is always guessed, even on the last allowed question. Otherwise, once more
    /// than `question_limit` questions have been counted the machine gives up.
    pub fn resolve_current(&self) -> Result<Resolution<'_>> {
        let node = self.current_node().ok_or(Error::TraversalNotStarted)?;
        if node.is_answer() {
            return Ok(Resolution::Guess(&node.text));
        }

        if self.question_count > self.question_limit {
            return Ok(Resolution::GiveUp);
        }

        Ok(Resolution::Question(&node.text))
    }

    /// Replaces the wrongly guessed answer under the cursor with `correction.question`, whose
    /// branches hold the new answer and the old guess.
    ///
    /// The traversal ends afterwards, since the cursor no longer points at an answer.
    pub fn learn(&mut self, correction: Correction) -> Result<()> {
        let question = normalize_question(&correction.question)?;
        let answer = normalize_answer(&correction.answer)?;

        let node = self.current_node_mut().ok_or(Error::TraversalNotStarted)?;
        if !node.is_answer() {
            return Err(Error::NotAnAnswer);
        }

        let old_guess = std::mem::replace(&mut node.text, question);
        node.set_child(correction.answer_branch, KnowledgeNode::answer(answer));
        node.set_child(
            correction.answer_branch.opposite(),
            KnowledgeNode::answer(old_guess),
        );
        info!("learned {:?}", node.text);

        self.end_traversal();
        Ok(())
    }

    /// Node texts, each node before its `yes` then `no` subtrees.
    pub fn pre_order(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        visit_pre_order(&self.root, &mut texts);
        texts
    }

    /// Node texts, `yes` subtree, then the node, then the `no` subtree.
    pub fn in_order(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        visit_in_order(&self.root, &mut texts);
        texts
    }

    /// Node texts, each node after its `yes` then `no` subtrees.
    pub fn post_order(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        visit_post_order(&self.root, &mut texts);
        texts
    }
}

fn visit_pre_order<'a>(node: &'a KnowledgeNode, texts: &mut Vec<&'a str>) {
    texts.push(&node.text);
    if let Some(yes) = node.yes.as_deref() {
        visit_pre_order(yes, texts);
    }
    if let Some(no) = node.no.as_deref() {
        visit_pre_order(no, texts);
    }
}

fn visit_in_order<'a>(node: &'a KnowledgeNode, texts: &mut Vec<&'a str>) {
    if let Some(yes) = node.yes.as_deref() {
        visit_in_order(yes, texts);
    }
    texts.push(&node.text);
    if let Some(no) = node.no.as_deref() {
        visit_in_order(no, texts);
    }
}

fn visit_post_order<'a>(node: &'a KnowledgeNode, texts: &mut Vec<&'a str>) {
    if let Some(yes) = node.yes.as_deref() {
        visit_post_order(yes, texts);
    }
    if let Some(no) = node.no.as_deref() {
        visit_post_order(no, texts);
    }
    texts.push(&node.text);
}

/// Trims `text`, capitalizes its first letter and makes sure it ends in a question mark.
pub fn normalize_question(text: &str) -> Result<String> {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return Err(Error::EmptyText);
    };

    let mut question: String = first.to_uppercase().chain(chars).collect();
    if !question.ends_with('?') {
        question.push('?');
    }
    Ok(question)
}

fn normalize_answer(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyText);
    }
    Ok(trimmed.to_string())
}
