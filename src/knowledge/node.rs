use serde::{Deserialize, Serialize};

/// Which branch of a question to follow.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn opposite(self) -> Answer {
        match self {
            Answer::Yes => Answer::No,
            Answer::No => Answer::Yes,
        }
    }
}

/// A node of the knowledge tree.
///
/// Questions always have both a `yes` and a `no` child; answers (guesses) have neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes: Option<Box<KnowledgeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<Box<KnowledgeNode>>,
}

impl KnowledgeNode {
    /// Creates an answer node.
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            yes: None,
            no: None,
        }
    }

    /// Creates a question node with its two branches.
    pub fn question(text: impl Into<String>, yes: KnowledgeNode, no: KnowledgeNode) -> Self {
        Self {
            text: text.into(),
            yes: Some(Box::new(yes)),
            no: Some(Box::new(no)),
        }
    }

    /// Hangs `node` on the `answer` branch, replacing whatever was there.
    pub fn set_child(&mut self, answer: Answer, node: KnowledgeNode) {
        let slot = match answer {
            Answer::Yes => &mut self.yes,
            Answer::No => &mut self.no,
        };
        *slot = Some(Box::new(node));
    }

    /// True when the node has no children, i.e. it is a guess.
    pub fn is_answer(&self) -> bool {
        self.yes.is_none() && self.no.is_none()
    }

    pub fn child(&self, answer: Answer) -> Option<&KnowledgeNode> {
        match answer {
            Answer::Yes => self.yes.as_deref(),
            Answer::No => self.no.as_deref(),
        }
    }

    pub fn child_mut(&mut self, answer: Answer) -> Option<&mut KnowledgeNode> {
        match answer {
            Answer::Yes => self.yes.as_deref_mut(),
            Answer::No => self.no.as_deref_mut(),
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        let yes = self.yes.as_ref().map_or(0, |node| node.depth());
        let no = self.no.as_ref().map_or(0, |node| node.depth());
        1 + yes.max(no)
    }
}
