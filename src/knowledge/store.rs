use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::QuestionsConfig;
use crate::error::{Error, Result};
use crate::knowledge::tree::KnowledgeTree;

/// Port for persisting the knowledge tree between rounds.
///
/// The game only talks to this trait, so storage can be swapped (a file, memory in tests)
/// without touching the dialogue logic.
pub trait KnowledgeStore {
    /// Whether anything has been stored.
    fn exists(&self) -> bool;

    /// Loads the stored tree.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is stored, it cannot be read, or it does not decode into a
    /// well-formed tree.
    fn load(&self) -> Result<KnowledgeTree>;

    /// Replaces whatever is stored with `tree`.
    fn save(&self, tree: &KnowledgeTree) -> Result<()>;

    /// Forgets the stored tree. Deleting when nothing is stored succeeds.
    fn delete(&self) -> Result<()>;
}

/// Loads stored knowledge, treating any failure as "nothing known yet".
pub fn load_knowledge<S: KnowledgeStore + ?Sized>(store: &S) -> Option<KnowledgeTree> {
    if !store.exists() {
        return None;
    }

    match store.load() {
        Ok(tree) => Some(tree),
        Err(err) => {
            warn!("ignoring stored knowledge: {err}");
            None
        }
    }
}

/// Stores the tree as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store at the configured `knowledge_path`.
    pub fn from_config(config: &QuestionsConfig) -> Self {
        Self::new(config.knowledge_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KnowledgeStore for JsonFileStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<KnowledgeTree> {
        let file = File::open(&self.path).map_err(|source| Error::Io {
            operation: format!("open knowledge file {:?}", self.path),
            source,
        })?;

        let tree: KnowledgeTree = serde_json::from_reader(BufReader::new(file))?;
        tree.validate()?;
        Ok(tree)
    }

    fn save(&self, tree: &KnowledgeTree) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let file = File::create(&self.path).map_err(|source| Error::Io {
            operation: format!("create knowledge file {:?}", self.path),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tree)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("write knowledge file {:?}", self.path),
            source,
        })?;

        info!("saved knowledge to {:?}", self.path);
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("deleted knowledge at {:?}", self.path);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Io {
                operation: format!("delete knowledge file {:?}", self.path),
                source,
            }),
        }
    }
}
