use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Identity of one loaded script. Reloading a file yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptId(Uuid);

impl ScriptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScriptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text shown in the prompter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub id: ScriptId,
    pub title: String,
    pub content: String,
}

impl Script {
    pub fn from_text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: ScriptId::new(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Read a UTF-8 text file; the title is the file stem
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(bytes)
            .map_err(|_| Error::Script(format!("{} is not valid UTF-8", path.display())))?;
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        Ok(Self::from_text(title, content))
    }

    /// Whitespace-separated words, `None` for blank content
    pub fn word_count(&self) -> Option<u32> {
        let count = self.content.split_whitespace().count();
        if count == 0 {
            None
        } else {
            Some(u32::try_from(count).unwrap_or(u32::MAX))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_word_count() {
        let script = Script::from_text("t", "  Good evening,\n and welcome\tback. ");
        assert_eq!(script.word_count(), Some(5));
        assert_eq!(Script::from_text("t", " \n\t ").word_count(), None);
    }

    #[test]
    fn test_load_assigns_fresh_identity() {
        let dir = std::env::temp_dir().join(format!("scrollcue-script-{}", ScriptId::new()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("opening.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"Hello there")
            .unwrap();

        let first = Script::load(&path).unwrap();
        let second = Script::load(&path).unwrap();
        assert_eq!(first.title, "opening");
        assert_eq!(first.content, "Hello there");
        assert_ne!(first.id, second.id);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let dir = std::env::temp_dir().join(format!("scrollcue-script-{}", ScriptId::new()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(Script::load(&path), Err(Error::Script(_))));
        assert!(matches!(
            Script::load(&dir.join("missing.txt")),
            Err(Error::Io(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
