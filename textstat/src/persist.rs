use crate::model::{StatisticsRecord, Subject};
use crate::store::StatisticsStore;
use anyhow::{bail, Context, Result};
use std::fs::{create_dir_all, remove_file, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Statistics records as pretty JSON files, one per subject:
/// `<root>/documents/<id>.json` and `<root>/collections/<id>.json`.
pub struct JsonDirStore {
    pub root: PathBuf,
}

impl JsonDirStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn documents_dir(&self) -> PathBuf { self.root.join("documents") }
    fn collections_dir(&self) -> PathBuf { self.root.join("collections") }

    fn path_for(&self, subject: &Subject) -> PathBuf {
        match subject {
            Subject::Document(id) => self.documents_dir().join(format!("{}.json", file_stem(id))),
            Subject::Collection(id) => self.collections_dir().join(format!("{}.json", file_stem(id))),
        }
    }
}

/// Ids may be relative paths; keep them to one file name. Every byte other
/// than ASCII alphanumerics, `-` and `.` is written as `%XX`, so distinct ids
/// never share a file.
fn file_stem(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for b in id.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'.' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

impl StatisticsStore for JsonDirStore {
    fn put(&mut self, record: StatisticsRecord) -> Result<()> {
        let path = self.path_for(&record.subject);
        if let Some(dir) = path.parent() { create_dir_all(dir)?; }
        let mut f = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let json = serde_json::to_string_pretty(&record)?;
        f.write_all(json.as_bytes())?;
        Ok(())
    }

    fn get(&self, subject: &Subject) -> Result<Option<StatisticsRecord>> {
        let path = self.path_for(subject);
        let mut f = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("opening {}", path.display())),
        };
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;
        let record: StatisticsRecord = serde_json::from_str(&buf)?;
        if record.subject != *subject {
            bail!("{} holds {:?}, expected {:?}", path.display(), record.subject, subject);
        }
        Ok(Some(record))
    }

    fn clear(&mut self, subject: &Subject) -> Result<()> {
        match remove_file(self.path_for(subject)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
