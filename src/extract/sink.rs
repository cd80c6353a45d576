use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A destination for extracted artifacts
pub trait Sink {
    /// Store `data` under `name`. Each artifact is written by exactly one call
    fn write_artifact(&mut self, name: &str, data: &[u8]) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write_artifact(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        (**self).write_artifact(name, data)
    }
}

/// Writes every artifact as a file directly inside a directory
#[derive(Debug, Clone)]
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    /// Write into `root`, which must already exist
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Write into `root`, creating it and any missing parents
    pub fn create<P: Into<PathBuf>>(root: P) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Sink for DirSink {
    fn write_artifact(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        let mut file = File::create(self.root.join(name))?;
        file.write_all(data)?;
        file.flush()
    }
}

/// Keeps artifacts in memory, in the order they were written
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    artifacts: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[(String, Vec<u8>)] {
        &self.artifacts
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.artifacts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| &data[..])
    }

    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|(n, _)| &n[..]).collect()
    }

    pub fn into_inner(self) -> Vec<(String, Vec<u8>)> {
        self.artifacts
    }
}

impl Sink for MemorySink {
    fn write_artifact(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        self.artifacts.push((name.to_owned(), data.to_vec()));
        Ok(())
    }
}
