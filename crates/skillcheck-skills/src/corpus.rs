use skillcheck_config::LayoutConfig;
use skillcheck_core::{CheckError, DocumentClass};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// A document file found on disk, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub path: PathBuf,
    pub rel_path: String,
    pub class: DocumentClass,
}

/// The directory layout of one skills repository.
///
/// Every file named `document_file` below the content root is a document.
/// Those inside the drafts subtree are classified [`DocumentClass::Draft`].
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    content_root: PathBuf,
    drafts_dir: PathBuf,
    catalog_path: PathBuf,
    document_file: String,
}

impl Corpus {
    pub fn new(root: &Path, layout: &LayoutConfig) -> Self {
        let root = normalize_path(root);
        Self {
            content_root: normalize_path(&root.join(&layout.content_root)),
            drafts_dir: normalize_path(&root.join(&layout.drafts_dir)),
            catalog_path: normalize_path(&root.join(&layout.catalog_path)),
            document_file: layout.document_file.clone(),
            root,
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// Find every document under the content root, sorted by path.
    ///
    /// A missing content root is fatal: there is nothing to validate.
    pub fn discover(&self) -> skillcheck_core::Result<Vec<DocumentRef>> {
        if !self.content_root.is_dir() {
            return Err(CheckError::Corpus(format!(
                "content root {} does not exist or is not a directory",
                self.content_root.display()
            )));
        }

        let mut files = Vec::new();
        self.collect(&self.content_root, &mut files)?;
        files.sort();

        let docs: Vec<DocumentRef> = files
            .into_iter()
            .map(|path| DocumentRef {
                rel_path: self.rel_path(&path),
                class: self.classify(&path),
                path,
            })
            .collect();

        info!(
            root = %self.content_root.display(),
            documents = docs.len(),
            "discovered skill documents"
        );
        Ok(docs)
    }

    fn collect(&self, dir: &Path, out: &mut Vec<PathBuf>) -> skillcheck_core::Result<()> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CheckError::Corpus(format!("failed to read {}: {}", dir.display(), e))
        })?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');

            if path.is_dir() {
                if hidden {
                    debug!(?path, "skipping hidden directory");
                    continue;
                }
                self.collect(&path, out)?;
            } else if path
                .file_name()
                .is_some_and(|n| n == self.document_file.as_str())
            {
                out.push(path);
            }
        }
        Ok(())
    }

    /// Draft when the path lies inside the drafts subtree, active otherwise.
    pub fn classify(&self, path: &Path) -> DocumentClass {
        if normalize_path(path).starts_with(&self.drafts_dir) {
            DocumentClass::Draft
        } else {
            DocumentClass::Active
        }
    }

    /// Root-relative, `/`-separated form of `path`.
    pub fn rel_path(&self, path: &Path) -> String {
        rel_posix(&self.root, path)
    }
}

pub fn rel_posix(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::CurDir => Some(".".to_string()),
            Component::ParentDir => Some("..".to_string()),
            Component::RootDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexically resolve `.` and `..` without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut has_root = false;

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => {
                has_root = true;
                out.push(Path::new("/"));
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !has_root {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }

    out
}
