//! Function search path
//!
//! An ordered list of directories searched for function files. Front ends
//! edit it through [`PathChange`] requests and learn about edits by
//! subscribing to updates.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Separator between directories in a path string
pub const PATH_SEP: char = if cfg!(windows) { ';' } else { ':' };

/// Extension of function files
pub const FCN_FILE_EXT: &str = "m";

const SAVED_BEGIN: &str = "%% Begin saved path";
const SAVED_END: &str = "%% End saved path";

/// Where `add` places new directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Begin,
    End,
}

/// Direction for reordering selected entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Top,
    Bottom,
}

/// A request to modify the path: add (prepend) or remove `dirs`,
/// optionally expanding each to itself and all its subdirectories.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathChange {
    pub dirs: Vec<PathBuf>,
    #[serde(default)]
    pub remove: bool,
    #[serde(default)]
    pub subdirs: bool,
}

type Observer = Box<dyn Fn(&[PathBuf])>;

/// The load path
pub struct LoadPath {
    dirs: Vec<PathBuf>,
    default_dirs: Vec<PathBuf>,
    /// Path as it was when created or last loaded
    initial: Vec<PathBuf>,
    /// Path before the most recent change
    previous: Option<Vec<PathBuf>>,
    observers: Vec<Observer>,
}

impl LoadPath {
    /// Create a path holding `default_dirs`
    pub fn new(default_dirs: Vec<PathBuf>) -> Self {
        LoadPath {
            dirs: default_dirs.clone(),
            initial: default_dirs.clone(),
            default_dirs,
            previous: None,
            observers: Vec::new(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn default_dirs(&self) -> &[PathBuf] {
        &self.default_dirs
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| d == dir)
    }

    /// Register a callback run with the new directory list after every
    /// change
    pub fn subscribe(&mut self, observer: impl Fn(&[PathBuf]) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn update(&mut self, dirs: Vec<PathBuf>) {
        if dirs == self.dirs {
            return;
        }
        let old = std::mem::replace(&mut self.dirs, dirs);
        self.previous = Some(old);
        for observer in &self.observers {
            observer(&self.dirs);
        }
    }

    /// Add directories at the front or back of the path.
    ///
    /// Directories that do not exist are skipped. A directory already on the
    /// path is moved to the new position. Returns warning messages.
    pub fn add<P: AsRef<Path>>(&mut self, dirs: &[P], position: Position) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut added: Vec<PathBuf> = Vec::new();
        for dir in dirs {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                warnings.push(format!("addpath: {}: No such file or directory", dir.display()));
            } else if !added.iter().any(|d| d == dir) {
                added.push(dir.to_path_buf());
            }
        }

        let rest = self.dirs.iter().filter(|d| !added.contains(d)).cloned();
        let dirs = match position {
            Position::Begin => added.iter().cloned().chain(rest).collect(),
            Position::End => rest.chain(added.iter().cloned()).collect(),
        };
        self.update(dirs);
        warnings
    }

    /// Remove directories from the path. Returns warning messages.
    pub fn remove<P: AsRef<Path>>(&mut self, dirs: &[P]) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut kept = self.dirs.clone();
        for dir in dirs {
            let dir = dir.as_ref();
            let before = kept.len();
            kept.retain(|d| d != dir);
            if kept.len() == before {
                warnings.push(format!("rmpath: {}: not found", dir.display()));
            }
        }
        self.update(kept);
        warnings
    }

    /// Replace the whole path
    pub fn set(&mut self, dirs: Vec<PathBuf>) {
        let mut unique: Vec<PathBuf> = Vec::with_capacity(dirs.len());
        for dir in dirs {
            if !unique.contains(&dir) {
                unique.push(dir);
            }
        }
        self.update(unique);
    }

    /// Reset to the default directories
    pub fn restore_default(&mut self) {
        self.update(self.default_dirs.clone());
    }

    /// Move the entries at `indices` one step or to an end, keeping their
    /// relative order. Out-of-range indices are ignored.
    pub fn move_entries(&mut self, indices: &[usize], direction: Move) {
        let mut selected: Vec<usize> = indices.iter().copied().filter(|&i| i < self.dirs.len()).collect();
        selected.sort_unstable();
        selected.dedup();
        if selected.is_empty() {
            return;
        }

        let mut dirs = self.dirs.clone();
        // selected entries held in place by the edge or a held neighbour
        let mut held = vec![false; dirs.len()];
        match direction {
            Move::Up => {
                for &i in &selected {
                    if i == 0 || held[i - 1] {
                        held[i] = true;
                    } else {
                        dirs.swap(i - 1, i);
                    }
                }
            }
            Move::Down => {
                for &i in selected.iter().rev() {
                    if i + 1 == dirs.len() || held[i + 1] {
                        held[i] = true;
                    } else {
                        dirs.swap(i, i + 1);
                    }
                }
            }
            Move::Top | Move::Bottom => {
                let (picked, rest): (Vec<_>, Vec<_>) = dirs
                    .into_iter()
                    .enumerate()
                    .partition(|(i, _)| selected.contains(i));
                let picked = picked.into_iter().map(|(_, d)| d);
                let rest = rest.into_iter().map(|(_, d)| d);
                dirs = if direction == Move::Top {
                    picked.chain(rest).collect()
                } else {
                    rest.chain(picked).collect()
                };
            }
        }
        self.update(dirs);
    }

    /// Undo the most recent change. Returns false if there is none.
    ///
    /// Only one change is remembered, and a revert cannot itself be undone.
    pub fn revert_last(&mut self) -> bool {
        match self.previous.take() {
            Some(previous) => {
                self.update(previous);
                self.previous = None;
                true
            }
            None => false,
        }
    }

    /// Return to the path as it was when created or last loaded
    pub fn revert_initial(&mut self) {
        self.update(self.initial.clone());
    }

    /// Handle a modify request: expand with [`genpath`] when asked, then
    /// remove or prepend. Returns warning messages.
    pub fn apply(&mut self, change: &PathChange) -> Vec<String> {
        let mut warnings = Vec::new();
        let dirs: Vec<PathBuf> = if change.subdirs {
            let mut dirs = Vec::new();
            for dir in &change.dirs {
                let (expanded, walk_warnings) = genpath(dir, &[]);
                warnings.extend(walk_warnings);
                if expanded.is_empty() {
                    dirs.push(dir.clone());
                } else {
                    dirs.extend(expanded);
                }
            }
            dirs
        } else {
            change.dirs.clone()
        };

        warnings.extend(if change.remove {
            self.remove(&dirs)
        } else {
            self.add(&dirs, Position::Begin)
        });
        warnings
    }

    /// First `DIR/NAME.m` on the path
    pub fn find_fcn_file(&self, name: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| dir.join(format!("{name}.{FCN_FILE_EXT}")))
            .find(|file| file.is_file())
    }

    /// Directories joined with [`PATH_SEP`]
    pub fn to_path_string(&self) -> String {
        join_path(&self.dirs)
    }

    /// Write the path to a pathdef file.
    ///
    /// When `file` already exists only the saved section is replaced; text
    /// around it is kept.
    pub fn save(&self, file: &Path) -> io::Result<()> {
        let section = saved_section(&self.dirs);
        let text = match fs::read_to_string(file) {
            Ok(existing) => match section_bounds(&existing) {
                Some((begin, end)) => format!("{}{}{}", &existing[..begin], section, &existing[end..]),
                None => format!("{existing}\n{section}"),
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
                format!("% numcall load path, saved {stamp}\n% Only the saved section below is read back.\n\n{section}")
            }
            Err(err) => return Err(err),
        };
        fs::write(file, text)
    }

    /// Read the directories saved by [`LoadPath::save`]
    pub fn load_saved(file: &Path) -> io::Result<Vec<PathBuf>> {
        let text = fs::read_to_string(file)?;
        let (begin, end) = section_bounds(&text).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: no saved path section", file.display()),
            )
        })?;
        Ok(text[begin..end]
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('%'))
            .map(PathBuf::from)
            .collect())
    }

    /// Replace the path with a saved one; it becomes the new initial path
    pub fn load(&mut self, file: &Path) -> io::Result<()> {
        let dirs = Self::load_saved(file)?;
        self.initial = dirs.clone();
        self.set(dirs);
        Ok(())
    }
}

impl Default for LoadPath {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for LoadPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadPath")
            .field("dirs", &self.dirs)
            .field("default_dirs", &self.default_dirs)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn saved_section(dirs: &[PathBuf]) -> String {
    let mut out = String::new();
    out.push_str(SAVED_BEGIN);
    out.push('\n');
    for dir in dirs {
        out.push_str(&dir.display().to_string());
        out.push('\n');
    }
    out.push_str(SAVED_END);
    out.push('\n');
    out
}

/// Byte range of the saved section, markers included. A section whose end
/// marker is missing runs to the end of the text.
fn section_bounds(text: &str) -> Option<(usize, usize)> {
    let begin = text.find(SAVED_BEGIN)?;
    let Some(end_marker) = text[begin..].find(SAVED_END).map(|at| begin + at) else {
        return Some((begin, text.len()));
    };
    let mut end = end_marker + SAVED_END.len();
    if text[end..].starts_with('\n') {
        end += 1;
    }
    Some((begin, end))
}

/// Join directories with [`PATH_SEP`]
pub fn join_path(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(&PATH_SEP.to_string())
}

/// Split a path string on [`PATH_SEP`], dropping empty elements
pub fn parse_path_string(path: &str) -> Vec<PathBuf> {
    path.split(PATH_SEP)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// `dir` followed by all its subdirectories, depth-first in name order,
/// plus a warning for each directory that could not be read.
///
/// Names starting with `.`, `@` or `+`, the name `private`, and names in
/// `skip` are not descended into. Returns nothing if `dir` is not a
/// directory.
pub fn genpath(dir: &Path, skip: &[&str]) -> (Vec<PathBuf>, Vec<String>) {
    let mut dirs = Vec::new();
    let mut warnings = Vec::new();
    if !dir.is_dir() {
        return (dirs, warnings);
    }

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || is_path_dir(entry, skip));
    for entry in walker {
        match entry {
            Ok(entry) => dirs.push(entry.into_path()),
            Err(err) => warnings.push(format!("genpath: {err}")),
        }
    }
    (dirs, warnings)
}

fn is_path_dir(entry: &walkdir::DirEntry, skip: &[&str]) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_str().is_some_and(|name| !skip_dir(name, skip))
}

fn skip_dir(name: &str, skip: &[&str]) -> bool {
    name.starts_with(['.', '@', '+']) || name == "private" || skip.contains(&name)
}
