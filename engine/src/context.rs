use std::collections::HashMap;
use std::path::PathBuf;

use weave::fragment::{Fragment, find_placeholder_mut, has_placeholder};

use crate::error::UsageError;

/// How a feed attaches to the accumulated source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedOptions {
    /// Replace the previous feed with the same identity instead of appending.
    pub redo: bool,
    /// Fill the named, still-empty placeholder in place.
    pub insert_into: Option<String>,
    /// Insert immediately after the named block.
    pub insert_after: Option<String>,
}

/// The growing content of one logical source: fed fragments in document
/// order. Placeholder fills mutate the trees in place.
#[derive(Debug, Clone, Default)]
struct SourceEntry {
    fragments: Vec<Fragment>,
}

impl SourceEntry {
    fn lines(&self) -> Vec<String> {
        self.fragments.iter().flat_map(|f| f.lines()).collect()
    }

    /// Latest fed fragment carrying the given block name.
    fn block_position(&self, name: &str) -> Option<usize> {
        self.fragments
            .iter()
            .rposition(|f| f.name.as_deref() == Some(name))
    }
}

/// Saved state of one logical source, taken before a command mutates it.
#[derive(Debug)]
pub struct Checkpoint(Option<SourceEntry>);

/// The per-render source accumulator: one accumulating source tree per
/// logical name. Created fresh at the start of a render and discarded at
/// its end; only `write_all` persists anything.
#[derive(Debug)]
pub struct SourceSet {
    sources: HashMap<String, SourceEntry>,
    out_dir: PathBuf,
}

impl SourceSet {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        SourceSet {
            sources: HashMap::new(),
            out_dir: out_dir.into(),
        }
    }

    /// Merge a fragment into the named source. All-or-nothing: the target is
    /// validated before anything mutates, so a failed feed leaves the entry
    /// exactly as it was.
    pub fn feed(
        &mut self,
        source: &str,
        fragment: Fragment,
        options: &FeedOptions,
    ) -> Result<(), UsageError> {
        if let Some(anchor) = options.insert_into.as_deref() {
            let Some(entry) = self.sources.get_mut(source) else {
                return Err(UsageError::UnknownPlaceholder {
                    source: source.to_string(),
                    name: anchor.to_string(),
                });
            };
            for fed in &mut entry.fragments {
                if let Some(children) = find_placeholder_mut(&mut fed.parts, anchor, options.redo)
                {
                    *children = fragment.parts;
                    return Ok(());
                }
            }
            let exists = entry
                .fragments
                .iter()
                .any(|f| has_placeholder(&f.parts, anchor));
            Err(if exists {
                UsageError::PlaceholderFilled {
                    source: source.to_string(),
                    name: anchor.to_string(),
                }
            } else {
                UsageError::UnknownPlaceholder {
                    source: source.to_string(),
                    name: anchor.to_string(),
                }
            })
        } else if let Some(after) = options.insert_after.as_deref() {
            let Some(entry) = self.sources.get_mut(source) else {
                return Err(UsageError::UnknownBlock {
                    source: source.to_string(),
                    name: after.to_string(),
                });
            };
            match entry.block_position(after) {
                Some(position) => {
                    entry.fragments.insert(position + 1, fragment);
                    Ok(())
                }
                None => Err(UsageError::UnknownBlock {
                    source: source.to_string(),
                    name: after.to_string(),
                }),
            }
        } else if options.redo {
            let Some(identity) = fragment.name.clone() else {
                return Err(UsageError::RedoWithoutIdentity);
            };
            let entry = self.sources.entry(source.to_string()).or_default();
            match entry.block_position(&identity) {
                Some(position) => entry.fragments[position] = fragment,
                None => entry.fragments.push(fragment),
            }
            Ok(())
        } else {
            self.sources
                .entry(source.to_string())
                .or_default()
                .fragments
                .push(fragment);
            Ok(())
        }
    }

    /// Discard everything accumulated for the source; afterwards it is
    /// indistinguishable from a source that was never fed.
    pub fn restart(&mut self, source: &str) {
        self.sources.remove(source);
    }

    /// Capture the source's current state so a later `rollback` can undo
    /// restarts and feeds applied since.
    pub fn checkpoint(&self, source: &str) -> Checkpoint {
        Checkpoint(self.sources.get(source).cloned())
    }

    pub fn rollback(&mut self, source: &str, checkpoint: Checkpoint) {
        match checkpoint.0 {
            Some(entry) => {
                self.sources.insert(source.to_string(), entry);
            }
            None => {
                self.sources.remove(source);
            }
        }
    }

    /// Read back previously fed content without feeding anything new: the
    /// whole source, or just the latest block fed under `block`.
    pub fn recall(&self, source: &str, block: Option<&str>) -> Result<Vec<String>, UsageError> {
        let entry = self
            .sources
            .get(source)
            .ok_or_else(|| UsageError::UnknownSource(source.to_string()))?;
        match block {
            None => Ok(entry.lines()),
            Some(name) => entry
                .block_position(name)
                .map(|position| entry.fragments[position].lines())
                .ok_or_else(|| UsageError::UnknownBlock {
                    source: source.to_string(),
                    name: name.to_string(),
                }),
        }
    }

    pub fn is_empty(&self, source: &str) -> bool {
        self.sources.get(source).is_none_or(|e| e.lines().is_empty())
    }

    pub fn line_count(&self, source: &str) -> usize {
        self.sources.get(source).map_or(0, |e| e.lines().len())
    }

    /// Current resolved text of a source; empty if never fed. Non-empty
    /// text always ends with a newline.
    pub fn text(&self, source: &str) -> String {
        let Some(entry) = self.sources.get(source) else {
            return String::new();
        };
        let lines = entry.lines();
        if lines.is_empty() {
            String::new()
        } else {
            let mut text = lines.join("\n");
            text.push('\n');
            text
        }
    }

    /// All logical source names currently accumulated, sorted.
    pub fn source_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Flush every accumulated source to its file under the output
    /// directory. Idempotent: later calls overwrite with current state.
    pub fn write_all(&self) -> Result<(), std::io::Error> {
        std::fs::create_dir_all(&self.out_dir)?;
        for name in self.source_names() {
            std::fs::write(self.out_dir.join(name), self.text(name))?;
        }
        Ok(())
    }
}
