use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use weave::directive::Directive;
use weave::display::DisplayBlock;

use crate::error::EngineError;

/// Exact-match identity of one authored command: kind, positional
/// arguments, option set, and literal content. Options are held sorted so
/// declaration order never affects equality or hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: String,
    args: Vec<String>,
    options: BTreeMap<String, String>,
    content: Vec<String>,
}

impl CacheKey {
    pub fn new(
        kind: impl Into<String>,
        args: Vec<String>,
        options: &[(String, String)],
        content: Vec<String>,
    ) -> Self {
        CacheKey {
            kind: kind.into(),
            args,
            options: options.iter().cloned().collect(),
            content,
        }
    }

    pub fn of(directive: &Directive) -> Self {
        CacheKey::new(
            directive.kind.key_name(),
            directive.args.clone(),
            &directive.options,
            directive.content.clone(),
        )
    }
}

/// Memoizes directive results for the lifetime of one render. Each distinct
/// key invokes its producer at most once; every later call with an equal
/// key returns the same stored result. Failures are never stored, so the
/// next attempt with the same key retries the producer.
#[derive(Debug, Default)]
pub struct RunCache {
    entries: HashMap<CacheKey, Rc<Vec<DisplayBlock>>>,
}

impl RunCache {
    pub fn new() -> Self {
        RunCache::default()
    }

    pub fn run_cached<F>(
        &mut self,
        key: CacheKey,
        producer: F,
    ) -> Result<Rc<Vec<DisplayBlock>>, EngineError>
    where
        F: FnOnce() -> Result<Vec<DisplayBlock>, EngineError>,
    {
        if let Some(hit) = self.entries.get(&key) {
            return Ok(Rc::clone(hit));
        }
        let produced = Rc::new(producer()?);
        self.entries.insert(key, Rc::clone(&produced));
        Ok(produced)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
