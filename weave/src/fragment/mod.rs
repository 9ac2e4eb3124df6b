pub mod expand;
pub mod lexer;

/// One element of a fragment: either resolved text or a named hole.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// An immutable run of source lines.
    Text(Vec<String>),
    /// A named anchor to be filled later. Every occurrence of a name is its
    /// own anchor, never a shared reference; children stay empty until a
    /// feed targets the name.
    Placeholder { name: String, children: Vec<Part> },
}

impl Part {
    pub fn placeholder(name: impl Into<String>) -> Part {
        Part::Placeholder {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Append this part's resolved lines, recursing into filled placeholders.
    fn collect_lines(&self, out: &mut Vec<String>) {
        match self {
            Part::Text(lines) => out.extend(lines.iter().cloned()),
            Part::Placeholder { children, .. } => {
                for child in children {
                    child.collect_lines(out);
                }
            }
        }
    }
}

/// An ordered sequence of parts representing one unit of authored source.
/// The optional name is the human-assigned block label (distinct from
/// placeholder names) used for selective recall and omission display.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub name: Option<String>,
    pub parts: Vec<Part>,
}

impl Fragment {
    pub fn new(name: Option<String>, parts: Vec<Part>) -> Fragment {
        Fragment { name, parts }
    }

    /// The fragment's resolved lines, placeholders contributing whatever has
    /// been fed into them so far.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for part in &self.parts {
            part.collect_lines(&mut out);
        }
        out
    }

    pub fn line_count(&self) -> usize {
        self.lines().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

/// Find the first placeholder named `name`, in document order, recursing
/// into already-filled anchors. Unless `include_filled`, anchors that
/// already have content are skipped (but still searched within).
pub fn find_placeholder_mut<'a>(
    parts: &'a mut [Part],
    name: &str,
    include_filled: bool,
) -> Option<&'a mut Vec<Part>> {
    for part in parts {
        if let Part::Placeholder {
            name: anchor,
            children,
        } = part
        {
            if anchor == name && (include_filled || children.is_empty()) {
                return Some(children);
            }
            if let Some(found) = find_placeholder_mut(children, name, include_filled) {
                return Some(found);
            }
        }
    }
    None
}

/// Whether any placeholder named `name` exists anywhere in the parts,
/// filled or not.
pub fn has_placeholder(parts: &[Part], name: &str) -> bool {
    parts.iter().any(|part| match part {
        Part::Text(_) => false,
        Part::Placeholder {
            name: anchor,
            children,
        } => anchor == name || has_placeholder(children, name),
    })
}
