//! Document traversal and candidate collection.
//!
//! Traversal is pure: [`collect_candidates`] only reads the tree and returns
//! the mutations to perform. [`apply_candidates`] performs them afterwards.

use xmltree::{Element, XMLNode};

use super::filter::{
    ID_ATTRIBUTE, IdFilter, VERSION_ATTRIBUTE, is_dependency, pin_version, qualified_name,
};

/// An element reached during a pre-order walk.
#[derive(Debug, Clone)]
pub struct Visit<'a> {
    /// Child indices leading from the root to this element.
    pub path: Vec<usize>,
    /// Slash-separated element names from the root to this element.
    pub location: String,
    /// The element itself.
    pub element: &'a Element,
}

/// Pre-order depth-first iterator over every element of a tree, root
/// included.
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> Walk<'a> {
    /// Starts a walk at `root`.
    pub fn new(root: &'a Element) -> Self {
        Self {
            stack: vec![Visit {
                path: Vec::new(),
                location: qualified_name(root),
                element: root,
            }],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;

        // Reverse push keeps document order on pop.
        for (index, child) in visit.element.children.iter().enumerate().rev() {
            if let XMLNode::Element(child) = child {
                let mut path = visit.path.clone();
                path.push(index);
                self.stack.push(Visit {
                    path,
                    location: format!("{}/{}", visit.location, qualified_name(child)),
                    element: child,
                });
            }
        }

        Some(visit)
    }
}

/// A dependency whose version will be pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinCandidate {
    /// Child indices leading from the root to the dependency element.
    pub path: Vec<usize>,
    /// Dependency id as written in the manifest.
    pub id: String,
    /// Version before pinning.
    pub version: String,
    /// Version after pinning.
    pub pinned: String,
}

/// A dependency element lacking an attribute needed to evaluate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAttribute {
    /// Slash-separated element location.
    pub location: String,
    /// The missing attribute.
    pub attribute: &'static str,
}

/// Collects every dependency under `root` selected by `filter` whose version
/// is not already pinned.
///
/// # Errors
///
/// A dependency element without `id` fails immediately. A selected
/// dependency without `version` fails as well.
pub fn collect_candidates(
    root: &Element,
    filter: &IdFilter,
) -> Result<Vec<PinCandidate>, MissingAttribute> {
    let mut candidates = Vec::new();

    for visit in Walk::new(root).filter(|v| is_dependency(v.element)) {
        let attributes = &visit.element.attributes;

        let id = attributes.get(ID_ATTRIBUTE).ok_or_else(|| MissingAttribute {
            location: visit.location.clone(),
            attribute: ID_ATTRIBUTE,
        })?;
        if !filter.matches(id) {
            continue;
        }

        let version = attributes
            .get(VERSION_ATTRIBUTE)
            .ok_or_else(|| MissingAttribute {
                location: visit.location.clone(),
                attribute: VERSION_ATTRIBUTE,
            })?;

        if let Some(pinned) = pin_version(version) {
            candidates.push(PinCandidate {
                path: visit.path,
                id: id.clone(),
                version: version.clone(),
                pinned,
            });
        }
    }

    Ok(candidates)
}

/// Writes the pinned versions of `candidates` into the tree.
///
/// Returns the number of elements updated. Candidates must come from
/// [`collect_candidates`] on the same tree; stale paths are skipped.
pub fn apply_candidates(root: &mut Element, candidates: &[PinCandidate]) -> usize {
    let mut applied = 0;
    for candidate in candidates {
        match element_at_mut(root, &candidate.path) {
            Some(element) => {
                element
                    .attributes
                    .insert(VERSION_ATTRIBUTE.to_string(), candidate.pinned.clone());
                applied += 1;
            }
            None => log::warn!("no element at {:?} for '{}'", candidate.path, candidate.id),
        }
    }
    applied
}

fn element_at_mut<'a>(root: &'a mut Element, path: &[usize]) -> Option<&'a mut Element> {
    let mut current = root;
    for &index in path {
        current = match current.children.get_mut(index) {
            Some(XMLNode::Element(child)) => child,
            _ => return None,
        };
    }
    Some(current)
}
