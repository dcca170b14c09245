use std::collections::BTreeSet;

/// Which section indices are expanded; all collapsed by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedSections {
    open: BTreeSet<usize>,
}

impl ExpandedSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips one section and returns whether it is now expanded.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.open.remove(&index) {
            false
        } else {
            self.open.insert(index);
            true
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.open.contains(&index)
    }

    pub fn collapse_all(&mut self) {
        self.open.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.open.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

impl FromIterator<usize> for ExpandedSections {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut sections = Self::new();
        for index in iter {
            sections.toggle(index);
        }
        sections
    }
}
