//! Subset stack for index-remapped label views
//!
//! Each added subset is given in indices of the currently visible view and is
//! composed with the active subset before being pushed, so every entry on the
//! stack maps visible positions straight to storage positions.

use crate::core::{Result, SVMError};

/// Index list mapping visible positions to storage positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    indices: Vec<usize>,
}

impl Subset {
    /// Storage index for each visible position
    pub fn subset_idx(&self) -> &[usize] {
        &self.indices
    }

    /// Number of visible entries
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if the subset hides every entry
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Stack of composed subsets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetStack {
    stack: Vec<Subset>,
}

impl SubsetStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the current view of `storage_len` entries to `indices`
    ///
    /// `indices` are positions in the current view. A nested subset may not
    /// be larger than the one it refines.
    pub fn add_subset(&mut self, indices: &[usize], storage_len: usize) -> Result<()> {
        let visible = self.num_visible(storage_len);

        if self.has_subsets() && indices.len() > visible {
            return Err(SVMError::InvalidParameter(format!(
                "Subset of size {} is larger than the active subset of size {}",
                indices.len(),
                visible
            )));
        }

        if let Some(&index) = indices.iter().find(|&&i| i >= visible) {
            return Err(SVMError::InvalidSubset {
                index,
                len: visible,
            });
        }

        let composed = match self.stack.last() {
            Some(active) => indices.iter().map(|&i| active.indices[i]).collect(),
            None => indices.to_vec(),
        };

        self.stack.push(Subset { indices: composed });
        Ok(())
    }

    /// Drop the most recently added subset
    pub fn remove_subset(&mut self) {
        self.stack.pop();
    }

    /// Drop every subset
    pub fn remove_all_subsets(&mut self) {
        self.stack.clear();
    }

    /// Whether any subset is active
    pub fn has_subsets(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Number of subsets on the stack
    pub fn num_subsets(&self) -> usize {
        self.stack.len()
    }

    /// Active subset, if any
    pub fn last_subset(&self) -> Option<&Subset> {
        self.stack.last()
    }

    /// Storage index of visible position `i`
    pub fn subset_idx_conversion(&self, i: usize) -> usize {
        match self.stack.last() {
            Some(active) => active.indices[i],
            None => i,
        }
    }

    /// Number of visible entries over a storage of `storage_len` entries
    pub fn num_visible(&self, storage_len: usize) -> usize {
        self.stack.last().map_or(storage_len, Subset::len)
    }
}
