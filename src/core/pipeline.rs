use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::element::{ElementKind, PipelineElement};

/// Ordered sequence of transformation elements. Elements apply left to
/// right; order is preserved through encode, decode and execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    elements: Vec<PipelineElement>,
}

impl Pipeline {
    pub fn new(elements: Vec<PipelineElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[PipelineElement] {
        &self.elements
    }

    pub fn push(&mut self, element: PipelineElement) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether the restricted editing surface can represent this pipeline:
    /// at least one element, the first anchored to a base plugin, and no
    /// two elements of the same kind anywhere in the sequence. Kind
    /// comparison is nominal; two `ApplyPlugin` elements with different
    /// plugin ids still count as duplicates.
    pub fn is_simple(&self) -> bool {
        let Some(first) = self.elements.first() else {
            return false;
        };
        if first.kind() != ElementKind::ApplyPlugin {
            return false;
        }
        let mut seen = HashSet::new();
        self.elements.iter().all(|element| seen.insert(element.kind()))
    }
}
