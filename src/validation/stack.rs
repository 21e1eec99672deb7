//! The validation stack: a flat vector of frames partitioned into layers by
//! sentinel entries. All links are indices so the vector can reallocate
//! freely while frames are live.

use crate::error::{InvalidReason, ValidationResult};
use crate::value::SchemaValue;
use std::sync::Arc;

/// How a composed frame combines into its parent during result propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Composition {
    Ref,
    TypeAny,
    TypeList,
    All,
    Any,
    One,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PositionKind {
    Basic,
    Composed(Composition),
    Sentinel,
}

/// One validation frame: a sub-schema bound to the current instance
/// location.
#[derive(Debug)]
pub(crate) struct Position {
    /// `None` only for sentinels.
    pub(crate) value: Option<Arc<SchemaValue>>,
    /// Parent frame index; for sentinels, the previous sentinel.
    pub(crate) parent: Option<usize>,
    pub(crate) kind: PositionKind,
    pub(crate) layer_start: usize,
    pub(crate) depth: usize,
    pub(crate) result: ValidationResult,
    pub(crate) invalid_reason: InvalidReason,
    pub(crate) is_final: bool,
    pub(crate) any_of_valid: bool,
    pub(crate) one_of_valid: bool,
    pub(crate) type_valid: bool,
    pub(crate) count: usize,
    pub(crate) object_key: Option<String>,
}

impl Position {
    fn new(kind: PositionKind, value: Option<Arc<SchemaValue>>, parent: Option<usize>) -> Position {
        Position {
            value,
            parent,
            kind,
            layer_start: 0,
            depth: 0,
            result: ValidationResult::Valid,
            invalid_reason: InvalidReason::None,
            is_final: false,
            any_of_valid: false,
            one_of_valid: false,
            type_valid: false,
            count: 0,
            object_key: None,
        }
    }

    pub(crate) fn is_sentinel(&self) -> bool {
        self.kind == PositionKind::Sentinel
    }

    pub(crate) fn composition(&self) -> Option<Composition> {
        match self.kind {
            PositionKind::Composed(composition) => Some(composition),
            _ => None,
        }
    }

    pub(crate) fn schema(&self) -> &Arc<SchemaValue> {
        self.value.as_ref().expect("sentinel positions carry no schema")
    }

    /// Fix the frame's result; later events must not change it.
    pub(crate) fn set_final(&mut self, result: ValidationResult) {
        self.result = result;
        self.is_final = true;
    }
}

#[derive(Debug)]
pub(crate) struct ValidationStack {
    positions: Vec<Position>,
    last_separator: Option<usize>,
    depth: usize,
    mark: usize,
}

impl ValidationStack {
    pub(crate) fn new(capacity: usize) -> ValidationStack {
        assert!(capacity >= 1, "stack capacity must be at least 1");
        ValidationStack {
            positions: Vec::with_capacity(capacity),
            last_separator: None,
            depth: 0,
            mark: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn position(&self, index: usize) -> &Position {
        &self.positions[index]
    }

    pub(crate) fn position_mut(&mut self, index: usize) -> &mut Position {
        &mut self.positions[index]
    }

    pub(crate) fn root_position(&self) -> &Position {
        &self.positions[0]
    }

    fn next_layer_start(&self) -> usize {
        self.last_separator.map_or(0, |separator| separator + 1)
    }

    fn push(&mut self, mut position: Position) -> usize {
        position.depth = self.depth;
        position.layer_start = self.next_layer_start();
        let index = self.positions.len();
        self.positions.push(position);
        index
    }

    pub(crate) fn push_basic(
        &mut self,
        value: Arc<SchemaValue>,
        parent: Option<usize>,
    ) -> usize {
        self.push(Position::new(PositionKind::Basic, Some(value), parent))
    }

    pub(crate) fn push_composed(
        &mut self,
        value: Arc<SchemaValue>,
        parent: Option<usize>,
        composition: Composition,
    ) -> usize {
        self.push(Position::new(
            PositionKind::Composed(composition),
            Some(value),
            parent,
        ))
    }

    /// Open a new layer. The sentinel links to the previous one so that
    /// `layer_remove` can restore it.
    pub(crate) fn push_separator(&mut self) -> usize {
        let mut position = Position::new(PositionKind::Sentinel, None, self.last_separator);
        position.depth = self.depth;
        let index = self.positions.len();
        position.layer_start = index;
        self.positions.push(position);
        self.last_separator = Some(index);
        self.depth += 1;
        index
    }

    /// Drop the top layer including its sentinel and restore the previous
    /// one. Without any sentinel the stack shrinks back to the root frame.
    pub(crate) fn layer_remove(&mut self) {
        match self.last_separator {
            Some(separator) => {
                debug_assert_eq!(self.positions[separator].depth + 1, self.depth());
                self.last_separator = self.positions[separator].parent;
                self.positions.truncate(separator);
                self.depth -= 1;
            }
            None => {
                self.positions.truncate(1);
                self.depth = 0;
            }
        }
    }

    pub(crate) fn layer_iterator(&self) -> LayerIterator {
        let start = self
            .positions
            .last()
            .map_or(0, |position| position.layer_start);
        LayerIterator { index: start }
    }

    pub(crate) fn layer_reverse_iterator(&self) -> ReverseLayerIterator {
        ReverseLayerIterator {
            index: self.positions.len(),
            finished: self.positions.is_empty(),
        }
    }

    /// Re-arm every frame of the top layer for a fresh evaluation round
    /// (used between candidate items of `contains`).
    pub(crate) fn layer_reset_positions(&mut self) {
        let mut iterator = self.layer_iterator();
        while let Some(index) = iterator.next(self) {
            let position = &mut self.positions[index];
            position.result = ValidationResult::Valid;
            position.invalid_reason = InvalidReason::None;
            position.is_final = false;
            position.count = 0;
            position.any_of_valid = false;
            position.one_of_valid = false;
            position.type_valid = false;
        }
    }

    /// Remember the current size for a speculative push block.
    pub(crate) fn mark(&mut self) {
        self.mark = self.positions.len();
    }

    /// Unwind speculative pushes back to the mark.
    pub(crate) fn reset_to_mark(&mut self) {
        self.positions.truncate(self.mark);
    }
}

/// Forward iteration over the top layer. The iterator re-reads the stack on
/// every step, so frames pushed into the layer mid-iteration are visited too
/// (nested applicators rely on this).
pub(crate) struct LayerIterator {
    index: usize,
}

impl LayerIterator {
    pub(crate) fn next(&mut self, stack: &ValidationStack) -> Option<usize> {
        if self.index >= stack.len() {
            return None;
        }
        if stack.position(self.index).is_sentinel() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(index)
    }
}

/// Reverse iteration from the top of the stack down to the layer's sentinel,
/// so children are visited before the parents they propagate into.
pub(crate) struct ReverseLayerIterator {
    index: usize,
    finished: bool,
}

impl ReverseLayerIterator {
    pub(crate) fn next(&mut self, stack: &ValidationStack) -> Option<usize> {
        if self.finished {
            return None;
        }
        self.index -= 1;
        let is_sentinel = stack.position(self.index).is_sentinel();
        if is_sentinel || self.index == 0 {
            self.finished = true;
            return if is_sentinel { None } else { Some(self.index) };
        }
        Some(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::SchemaUri;
    use crate::value::{SchemaData, SchemaValue};

    fn dummy_value() -> Arc<SchemaValue> {
        Arc::new(SchemaValue::new(SchemaData::Mixed, SchemaUri::root_scope()))
    }

    #[test]
    fn sentinels_delimit_layers() {
        let mut stack = ValidationStack::new(4);
        stack.push_basic(dummy_value(), None);
        let separator = stack.push_separator();
        assert_eq!(stack.position(separator).layer_start, separator);
        stack.push_basic(dummy_value(), Some(0));
        stack.push_basic(dummy_value(), Some(0));
        assert_eq!(stack.depth(), 1);

        let mut collected = Vec::new();
        let mut iterator = stack.layer_iterator();
        while let Some(index) = iterator.next(&stack) {
            collected.push(index);
        }
        assert_eq!(collected, vec![2, 3]);

        let mut reversed = Vec::new();
        let mut iterator = stack.layer_reverse_iterator();
        while let Some(index) = iterator.next(&stack) {
            reversed.push(index);
        }
        assert_eq!(reversed, vec![3, 2]);
    }

    #[test]
    fn layer_remove_restores_the_previous_layer() {
        let mut stack = ValidationStack::new(4);
        stack.push_basic(dummy_value(), None);
        let size_before = stack.len();
        stack.push_separator();
        stack.push_basic(dummy_value(), Some(0));
        stack.layer_remove();
        assert_eq!(stack.len(), size_before);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn nested_layers_restore_their_separators() {
        let mut stack = ValidationStack::new(4);
        stack.push_basic(dummy_value(), None);
        let first = stack.push_separator();
        stack.push_basic(dummy_value(), Some(0));
        stack.push_separator();
        stack.push_basic(dummy_value(), Some(2));
        assert_eq!(stack.depth(), 2);
        stack.layer_remove();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.last_separator, Some(first));
    }

    #[test]
    fn growth_during_iteration_is_visible() {
        let mut stack = ValidationStack::new(2);
        stack.push_basic(dummy_value(), None);
        let mut iterator = stack.layer_iterator();
        let mut visited = 0;
        while let Some(index) = iterator.next(&stack) {
            visited += 1;
            if index == 0 {
                stack.push_basic(dummy_value(), Some(0));
            }
        }
        assert_eq!(visited, 2);
    }

    #[test]
    fn mark_and_reset_unwind_speculative_pushes() {
        let mut stack = ValidationStack::new(4);
        stack.push_basic(dummy_value(), None);
        stack.mark();
        stack.push_basic(dummy_value(), Some(0));
        stack.push_basic(dummy_value(), Some(0));
        assert_eq!(stack.len(), 3);
        stack.reset_to_mark();
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn layer_reset_positions_clears_state() {
        let mut stack = ValidationStack::new(4);
        stack.push_basic(dummy_value(), None);
        stack.push_separator();
        let index = stack.push_basic(dummy_value(), Some(0));
        let position = stack.position_mut(index);
        position.result = ValidationResult::Invalid;
        position.any_of_valid = true;
        position.count = 3;
        stack.layer_reset_positions();
        let position = stack.position(index);
        assert_eq!(position.result, ValidationResult::Valid);
        assert!(!position.any_of_valid);
        assert_eq!(position.count, 0);
    }

    #[test]
    fn size_never_drops_below_depth() {
        let mut stack = ValidationStack::new(2);
        stack.push_basic(dummy_value(), None);
        stack.push_separator();
        stack.push_separator();
        assert!(stack.len() >= stack.depth());
    }
}
