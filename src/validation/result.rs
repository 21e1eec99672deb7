//! Bottom-up result propagation from a frame into its parent, applying the
//! combination rule of the frame's composition tag.

use super::stack::{Composition, PositionKind};
use super::stream::ValidationStream;
use crate::error::{InvalidReason, SchemaError, SchemaErrorKind, ValidationResult};

/// Propagate the result of the frame at `index` into its parent. A frame
/// without a parent is the root; its result becomes final.
pub(crate) fn propagate(stream: &mut ValidationStream, index: usize) {
    let (parent, kind, result, reason) = {
        let position = stream.stack.position(index);
        (
            position.parent,
            position.kind,
            position.result,
            position.invalid_reason,
        )
    };

    let parent = match parent {
        None => {
            stream.stack.position_mut(index).is_final = true;
            return;
        }
        Some(parent) => parent,
    };
    if stream.stack.position(parent).is_final {
        return;
    }

    match kind {
        PositionKind::Sentinel => {}
        PositionKind::Basic
        | PositionKind::Composed(Composition::Ref)
        | PositionKind::Composed(Composition::All) => {
            if result != ValidationResult::Valid {
                stream.stack.position_mut(parent).set_final(result);
            }
        }
        PositionKind::Composed(Composition::TypeAny)
        | PositionKind::Composed(Composition::TypeList) => {
            if result == ValidationResult::Valid {
                stream.stack.position_mut(parent).type_valid = true;
            } else if reason == InvalidReason::Type {
                // a type mismatch just means this union branch is not
                // applicable
                stream.error = None;
            } else {
                stream.stack.position_mut(parent).set_final(result);
            }
        }
        PositionKind::Composed(Composition::Any) => {
            if result == ValidationResult::Valid {
                stream.stack.position_mut(parent).any_of_valid = true;
            }
        }
        PositionKind::Composed(Composition::One) => {
            if result == ValidationResult::Valid {
                if stream.stack.position(parent).one_of_valid {
                    stream.error = Some(SchemaError::new(
                        SchemaErrorKind::ValidationComposition,
                        "More than one oneOf subschema was valid",
                    ));
                    let parent_position = stream.stack.position_mut(parent);
                    parent_position.invalid_reason = InvalidReason::Composition;
                    parent_position.set_final(ValidationResult::Invalid);
                } else {
                    stream.stack.position_mut(parent).one_of_valid = true;
                }
            }
        }
        PositionKind::Composed(Composition::Not) => {
            if result == ValidationResult::Valid {
                stream.error = Some(SchemaError::new(
                    SchemaErrorKind::ValidationComposition,
                    "Value must not be valid against the not schema",
                ));
                let parent_position = stream.stack.position_mut(parent);
                parent_position.invalid_reason = InvalidReason::Composition;
                parent_position.set_final(ValidationResult::Invalid);
            } else {
                stream.error = None;
            }
        }
    }
}
