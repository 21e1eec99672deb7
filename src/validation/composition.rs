//! Applicator composition: materialising the sub-schema frames a schema
//! value spawns for the current instance location.

use super::stack::Composition;
use super::stream::ValidationStream;
use crate::error::{SchemaError, ValidationResult};
use crate::value::SchemaValue;
use std::sync::Arc;

fn push_composed_list(
    stream: &mut ValidationStream,
    parent: usize,
    branches: &[Arc<SchemaValue>],
    composition: Composition,
) {
    for branch in branches {
        stream
            .stack
            .push_composed(Arc::clone(branch), Some(parent), composition);
    }
}

/// Push one composed frame per applicator sub-schema of the frame at
/// `index`. A resolved `$ref` pushes its target; a ref-only schema stops
/// there, the reference fully replaces its semantics.
pub(crate) fn composition_push(stream: &mut ValidationStream, index: usize) -> ValidationResult {
    let value = super::schema_at(stream, index);

    if let Some(reference) = &value.reference {
        let resolved = match reference.resolve(stream.schema) {
            Ok(resolved) => resolved,
            Err(error) => {
                stream.error = Some(error);
                return ValidationResult::Error;
            }
        };
        stream
            .stack
            .push_composed(resolved, Some(index), Composition::Ref);
        if value.ref_only {
            return ValidationResult::Valid;
        }
    }

    if let Some(branches) = &value.common.type_any {
        push_composed_list(stream, index, branches, Composition::TypeAny);
    }
    if let Some(branches) = &value.common.type_list {
        push_composed_list(stream, index, branches, Composition::TypeList);
    }
    if let Some(branches) = &value.common.all_of {
        push_composed_list(stream, index, branches, Composition::All);
    }
    if let Some(branches) = &value.common.any_of {
        push_composed_list(stream, index, branches, Composition::Any);
    }
    if let Some(branches) = &value.common.one_of {
        push_composed_list(stream, index, branches, Composition::One);
    }
    if let Some(negated) = &value.common.not {
        stream
            .stack
            .push_composed(Arc::clone(negated), Some(index), Composition::Not);
    }

    ValidationResult::Valid
}

/// Run the composition push for a frame, record the outcome on it and
/// terminate the stream on a fatal result.
pub(crate) fn composition_check(
    stream: &mut ValidationStream,
    index: usize,
) -> Result<(), SchemaError> {
    let result = composition_push(stream, index);
    stream.stack.position_mut(index).result = result;
    if result == ValidationResult::Error {
        return Err(stream.fatal_error());
    }
    Ok(())
}
