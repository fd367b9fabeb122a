//! Merging of partial dicts from composed option components.
//!
//! An option type built from several components (shared series fields, area-specific
//! fields, ...) serializes by letting each component contribute its own slice of fields.

use crate::value::Map;
use log::debug;

/// A component that knows how to serialize its own slice of fields.
pub trait PartialDict {
    /// This component's fields, untrimmed. `None` means the component does not serialize,
    /// which ends the merge at this point.
    fn partial_dict(&self) -> Option<Map>;
}

/// A type assembled from [`PartialDict`] components.
pub trait Composed {
    /// The components in merge order: later components overwrite keys of earlier ones.
    fn components(&self) -> Vec<&dyn PartialDict>;

    /// The merged dict of all components.
    fn flattened_dict(&self) -> Map {
        flatten_components(&self.components())
    }
}

/// Merges the partial dicts of `components` in order. Stops without error at the first
/// component that does not serialize and returns what was merged up to then.
#[must_use]
pub fn flatten_components(components: &[&dyn PartialDict]) -> Map {
    let mut merged = Map::new();
    for (index, component) in components.iter().enumerate() {
        match component.partial_dict() {
            Some(partial) => merged.extend(partial),
            None => {
                debug!("component {index} does not serialize; stopping the merge there");
                break;
            }
        }
    }
    merged
}
