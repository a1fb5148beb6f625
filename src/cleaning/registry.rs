//! Kind → transform lookup.

use std::collections::BTreeMap;

use super::kind::DatasetKind;
use super::rules::{CleaningSpec, STANDARD_SPECS};
use super::transform::Transform;

/// Look up the standard transform for `kind`. [`DatasetKind::Unknown`] has none.
pub fn get_transform(kind: DatasetKind) -> Option<Transform> {
    STANDARD_SPECS
        .iter()
        .find(|spec| spec.kind == kind)
        .map(|spec| Transform::new(spec))
}

/// Read-only map from dataset kind to cleaning transform.
///
/// Built once at startup and handed to the pipeline; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct TransformRegistry {
    transforms: BTreeMap<DatasetKind, Transform>,
}

impl TransformRegistry {
    /// Registry with every spec in [`STANDARD_SPECS`].
    pub fn standard() -> Self {
        STANDARD_SPECS
            .iter()
            .fold(Self::empty(), |registry, spec| registry.with(spec))
    }

    /// Registry with no transforms; every file is skipped as unclassified.
    pub fn empty() -> Self {
        Self {
            transforms: BTreeMap::new(),
        }
    }

    /// Add (or replace) the transform for `spec.kind`.
    pub fn with(mut self, spec: &'static CleaningSpec) -> Self {
        self.transforms.insert(spec.kind, Transform::new(spec));
        self
    }

    pub fn get(&self, kind: DatasetKind) -> Option<&Transform> {
        self.transforms.get(&kind)
    }

    /// Kinds that have a transform, in kind order.
    pub fn kinds(&self) -> impl Iterator<Item = DatasetKind> + '_ {
        self.transforms.keys().copied()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::{TransformRegistry, get_transform};
    use crate::cleaning::DatasetKind;
    use crate::cleaning::rules::WORLD_TRADE;

    #[test]
    fn unknown_has_no_transform() {
        assert!(get_transform(DatasetKind::Unknown).is_none());
        assert!(TransformRegistry::standard().get(DatasetKind::Unknown).is_none());
    }

    #[test]
    fn standard_registry_covers_every_known_kind() {
        let registry = TransformRegistry::standard();
        let kinds: Vec<_> = registry.kinds().collect();
        assert_eq!(
            kinds,
            vec![
                DatasetKind::WorldTrade,
                DatasetKind::Product,
                DatasetKind::Sales,
                DatasetKind::Revenue
            ]
        );
        for kind in kinds {
            assert_eq!(registry.get(kind).map(|t| t.kind()), Some(kind));
            assert_eq!(get_transform(kind).map(|t| t.kind()), Some(kind));
        }
    }

    #[test]
    fn empty_registry_can_be_extended() {
        let registry = TransformRegistry::empty().with(&WORLD_TRADE);
        assert!(registry.get(DatasetKind::WorldTrade).is_some());
        assert!(registry.get(DatasetKind::Sales).is_none());
    }
}
