use actchain_core::TypeIdentity;
use std::collections::BTreeMap;

use super::ActionHandle;

/// Actions partitioned by the identity of their output type.
///
/// Producers inside a group are kept in registration order. Actions whose
/// output has no identity are not grouped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputGroupIndex {
    groups: BTreeMap<TypeIdentity, Vec<ActionHandle>>,
}

impl OutputGroupIndex {
    pub fn build<'a>(output_identities: impl IntoIterator<Item = Option<&'a TypeIdentity>>) -> Self {
        let mut groups: BTreeMap<TypeIdentity, Vec<ActionHandle>> = BTreeMap::new();
        for (index, identity) in output_identities.into_iter().enumerate() {
            if let Some(identity) = identity {
                groups
                    .entry(identity.clone())
                    .or_default()
                    .push(ActionHandle::new(index));
            }
        }
        Self { groups }
    }

    pub fn producers(&self, identity: &TypeIdentity) -> &[ActionHandle] {
        self.groups
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn identities(&self) -> impl Iterator<Item = &TypeIdentity> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeIdentity, &[ActionHandle])> {
        self.groups
            .iter()
            .map(|(identity, handles)| (identity, handles.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
#[path = "grouping_test.rs"]
mod tests;
