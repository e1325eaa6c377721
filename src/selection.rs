// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Per-repository option selection.
//!
//! A repository stores the union of every catalog identifier the user toggled
//! on as one flat [`OptionSet`]. The helpers in this module resolve that set
//! against a catalog table (preserving catalog order) and convert between the
//! set and the boolean toggle vectors used by toggle grids.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{CatalogItem, toggles},
    error::Error
};

/// Flat set of enabled catalog identifiers.
///
/// The set is ordered so serialized settings are stable. Identifiers that no
/// catalog defines are kept but ignored by every lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    ids: BTreeSet<String>
}

impl OptionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `id` is enabled.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Enables `id`, returning `true` when it was not enabled before.
    pub fn insert<S>(&mut self, id: S) -> bool
    where
        S: Into<String>
    {
        self.ids.insert(id.into())
    }

    /// Disables `id`, returning `true` when it was enabled before.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Number of enabled identifiers.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` when nothing is enabled.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over the enabled identifiers in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Replaces the identifiers belonging to `catalog` with the ones switched
    /// on in `toggles`, leaving identifiers of other tables untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] when `toggles` does not have one entry
    /// per catalog item. The set is left unchanged in that case.
    pub fn apply_toggles<T>(&mut self, catalog: &[T], toggles: &[bool]) -> Result<(), Error>
    where
        T: CatalogItem
    {
        let enabled = from_toggle_vector(catalog, toggles)?;
        for item in catalog {
            self.ids.remove(item.id());
        }
        self.ids.extend(enabled.ids);
        Ok(())
    }
}

impl<S> FromIterator<S> for OptionSet
where
    S: Into<String>
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect()
        }
    }
}

impl<S> Extend<S> for OptionSet
where
    S: Into<String>
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.ids.extend(iter.into_iter().map(Into::into));
    }
}

/// Filters `catalog` down to the items enabled in `enabled`.
///
/// Catalog order is preserved and an empty result is valid.
///
/// # Examples
///
/// ```
/// use asgen::{Catalog, OptionSet, resolve_enabled};
///
/// let catalog = Catalog::standard();
/// let enabled: OptionSet = ["linux", "iOS", "unknown"].into_iter().collect();
/// let platforms = resolve_enabled(&catalog.platforms, &enabled);
/// let ids: Vec<&str> = platforms.iter().map(|p| p.id.as_str()).collect();
/// assert_eq!(ids, ["iOS", "linux"]);
/// ```
pub fn resolve_enabled<'a, T>(catalog: &'a [T], enabled: &OptionSet) -> Vec<&'a T>
where
    T: CatalogItem
{
    catalog
        .iter()
        .filter(|item| enabled.contains(item.id()))
        .collect()
}

/// Produces one flag per catalog item, in catalog order.
pub fn to_toggle_vector<T>(catalog: &[T], enabled: &OptionSet) -> Vec<bool>
where
    T: CatalogItem
{
    catalog
        .iter()
        .map(|item| enabled.contains(item.id()))
        .collect()
}

/// Collects the identifiers whose toggle is switched on.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] when `toggles` and `catalog` differ in
/// length.
pub fn from_toggle_vector<T>(catalog: &[T], toggles: &[bool]) -> Result<OptionSet, Error>
where
    T: CatalogItem
{
    if catalog.len() != toggles.len() {
        return Err(Error::LengthMismatch {
            expected: catalog.len(),
            actual:   toggles.len()
        });
    }

    Ok(catalog
        .iter()
        .zip(toggles)
        .filter(|(_, enabled)| **enabled)
        .map(|(item, _)| item.id())
        .collect())
}

/// General toggles that shape the emitted steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeneralToggles {
    /// Emit build steps.
    pub build:      bool,
    /// Emit test steps.
    pub test:       bool,
    /// Keep only the oldest and newest compiler.
    pub first_last: bool,
    /// Append a notification step.
    pub notify:     bool,
    /// Append a log upload step.
    pub upload:     bool
}

impl GeneralToggles {
    /// Reads the general toggles out of an option set.
    pub fn from_options(options: &OptionSet) -> Self {
        Self {
            build:      options.contains(toggles::BUILD),
            test:       options.contains(toggles::TEST),
            first_last: options.contains(toggles::FIRST_LAST),
            notify:     options.contains(toggles::NOTIFY),
            upload:     options.contains(toggles::UPLOAD)
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::{prelude::*, sample::subsequence};

    use super::*;
    use crate::catalog::Catalog;

    fn set(ids: &[&str]) -> OptionSet {
        ids.iter().copied().collect()
    }

    fn round_trip<T: CatalogItem>(catalog: &[T], original: &OptionSet) -> OptionSet {
        from_toggle_vector(catalog, &to_toggle_vector(catalog, original))
            .expect("vector built from the same catalog")
    }

    #[test]
    fn resolve_enabled_preserves_catalog_order() {
        let catalog = Catalog::standard();
        let enabled = set(&["swift-53", "swift-50", "swift-nightly"]);

        let compilers = resolve_enabled(&catalog.compilers, &enabled);
        let ids: Vec<&str> = compilers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["swift-50", "swift-53", "swift-nightly"]);
    }

    #[test]
    fn resolve_enabled_ignores_unknown_identifiers() {
        let catalog = Catalog::standard();
        let enabled = set(&["android", "swift-99"]);

        assert!(resolve_enabled(&catalog.compilers, &enabled).is_empty());
        assert!(resolve_enabled(&catalog.platforms, &enabled).is_empty());
    }

    #[test]
    fn to_toggle_vector_marks_enabled_entries() {
        let catalog = Catalog::standard();
        let enabled = set(&["release", "build"]);

        assert_eq!(to_toggle_vector(&catalog.configurations, &enabled), [false, true]);
        assert_eq!(
            to_toggle_vector(&catalog.general, &enabled),
            [true, false, false, false, false, false]
        );
    }

    #[test]
    fn from_toggle_vector_rejects_length_mismatch() {
        let catalog = Catalog::standard();
        let error = from_toggle_vector(&catalog.configurations, &[true])
            .expect_err("mismatched lengths must fail");

        match error {
            Error::LengthMismatch {
                expected,
                actual
            } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error variant: {other:?}")
        }
    }

    #[test]
    fn apply_toggles_only_touches_its_group() {
        let catalog = Catalog::standard();
        let mut options = set(&["swift-52", "linux", "debug", "custom-flag"]);

        options
            .apply_toggles(&catalog.platforms, &[true, false, true, false, false, false])
            .expect("toggles should apply");

        assert_eq!(options, set(&["swift-52", "macOS", "iOS", "debug", "custom-flag"]));
    }

    #[test]
    fn apply_toggles_leaves_set_untouched_on_error() {
        let catalog = Catalog::standard();
        let mut options = set(&["linux"]);

        assert!(options.apply_toggles(&catalog.platforms, &[true]).is_err());
        assert_eq!(options, set(&["linux"]));
    }

    #[test]
    fn general_toggles_read_known_identifiers() {
        let toggles = GeneralToggles::from_options(&set(&["build", "upload", "header"]));
        assert_eq!(
            toggles,
            GeneralToggles {
                build:      true,
                test:       false,
                first_last: false,
                notify:     false,
                upload:     true
            }
        );
    }

    #[test]
    fn option_set_serializes_as_sorted_list() {
        let options = set(&["linux", "debug", "build"]);
        let json = serde_json::to_string(&options).expect("serialization failed");
        assert_eq!(json, r#"["build","debug","linux"]"#);
    }

    proptest! {
        #[test]
        fn toggle_vector_round_trips_every_subset(
            picked in subsequence(
                Catalog::standard().ids().map(str::to_owned).collect::<Vec<_>>(),
                0..=20
            )
        ) {
            let catalog = Catalog::standard();
            let original: OptionSet = picked.iter().map(String::as_str).collect();

            let mut rebuilt = OptionSet::new();
            rebuilt.extend(round_trip(&catalog.compilers, &original).iter());
            rebuilt.extend(round_trip(&catalog.platforms, &original).iter());
            rebuilt.extend(round_trip(&catalog.configurations, &original).iter());
            rebuilt.extend(round_trip(&catalog.general, &original).iter());

            prop_assert_eq!(rebuilt, original);
        }

        #[test]
        fn single_group_round_trip_is_identity(mask in proptest::collection::vec(any::<bool>(), 6)) {
            let catalog = Catalog::standard();
            let enabled = from_toggle_vector(&catalog.platforms, &mask).unwrap();
            prop_assert_eq!(to_toggle_vector(&catalog.platforms, &enabled), mask);
        }
    }
}
