// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Post-resolution filter applied to the enabled compiler list.

use crate::{catalog::toggles, selection::OptionSet};

/// Strategy used to narrow the resolved compiler list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompilerPolicy {
    /// Keep every enabled compiler.
    #[default]
    All,
    /// Keep only the oldest and the newest enabled compiler.
    OldestAndNewest
}

impl CompilerPolicy {
    /// Picks the policy requested by the repository options.
    pub fn from_options(options: &OptionSet) -> Self {
        if options.contains(toggles::FIRST_LAST) {
            Self::OldestAndNewest
        } else {
            Self::All
        }
    }

    /// Applies the policy to a list already in catalog order.
    ///
    /// # Examples
    ///
    /// ```
    /// use asgen::CompilerPolicy;
    ///
    /// let narrowed = CompilerPolicy::OldestAndNewest.apply(vec!["a", "b", "d"]);
    /// assert_eq!(narrowed, ["a", "d"]);
    ///
    /// let single = CompilerPolicy::OldestAndNewest.apply(vec!["a"]);
    /// assert_eq!(single, ["a"]);
    /// ```
    pub fn apply<T>(self, mut compilers: Vec<T>) -> Vec<T> {
        match self {
            Self::All => compilers,
            Self::OldestAndNewest => {
                if compilers.len() > 2 {
                    let newest = compilers.pop();
                    compilers.truncate(1);
                    compilers.extend(newest);
                }
                compilers
            }
        }
    }
}
