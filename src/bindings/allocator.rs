use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::debug;

use super::{BindingNamespace, BindingScanner, BindingSite, SlotIndex};
use crate::error::ParseErrorKind;
use crate::rewriter::StringRewriter;

/// Tracks used binding indices across a whole include tree and hands out free ones.
///
/// Hardcoded indices are registered while files are traversed. Wildcards are
/// only resolved once the complete output is known, because a hardcoded index
/// further down the document must still be avoided.
///
/// Duplicate hardcoded indices are not reported: they may be hidden behind
/// `#ifdef`s, which are not evaluated here.
#[derive(Debug, Default)]
pub struct BindingAllocator {
    used: IndexMap<BindingNamespace, BTreeSet<u32>>,
    wildcard_found: bool,
}

impl BindingAllocator {
    pub fn new() -> Self {
        Default::default()
    }

    /// Records a site found during traversal.
    pub fn register_site(&mut self, site: &BindingSite) {
        match site.index {
            SlotIndex::Explicit(index) => {
                self.used.entry(site.namespace).or_default().insert(index);
            }
            SlotIndex::Wildcard => self.wildcard_found = true,
        }
    }

    /// Whether any `?` was seen, i.e. whether [`BindingAllocator::assign_wildcards`] has work to do.
    pub fn wildcard_found(&self) -> bool {
        self.wildcard_found
    }

    pub fn used_indices(&self, namespace: &BindingNamespace) -> Option<&BTreeSet<u32>> {
        self.used.get(namespace)
    }

    /// Replaces every wildcard in `text` with the smallest free index of its namespace.
    /// GLSL numbering starts at `base_glsl_index`, HLSL numbering at 0 for every
    /// register type and space.
    pub fn assign_wildcards(
        &mut self,
        text: &str,
        scanner: BindingScanner,
        base_glsl_index: u32,
    ) -> Result<String, ParseErrorKind> {
        let sites = scanner.scan(text)?;
        // `None` once every index up to `u32::MAX` has been handed out.
        let mut next_free: IndexMap<BindingNamespace, Option<u32>> = IndexMap::new();
        let mut rewriter = StringRewriter::new(text);
        for site in sites.iter().filter(|site| site.index == SlotIndex::Wildcard) {
            let start = match site.namespace {
                BindingNamespace::Glsl => base_glsl_index,
                BindingNamespace::Hlsl { .. } => 0,
            };
            let next = next_free.entry(site.namespace).or_insert(Some(start));
            let used = self.used.entry(site.namespace).or_default();
            while let Some(candidate) = *next {
                if !used.contains(&candidate) {
                    break;
                }
                *next = candidate.checked_add(1);
            }
            let index = next.ok_or(ParseErrorKind::BindingIndexExhausted {
                namespace: site.namespace,
            })?;
            used.insert(index);
            *next = index.checked_add(1);

            debug!(namespace = %site.namespace, index, "assigned binding index");
            rewriter.replace_span(site.index_span, &index.to_string());
        }
        Ok(rewriter.finish())
    }
}
