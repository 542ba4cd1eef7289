use std::collections::BTreeSet;

use crate::corpus::{LinkMap, RelationType};

/// Prunes a sentence's links down to what may be shown.
///
/// A relation survives only if it is allowed and keeps at least one link
/// with `distance <= max_distance`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkFilter {
    allowed: BTreeSet<RelationType>,
    max_distance: f64,
}

impl LinkFilter {
    /// `None` for `max_distance` disables the distance cut-off
    pub fn new(allowed: impl IntoIterator<Item = RelationType>, max_distance: Option<f64>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            max_distance: max_distance.unwrap_or(f64::INFINITY),
        }
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn allows(&self, relation: RelationType) -> bool {
        self.allowed.contains(&relation)
    }

    pub fn apply(&self, links: &LinkMap) -> LinkMap {
        links
            .iter()
            .filter(|(relation, _)| self.allows(**relation))
            .filter_map(|(relation, candidates)| {
                let kept: Vec<_> = candidates
                    .iter()
                    .filter(|link| link.distance <= self.max_distance)
                    .cloned()
                    .collect();
                (!kept.is_empty()).then_some((*relation, kept))
            })
            .collect()
    }

    /// Whether `apply` would return anything, without building the result
    pub fn has_links(&self, links: &LinkMap) -> bool {
        links.iter().any(|(relation, candidates)| {
            self.allows(*relation)
                && candidates
                    .iter()
                    .any(|link| link.distance <= self.max_distance)
        })
    }
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new(RelationType::ALL, None)
    }
}

/// Keep every relation type, dropping links farther than `threshold`
pub fn filter(threshold: f64, links: &LinkMap) -> LinkMap {
    LinkFilter::new(RelationType::ALL, Some(threshold)).apply(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Link;
    use crate::corpus::fixtures::link;
    use proptest::prelude::*;

    fn sample() -> LinkMap {
        let mut links = LinkMap::new();
        links.insert(
            RelationType::CauseIs,
            vec![link("a", 0, "near", 0.2), link("a", 1, "far", 0.8)],
        );
        links.insert(RelationType::Similarly, vec![link("b", 0, "far", 0.9)]);
        links
    }

    #[test]
    fn test_distance_threshold_is_inclusive() {
        let filtered = filter(0.8, &sample());
        assert_eq!(filtered[&RelationType::CauseIs].len(), 2);
        assert!(!filtered.contains_key(&RelationType::Similarly));
    }

    #[test]
    fn test_empty_groups_are_omitted() {
        let filtered = filter(0.5, &sample());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[&RelationType::CauseIs].len(), 1);
        assert_eq!(filtered[&RelationType::CauseIs][0].linked_keywords, "near");
    }

    #[test]
    fn test_disallowed_relations_dropped() {
        let filter = LinkFilter::new([RelationType::Similarly], None);
        let filtered = filter.apply(&sample());
        assert_eq!(filtered.keys().copied().collect::<Vec<_>>(), vec![RelationType::Similarly]);
    }

    #[test]
    fn test_default_keeps_everything() {
        assert_eq!(LinkFilter::default().apply(&sample()), sample());
    }

    #[test]
    fn test_has_links_matches_apply() {
        let strict = LinkFilter::new(RelationType::ALL, Some(0.1));
        assert!(!strict.has_links(&sample()));
        assert!(LinkFilter::default().has_links(&sample()));
        assert!(!LinkFilter::default().has_links(&LinkMap::new()));
    }

    fn relation_strategy() -> impl Strategy<Value = RelationType> {
        prop::sample::select(RelationType::ALL.to_vec())
    }

    fn link_strategy() -> impl Strategy<Value = Link> {
        ("[a-z]{1,4}", 0usize..20, "[a-z ]{0,12}", 0.0f64..2.0).prop_map(
            |(doc, sent, keywords, distance)| Link {
                linked_document_id: doc,
                linked_sentence_id: sent,
                linked_keywords: keywords,
                distance,
            },
        )
    }

    fn links_strategy() -> impl Strategy<Value = LinkMap> {
        prop::collection::btree_map(relation_strategy(), prop::collection::vec(link_strategy(), 0..5), 0..8)
    }

    proptest! {
        #[test]
        fn prop_filter_respects_threshold(threshold in 0.0f64..2.0, links in links_strategy()) {
            let filtered = filter(threshold, &links);
            for (relation, kept) in &filtered {
                prop_assert!(RelationType::ALL.contains(relation));
                prop_assert!(!kept.is_empty());
                prop_assert!(kept.iter().all(|l| l.distance <= threshold));
            }
        }

        #[test]
        fn prop_filter_is_idempotent(threshold in 0.0f64..2.0, links in links_strategy()) {
            let once = filter(threshold, &links);
            prop_assert_eq!(filter(threshold, &once), once);
        }

        #[test]
        fn prop_allowed_set_is_respected(
            allowed in prop::collection::btree_set(relation_strategy(), 0..8),
            links in links_strategy(),
        ) {
            let filter = LinkFilter::new(allowed.iter().copied(), None);
            let filtered = filter.apply(&links);
            prop_assert!(filtered.keys().all(|r| allowed.contains(r)));
            prop_assert_eq!(filter.has_links(&links), !filtered.is_empty());
        }
    }
}
