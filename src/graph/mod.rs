pub mod builder;
pub mod filter;
pub mod keys;

pub use builder::{GraphBuilder, IdeaEdge, IdeaGraph, IdeaNode, NodeKind};
pub use filter::LinkFilter;
pub use keys::NodeKey;

use crate::corpus::{Corpus, SentenceRef};
use crate::error::Result;

/// Filter a sentence's links and build its related-idea graph
pub fn related_ideas(
    corpus: &Corpus,
    origin: &SentenceRef,
    filter: &LinkFilter,
    builder: &GraphBuilder,
) -> Result<IdeaGraph> {
    let (_, sentence) = corpus.sentence(origin)?;
    let links = filter.apply(&sentence.links);
    Ok(builder.build(origin, &sentence.text, &links))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::corpus;
    use crate::corpus::RelationType;
    use crate::error::AppError;

    #[test]
    fn test_related_ideas_applies_filter() {
        let corpus = corpus();
        let origin = SentenceRef::new("cat", 1);

        let all = related_ideas(&corpus, &origin, &LinkFilter::default(), &GraphBuilder::default())
            .unwrap();
        assert_eq!(all.relation_nodes().count(), 2);

        let strict = LinkFilter::new(RelationType::ALL, Some(0.5));
        let near = related_ideas(&corpus, &origin, &strict, &GraphBuilder::default()).unwrap();
        let relations: Vec<_> = near.relation_nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(relations, vec!["CONSEQUENCE_IS"]);
    }

    #[test]
    fn test_related_ideas_lookup_miss() {
        let err = related_ideas(
            &corpus(),
            &SentenceRef::new("cat", 42),
            &LinkFilter::default(),
            &GraphBuilder::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::LookupMiss { .. }));
    }
}
