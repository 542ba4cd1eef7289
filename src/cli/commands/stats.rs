use anyhow::Result;
use console::{Emoji, style};
use std::collections::BTreeMap;

use crate::cli::GlobalArgs;
use crate::corpus::{Corpus, RelationType};

static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Link count and distance range of one relation type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationStats {
    pub links: usize,
    pub min_distance: f64,
    pub max_distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub documents: usize,
    pub sentences: usize,
    pub linked_sentences: usize,
    pub relations: BTreeMap<RelationType, RelationStats>,
    pub dropped_links: usize,
}

impl CorpusStats {
    /// Counts over the raw links, before any filtering
    pub fn compute(corpus: &Corpus) -> Self {
        let mut stats = Self {
            documents: corpus.len(),
            sentences: 0,
            linked_sentences: 0,
            relations: BTreeMap::new(),
            dropped_links: corpus.dropped_links(),
        };

        for sentence in corpus.documents().flat_map(|d| &d.sentences) {
            stats.sentences += 1;
            if sentence.links.values().any(|l| !l.is_empty()) {
                stats.linked_sentences += 1;
            }
            for (relation, links) in &sentence.links {
                for link in links {
                    let entry = stats.relations.entry(*relation).or_insert(RelationStats {
                        links: 0,
                        min_distance: f64::INFINITY,
                        max_distance: f64::NEG_INFINITY,
                    });
                    entry.links += 1;
                    entry.min_distance = entry.min_distance.min(link.distance);
                    entry.max_distance = entry.max_distance.max(link.distance);
                }
            }
        }

        stats
    }

    pub fn total_links(&self) -> usize {
        self.relations.values().map(|r| r.links).sum()
    }
}

pub async fn run(global: &GlobalArgs) -> Result<()> {
    println!();
    println!(
        "{}",
        style(" TextMagnet - Corpus Statistics ").bold().reverse()
    );
    println!();

    let (_, corpus) = super::load(global).await?;
    let stats = CorpusStats::compute(&corpus);

    println!("{}Corpus Overview", CHART);
    println!();
    println!(
        "  {} Documents:        {}",
        style("•").cyan(),
        style(stats.documents).green().bold()
    );
    println!(
        "  {} Sentences:        {}",
        style("•").cyan(),
        style(stats.sentences).green().bold()
    );
    println!(
        "  {} Linked sentences: {}",
        style("•").cyan(),
        style(stats.linked_sentences).green().bold()
    );
    println!(
        "  {} Links:            {}",
        style("•").cyan(),
        style(stats.total_links()).green().bold()
    );

    if !stats.relations.is_empty() {
        println!();
        println!("{}Links per Relation", GRAPH);
        println!();
        for (relation, r) in &stats.relations {
            let bar_len = (r.links * 30 / stats.total_links().max(1)).max(1);
            println!(
                "  {:<15} {} {} {}",
                style(relation.label()).yellow(),
                style("█".repeat(bar_len)).green(),
                style(r.links).bold(),
                style(format!("(distance {:.2} – {:.2})", r.min_distance, r.max_distance)).dim(),
            );
        }
    }

    if stats.dropped_links > 0 {
        println!();
        println!(
            "{}{} malformed link entries were dropped while loading",
            WARN,
            style(stats.dropped_links).yellow().bold()
        );
    }

    println!();

    Ok(())
}
