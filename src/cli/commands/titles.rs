use anyhow::{Context, Result};
use console::{Emoji, style};
use regex::{Regex, RegexBuilder};

use crate::cli::GlobalArgs;
use crate::corpus::Corpus;

static BOOK: Emoji<'_, '_> = Emoji("📖 ", "");

pub async fn run(global: &GlobalArgs, filter: Option<String>) -> Result<()> {
    let pattern = title_pattern(filter.as_deref()).context("Invalid --filter pattern")?;

    let (_, corpus) = super::load(global).await?;

    let titles = matching_titles(&corpus, pattern.as_ref());
    if !print_titles(&titles) {
        return Ok(());
    }
    tracing::info!("{} of {} titles shown", titles.len(), corpus.len());

    Ok(())
}

/// Case-insensitive regex over titles; `None` matches everything
pub(crate) fn title_pattern(filter: Option<&str>) -> Result<Option<Regex>, regex::Error> {
    filter
        .map(|f| RegexBuilder::new(f).case_insensitive(true).build())
        .transpose()
}

pub(crate) fn matching_titles<'a>(corpus: &'a Corpus, pattern: Option<&Regex>) -> Vec<&'a str> {
    corpus
        .titles()
        .filter(|t| pattern.is_none_or(|p| p.is_match(t)))
        .collect()
}

/// Print the titles, or a notice when there are none. Returns whether any were printed.
pub(crate) fn print_titles(titles: &[&str]) -> bool {
    if titles.is_empty() {
        println!("{}", style("No matching titles.").yellow());
        return false;
    }
    for title in titles {
        println!("{}{}", BOOK, title);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::corpus;

    #[test]
    fn test_filter_is_case_insensitive_regex() {
        let corpus = corpus();
        let pattern = title_pattern(Some("^eye")).unwrap();
        assert_eq!(matching_titles(&corpus, pattern.as_ref()), vec!["Eye surgery"]);

        let pattern = title_pattern(Some("cat|SURG")).unwrap();
        assert_eq!(
            matching_titles(&corpus, pattern.as_ref()),
            vec!["Cataract", "Eye surgery"]
        );
    }

    #[test]
    fn test_no_filter_matches_all_titles() {
        let corpus = corpus();
        assert_eq!(matching_titles(&corpus, None).len(), 2);
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        assert!(title_pattern(Some("(unclosed")).is_err());
    }
}
