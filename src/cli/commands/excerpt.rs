use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::graph::NodeKey;
use crate::render::render_excerpt_for_key;

pub async fn run(global: &GlobalArgs, node_key: String) -> Result<()> {
    // Reject malformed keys before touching the data source
    let key: NodeKey = node_key.parse()?;
    let (_, corpus) = super::load(global).await?;

    tracing::debug!(
        "Excerpt for {} ({:?})",
        key.target,
        key.relation().map(|r| r.label())
    );
    println!("{}", render_excerpt_for_key(&corpus, &key)?);

    Ok(())
}
