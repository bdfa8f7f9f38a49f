//! Print the summary of a commit range as JSON.

use cinema_common::config::AppConfig;

use crate::options::RangeArgs;

pub fn run(range: RangeArgs, config: &AppConfig) -> anyhow::Result<()> {
    let git = super::repository(config);
    git.ensure_repository()?;

    let analysis = cinema_history::analyze(&git, &range.request())?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
