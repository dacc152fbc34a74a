//! Command implementations shared by the CLI surface.

use crate::config::Config;
use crate::search::{SearchEngine, SearchResult};
use crate::workspace::{FileEntry, Workspace};

/// Maximum accepted query length, in codepoints. Longer inputs are almost
/// certainly pasted by accident and would be read against every file.
const MAX_QUERY_LEN: usize = 1000;

/// Search the configured workspace.
///
/// The engine caps its own output; `limit` can only tighten it further.
/// `group` filters results after ranking, so corpus statistics are computed
/// over the whole workspace either way.
///
/// # Errors
///
/// Returns an error if config loading fails or the query is over-long.
/// An empty or missing workspace is not an error; it yields no results.
pub fn search(
    query: &str,
    limit: usize,
    group: Option<&str>,
) -> anyhow::Result<Vec<SearchResult>> {
    if query.chars().count() > MAX_QUERY_LEN {
        anyhow::bail!(
            "Query too long: {} chars (max {MAX_QUERY_LEN})",
            query.chars().count()
        );
    }

    let config = Config::load()?;
    let engine = SearchEngine::new(Workspace::new(config.workspace_root()));

    let mut results = engine.search(query);
    if let Some(group) = group {
        results.retain(|result| result.group == group);
    }
    results.truncate(limit);

    Ok(results)
}

/// List the viewable workspace files, in enumeration order.
///
/// # Errors
///
/// Returns an error if config loading fails.
pub fn list(group: Option<&str>) -> anyhow::Result<Vec<FileEntry>> {
    let config = Config::load()?;
    let workspace = Workspace::new(config.workspace_root());

    let mut files = workspace.scan();
    if let Some(group) = group {
        files.retain(|file| file.group == group);
    }

    Ok(files)
}

/// Read one workspace file by its relative path.
///
/// # Errors
///
/// Returns an error for traversal attempts, missing files, non-viewable
/// extensions, and read failures.
pub fn get(path: &str) -> anyhow::Result<String> {
    let config = Config::load()?;
    let workspace = Workspace::new(config.workspace_root());
    Ok(workspace.read_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_long_query_rejected() {
        let query = "a".repeat(MAX_QUERY_LEN + 1);
        let result = search(&query, 10, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too long"));
    }
}
