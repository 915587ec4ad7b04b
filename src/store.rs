//! The persisted-file collaborators: source list, blacklist, output file.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Read a newline-delimited URL list, skipping blank lines.
async fn read_url_lines(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path).await?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Load the blacklist. A missing or unreadable file reads as empty — a
/// fresh setup simply has no blacklist yet.
pub async fn read_blacklist(path: &Path) -> HashSet<String> {
    match read_url_lines(path).await {
        Ok(lines) => lines.into_iter().collect(),
        Err(_) => HashSet::new(),
    }
}

/// Load the active source list: the input file minus blacklisted entries.
pub async fn read_sources(path: &Path, blacklist: &HashSet<String>) -> io::Result<Vec<String>> {
    let lines = read_url_lines(path).await?;
    Ok(lines
        .into_iter()
        .filter(|url| !blacklist.contains(url))
        .collect())
}

/// Append this run's failed sources to the blacklist file, skipping URLs
/// already blacklisted so the file does not grow without bound.
pub async fn append_blacklist(
    path: &Path,
    known: &HashSet<String>,
    failed: &[String],
) -> io::Result<()> {
    let mut seen = known.clone();
    let fresh: Vec<&String> = failed
        .iter()
        .filter(|url| seen.insert((*url).clone()))
        .collect();
    if fresh.is_empty() {
        return Ok(());
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    for url in fresh {
        file.write_all(format!("{url}\n").as_bytes()).await?;
    }
    file.flush().await
}

/// Overwrite the output file with the final line list.
pub async fn write_output(path: &Path, lines: &[String]) -> io::Result<()> {
    fs::write(path, lines.join("\n")).await
}
