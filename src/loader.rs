//! Reads corpus files into (document, line) records.
//!
//! The input location is a single file, a directory (every regular file
//! directly inside it), or a path whose last component holds `*`/`?`
//! wildcards. `.gz` files are decompressed on the fly.

use crate::document::DocRecord;
use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// `*` matches any run of characters, `?` exactly one
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    // Position of the last `*` and the name index it was tried against
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    n = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}

fn has_wildcard(s: &str) -> bool {
    s.contains('*') || s.contains('?')
}

fn regular_files(dir: &Path, filter: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to list directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        // Follows symlinks, unlike `DirEntry::file_type`
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if filter(name.as_str()) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Resolve an input location into the sorted list of files it names
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);

    let files = match path.file_name().map(|n| n.to_string_lossy()) {
        Some(name) if has_wildcard(&name) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            regular_files(dir, |file| wildcard_match(&name, file))?
        }
        _ if path.is_dir() => regular_files(path, |_| true)?,
        _ if path.is_file() => vec![path.to_path_buf()],
        _ => Vec::new(),
    };

    if files.is_empty() {
        bail!("No input files match '{}'", pattern);
    }
    Ok(files)
}

fn open_lines(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Every line of one file, keyed by the file's path
pub fn read_document(path: &Path) -> Result<Vec<DocRecord>> {
    let document = path.display().to_string();
    let mut records = Vec::new();
    for line in open_lines(path)?.lines() {
        let line = line.with_context(|| format!("Failed to read {}", document))?;
        records.push(DocRecord::new(document.as_str(), line));
    }
    if records.is_empty() {
        tracing::warn!("{} has no lines and is not part of the corpus", document);
    }
    Ok(records)
}

/// Read every file matched by `pattern`
pub fn load(pattern: &str) -> Result<Vec<DocRecord>> {
    let paths = expand_pattern(pattern)?;
    tracing::info!("Reading {} files matching '{}'", paths.len(), pattern);

    let per_file: Vec<Vec<DocRecord>> = paths
        .par_iter()
        .map(|path| read_document(path))
        .collect::<Result<_>>()?;

    Ok(per_file.into_iter().flatten().collect())
}
