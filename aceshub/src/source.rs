//! Data source handling.

use std::path::PathBuf;

use glob::Paths;
use log::debug;

use crate::{Error, SupportedFormat, Value};

/// An iterator producing elements of type `Result<Value, Error>` that are read
/// from a particular data source, one value per document.
pub enum SourceIter {
    Files { pattern: String, paths: Paths, seen: bool },
    Embedded(Option<Result<Value, Error>>),
}

impl Iterator for SourceIter {
    type Item = Result<Value, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SourceIter::Files {
                pattern,
                paths,
                seen,
            } => {
                let next_path: PathBuf = match paths.next() {
                    Some(Ok(p)) => p,
                    Some(Err(e)) => return Some(Err(Error::SourceIter(e))),
                    None if !*seen => {
                        *seen = true;
                        return Some(Err(Error::NoSourceFiles(pattern.clone())));
                    }
                    None => return None,
                };
                *seen = true;
                debug!("Loading records from {}", next_path.display());
                Some(Value::load_from_file(&next_path))
            }
            SourceIter::Embedded(maybe_value) => maybe_value.take(),
        }
    }
}

/// A source of records for a collection.
#[derive(Debug, Clone)]
pub enum Source {
    /// One or more files from the local file system.
    ///
    /// The parameter can specify a glob-style pattern for matching files.
    /// Matching files are read in path order.
    Files(String),
    /// A document compiled into the binary.
    Embedded {
        format: SupportedFormat,
        content: &'static str,
    },
}

impl Source {
    /// Returns an iterator that allows one to iterate through values parsed
    /// from the source as they are read.
    ///
    /// Can fail if this source has been incorrectly configured.
    pub fn iter(&self) -> Result<SourceIter, Error> {
        Ok(match self {
            Self::Files(pattern) => glob::glob(pattern)
                .map(|paths| SourceIter::Files {
                    pattern: pattern.clone(),
                    paths,
                    seen: false,
                })
                .map_err(|e| Error::SourceFilePattern(pattern.clone(), e))?,
            Self::Embedded { format, content } => {
                SourceIter::Embedded(Some(Value::load_as(*format, content)))
            }
        })
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Files(pattern) => write!(f, "{}", pattern),
            Self::Embedded { format, .. } => write!(f, "<embedded {:?}>", format),
        }
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn reads_matching_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"id": 2}]"#).unwrap();
        fs::write(dir.path().join("a.yaml"), "- id: 1\n").unwrap();
        let pattern = format!("{}/*.*", dir.path().display());
        let values = Source::Files(pattern)
            .iter()
            .unwrap()
            .collect::<Result<Vec<Value>, Error>>()
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(
            values[0].as_array().unwrap()[0].as_map().unwrap().get("id"),
            Some(&Value::Unsigned(1))
        );
    }

    #[test]
    fn pattern_without_matches_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        let mut iter = Source::Files(pattern).iter().unwrap();
        assert!(matches!(iter.next(), Some(Err(Error::NoSourceFiles(_)))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn embedded_source_yields_one_document() {
        let source = Source::Embedded {
            format: SupportedFormat::Yaml,
            content: "- id: 1\n- id: 2\n",
        };
        let values = source.iter().unwrap().collect::<Vec<_>>();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].as_ref().unwrap().as_array().unwrap().len(), 2);
    }
}
