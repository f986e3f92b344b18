use std::path::PathBuf;

use thiserror::Error;

use crate::ValueType;

/// The primary error type that can be produced by ACES Hub.
#[derive(Debug, Error)]
pub enum Error {
    #[error("object property names must be strings")]
    ObjectKeysMustBeStrings,
    #[error("I/O error {0}: {1}")]
    Io(String, std::io::Error),
    #[error("failed to load data from file {0}: {1}")]
    LoadFromFile(PathBuf, Box<Error>),
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
    #[error("cannot determine file type of file: {0}")]
    CannotDetermineFileType(PathBuf),
    #[error("source files iteration failed: {0}")]
    SourceIter(#[from] glob::GlobError),
    #[error("failed to parse source file pattern \"{0}\": {1}")]
    SourceFilePattern(String, glob::PatternError),
    #[error("no files match source pattern \"{0}\"")]
    NoSourceFiles(String),
    #[error("expected a list of records, but got a value of type {0}")]
    NotARecordList(ValueType),
    #[error("expected a record to be an object, but got a value of type {0}")]
    RecordNotAnObject(ValueType),
    #[error("record is missing an integer \"id\" field")]
    MissingRecordId,
    #[error("duplicate record ID {1} in collection \"{0}\"")]
    DuplicateRecordId(String, u64),
    #[error("no such collection: {0}")]
    NoSuchCollection(String),
    #[error("collection already exists: {0}")]
    CollectionAlreadyExists(String),
    #[error("unknown facet kind \"{0}\" - expected one of exact, tag, flag or temporal")]
    UnknownFacetKind(String),
    #[error("malformed facet selection \"{0}\" - expected the form name=value")]
    MalformedFacetSelection(String),
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),
    #[error("invalid date/time \"{0}\"")]
    InvalidDateTime(String),
    #[error("failed to render template \"{0}\": {1}")]
    TemplateRender(String, handlebars::RenderError),
    #[error("failed to parse template \"{0}\": {1}")]
    TemplateParse(String, Box<handlebars::TemplateError>),
    #[error("failed to load configuration from {0}")]
    FailedToLoadConfig(PathBuf),
    #[error("failed to load budget from {0}")]
    FailedToLoadBudget(PathBuf),
}
