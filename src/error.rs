//! Error types for the montage importer.
//!
//! Errors are layered per subsystem and every variant maps to a stable
//! negative numeric code via [`MontageError::code`]. The codes follow the
//! convention the hosting pipeline inspects: `-387..` for setup problems,
//! `-700xx` for parse and import problems. Non-fatal conditions (unknown
//! vendor tags, malformed optional values) are logged and never surface
//! through these types.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration and setup errors. All fatal; the run aborts before any
/// parsing happens.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No input file was supplied.
    #[error("the input file must be set before the import can run")]
    InputFileNotSet,

    /// The input file does not exist on disk.
    #[error("the input file does not exist: {path}")]
    InputFileMissing { path: PathBuf },

    /// The input file could not be read.
    #[error("could not read input file {path}: {message}")]
    InputFileUnreadable { path: PathBuf, message: String },
}

/// Errors from the destination columnar store.
///
/// The importer's responsibility ends at "array created/extended with correct
/// length and type"; these cover the ways that contract can fail.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// An attribute matrix with this name already exists in the container.
    #[error("attribute matrix '{0}' already exists")]
    DuplicateMatrix(String),

    /// The named attribute matrix is not present.
    #[error("attribute matrix '{0}' not found")]
    MissingMatrix(String),

    /// An array with this name already exists in the matrix.
    #[error("array '{0}' already exists in matrix '{1}'")]
    DuplicateArray(String, String),

    /// The named array is not present in the matrix.
    #[error("array '{0}' not found in matrix '{1}'")]
    MissingArray(String, String),
}

/// Errors raised while parsing the `_meta.xml` document.
///
/// Any of these aborts the whole parse; partial results are discarded.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// XML syntax error. Line and column are 1-based.
    #[error("XML parse error at line {line}, column {column}: {message}")]
    MalformedDocument {
        line: usize,
        column: usize,
        message: String,
    },

    /// The document has no root element at all.
    #[error("the document contains no root element")]
    EmptyDocument,

    /// The root `<Tags>` element is absent. The file is probably not an
    /// AxioVision `_meta.xml`.
    #[error("could not find the <ROOT><Tags> element; is the file an AxioVision _meta.xml?")]
    MissingRootTags,

    /// The `<Count>` child of a `<Tags>` section is missing or non-numeric.
    #[error("'Count' tag missing or non-numeric in the <{section}> tags section")]
    BadCount { section: String },

    /// A `<pNNN>` element declared by the image count is absent.
    #[error("could not find the <ROOT><{tag}> element; is the file an AxioVision _meta.xml?")]
    MissingTileElement { tag: String },

    /// A `<pNNN>` element has no nested `<Tags>` block.
    #[error("could not find the <ROOT><{tag}><Tags> element; is the file an AxioVision _meta.xml?")]
    MissingTileTags { tag: String },

    /// The tags section of one tile failed to parse.
    #[error("error parsing the <ROOT><{tag}><Tags> element: {source}")]
    TileSection {
        tag: String,
        #[source]
        source: Box<ParseError>,
    },

    /// A tag id that is mandatory for the import is absent from the global
    /// `<ROOT><Tags>` section.
    #[error("mandatory tag '{name}' is missing from the root tags section")]
    MissingGlobalTag { name: &'static str },

    /// A tag id that is mandatory for the import is absent from one tile's
    /// section.
    #[error("mandatory tag '{name}' is missing from tile {tile}")]
    MissingTileTag { tile: i32, name: &'static str },

    /// The per-tile pixel dimensions read from the first tile are not both
    /// positive.
    #[error("tile {tile} declares non-positive pixel dimensions {width}x{height}")]
    InvalidTileDimensions {
        tile: i32,
        width: i32,
        height: i32,
    },

    /// Raw tag text could not be decoded into its declared value type.
    ///
    /// Fatal only when the caller escalates it; the section parser downgrades
    /// this to a warning for non-mandatory tags.
    #[error("could not decode value '{raw}' for tag id {id} as {kind}")]
    MalformedValue {
        id: i32,
        raw: String,
        kind: &'static str,
    },
}

/// Errors from the injected image-import and grayscale-conversion
/// collaborators.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    /// A tile image file could not be opened or decoded.
    #[error("could not read tile image {path}: {message}")]
    ImageRead { path: PathBuf, message: String },

    /// Grayscale conversion of a tile array failed.
    #[error("could not convert array '{array}' to grayscale: {message}")]
    Grayscale { array: String, message: String },

    /// The store rejected an operation the collaborator needed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Umbrella error for a whole import run.
#[derive(Debug, Clone, Error)]
pub enum MontageError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl MontageError {
    /// Stable numeric error code for host pipelines that inspect codes.
    ///
    /// Setup errors live in the `-38x`/`-390` range, parse and import errors
    /// in `-700xx`, matching the codes the original filter reported.
    pub fn code(&self) -> i32 {
        match self {
            MontageError::Config(e) => match e {
                ConfigError::InputFileNotSet => -387,
                ConfigError::InputFileMissing { .. } => -388,
                ConfigError::InputFileUnreadable { .. } => -389,
            },
            MontageError::Store(_) => -390,
            MontageError::Parse(e) => parse_code(e),
            MontageError::Collaborator(e) => match e {
                CollaboratorError::ImageRead { .. } => -70020,
                CollaboratorError::Grayscale { .. } => -70021,
                CollaboratorError::Store(_) => -390,
            },
        }
    }
}

fn parse_code(e: &ParseError) -> i32 {
    match e {
        ParseError::MalformedDocument { .. } | ParseError::EmptyDocument => -70000,
        ParseError::MissingRootTags | ParseError::BadCount { .. } => -70001,
        ParseError::MissingTileElement { .. } => -70002,
        ParseError::MissingTileTags { .. } => -70003,
        ParseError::TileSection { .. } => -70004,
        ParseError::MissingGlobalTag { .. } | ParseError::MissingTileTag { .. } => -70010,
        ParseError::InvalidTileDimensions { .. } => -70011,
        ParseError::MalformedValue { .. } => -70013,
    }
}

/// Convenience result alias used throughout the crate.
pub type Result<T, E = MontageError> = std::result::Result<T, E>;

// =============================================================================
// Tests
// =============================================================================
