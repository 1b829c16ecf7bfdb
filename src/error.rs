//! Error types for tiled-linalg

use thiserror::Error;

/// Result type alias using tiled-linalg's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Which pair of operands disagreed on their tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridMismatchKind {
    /// The output grid does not match the grid implied by the inputs
    OutputInput,
    /// Two inputs disagree along a contracted or shared axis
    InputInput,
}

impl GridMismatchKind {
    /// Numeric discriminant (0 = output/input, 1 = input/input)
    #[inline]
    pub fn code(&self) -> u8 {
        match self {
            GridMismatchKind::OutputInput => 0,
            GridMismatchKind::InputInput => 1,
        }
    }

    /// Short human-readable description
    pub fn describe(&self) -> &'static str {
        match self {
            GridMismatchKind::OutputInput => "output/input",
            GridMismatchKind::InputInput => "input/input",
        }
    }
}

impl std::fmt::Display for GridMismatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Errors that can occur in tiled-linalg operations
#[derive(Error, Debug)]
pub enum Error {
    /// Operand tilings disagree along corresponding axes
    ///
    /// Carries tile counts, except for GEMV vectors, whose count and size
    /// mismatches both land here and carry the first differing tile size.
    #[error(
        "Incompatible tile grids in '{op}' ({kind} mismatch, code {code}): expected {expected}, got {got}",
        code = .kind.code()
    )]
    TileGridMismatch {
        /// The operation being validated
        op: &'static str,
        /// Which operand pair disagreed
        kind: GridMismatchKind,
        /// Tile count, or tile size, of the reference operand
        expected: usize,
        /// Tile count, or tile size, of the offending operand
        got: usize,
    },

    /// Tile counts agree but individual tile sizes differ along a shared axis
    #[error("Tile sizes differ in '{op}' at tile index {index}: expected {expected}, got {got}")]
    TileDimensionMismatch {
        /// The operation being validated
        op: &'static str,
        /// Position along the axis where the sizes diverge
        index: usize,
        /// Tile size of the reference operand
        expected: usize,
        /// Tile size of the offending operand
        got: usize,
    },

    /// Operand rank does not fit the operation
    #[error("Rank mismatch in '{op}': expected rank {expected}, got {got}")]
    RankMismatch {
        /// The operation being validated
        op: &'static str,
        /// Required rank
        expected: usize,
        /// Actual rank
        got: usize,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Index out of bounds
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Size of the dimension
        size: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Failure setting up the worker thread pool
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create a tile grid mismatch error
    pub fn grid_mismatch(
        op: &'static str,
        kind: GridMismatchKind,
        expected: usize,
        got: usize,
    ) -> Self {
        Self::TileGridMismatch {
            op,
            kind,
            expected,
            got,
        }
    }

    /// Create a tile dimension mismatch error
    pub fn tile_dimension(op: &'static str, index: usize, expected: usize, got: usize) -> Self {
        Self::TileDimensionMismatch {
            op,
            index,
            expected,
            got,
        }
    }

    /// Create a rank mismatch error
    pub fn rank_mismatch(op: &'static str, expected: usize, got: usize) -> Self {
        Self::RankMismatch { op, expected, got }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Grid mismatch discriminant, if this is a grid-compatibility error
    pub fn grid_mismatch_kind(&self) -> Option<GridMismatchKind> {
        match self {
            Self::TileGridMismatch { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
