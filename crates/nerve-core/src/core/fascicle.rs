use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const INNERS_DIR: &str = "inners";
const OUTERS_DIR: &str = "outers";
const LEGACY_OUTERS_DIR: &str = "outer";

#[derive(Debug, Error)]
pub enum FascicleError {
    #[error(
        "Fascicle '{label}' needs at least one inner and one outer contour (found {inners} inner(s), {outers} outer(s))"
    )]
    Incomplete {
        label: String,
        inners: usize,
        outers: usize,
    },

    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The contour files making up one fascicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FascicleGeometry {
    /// Name of the fascicle's source directory.
    pub label: String,
    pub inners: Vec<PathBuf>,
    pub outers: Vec<PathBuf>,
}

/// The primitive used to build a fascicle, chosen from its inner count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FascicleKind {
    /// A single inner contour: built directly from the contour curves.
    SimpleContour,
    /// Several inner contours: built from a meshed cross-section.
    Mesh,
}

impl FascicleKind {
    /// Every fascicle primitive, in the order they are registered.
    pub const ALL: [FascicleKind; 2] = [FascicleKind::SimpleContour, FascicleKind::Mesh];

    /// Exactly one inner selects [`FascicleKind::SimpleContour`]; two or more
    /// select [`FascicleKind::Mesh`]; zero has no valid kind.
    pub fn select(inner_count: usize) -> Option<Self> {
        match inner_count {
            0 => None,
            1 => Some(Self::SimpleContour),
            _ => Some(Self::Mesh),
        }
    }

    pub fn primitive_name(self) -> &'static str {
        match self {
            Self::SimpleContour => "FascicleCI",
            Self::Mesh => "FascicleMesh",
        }
    }
}

impl FascicleGeometry {
    /// Checks the one-inner-one-outer invariant and picks the primitive kind.
    pub fn kind(&self) -> Result<FascicleKind, FascicleError> {
        if self.outers.is_empty() {
            return Err(self.incomplete());
        }
        FascicleKind::select(self.inners.len()).ok_or_else(|| self.incomplete())
    }

    fn incomplete(&self) -> FascicleError {
        FascicleError::Incomplete {
            label: self.label.clone(),
            inners: self.inners.len(),
            outers: self.outers.len(),
        }
    }
}

/// Lists the fascicles to build, whatever their storage.
pub trait FascicleSource {
    fn list_fascicle_geometry(&self) -> Result<Vec<FascicleGeometry>, FascicleError>;
}

impl FascicleSource for Vec<FascicleGeometry> {
    fn list_fascicle_geometry(&self) -> Result<Vec<FascicleGeometry>, FascicleError> {
        Ok(self.clone())
    }
}

/// Scans a directory holding one subdirectory per fascicle, each with an
/// `inners/` and an `outers/` directory of contour files.
///
/// Entries whose names contain a `.` are skipped. Fascicles and contour files
/// are returned in name order so that repeated scans are deterministic.
#[derive(Debug, Clone)]
pub struct DirectoryFascicleSource {
    dir: PathBuf,
}

impl DirectoryFascicleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FascicleSource for DirectoryFascicleSource {
    fn list_fascicle_geometry(&self) -> Result<Vec<FascicleGeometry>, FascicleError> {
        if !self.dir.is_dir() {
            warn!(
                "Fascicle directory {:?} does not exist; no fascicles will be built.",
                self.dir
            );
            return Ok(Vec::new());
        }

        let mut fascicles = Vec::new();
        for name in sorted_entries(&self.dir)? {
            let path = self.dir.join(&name);
            if name.contains('.') || !path.is_dir() {
                continue;
            }

            let outers_dir = if path.join(OUTERS_DIR).is_dir() {
                path.join(OUTERS_DIR)
            } else {
                path.join(LEGACY_OUTERS_DIR)
            };
            let inners = list_files(&path.join(INNERS_DIR))?;
            let outers = list_files(&outers_dir)?;
            debug!(
                "Found fascicle '{}' with {} inner(s) and {} outer(s).",
                name,
                inners.len(),
                outers.len()
            );
            fascicles.push(FascicleGeometry {
                label: name,
                inners,
                outers,
            });
        }
        Ok(fascicles)
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<String>, FascicleError> {
    let io_err = |e| FascicleError::Io {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, FascicleError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    Ok(sorted_entries(dir)?
        .into_iter()
        .map(|name| dir.join(name))
        .collect())
}
