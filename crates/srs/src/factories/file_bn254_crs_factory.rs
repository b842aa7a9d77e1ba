use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bbrs_ecc::curves::bn254::G1Affine as Bn254G1Affine;

use super::crs_factory::Bn254CrsFactory;
use crate::error::SrsError;

/// Size of one serialized point: x then y, 32 bytes big-endian each.
pub const POINT_SIZE: usize = 64;

/// Reads points from a flat file of 64-byte `x || y` records.
///
/// Only the requested range is read, so growing a large SRS touches each byte once.
pub struct FileBn254CrsFactory {
    path: PathBuf,
}

impl FileBn254CrsFactory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> SrsError {
        SrsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Bn254CrsFactory for FileBn254CrsFactory {
    fn load_points(&self, start: usize, count: usize) -> Result<Vec<Bn254G1Affine>, SrsError> {
        let mut file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let file_len = file.metadata().map_err(|e| self.io_error(e))?.len();
        let available = (file_len / POINT_SIZE as u64) as usize;
        let end = start.saturating_add(count);
        if end > available {
            return Err(SrsError::Insufficient {
                available,
                required: end,
            });
        }

        file.seek(SeekFrom::Start((start * POINT_SIZE) as u64))
            .map_err(|e| self.io_error(e))?;
        let mut buf = vec![0u8; count * POINT_SIZE];
        file.read_exact(&mut buf).map_err(|e| self.io_error(e))?;

        let mut points = Vec::with_capacity(count);
        for (offset, chunk) in buf.chunks_exact(POINT_SIZE).enumerate() {
            let index = start + offset;
            let mut bytes = [0u8; POINT_SIZE];
            bytes.copy_from_slice(chunk);
            let point = Bn254G1Affine::from_be_bytes(&bytes)
                .filter(|p| !p.is_point_at_infinity())
                .ok_or(SrsError::InvalidPoint { index })?;
            if index == 0 && point != Bn254G1Affine::one() {
                return Err(SrsError::BadGenerator);
            }
            points.push(point);
        }
        Ok(points)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
