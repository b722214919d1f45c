use crate::artifacts::index::CHECKSUM_SIZE;
use crate::errors::{Error, Result};
use bytes::Bytes;
use file_guard::FileGuard;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::PathBuf;

/// Locked index file that digests everything read from or written to it
pub struct Checksum<'f> {
    file: FileGuard<&'f mut std::fs::File>,
    path: PathBuf,
    digest: Sha1,
}

impl<'f> Checksum<'f> {
    pub(crate) fn new(file: FileGuard<&'f mut std::fs::File>, path: impl Into<PathBuf>) -> Self {
        Checksum {
            file,
            path: path.into(),
            digest: Sha1::new(),
        }
    }

    pub(crate) fn read(&mut self, size: usize) -> Result<Bytes> {
        let mut buffer = vec![0; size];
        self.file
            .deref_mut()
            .read_exact(&mut buffer)
            .map_err(|_| self.corrupt("unexpected end-of-file while reading index"))?;

        self.digest.update(&buffer);
        Ok(Bytes::from(buffer))
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .deref_mut()
            .write_all(data)
            .map_err(Error::io_at(&self.path))?;
        self.digest.update(data);
        Ok(())
    }

    pub(crate) fn write_checksum(&mut self) -> Result<()> {
        let checksum = self.digest.clone().finalize();
        self.file
            .deref_mut()
            .write_all(checksum.as_slice())
            .map_err(Error::io_at(&self.path))
    }

    pub(crate) fn verify(&mut self) -> Result<()> {
        let mut expected_checksum = [0u8; CHECKSUM_SIZE];
        self.file
            .deref_mut()
            .read_exact(&mut expected_checksum)
            .map_err(|_| self.corrupt("missing trailing checksum"))?;

        let actual_checksum = self.digest.clone().finalize();
        if expected_checksum != actual_checksum.as_slice() {
            return Err(self.corrupt("checksum does not match value stored on disk"));
        }

        Ok(())
    }

    pub(crate) fn corrupt(&self, reason: impl Into<String>) -> Error {
        Error::CorruptIndex {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}
