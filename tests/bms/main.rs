//! Tests for `bms_playback::bms`.

mod diagnostics;
mod files;
mod lenient;
mod loading;

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

use bms_playback::decode::{AudioDecoder, DecodeError, Pcm};

/// Decodes every sample into a short constant tone, except the files named `missing`.
#[derive(Debug, Default)]
pub struct StubDecoder {
    decoded: RefCell<Vec<PathBuf>>,
}

impl StubDecoder {
    pub fn decoded(&self) -> Vec<PathBuf> {
        self.decoded.borrow().clone()
    }
}

impl AudioDecoder for StubDecoder {
    fn decode(&self, path: &Path) -> Result<Pcm, DecodeError> {
        if path.file_stem().is_some_and(|stem| stem == "missing") {
            return Err(std::io::Error::from(std::io::ErrorKind::NotFound).into());
        }
        self.decoded.borrow_mut().push(path.to_path_buf());
        Ok(vec![0.25; 8].into())
    }

    fn extensions(&self) -> &[&str] {
        &["wav"]
    }
}
