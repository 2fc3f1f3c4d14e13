use super::{sample_name, DatasetBatch};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An I/O failure while writing a dataset.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    /// A directory could not be created.
    #[error("failed to create directory `{}`", path.display())]
    CreateDir {
        /// The directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// A file could not be written.
    #[error("failed to write `{}`", path.display())]
    Write {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Writes dataset batches to disk, as `images/<name>.<ext>` and `labels/<name>.txt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// A sink writing under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory containing the images.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// The directory containing the labels.
    pub fn labels_dir(&self) -> PathBuf {
        self.root.join("labels")
    }

    /// Writes every captured sample of `batch`, and returns the number of samples written.
    ///
    /// Skipped entries produce no file.
    pub fn write_batch(&self, batch: &DatasetBatch) -> Result<usize, SinkError> {
        let images = self.images_dir();
        let labels = self.labels_dir();
        create_dir(&images)?;
        create_dir(&labels)?;

        let mut written = 0;

        for (image, label, index) in batch.artifacts() {
            let name = sample_name(index);
            write_file(&images.join(format!("{}.{}", name, image.extension)), &image.bytes)?;
            write_file(&labels.join(format!("{}.txt", name)), label.as_bytes())?;
            written += 1;
        }

        log::info!("Wrote {} samples to `{}`.", written, self.root.display());
        Ok(written)
    }
}

fn create_dir(path: &Path) -> Result<(), SinkError> {
    fs::create_dir_all(path).map_err(|source| SinkError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), SinkError> {
    fs::write(path, contents).map_err(|source| SinkError::Write {
        path: path.to_path_buf(),
        source,
    })
}
