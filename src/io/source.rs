/*! Raw record sources.

A source is either a single file or a directory of files. Directories are read one level deep:
subdirectories and `bz2` archives are skipped, `gz` files are decompressed on the fly.

Lines are yielded in file order then line order.
!*/
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use flate2::read::MultiGzDecoder;
use log::{debug, warn};

use crate::error::Error;

/// Archive extension that is never read inline.
const SKIPPED_EXTENSION: &str = "bz2";

/// Open a file, transparently decompressing `.gz` files.
pub fn open_reader(path: &Path) -> Result<BufReader<Box<dyn Read + Send>>, Error> {
    let file = File::open(path)?;
    let inner: Box<dyn Read + Send> = match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => Box::new(MultiGzDecoder::new(BufReader::new(file))),
        _ => Box::new(file),
    };
    Ok(BufReader::new(inner))
}

#[derive(Debug, Clone)]
pub struct RecordSource {
    paths: Vec<PathBuf>,
}

impl RecordSource {
    /// Enumerate the files of a source.
    ///
    /// Errors if `path` does not exist.
    pub fn new(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::Config(format!("source {:?} does not exist", path)));
        }

        let paths = if path.is_dir() {
            Self::list_dir(path)?
        } else {
            vec![path.to_path_buf()]
        };

        debug!("source {:?}: {} files", path, paths.len());
        Ok(Self { paths })
    }

    /// list regular files of a directory, sorted by name.
    fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, Error> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                continue;
            }
            let is_archive = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.ends_with(SKIPPED_EXTENSION))
                .unwrap_or(false);
            if is_archive {
                warn!("skipping archive {:?}", path);
                continue;
            }
            paths.push(path);
        }
        paths.sort();
        Ok(paths)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Lazy iterator over every line of every file.
    pub fn lines(&self) -> Lines {
        Lines {
            paths: self.paths.clone().into_iter(),
            current: None,
        }
    }
}

/// Line iterator over a [RecordSource].
///
/// Yields lines without their line terminator.
/// Lines that are not valid UTF-8 are decoded lossily.
/// I/O errors are yielded and the current file is abandoned.
pub struct Lines {
    paths: std::vec::IntoIter<PathBuf>,
    current: Option<(PathBuf, BufReader<Box<dyn Read + Send>>)>,
}

impl Lines {
    fn next_file(&mut self) -> Option<Result<(), Error>> {
        let path = self.paths.next()?;
        debug!("reading {:?}", path);
        Some(open_reader(&path).map(|reader| {
            self.current = Some((path, reader));
        }))
    }
}

impl Iterator for Lines {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                if let Err(e) = self.next_file()? {
                    return Some(Err(e));
                }
            }
            let (path, reader) = self.current.as_mut()?;

            let mut buf = Vec::new();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    debug!("done reading {:?}", path);
                    self.current = None;
                }
                Ok(_) => {
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }
                    let line = match String::from_utf8(buf) {
                        Ok(line) => line,
                        Err(e) => {
                            debug!("invalid utf-8 in {:?}", path);
                            String::from_utf8_lossy(e.as_bytes()).into_owned()
                        }
                    };
                    return Some(Ok(line));
                }
                Err(e) => {
                    self.current = None;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
