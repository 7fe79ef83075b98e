//! Line counting, used to give progress reporting a total.
use std::io::BufRead;
use std::path::PathBuf;

use log::debug;
use rayon::prelude::*;

use crate::error::Error;
use crate::io::source::open_reader;

/// Count the lines of all files concurrently.
///
/// A last line without terminator is counted too.
pub fn count_lines(paths: &[PathBuf]) -> Result<u64, Error> {
    paths
        .par_iter()
        .map(|path| -> Result<u64, Error> {
            let mut reader = open_reader(path)?;
            let mut buf = Vec::new();
            let mut nb_lines = 0u64;
            while reader.read_until(b'\n', &mut buf)? > 0 {
                nb_lines += 1;
                buf.clear();
            }
            debug!("{:?}: {} lines", path, nb_lines);
            Ok(nb_lines)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, "1\n2\n3\n").unwrap();
        std::fs::write(&b, "1\n2").unwrap();
        assert_eq!(count_lines(&[a, b]).unwrap(), 5);
    }

    #[test]
    fn missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(count_lines(&[dir.path().join("nope")]).is_err());
    }
}
