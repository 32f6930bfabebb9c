use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{DynError, FlagError};

pub const CAPTURE_MAGIC: [u8; 4] = *b"SPCA";

/// One spectral snapshot: acquisition day, shared frequency axis (Hz) and a
/// channel x bin power matrix. Only the first time slice of a capture file is
/// kept.
#[derive(Debug, Clone)]
pub struct Capture {
    pub day_id: u32,
    pub freq: Vec<f64>,
    pub spectra: Vec<Vec<f64>>,
}

/// The day-id is the leading `_`-separated token of the file name,
/// e.g. `57005_tbw.spca`.
pub fn day_id_from_filename(path: &Path) -> Result<u32, FlagError> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let token = name.split('_').next().unwrap_or("");
    token.parse::<u32>().map_err(|_| FlagError::Parse {
        name: name.to_string(),
    })
}

fn read_u32_le(reader: &mut impl Read) -> Result<u32, DynError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f64_vec(reader: &mut impl Read, len: usize) -> Result<Vec<f64>, DynError> {
    let mut raw = vec![0u8; len * 8];
    reader.read_exact(&mut raw)?;
    Ok(raw
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect())
}

/// Load one capture file.
///
/// Layout (little-endian): magic `SPCA`, u32 channel count, u32 bin count,
/// u32 time-slice count, `nbin` f64 frequency values, then per time slice a
/// channel-major `nchan * nbin` f64 power block. Slices past the first are
/// left unread.
pub fn load_capture(path: &Path) -> Result<Capture, DynError> {
    let day_id = day_id_from_filename(path)?;
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != CAPTURE_MAGIC {
        return Err(FlagError::Format(format!("{}: bad magic", path.display())).into());
    }
    let nchan = read_u32_le(&mut reader)? as usize;
    let nbin = read_u32_le(&mut reader)? as usize;
    let ntime = read_u32_le(&mut reader)? as usize;
    if nchan == 0 || nbin == 0 || ntime == 0 {
        return Err(FlagError::Format(format!(
            "{}: empty dimensions {}x{}x{}",
            path.display(),
            ntime,
            nchan,
            nbin
        ))
        .into());
    }

    let freq = read_f64_vec(&mut reader, nbin)?;
    let mut spectra = Vec::with_capacity(nchan);
    for _ in 0..nchan {
        spectra.push(read_f64_vec(&mut reader, nbin)?);
    }

    Ok(Capture {
        day_id,
        freq,
        spectra,
    })
}

/// A leading `.txt` argument is a newline-delimited list of capture paths and
/// replaces the whole argument list. Blank lines (including a trailing
/// newline) are dropped.
pub fn expand_file_list(inputs: Vec<PathBuf>) -> Result<Vec<PathBuf>, DynError> {
    let is_list = inputs
        .first()
        .and_then(|p| p.extension())
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);
    if !is_list {
        return Ok(inputs);
    }

    let file = File::open(&inputs[0])?;
    let reader = BufReader::new(file);
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        paths.push(PathBuf::from(line));
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_capture_file(
        path: &Path,
        freq: &[f64],
        slices: &[Vec<Vec<f64>>],
    ) {
        let nchan = slices[0].len() as u32;
        let nbin = freq.len() as u32;
        let mut file = File::create(path).unwrap();
        file.write_all(&CAPTURE_MAGIC).unwrap();
        file.write_all(&nchan.to_le_bytes()).unwrap();
        file.write_all(&nbin.to_le_bytes()).unwrap();
        file.write_all(&(slices.len() as u32).to_le_bytes()).unwrap();
        for &value in freq {
            file.write_all(&value.to_le_bytes()).unwrap();
        }
        for slice in slices {
            for row in slice {
                for &value in row {
                    file.write_all(&value.to_le_bytes()).unwrap();
                }
            }
        }
    }

    #[test]
    fn day_id_comes_from_the_leading_token() {
        assert_eq!(
            day_id_from_filename(Path::new("/data/57005_tbw.spca")).unwrap(),
            57005
        );
        assert!(matches!(
            day_id_from_filename(Path::new("capture_57005.spca")),
            Err(FlagError::Parse { .. })
        ));
    }

    #[test]
    fn load_reads_only_the_first_time_slice() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("57005_tbw.spca");
        let freq = [10.0e6, 20.0e6, 30.0e6];
        let first = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let second = vec![vec![9.0, 9.0, 9.0], vec![9.0, 9.0, 9.0]];
        write_capture_file(&path, &freq, &[first.clone(), second]);

        let capture = load_capture(&path).unwrap();
        assert_eq!(capture.day_id, 57005);
        assert_eq!(capture.freq, freq);
        assert_eq!(capture.spectra, first);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("57005_bad.spca");
        std::fs::write(&path, b"NOPE0000").unwrap();
        let err = load_capture(&path).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn truncated_file_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("57005_short.spca");
        let mut file = File::create(&path).unwrap();
        file.write_all(&CAPTURE_MAGIC).unwrap();
        file.write_all(&2u32.to_le_bytes()).unwrap();
        file.write_all(&3u32.to_le_bytes()).unwrap();
        file.write_all(&1u32.to_le_bytes()).unwrap();
        // Frequency axis and power block are missing entirely.
        drop(file);
        assert!(load_capture(&path).is_err());
    }

    #[test]
    fn txt_argument_expands_to_the_listed_paths() {
        let dir = tempdir().unwrap();
        let list = dir.path().join("captures.txt");
        std::fs::write(&list, "a.spca\nb.spca\n\n").unwrap();
        let expanded = expand_file_list(vec![list]).unwrap();
        assert_eq!(
            expanded,
            vec![PathBuf::from("a.spca"), PathBuf::from("b.spca")]
        );
    }

    #[test]
    fn plain_paths_pass_through_unchanged() {
        let inputs = vec![PathBuf::from("57005_a.spca"), PathBuf::from("57005_b.spca")];
        assert_eq!(expand_file_list(inputs.clone()).unwrap(), inputs);
    }
}
