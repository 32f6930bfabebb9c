use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::DynError;
use crate::flag::ChannelStatus;

/// Remove any bad-capture list left over from a previous run.
pub fn reset_bad_captures(path: &Path) -> Result<(), DynError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Append one day group's outlier capture paths, one per line.
pub fn append_bad_captures(path: &Path, names: &[String]) -> Result<(), DynError> {
    if names.is_empty() {
        return Ok(());
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for name in names {
        writeln!(file, "{name}")?;
    }
    Ok(())
}

/// Comma-terminated, ascending, 0-based indices of every channel whose final
/// status is not GOOD.
pub fn write_antenna_flags(path: &Path, status: &[ChannelStatus]) -> Result<(), DynError> {
    let mut file = File::create(path)?;
    for (idx, s) in status.iter().enumerate() {
        if *s != ChannelStatus::Good {
            write!(file, "{idx},")?;
        }
    }
    Ok(())
}

pub fn print_status_counts(status: &[ChannelStatus]) {
    let count = |wanted: ChannelStatus| status.iter().filter(|&&s| s == wanted).count();
    println!("  Good:    {}", count(ChannelStatus::Good));
    println!("  Suspect: {}", count(ChannelStatus::Suspect));
    println!("  Bad:     {}", count(ChannelStatus::Bad));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn antenna_flags_lists_exactly_the_non_good_indices() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("antenna_flags.txt");
        let status = vec![
            ChannelStatus::Good,
            ChannelStatus::Bad,
            ChannelStatus::Suspect,
            ChannelStatus::Good,
        ];
        write_antenna_flags(&path, &status).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1,2,");
    }

    #[test]
    fn all_good_channels_leave_an_empty_flag_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("antenna_flags.txt");
        write_antenna_flags(&path, &[ChannelStatus::Good; 4]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn bad_captures_accumulate_across_day_groups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad_captures.txt");
        append_bad_captures(&path, &["57005_a.spca".to_string()]).unwrap();
        append_bad_captures(&path, &[]).unwrap();
        append_bad_captures(&path, &["57006_b.spca".to_string()]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "57005_a.spca\n57006_b.spca\n"
        );
    }

    #[test]
    fn reset_removes_a_stale_list_and_tolerates_a_missing_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad_captures.txt");
        fs::write(&path, "stale\n").unwrap();
        reset_bad_captures(&path).unwrap();
        assert!(!path.exists());
        reset_bad_captures(&path).unwrap();
    }
}
