use thiserror::Error;

pub type DynError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum FlagError {
    #[error("capture shape mismatch: expected {expected_chans} channels x {expected_bins} bins, found {found_chans} x {found_bins}")]
    Consistency {
        expected_chans: usize,
        expected_bins: usize,
        found_chans: usize,
        found_bins: usize,
    },

    #[error("cannot parse day-id from capture filename: {name}")]
    Parse { name: String },

    #[error("channel count {channels} is odd; polarization pairs require an even count")]
    Pairing { channels: usize },

    #[error("comparison window [{lo}, {hi}) does not fit {bins} frequency bins")]
    Window { lo: usize, hi: usize, bins: usize },

    #[error("malformed capture file: {0}")]
    Format(String),

    #[error("no captures accumulated")]
    Empty,
}
