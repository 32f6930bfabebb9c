use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_CHAN_LO: usize = 1066;
pub const DEFAULT_CHAN_HI: usize = 3552;
pub const DEFAULT_DEVIATION_DB: f64 = 3.0;
pub const DEFAULT_BAD_FRACTION: f64 = 0.25;
pub const DEFAULT_SIGMA: f64 = 3.0;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Average antenna spectral captures and flag bad captures and channels",
    long_about = None,
    arg_required_else_help = true,
    after_help = "Examples:\n  antenna_flags 57005_tbw1.spca 57005_tbw2.spca 57006_tbw1.spca\n  antenna_flags captures.txt --output-dir flags\n  antenna_flags captures.txt --chan-lo 512 --chan-hi 2048 --no-plots\n"
)]
pub struct Args {
    /// Capture files to process, or a single newline-delimited .txt list
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// First frequency bin of the comparison window
    #[arg(long = "chan-lo", default_value_t = DEFAULT_CHAN_LO)]
    pub chan_lo: usize,

    /// One past the last frequency bin of the comparison window
    #[arg(long = "chan-hi", default_value_t = DEFAULT_CHAN_HI)]
    pub chan_hi: usize,

    /// Deviation from the median spectrum that marks a window bin (dB)
    #[arg(long = "deviation-db", default_value_t = DEFAULT_DEVIATION_DB)]
    pub deviation_db: f64,

    /// Fraction of window bins that must deviate before a channel goes bad
    #[arg(long = "bad-fraction", default_value_t = DEFAULT_BAD_FRACTION)]
    pub bad_fraction: f64,

    /// Residual threshold for per-day capture outliers (population sigmas)
    #[arg(long, default_value_t = DEFAULT_SIGMA)]
    pub sigma: f64,

    /// Directory for text and plot artifacts
    #[arg(long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Skip PNG plot rendering
    #[arg(long = "no-plots")]
    pub no_plots: bool,
}
