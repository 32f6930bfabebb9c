mod accum;
mod args;
mod capture;
mod error;
mod flag;
mod plot;
mod report;
mod stats;
mod trend;

use std::io::Write;

use clap::{CommandFactory, Parser};

use accum::{median_spectrum, SpectrumAccumulator};
use args::Args;
use capture::{expand_file_list, load_capture};
use error::DynError;
use flag::{classify_channels, downgrade_pairs, ChannelStatus};
use plot::{plot_median_power_scatter, plot_spectra_overlay, plot_spectrum_db};
use stats::db10;
use trend::{flag_outliers, group_by_day, MedianPowerPoint};

fn main() -> Result<(), DynError> {
    if std::env::args_os().len() == 1 {
        Args::command().print_help()?;
        println!();
        return Ok(());
    }

    let args = Args::parse();
    if args.chan_lo >= args.chan_hi {
        return Err("--chan-lo must be below --chan-hi".into());
    }

    let files = expand_file_list(args.inputs.clone())?;
    if files.is_empty() {
        return Err("No capture files to process".into());
    }
    std::fs::create_dir_all(&args.output_dir)?;

    println!("Starting antenna flagging with the following arguments:");
    println!("--------------------------------------------------");
    println!("  captures:   {}", files.len());
    println!("  window:     [{}, {}) bins", args.chan_lo, args.chan_hi);
    println!("  deviation:  {:.1} dB", args.deviation_db);
    println!("  bad-frac:   {:.2}", args.bad_fraction);
    println!("  sigma:      {:.1}", args.sigma);
    println!("  output-dir: {}", args.output_dir.display());

    // Load and accumulate. Each capture is dropped right after it is added;
    // only the running sum and the per-capture median power survive the loop.
    let mut accumulator = SpectrumAccumulator::new();
    let mut points: Vec<MedianPowerPoint> = Vec::with_capacity(files.len());
    let mut freq: Vec<f64> = Vec::new();
    for (idx, path) in files.iter().enumerate() {
        let capture = load_capture(path)?;
        accumulator.add(&capture.spectra)?;
        let flattened: Vec<f64> = capture.spectra.iter().flatten().copied().collect();
        points.push(MedianPowerPoint {
            day_id: capture.day_id,
            median_power: stats::median(&flattened),
        });
        if idx == 0 {
            freq = capture.freq;
        }
        print!("\r[load] {}/{}", idx + 1, files.len());
        std::io::stdout().flush()?;
    }
    println!();
    let (chans, bins) = accumulator.shape();
    println!(
        "[info] Loaded {} captures: {} channels x {} bins",
        accumulator.count(),
        chans,
        bins
    );

    // Per-day temporal outliers. The previous list is removed up front, then
    // every day group appends its own outliers.
    let bad_captures_path = args.output_dir.join("bad_captures.txt");
    report::reset_bad_captures(&bad_captures_path)?;
    let mut scatter_points: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    let mut scatter_outliers: Vec<(f64, f64)> = Vec::new();
    let mut outlier_total = 0usize;
    for (day, indices) in group_by_day(&points) {
        let power: Vec<f64> = indices.iter().map(|&i| points[i].median_power).collect();
        let outliers = flag_outliers(&power, args.sigma);
        let group_len = indices.len() as f64;
        for (pos, &value) in power.iter().enumerate() {
            scatter_points.push((day as f64 + pos as f64 / group_len, value));
        }
        for &pos in &outliers {
            scatter_outliers.push((day as f64 + pos as f64 / group_len, power[pos]));
        }
        let names: Vec<String> = outliers
            .iter()
            .map(|&pos| files[indices[pos]].display().to_string())
            .collect();
        report::append_bad_captures(&bad_captures_path, &names)?;
        outlier_total += outliers.len();
    }
    println!(
        "[info] Flagged {} of {} captures as temporal outliers -> {}",
        outlier_total,
        files.len(),
        bad_captures_path.display()
    );

    // Reference spectra and channel classification.
    let mean_spec = accumulator.mean()?;
    let median_spec = median_spectrum(&mean_spec);
    let mut status = classify_channels(
        &mean_spec,
        &median_spec,
        args.chan_lo,
        args.chan_hi,
        args.deviation_db,
        args.bad_fraction,
    )?;
    downgrade_pairs(&mut status)?;

    report::print_status_counts(&status);
    let flags_path = args.output_dir.join("antenna_flags.txt");
    report::write_antenna_flags(&flags_path, &status)?;
    println!("[info] Wrote channel flags -> {}", flags_path.display());

    if !args.no_plots {
        render_plots(
            &args,
            &freq,
            &mean_spec,
            &median_spec,
            &status,
            &scatter_points,
            &scatter_outliers,
        )?;
    }

    println!("Processing finished.");
    Ok(())
}

fn render_plots(
    args: &Args,
    freq: &[f64],
    mean_spec: &[Vec<f64>],
    median_spec: &[f64],
    status: &[ChannelStatus],
    scatter_points: &[(f64, f64)],
    scatter_outliers: &[(f64, f64)],
) -> Result<(), DynError> {
    let scatter_path = args.output_dir.join("median_power.png");
    plot_median_power_scatter(
        scatter_points,
        scatter_outliers,
        "Median capture power",
        &scatter_path,
        "Day (MJD + capture fraction)",
        "Median power",
    )?;
    println!("[plot] Wrote capture power scatter to {}", scatter_path.display());

    if freq.len() < 2 {
        println!("[warn] Insufficient frequency bins to plot spectra after removing the DC bin.");
        return Ok(());
    }

    // Spectrum plots skip the DC bin.
    let freq_mhz: Vec<f64> = freq[1..].iter().map(|&f| f / 1.0e6).collect();
    let median_db: Vec<f64> = median_spec[1..].iter().map(|&p| db10(p)).collect();
    let median_path = args.output_dir.join("median_spectrum.png");
    plot_spectrum_db(
        &freq_mhz,
        &median_db,
        "Median",
        &median_path,
        "Frequency (MHz)",
        "Power (dB)",
        "median",
    )?;
    println!("[plot] Wrote median spectrum to {}", median_path.display());

    for (wanted, filename) in [
        (ChannelStatus::Good, "spectra_good.png"),
        (ChannelStatus::Suspect, "spectra_suspect.png"),
        (ChannelStatus::Bad, "spectra_bad.png"),
    ] {
        let rows: Vec<Vec<f64>> = status
            .iter()
            .zip(mean_spec)
            .filter(|(s, _)| **s == wanted)
            .map(|(_, row)| row[1..].iter().map(|&p| db10(p)).collect())
            .collect();
        if rows.is_empty() {
            println!(
                "[warn] No channels with status {}; skipping {}",
                wanted.label(),
                filename
            );
            continue;
        }
        let path = args.output_dir.join(filename);
        plot_spectra_overlay(
            &freq_mhz,
            &rows,
            &format!("Status: {}", wanted.label()),
            &path,
            "Frequency (MHz)",
            "Power (dB)",
        )?;
        println!("[plot] Wrote {} channel overlay to {}", wanted.label(), path.display());
    }

    Ok(())
}
