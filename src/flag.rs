use crate::error::FlagError;
use crate::stats::db10;

/// Per-channel health. The discriminants keep the report encoding
/// (bad = 1, suspect = 2, good = 3); derived ordering gives
/// Bad < Suspect < Good, so a min-combine always downgrades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChannelStatus {
    Bad = 1,
    Suspect = 2,
    Good = 3,
}

impl ChannelStatus {
    pub fn label(self) -> &'static str {
        match self {
            ChannelStatus::Bad => "Bad",
            ChannelStatus::Suspect => "Suspect",
            ChannelStatus::Good => "Good",
        }
    }
}

/// Classify each channel of a channel x bin power matrix against the median
/// spectrum over the bin window [chan_lo, chan_hi). A channel goes BAD when
/// more than `bad_fraction` of the window bins deviate from the median by
/// more than `deviation_db` decibels; otherwise it stays GOOD. Bins whose
/// power has no dB value (non-positive) never count as deviating.
pub fn classify_channels(
    spec: &[Vec<f64>],
    median_spec: &[f64],
    chan_lo: usize,
    chan_hi: usize,
    deviation_db: f64,
    bad_fraction: f64,
) -> Result<Vec<ChannelStatus>, FlagError> {
    let bins = median_spec.len();
    if chan_lo >= chan_hi || chan_hi > bins {
        return Err(FlagError::Window {
            lo: chan_lo,
            hi: chan_hi,
            bins,
        });
    }
    let window = (chan_hi - chan_lo) as f64;
    let median_db: Vec<f64> = median_spec[chan_lo..chan_hi]
        .iter()
        .map(|&p| db10(p))
        .collect();

    let mut status = Vec::with_capacity(spec.len());
    for row in spec {
        debug_assert_eq!(row.len(), bins);
        let bad_bins = row[chan_lo..chan_hi]
            .iter()
            .zip(&median_db)
            .filter(|(&p, &m)| (db10(p) - m).abs() > deviation_db)
            .count();
        status.push(if bad_bins as f64 > bad_fraction * window {
            ChannelStatus::Bad
        } else {
            ChannelStatus::Good
        });
    }
    Ok(status)
}

/// Adjacent channels (2k, 2k+1) are the two polarizations of one physical
/// antenna. A pair in which either member is not GOOD is downgraded as a
/// whole: each member becomes the minimum of its own status and SUSPECT.
pub fn downgrade_pairs(status: &mut [ChannelStatus]) -> Result<(), FlagError> {
    if status.len() % 2 != 0 {
        return Err(FlagError::Pairing {
            channels: status.len(),
        });
    }
    for pair in status.chunks_exact_mut(2) {
        if pair[0] != ChannelStatus::Good || pair[1] != ChannelStatus::Good {
            pair[0] = pair[0].min(ChannelStatus::Suspect);
            pair[1] = pair[1].min(ChannelStatus::Suspect);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_spectrum_stays_good() {
        let median = vec![1.0; 10];
        let spec = vec![median.clone()];
        let status = classify_channels(&spec, &median, 0, 10, 3.0, 0.25).unwrap();
        assert_eq!(status, vec![ChannelStatus::Good]);
    }

    #[test]
    fn channel_with_too_many_deviating_bins_goes_bad() {
        // 3 of 8 window bins off by 10 dB: 3 > 0.25 * 8.
        let median = vec![1.0; 8];
        let mut row = vec![1.0; 8];
        row[1] = 10.0;
        row[4] = 10.0;
        row[6] = 10.0;
        let status = classify_channels(&[row], &median, 0, 8, 3.0, 0.25).unwrap();
        assert_eq!(status, vec![ChannelStatus::Bad]);
    }

    #[test]
    fn deviating_bins_at_exactly_the_fraction_stay_good() {
        // 2 of 8 bins is not strictly more than 0.25 * 8.
        let median = vec![1.0; 8];
        let mut row = vec![1.0; 8];
        row[0] = 10.0;
        row[7] = 10.0;
        let status = classify_channels(&[row], &median, 0, 8, 3.0, 0.25).unwrap();
        assert_eq!(status, vec![ChannelStatus::Good]);
    }

    #[test]
    fn window_restricts_the_comparison() {
        // Deviations outside [2, 6) are ignored.
        let median = vec![1.0; 8];
        let mut row = vec![1.0; 8];
        row[0] = 100.0;
        row[1] = 100.0;
        row[6] = 100.0;
        row[7] = 100.0;
        let status = classify_channels(&[row], &median, 2, 6, 3.0, 0.25).unwrap();
        assert_eq!(status, vec![ChannelStatus::Good]);
    }

    #[test]
    fn non_positive_power_never_counts_as_deviating() {
        let median = vec![1.0; 4];
        let row = vec![0.0, -1.0, 0.0, 0.0];
        let status = classify_channels(&[row], &median, 0, 4, 3.0, 0.25).unwrap();
        assert_eq!(status, vec![ChannelStatus::Good]);
    }

    #[test]
    fn bad_window_is_rejected() {
        let median = vec![1.0; 4];
        assert!(matches!(
            classify_channels(&[], &median, 2, 8, 3.0, 0.25),
            Err(FlagError::Window { .. })
        ));
        assert!(matches!(
            classify_channels(&[], &median, 3, 3, 3.0, 0.25),
            Err(FlagError::Window { .. })
        ));
    }

    #[test]
    fn good_bad_pair_becomes_suspect_suspect() {
        let mut status = vec![ChannelStatus::Good, ChannelStatus::Bad];
        downgrade_pairs(&mut status).unwrap();
        assert_eq!(status, vec![ChannelStatus::Suspect, ChannelStatus::Suspect]);
    }

    #[test]
    fn good_good_pair_is_unchanged() {
        let mut status = vec![ChannelStatus::Good, ChannelStatus::Good];
        downgrade_pairs(&mut status).unwrap();
        assert_eq!(status, vec![ChannelStatus::Good, ChannelStatus::Good]);
    }

    #[test]
    fn bad_bad_pair_stays_bad() {
        let mut status = vec![ChannelStatus::Bad, ChannelStatus::Bad];
        downgrade_pairs(&mut status).unwrap();
        assert_eq!(status, vec![ChannelStatus::Bad, ChannelStatus::Bad]);
    }

    #[test]
    fn downgrade_only_touches_the_affected_pair() {
        let mut status = vec![
            ChannelStatus::Good,
            ChannelStatus::Good,
            ChannelStatus::Bad,
            ChannelStatus::Good,
        ];
        downgrade_pairs(&mut status).unwrap();
        assert_eq!(
            status,
            vec![
                ChannelStatus::Good,
                ChannelStatus::Good,
                ChannelStatus::Bad,
                ChannelStatus::Suspect,
            ]
        );
    }

    #[test]
    fn odd_channel_count_is_a_pairing_error() {
        let mut status = vec![ChannelStatus::Good; 3];
        assert!(matches!(
            downgrade_pairs(&mut status),
            Err(FlagError::Pairing { channels: 3 })
        ));
    }
}
