use ndarray::Array2;

use crate::detector::history::DetectionHistory;

/// Number of output series a caller may request.
pub const OUTPUT_SERIES_COUNT: usize = 8;

/// Output series in their fixed export order. Callers request a prefix of
/// this list; the score matrix carries one row per hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputSeries {
    MaxScore(Vec<f32>),
    FrequencyOffset(Vec<f32>),
    Scores(Array2<f32>),
    FrameDetected(Vec<bool>),
    FrequencyIndex(Vec<u32>),
    MaxFound(Vec<bool>),
    ChipFromMax(Vec<u64>),
    ChipSinceLastDet(Vec<u64>),
}

/// Materializes the first `count` output series (capped at
/// [`OUTPUT_SERIES_COUNT`]). The history always carries every field, so the
/// requested count never changes the values of the series produced.
pub fn export_prefix(history: &DetectionHistory, count: usize) -> Vec<OutputSeries> {
    let mut series = vec![
        OutputSeries::MaxScore(history.max_score().to_vec()),
        OutputSeries::FrequencyOffset(history.frequency_offset().to_vec()),
        OutputSeries::Scores(history.scores_matrix()),
        OutputSeries::FrameDetected(history.frame_detected().to_vec()),
        OutputSeries::FrequencyIndex(history.frequency_index().to_vec()),
        OutputSeries::MaxFound(history.max_found().to_vec()),
        OutputSeries::ChipFromMax(history.chip_from_max().to_vec()),
        OutputSeries::ChipSinceLastDet(history.chip_since_last_det().to_vec()),
    ];
    series.truncate(count.min(OUTPUT_SERIES_COUNT));
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::state_machine::DetectionState;

    fn history() -> DetectionHistory {
        let states = vec![
            DetectionState {
                frame_detected: false,
                max_found: false,
                scores: vec![0.5, 1.5],
                max_score: 1.5,
                frequency_offset: 0.0,
                frequency_index: 1,
                chip_since_last_det: 1,
                chip_from_max: 1,
            },
            DetectionState {
                frame_detected: true,
                max_found: false,
                scores: vec![2.0, 4.0],
                max_score: 4.0,
                frequency_offset: 0.1,
                frequency_index: 1,
                chip_since_last_det: 0,
                chip_from_max: 0,
            },
        ];
        DetectionHistory::from_states(&states).unwrap()
    }

    #[test]
    fn series_come_out_in_fixed_order() {
        let all = export_prefix(&history(), OUTPUT_SERIES_COUNT);
        assert_eq!(all.len(), 8);
        assert!(matches!(all[0], OutputSeries::MaxScore(_)));
        assert!(matches!(all[1], OutputSeries::FrequencyOffset(_)));
        assert!(matches!(all[2], OutputSeries::Scores(_)));
        assert!(matches!(all[3], OutputSeries::FrameDetected(_)));
        assert!(matches!(all[4], OutputSeries::FrequencyIndex(_)));
        assert!(matches!(all[5], OutputSeries::MaxFound(_)));
        assert!(matches!(all[6], OutputSeries::ChipFromMax(_)));
        assert!(matches!(all[7], OutputSeries::ChipSinceLastDet(_)));
    }

    #[test]
    fn requesting_fewer_series_preserves_values() {
        let history = history();
        let all = export_prefix(&history, OUTPUT_SERIES_COUNT);
        let some = export_prefix(&history, 3);
        assert_eq!(some.len(), 3);
        assert_eq!(some.as_slice(), &all[..3]);
    }

    #[test]
    fn count_is_capped_at_the_series_count() {
        assert_eq!(export_prefix(&history(), 64).len(), OUTPUT_SERIES_COUNT);
        assert!(export_prefix(&history(), 0).is_empty());
    }

    #[test]
    fn score_matrix_rows_are_hypotheses() {
        let all = export_prefix(&history(), 3);
        match &all[2] {
            OutputSeries::Scores(matrix) => {
                assert_eq!(matrix.shape(), &[2, 2]);
                assert_eq!(matrix[[1, 1]], 4.0);
            }
            other => panic!("expected score matrix, found {:?}", other),
        }
    }
}
