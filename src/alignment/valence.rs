use crate::emotion::{Emotion, Valence};

pub const EXACT_MATCH_SCORE: f64 = 1.0;
pub const SAME_VALENCE_SCORE: f64 = 0.7;
pub const NEUTRAL_INVOLVED_SCORE: f64 = 0.3;
pub const CONFLICT_SCORE: f64 = 0.0;

/// Congruence between the text-derived and face-derived labels.
///
/// Ladder, first match wins: exact label, same valence, either side neutral,
/// opposite valences.
pub fn score(emo_text: Emotion, emo_face: Emotion) -> f64 {
    if emo_text == emo_face {
        return EXACT_MATCH_SCORE;
    }
    let text_valence = emo_text.valence();
    let face_valence = emo_face.valence();
    if text_valence == face_valence {
        SAME_VALENCE_SCORE
    } else if text_valence == Valence::Neutral || face_valence == Valence::Neutral {
        NEUTRAL_INVOLVED_SCORE
    } else {
        CONFLICT_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEGATIVE: [Emotion; 4] = [Emotion::Sad, Emotion::Angry, Emotion::Fear, Emotion::Disgust];

    #[test]
    fn identical_labels_score_one() {
        for emotion in Emotion::ALL {
            assert_eq!(score(emotion, emotion), 1.0);
        }
    }

    #[test]
    fn distinct_negatives_score_partial() {
        for a in NEGATIVE {
            for b in NEGATIVE {
                if a != b {
                    assert_eq!(score(a, b), 0.7);
                }
            }
        }
        assert_eq!(score(Emotion::Happy, Emotion::Surprise), 0.7);
    }

    #[test]
    fn neutral_pairs() {
        for emotion in Emotion::ALL {
            let expected = if emotion == Emotion::Neutral { 1.0 } else { 0.3 };
            assert_eq!(score(emotion, Emotion::Neutral), expected);
            assert_eq!(score(Emotion::Neutral, emotion), expected);
        }
    }

    #[test]
    fn opposite_valences_conflict() {
        assert_eq!(score(Emotion::Happy, Emotion::Angry), 0.0);
        assert_eq!(score(Emotion::Fear, Emotion::Surprise), 0.0);
    }

    #[test]
    fn score_is_symmetric() {
        for a in Emotion::ALL {
            for b in Emotion::ALL {
                assert_eq!(score(a, b), score(b, a));
            }
        }
    }
}
