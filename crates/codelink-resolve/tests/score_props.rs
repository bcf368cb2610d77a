use codelink_resolve::dice_similarity;
use proptest::prelude::*;

proptest! {
    #[test]
    fn score_stays_within_unit_interval(a in ".{0,40}", b in ".{0,40}") {
        let score = dice_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score), "score out of range: {score}");
    }

    #[test]
    fn score_is_symmetric(a in ".{0,40}", b in ".{0,40}") {
        prop_assert_eq!(
            dice_similarity(&a, &b).to_bits(),
            dice_similarity(&b, &a).to_bits()
        );
    }

    #[test]
    fn identical_strings_score_one(a in ".{1,40}") {
        prop_assert_eq!(dice_similarity(&a, &a), 1.0);
    }
}
