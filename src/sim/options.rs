//! Answer option generation

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::consts::OPTION_COUNT;
use crate::error::QuizError;

/// Check that `range` can supply `OPTION_COUNT` distinct values.
pub fn check_range(range: &RangeInclusive<i64>) -> Result<(), QuizError> {
    let (low, high) = (*range.start(), *range.end());
    let width = i128::from(high) - i128::from(low) + 1;
    if width < OPTION_COUNT as i128 {
        return Err(QuizError::InsufficientRange { low, high });
    }
    Ok(())
}

/// Build the shuffled options for a question.
///
/// The correct answer is always present exactly once; the three distractors
/// are drawn uniformly from `range` and never repeat. The correct answer may
/// lie outside `range`.
pub fn generate_options<R: Rng + ?Sized>(
    rng: &mut R,
    correct: i64,
    range: RangeInclusive<i64>,
) -> Result<[i64; OPTION_COUNT], QuizError> {
    check_range(&range)?;

    let mut options = [correct; OPTION_COUNT];
    let mut filled = 1;
    while filled < OPTION_COUNT {
        let candidate = rng.random_range(range.clone());
        if !options[..filled].contains(&candidate) {
            options[filled] = candidate;
            filled += 1;
        }
    }

    options.shuffle(rng);
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_valid(options: &[i64; OPTION_COUNT], correct: i64) {
        assert_eq!(options.iter().filter(|&&o| o == correct).count(), 1);
        for (i, a) in options.iter().enumerate() {
            for b in &options[i + 1..] {
                assert_ne!(a, b, "duplicate option in {options:?}");
            }
        }
    }

    #[test]
    fn test_options_default_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for correct in [0, 9, 42, 99] {
            let options = generate_options(&mut rng, correct, 0..=99).unwrap();
            assert_valid(&options, correct);
            assert!(options.iter().all(|o| (0..=99).contains(o)));
        }
    }

    #[test]
    fn test_options_correct_outside_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let options = generate_options(&mut rng, -15, 0..=99).unwrap();
        assert_valid(&options, -15);
    }

    #[test]
    fn test_options_tightest_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut options = generate_options(&mut rng, 2, 0..=3).unwrap();
        options.sort();
        assert_eq!(options, [0, 1, 2, 3]);
    }

    #[test]
    fn test_options_insufficient_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(
            generate_options(&mut rng, 1, 0..=2),
            Err(QuizError::InsufficientRange { low: 0, high: 2 })
        );
        #[allow(clippy::reversed_empty_ranges)]
        let empty = 10..=0;
        assert!(generate_options(&mut rng, 1, empty).is_err());
    }

    #[test]
    fn test_correct_answer_position_varies() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut seen = [false; OPTION_COUNT];
        for _ in 0..200 {
            let options = generate_options(&mut rng, 50, 0..=99).unwrap();
            let pos = options.iter().position(|&o| o == 50).unwrap();
            seen[pos] = true;
        }
        assert!(seen.iter().all(|&s| s), "correct answer stuck in {seen:?}");
    }

    proptest! {
        #[test]
        fn prop_options_are_distinct_and_contain_answer(
            seed in any::<u64>(),
            correct in -100i64..200,
            low in -50i64..50,
            width in 4i64..200,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let options = generate_options(&mut rng, correct, low..=low + width - 1).unwrap();
            prop_assert_eq!(options.iter().filter(|&&o| o == correct).count(), 1);
            let mut sorted = options;
            sorted.sort();
            prop_assert!(sorted.windows(2).all(|w| w[0] != w[1]));
        }
    }
}
