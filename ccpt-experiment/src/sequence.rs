//! Trial sequence generation: exact category proportions under a uniform
//! shuffle, with an independently shuffled balanced ISI assignment.

use crate::error::SequenceError;
use ccpt_core::{Color, Shape, StimulusSpec, Trial};
use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Duration;

/// The fixed inter-stimulus intervals, spread as evenly as possible
/// across a sequence.
pub const ISI_CHOICES: [Duration; 4] = [
    Duration::from_millis(400),
    Duration::from_millis(600),
    Duration::from_millis(800),
    Duration::from_millis(1000),
];

/// Builds the full trial list for one block.
///
/// Category counts for length `n` (fractions truncated, remainder
/// absorbed by the last category):
/// targets 30%, same-shape non-targets 17.5%, same-color non-targets
/// 17.5%, and everything else.
pub fn generate<R: Rng>(
    n: usize,
    target: StimulusSpec,
    rng: &mut R,
) -> Result<Vec<Trial>, SequenceError> {
    if n == 0 {
        return Err(SequenceError::InvalidTrialCount);
    }

    let target_count = (n as f64 * 0.30) as usize;
    let same_shape_count = (n as f64 * 0.175) as usize;
    let same_color_count = (n as f64 * 0.175) as usize;
    let other_count = n - target_count - same_shape_count - same_color_count;

    let mut stimuli = Vec::with_capacity(n);
    for _ in 0..target_count {
        stimuli.push(target);
    }
    for _ in 0..same_shape_count {
        stimuli.push(StimulusSpec::new(
            target.shape,
            color_excluding(target.color, rng),
        ));
    }
    for _ in 0..same_color_count {
        stimuli.push(StimulusSpec::new(
            shape_excluding(target.shape, rng),
            target.color,
        ));
    }
    for _ in 0..other_count {
        stimuli.push(StimulusSpec::new(
            shape_excluding(target.shape, rng),
            color_excluding(target.color, rng),
        ));
    }
    stimuli.shuffle(rng);

    // The ISI pool is shuffled on its own, so an interval carries no
    // information about the upcoming category.
    let isis = isi_pool(n, rng);

    Ok(stimuli
        .into_iter()
        .zip(isis)
        .enumerate()
        .map(|(index, (stimulus, isi))| Trial::new(index, stimulus, target, isi))
        .collect())
}

fn isi_pool<R: Rng>(n: usize, rng: &mut R) -> Vec<Duration> {
    let mut pool = Vec::with_capacity(n);
    for &isi in &ISI_CHOICES {
        pool.extend(std::iter::repeat_n(isi, n / ISI_CHOICES.len()));
    }
    while pool.len() < n {
        pool.push(ISI_CHOICES[rng.random_range(0..ISI_CHOICES.len())]);
    }
    pool.shuffle(rng);
    pool
}

fn color_excluding<R: Rng>(excluded: Color, rng: &mut R) -> Color {
    let pool: Vec<Color> = Color::ALL.into_iter().filter(|c| *c != excluded).collect();
    pool[rng.random_range(0..pool.len())]
}

fn shape_excluding<R: Rng>(excluded: Shape, rng: &mut R) -> Shape {
    let pool: Vec<Shape> = Shape::ALL.into_iter().filter(|s| *s != excluded).collect();
    pool[rng.random_range(0..pool.len())]
}
