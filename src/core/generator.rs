use crate::domain::model::{Age, Emotion, Gender, Profile, Race};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds `count` profiles with uniformly drawn attributes. Same seed, same population.
pub fn generate_population(count: usize, seed: u64) -> Vec<Profile> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=count)
        .map(|n| {
            Profile::new(
                format!("hero-{:05}", n),
                pick(&mut rng, &Gender::ALL),
                pick(&mut rng, &Emotion::ALL),
                pick(&mut rng, &Age::ALL),
                pick(&mut rng, &Race::ALL),
            )
        })
        .collect()
}

fn pick<T: Copy>(rng: &mut StdRng, values: &[T]) -> T {
    values[rng.random_range(0..values.len())]
}
