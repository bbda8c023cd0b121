use rand::Rng;
use rand::seq::index;
use serde::Serialize;

/// Seeds are drawn from `1..=SEED_SPACE`.
pub const SEED_SPACE: u64 = 1_000_000;

/// JSON body of one completions request.
///
/// Greedy decoding and streaming are fixed; only the seed varies so the
/// server cannot collapse identical concurrent requests into one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSpec {
    pub model: String,
    pub prompt: String,
    pub temperature: f64,
    pub stream: bool,
    pub seed: u64,
}

impl RequestSpec {
    #[must_use]
    pub fn new(model: &str, prompt: &str, seed: u64) -> Self {
        Self {
            model: model.to_owned(),
            prompt: prompt.to_owned(),
            temperature: 0.0,
            stream: true,
            seed,
        }
    }
}

/// Draws `count` seeds that are distinct within the batch.
pub fn draw_seeds<R>(rng: &mut R, count: usize) -> Vec<u64>
where
    R: Rng + ?Sized,
{
    let space = usize::try_from(SEED_SPACE).unwrap_or(usize::MAX);
    if count <= space {
        return index::sample(rng, space, count)
            .into_iter()
            .map(|value| u64::try_from(value).map_or(SEED_SPACE, |seed| seed.saturating_add(1)))
            .collect();
    }
    // More requests than seeds: fall back to a random run of consecutive values.
    let offset: u64 = rng.gen_range(1..=SEED_SPACE);
    (0..count)
        .map(|step| offset.saturating_add(u64::try_from(step).unwrap_or(u64::MAX)))
        .collect()
}
