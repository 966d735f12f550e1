use rand::{Rng, distr::Alphanumeric, seq::IndexedRandom};

/// Palette categories are tinted with on the client.
pub const COLOR_LIST: [&str; 11] = [
    "rgb(39, 133, 106)",
    "rgb(30, 50, 100)",
    "rgb(141, 103, 171)",
    "rgb(232, 17, 91)",
    "rgb(180, 155, 200)",
    "rgb(160, 195, 210)",
    "rgb(71, 125, 149)",
    "rgb(20, 138, 8)",
    "rgb(240, 55, 165)",
    "rgb(13, 115, 236)",
    "rgb(230, 30, 50)",
];

/// Random alphanumeric string, used for the OAuth CSRF state.
pub fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Picks `total + 1` distinct integers from `[min, max)`.
///
/// Returns an empty vector when `total >= max - min`, i.e. whenever the range
/// cannot supply that many unique values (this includes `max <= min`).
pub fn generate_random_numbers(total: usize, max: usize, min: usize) -> Vec<usize> {
    if total >= max.saturating_sub(min) {
        return Vec::new();
    }

    let mut rng = rand::rng();
    let mut numbers = Vec::with_capacity(total + 1);
    while numbers.len() <= total {
        let n = rng.random_range(min..max);
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    }

    numbers
}

pub fn random_color() -> &'static str {
    COLOR_LIST
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(COLOR_LIST[0])
}
