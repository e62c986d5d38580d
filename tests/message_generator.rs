use rand::Rng;
use rand_xoshiro::{Xoshiro256PlusPlus, rand_core::SeedableRng};

pub const MEDIA_TYPES: [&str; 8] = [
    "text/html",
    "text/plain",
    "text/*",
    "application/json",
    "application/xml",
    "application/*",
    "image/png",
    "*/*",
];

pub fn rng(seed: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// Printable ASCII text that does not contain the excluded characters.
pub fn printable(rng: &mut Xoshiro256PlusPlus, min: usize, max: usize, exclude: &[char]) -> String {
    let length = rng.random_range(min..=max);
    let mut text = String::with_capacity(length);

    while text.len() < length {
        let c = char::from(rng.random_range(0x20u8..0x7f));

        if !exclude.contains(&c) {
            text.push(c);
        }
    }

    text
}

/// Header name that is not registered as a structured header.
pub fn header_name(rng: &mut Xoshiro256PlusPlus) -> String {
    format!("X-{}", printable(rng, 1, 20, &[':', ' ']))
}

/// Distinct quality values in thousandths, none of them 1.
pub fn distinct_qualities(rng: &mut Xoshiro256PlusPlus, count: usize) -> Vec<u16> {
    let mut values = Vec::with_capacity(count);

    while values.len() < count {
        let value = rng.random_range(1..1000u16);

        if !values.contains(&value) {
            values.push(value);
        }
    }

    values
}

pub fn pick<'a>(rng: &mut Xoshiro256PlusPlus, items: &[&'a str], count: usize) -> Vec<&'a str> {
    let mut pool = items.to_vec();
    let mut picked = Vec::with_capacity(count);

    while picked.len() < count && !pool.is_empty() {
        let index = rng.random_range(0..pool.len());
        picked.push(pool.remove(index));
    }

    picked
}
