/// Randomness primitives — the closed set of draws the selection grammar
/// and the roll engine are built on.

use rand::Rng;

/// Uniform draw in `[0.0, 1.0)`. The foundation the integer forms build on.
pub fn uniform_float<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen()
}

/// Uniform integer in `[0, n)`. Returns 0 when `n` is 0.
pub fn uniform_int<R: Rng + ?Sized>(rng: &mut R, n: u32) -> u32 {
    (uniform_float(rng) * f64::from(n)) as u32
}

/// Uniform integer in `[a, b]`, both ends inclusive. Requires `a <= b`.
pub fn uniform_int_inclusive<R: Rng + ?Sized>(rng: &mut R, a: u32, b: u32) -> u32 {
    debug_assert!(a <= b, "inverted range {}-{}", a, b);
    // Span arithmetic in f64: `b - a + 1` overflows u32 when the range
    // covers the whole domain. Integers up to 2^53 are exact in f64.
    let span = f64::from(b) - f64::from(a) + 1.0;
    let drawn = (f64::from(a) + uniform_float(rng) * span) as u32;
    // Rounding at the top of a wide span can land one past `b`.
    drawn.min(b)
}

/// Uniform pick from a slice. Panics on an empty slice; callers guarantee
/// non-emptiness (the engine reports `EmptySubtree` before drawing).
pub fn choose_one<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[uniform_int(rng, items.len() as u32) as usize]
}
