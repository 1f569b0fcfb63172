use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn jiggle(seed: u64) -> f32 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    let unit = (hasher.finish() >> 40) as f32 / (1u64 << 24) as f32;
    let value = (unit - 0.5) * 1e-6;
    if value == 0.0 { 1e-7 } else { value }
}

pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
