//! Timings of the splittable generator.
//!
//! Run with `cargo bench -p forkray_math --bench random`.

use std::hint::black_box;
use std::time::Instant;

use forkray_math::Rng;

const ITERATIONS: u32 = 20_000_000;

fn bench<T>(name: &str, mut f: impl FnMut() -> T) {
    for _ in 0..ITERATIONS / 10 {
        black_box(f());
    }
    let start = Instant::now();
    for _ in 0..ITERATIONS {
        black_box(f());
    }
    let ns = start.elapsed().as_nanos() as f64 / ITERATIONS as f64;
    println!("{name:<12} {ns:>8.2} ns/iter");
}

fn main() {
    bench("construct", || Rng::new(0, 0, 0, black_box(1)));

    let mut rng = Rng::default();
    bench("next", || rng.next());

    let mut rng = Rng::default();
    bench("rand", || rng.rand());

    // Chained, so every fork depends on the previous one
    let mut rng = Rng::default();
    bench("fork", || {
        rng = rng.fork(1);
        rng.state()
    });
}
