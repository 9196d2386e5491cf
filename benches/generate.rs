use std::collections::HashSet;
use std::io;

use mandelblock::bench::{Benchmark, BenchmarkReport};
use mandelblock::{Fixed32, Fixed64, Geometry, Mandelbrot, Resolution, Scalar};

const LIMIT: u32 = 1000;

fn thread_counts() -> Vec<usize> {
    let mut tcounts: HashSet<usize> = HashSet::new();
    tcounts.insert(0);
    tcounts.insert(2);
    tcounts.insert(num_cpus::get_physical());
    tcounts.insert(num_cpus::get());

    let mut tcounts: Vec<usize> = tcounts.into_iter().collect();
    tcounts.sort();
    tcounts
}

fn benchmark_generate<S: Scalar>(name: &str, height: usize, threads: usize) -> Benchmark {
    let width = (3 * height) / 2;
    let resolution = Resolution::new(width, height);
    let geometry = match Geometry::initial(resolution).convert::<S>() {
        Ok(geometry) => geometry,
        Err(e) => panic!("{} cannot represent the initial view: {}", name, e),
    };
    let mandelbrot = match threads {
        0 => Mandelbrot::<S>::new(LIMIT),
        n => Mandelbrot::<S>::threaded(LIMIT, n),
    }
    .unwrap();

    let f = move || {
        mandelbrot.generate(&geometry).unwrap();
    };
    Benchmark::iter(&format!("generate-{}-{}-t{}", name, height, threads), 3, f)
        .with_points(resolution.num_points())
}

fn benchmarks(height: usize) -> Vec<Benchmark> {
    let mut benches = vec![];
    for t in thread_counts() {
        benches.push(benchmark_generate::<f32>("f32", height, t));
        benches.push(benchmark_generate::<f64>("f64", height, t));
        benches.push(benchmark_generate::<Fixed64>("fixed64", height, t));
        benches.push(benchmark_generate::<Fixed32>("fixed32", height, t));
    }
    benches
}

fn main() -> io::Result<()> {
    let mut benches = benchmarks(200);
    benches.extend(benchmarks(800));
    BenchmarkReport::with_benches(benches).report("generate")
}
