use std::fs;
use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A named closure run a fixed number of times. `points` is the number of
/// sampled points one call covers, for throughput figures.
#[derive(Clone)]
pub struct Benchmark {
    f: Rc<dyn Fn()>,
    name: String,
    iterations: usize,
    points: usize,
}

pub enum Unit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
}

impl Unit {
    pub fn format(&self, d: &Duration, width: usize) -> String {
        let (symbol, value) = match self {
            Self::Nanosecond => ("ns", d.as_nanos()),
            Self::Microsecond => ("us", d.as_micros()),
            Self::Millisecond => ("ms", d.as_millis()),
            Self::Second => ("s", d.as_secs() as u128),
        };
        format!("{:>width$}{:<2}", value, symbol)
    }

    pub fn scaled(d: &Duration, treshold: u128) -> Self {
        if d.as_nanos() < treshold {
            Self::Nanosecond
        } else if d.as_micros() < treshold {
            Self::Microsecond
        } else if d.as_millis() < treshold {
            Self::Millisecond
        } else {
            Self::Second
        }
    }
}

impl Benchmark {
    pub fn iter<F: Fn() + 'static>(name: &str, n: usize, f: F) -> Self {
        Self {
            f: Rc::new(f),
            name: name.to_string(),
            iterations: n,
            points: 0,
        }
    }

    pub fn once<F: Fn() + 'static>(name: &str, f: F) -> Self {
        Self::iter(name, 1, f)
    }

    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    fn run(&self) -> Duration {
        let start = Instant::now();
        for _ in 0..self.iterations {
            (self.f)();
        }
        start.elapsed()
    }
}

struct Measurement {
    name: String,
    iterations: usize,
    points: usize,
    total: Duration,
}

impl Measurement {
    fn per_call(&self) -> Duration {
        self.total.div_f64(self.iterations.max(1) as f64)
    }

    /// Millions of points per second, if the benchmark counts points.
    fn mpoints_per_sec(&self) -> Option<f64> {
        let secs = self.per_call().as_secs_f64();
        (self.points > 0 && secs > 0.0).then(|| self.points as f64 / secs / 1e6)
    }
}

pub struct BenchmarkReport {
    benches: Vec<Benchmark>,
    results: Vec<Measurement>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self {
            benches: vec![],
            results: vec![],
        }
    }

    pub fn add_bench(&mut self, bench: Benchmark) {
        self.benches.push(bench);
    }

    pub fn with_benches(benches: Vec<Benchmark>) -> Self {
        let mut this = Self::new();
        for bench in benches {
            this.add_bench(bench);
        }
        this
    }

    pub fn run(&mut self) -> io::Result<()> {
        for bench in &self.benches {
            let total = bench.run();
            self.results.push(Measurement {
                name: bench.name.clone(),
                iterations: bench.iterations,
                points: bench.points,
                total,
            });
            print!(".");
            stdout().flush()?;
        }
        println!();
        Ok(())
    }

    pub fn show(&self) {
        println!(
            "  {: <36} {: >8}   {: >8}   {: >8}",
            "benchmark", "total", "per_call", "Mpt/s"
        );
        for m in &self.results {
            let per_call = m.per_call();
            let throughput = m
                .mpoints_per_sec()
                .map_or_else(|| "-".to_string(), |t| format!("{:.2}", t));
            println!(
                "  {: <36} {}   {}   {: >8}",
                m.name,
                Unit::scaled(&m.total, 100000).format(&m.total, 6),
                Unit::scaled(&per_call, 100000).format(&per_call, 6),
                throughput,
            )
        }
    }

    pub fn write_csv(&self, filename: &str) -> io::Result<()> {
        let mut lines: Vec<String> =
            vec!["benchmark,total_us,iterations,per_call_us,mpoints_per_sec".to_string()];
        for m in &self.results {
            lines.push(format!(
                "{},{},{},{},{}",
                m.name,
                m.total.as_micros(),
                m.iterations,
                m.per_call().as_micros(),
                m.mpoints_per_sec().unwrap_or(0.0),
            ));
        }
        lines.push("".to_string());
        fs::write(filename, lines.join("\n"))
    }

    pub fn report(&mut self, name: &str) -> io::Result<()> {
        print!("Benchmark: {}", name);
        self.run()?;
        self.show();
        self.write_csv(&format!("benchmark_{}.csv", name))
    }
}

impl Default for BenchmarkReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_runs_each_bench() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut report = BenchmarkReport::with_benches(vec![
            Benchmark::iter("three", 3, move || counter.set(counter.get() + 1)).with_points(10),
        ]);
        report.run().unwrap();
        assert_eq!(calls.get(), 3);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].iterations, 3);
    }

    #[test]
    fn test_unit_scale() {
        let d = Duration::from_micros(1500);
        assert!(matches!(Unit::scaled(&d, 1000), Unit::Millisecond));
        assert_eq!(Unit::Microsecond.format(&d, 6), "  1500us");
    }
}
