use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use regvm::Regex;

/// A linear congruential generator, so that inputs are the same every run.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) % bound as u64) as usize
    }

    fn range(&mut self, min: usize, max: usize) -> usize {
        min + self.next(max - min + 1)
    }
}

fn numeric_strings(rng: &mut Lcg, count: usize, min_len: usize, max_len: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let len = rng.range(min_len, max_len);
            (0..len)
                .map(|_| (b'0' + rng.next(10) as u8) as char)
                .collect()
        })
        .collect()
}

fn mixed_strings(rng: &mut Lcg, count: usize, min_len: usize, max_len: usize) -> Vec<String> {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    (0..count)
        .map(|_| {
            let len = rng.range(min_len, max_len);
            (0..len)
                .map(|_| ALPHABET[rng.next(ALPHABET.len())] as char)
                .collect()
        })
        .collect()
}

/// Strings like `aaab`, `cd` and `aad`, for `a*b|cd`.
fn alternation_strings(rng: &mut Lcg, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let a_count = rng.next(11);
            match rng.next(4) {
                1 => "cd".to_string(),
                2 => "a".repeat(a_count) + "d",
                _ => "a".repeat(a_count) + "b",
            }
        })
        .collect()
}

fn range_strings() -> Vec<String> {
    let mut strings: Vec<String> = [
        "abcdebcde",
        "bcdebcde",
        "rbcdebcde",
        "bcde",
        "abcde",
        "eeeeebbbbb",
        "acde",
        "bcdefgh",
        "abcdefghijk",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for i in 0..50 {
        let c = (b'b' + (i % 4) as u8) as char;
        strings.push(format!("a{}", c.to_string().repeat(i % 10 + 1)));
        strings.push(c.to_string().repeat(i % 8 + 1));
    }
    strings
}

fn repeated_strings() -> Vec<String> {
    (0..200)
        .map(|i| {
            "abcde"
                .chars()
                .map(|c| c.to_string().repeat(i % 10))
                .collect()
        })
        .collect()
}

fn workloads() -> Vec<(&'static str, &'static str, Vec<String>)> {
    let mut rng = Lcg(0x5eed);
    vec![
        ("star_numeric", "[0-9]*", numeric_strings(&mut rng, 100, 5, 20)),
        ("plus_numeric", "[0-9]+", numeric_strings(&mut rng, 100, 5, 20)),
        ("alternation", "a*b|cd", alternation_strings(&mut rng, 100)),
        ("optional_range", "a?[b-e]+", range_strings()),
        ("mixed", "[a-z]*[0-9]+", mixed_strings(&mut rng, 100, 5, 25)),
        (
            "large_numeric",
            "[0-9]*",
            numeric_strings(&mut rng, 1000, 50, 100),
        ),
        ("consecutive_stars", "a*b*c*d*e*", repeated_strings()),
    ]
}

fn bench_regex_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("regex_compile");

    for (name, pattern, _) in workloads() {
        group.bench_with_input(BenchmarkId::new("compile", name), &pattern, |b, pattern| {
            b.iter(|| Regex::new(pattern).unwrap())
        });
    }

    group.finish();
}

fn bench_regex_is_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("regex_is_match");

    for (name, pattern, inputs) in workloads() {
        let regex = Regex::new(pattern).unwrap();
        let bytes: usize = inputs.iter().map(String::len).sum();
        group.throughput(Throughput::Bytes(bytes as u64));

        group.bench_with_input(BenchmarkId::new("is_match", name), &inputs, |b, inputs| {
            b.iter(|| inputs.iter().filter(|s| regex.is_match(s)).count())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_regex_compile, bench_regex_is_match);
criterion_main!(benches);
