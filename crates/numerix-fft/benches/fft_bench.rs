use criterion::{Criterion, criterion_group, criterion_main};
use numerix_fft::{Complex, FftOptions, fft, ifft};

fn make_signal(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            (2.0 * std::f64::consts::PI * 5.0 * t).sin() + 0.5 * (t * 37.0).cos()
        })
        .collect()
}

fn bench_fft(c: &mut Criterion) {
    for &n in &[64, 1024, 16384] {
        let signal = make_signal(n);
        c.bench_function(&format!("fft_{n}"), |bencher| {
            bencher.iter(|| fft(&signal, &FftOptions::default()).unwrap());
        });
    }
}

fn bench_ifft(c: &mut Criterion) {
    for &n in &[64, 1024, 16384] {
        let spectrum: Vec<Complex> = fft(&make_signal(n), &FftOptions::default()).unwrap();
        c.bench_function(&format!("ifft_{n}"), |bencher| {
            bencher.iter(|| ifft(&spectrum, &FftOptions::default()).unwrap());
        });
    }
}

criterion_group!(benches, bench_fft, bench_ifft);
criterion_main!(benches);
