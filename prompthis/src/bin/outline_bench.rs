#[cfg(feature = "bench_outline")]
use prompthis::algorithms::bubble::bubble_outline;
#[cfg(feature = "bench_outline")]
use prompthis::config::OutlineParams;
#[cfg(feature = "bench_outline")]
use prompthis::model::RectNode;
#[cfg(feature = "bench_outline")]
use std::time::Instant;

#[cfg(not(feature = "bench_outline"))]
fn main() {
    panic!("outline_bench requires --features bench_outline");
}

// Thumbnails on a jittered grid; every `stride`-th one is a cluster member.
#[cfg(feature = "bench_outline")]
fn scatter(n: usize, stride: usize) -> (Vec<RectNode>, Vec<RectNode>) {
    let side = (n as f32).sqrt().ceil() as usize;
    let mut members = Vec::new();
    let mut others = Vec::new();
    for k in 0..n {
        let (i, j) = (k % side, k / side);
        let jitter = ((k * 37) % 11) as f32;
        let r = RectNode::new(i as f32 * 48.0 + jitter, j as f32 * 48.0 - jitter, 24.0, 24.0);
        if k % stride == 0 {
            members.push(r);
        } else {
            others.push(r);
        }
    }
    (members, others)
}

#[cfg(feature = "bench_outline")]
fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut n = 400usize;
    let mut stride = 5usize;
    let mut repeats = 10usize;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--n=") {
            if let Ok(v) = val.parse() {
                n = v;
            }
        } else if let Some(val) = a.strip_prefix("--stride=") {
            if let Ok(v) = val.parse::<usize>() {
                stride = v.max(1);
            }
        } else if let Some(val) = a.strip_prefix("--repeats=") {
            if let Ok(v) = val.parse() {
                repeats = v;
            }
        }
    }

    let (members, others) = scatter(n, stride);
    let params = OutlineParams::default();

    let _ = bubble_outline(&members, &others, params.padding, &params);
    let mut times: Vec<f64> = Vec::with_capacity(repeats);
    let mut points = 0usize;
    for _ in 0..repeats {
        let t = Instant::now();
        points = bubble_outline(&members, &others, params.padding, &params).len();
        times.push(t.elapsed().as_secs_f64() * 1000.0);
    }
    let avg = if times.is_empty() { 0.0 } else { times.iter().sum::<f64>() / times.len() as f64 };

    println!(
        "images={} members={} others={} outline_points={} avg_ms={:.3}",
        n,
        members.len(),
        others.len(),
        points,
        avg
    );
}
