//! Minimal CLI demo: drive a wave with synthetic increments and print its
//! approximate window sum alongside the debug snapshot.
//!
//! Usage:
//!   wave_demo --n 60 --epsilon 0.05 --r 1000000 --count 200

use std::env;

use tracing_subscriber::EnvFilter;
use wavesketch::{Wave, WaveParams};

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn parse_or<T: std::str::FromStr>(args: &[String], key: &str, default: T) -> T {
    parse_flag(args, key).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args: Vec<String> = env::args().collect();
    let n = parse_or(&args, "--n", 60i64);
    let epsilon = parse_or(&args, "--epsilon", 0.05f64);
    let r = parse_or(&args, "--r", -1i64);
    let count = parse_or(&args, "--count", 200i64);

    let params = WaveParams { n, epsilon, r, ts: Some(0), auto_expire: true };
    eprintln!("Creating wave with params:");
    eprintln!("{}", serde_json::to_string_pretty(&params)?);

    let mut w = Wave::new(params)?;

    for ts in 0..count {
        let v = 1 + (ts % 7);
        w.set(v, ts)?;
    }

    let exact = w.get(count - 1, false);
    let fast = w.get(count - 1, true);
    eprintln!();
    eprintln!("After {count} increments:");
    eprintln!("  total (unwindowed running sum): {}", w.total());
    eprintln!("  get(refined):                   {exact}");
    eprintln!("  get(fast):                      {fast}");

    let snapshot = w.debug_snapshot(false);
    eprintln!();
    eprintln!("Snapshot:");
    eprintln!("{}", serde_json::to_string_pretty(&snapshot)?);

    println!("wave_demo: ok");
    Ok(())
}
