// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `harness = false` in Cargo.toml: this is a plain `fn main`, not a
//! `#[bench]` suite, so it runs on stable without a benchmark harness
//! crate. Each case times a fixed number of `find_iter` sweeps over a
//! representative haystack and reports bytes/sec, split by which engine
//! the pattern was bound to.

use std::time::Instant;

use saferegex::Regex;

fn bench(name: &str, pattern: &str, haystack: &str, iters: u32) {
    let re = Regex::new(pattern).expect("pattern must compile");
    // Warm up: first iteration pays for any lazy allocation inside the
    // engine's thread-list preallocation.
    let _ = re.find_iter(haystack).count();

    let start = Instant::now();
    let mut total_matches = 0usize;
    for _ in 0..iters {
        total_matches += re.find_iter(haystack).count();
    }
    let elapsed = start.elapsed();
    let bytes = haystack.len() as u128 * iters as u128;
    let mb_per_sec = if elapsed.as_secs_f64() > 0.0 {
        (bytes as f64 / (1024.0 * 1024.0)) / elapsed.as_secs_f64()
    } else {
        f64::INFINITY
    };

    println!(
        "{name:<28} engine={:?} risk={:?} matches/iter={:<6} {:>8.2} MiB/s",
        re.engine(),
        re.risk(),
        total_matches / iters as usize,
        mb_per_sec,
    );
}

fn main() {
    let prose = "the quick brown fox jumps over the lazy dog ".repeat(200);
    let csv_like = "1997-04-12,1998-05-13,bad-date,2001-12-31,".repeat(200);
    let emails = "alice@example.com bob@example.org not-an-email carol@test.io ".repeat(200);

    bench("literal prefix", "dog", &prose, 2_000);
    bench("thompson char class", r"\w+", &prose, 2_000);
    bench("thompson captures", r"(\d{4})-(\d{2})-(\d{2})", &csv_like, 2_000);
    bench("backtrack backref", r"(\w)\w*\1", &prose, 500);
    bench("backtrack lookahead", r"\w+(?=@example)", &emails, 500);
}
