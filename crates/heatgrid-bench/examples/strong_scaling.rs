//! Strong-scaling sweep: fixed grid, growing participant count.
//!
//! Prints a CSV table on stdout and a progress line per run on stderr.
//!
//! ```text
//! cargo run --release -p heatgrid-bench --example strong_scaling [max_grid] [iterations]
//! ```

use heatgrid_bench::{
    csv_record, scaling_config, speedup, CSV_HEADER, SWEEP_GRID_SIZES, SWEEP_ITERATIONS,
    SWEEP_PARTICIPANTS,
};
use heatgrid_engine::run;

fn main() {
    let mut args = std::env::args().skip(1);
    let max_grid: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(1024);
    let iterations: usize = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(SWEEP_ITERATIONS);

    println!("{CSV_HEADER}");
    for size in SWEEP_GRID_SIZES.into_iter().filter(|&s| s <= max_grid) {
        eprintln!("--- grid {size}x{size} ---");
        let mut serial_time = None;
        for participants in SWEEP_PARTICIPANTS {
            let report = match run(&scaling_config(size, participants, iterations)) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("NP={participants}: {e}");
                    continue;
                }
            };
            let line = report.data_line().to_string();
            if let Some(record) = csv_record(&line) {
                println!("{record}");
            }

            let time = report.elapsed.as_secs_f64();
            if participants == 1 {
                serial_time = Some(time);
            }
            let ratio = match speedup(serial_time, time) {
                Some(s) => format!("{s:.2}x"),
                None => "n/a (no NP=1 baseline)".to_string(),
            };
            eprintln!(
                "NP={participants}: time={time:.4}s speedup={ratio} GFLOP/s={:.2}",
                report.gflops_per_second()
            );
        }
    }
}
