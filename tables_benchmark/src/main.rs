#![doc = include_str!("../README.md")]

use clap::Parser;
use cpu_time::ProcessTime;
use cube_tables::puzzle_cube3::coords::{CPerm, EPerm, Flip, MPerm, Slice, Twist};
use cube_tables::puzzle_cube3::utils::{ALL_MOVES, P2_MOVES};
use cube_tables::puzzle_cube3::{Coord, CubieCube};
use cube_tables::raw_sym_prun::{RawSymPrun, RawSymPrunConf};
use cube_tables::stats::{DepthCounts, LayerLogger};
use cube_tables::tables::CoordTables;
use cube_tables::{BuildConf, TableError, TableSet};
use fsum::FSum;
use log::LevelFilter;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Build the pruning tables one after another instead of on separate threads.
    #[arg(long)]
    sequential: bool,

    /// Skip the twist-flip pruning table.
    #[arg(long)]
    no_twist_flip: bool,

    /// Number of random states sampled for average bounds.
    #[arg(short, long, default_value_t = 10000)]
    samples: usize,

    /// Number of random moves that generate each sampled state.
    #[arg(short, long, default_value_t = 40)]
    walk_len: usize,

    /// Seed of the random state generator.
    #[arg(long, default_value_t = 1234)]
    seed: u64,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    log_level: u8,
}

/// Returns CPU seconds spent by `f` and its result.
fn timed<T>(f: impl FnOnce() -> T) -> (f64, T) {
    let start_moment = ProcessTime::try_now().expect("Getting process time failed");
    let result = f();
    (start_moment.try_elapsed().expect("Getting process time failed").as_secs_f64(), result)
}

/// Returns entropy of the depth distribution.
fn entropy(counts: &[usize]) -> f64 {
    let total = counts.iter().sum::<usize>() as f64;
    - FSum::with_all(counts.iter().filter(|&&c| c != 0).map(|&c| {
        let p = c as f64 / total;
        p * p.log2()
    })).value()
}

fn print_prun_stats(prun: &RawSymPrun, counts: &DepthCounts, seconds: f64) {
    let total_len = prun.table().len();
    println!("{}: {} classes x {} raw = {} entries, {} bytes, built in {:.3} sec{}",
             prun.name(), prun.n_classes(), prun.n_raw(), total_len, prun.size_bytes(), seconds,
             counts.first_backward.map_or(String::new(), |d| format!(" (backward from depth {})", d)));
    let mut distance_sum = 0;
    let mut len_sum = 0;
    for (distance_to_goal, &len) in counts.counts.iter().enumerate() {
        len_sum += len;
        distance_sum += distance_to_goal * len;
        let total_len = total_len as f64;
        println!("{}\t{} {:.2}%\t{} {:.2}%", distance_to_goal, len, len as f64 * 100.0 / total_len, len_sum, len_sum as f64 * 100.0 / total_len);
    }
    println!("  average depth {:.2}, max depth {}, value entropy {:.2}.",
             distance_sum as f64 / total_len as f64, prun.max_depth(), entropy(&counts.counts));
}

fn build_and_print(conf: RawSymPrunConf) -> Result<(), TableError> {
    let mut stats = (LayerLogger, DepthCounts::default());
    let (seconds, prun) = timed(|| RawSymPrun::build(&conf, &mut stats));
    print_prun_stats(&prun?, &stats.1, seconds);
    Ok(())
}

/// Returns the cube after `len` random moves from `moves`.
fn rand_cube(rng: &mut ChaCha8Rng, moves: &[u8], len: usize) -> CubieCube {
    (0..len).fold(CubieCube::SOLVED, |c, _| c.apply_move(moves[rng.gen_range(0..moves.len())]))
}

fn print_average_bounds(tables: &TableSet, rng: &mut ChaCha8Rng, samples: usize, walk_len: usize) {
    let (mut sum1, mut max1, mut sum2, mut max2) = (0usize, 0, 0usize, 0);
    for _ in 0..samples {
        let c = rand_cube(rng, &ALL_MOVES, walk_len);
        let b = tables.phase1_bound(Twist::get(&c), Flip::get(&c), Slice::get(&c));
        sum1 += b as usize;
        max1 = max1.max(b);
        let c = rand_cube(rng, &P2_MOVES, walk_len);
        let b = tables.phase2_bound(CPerm::get(&c), EPerm::get(&c), MPerm::get(&c));
        sum2 += b as usize;
        max2 = max2.max(b);
    }
    println!("phase 1: {:.2} (max {}) average bound for {} random states.", sum1 as f64 / samples as f64, max1, samples);
    println!("phase 2: {:.2} (max {}) average bound for {} random states.", sum2 as f64 / samples as f64, max2, samples);
}

fn main() -> Result<(), TableError> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(match args.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let (seconds, coords) = timed(CoordTables::build);
    let coords = coords?;
    println!("move and symmetry tables: {} bytes, built in {:.3} sec", coords.size_bytes(), seconds);

    let d = BuildConf::default().inv_depth;
    build_and_print(coords.slice_twist_conf(d.slice_twist))?;
    build_and_print(coords.slice_flip_conf(d.slice_flip))?;
    if !args.no_twist_flip { build_and_print(coords.twist_flip_conf(d.twist_flip))?; }
    build_and_print(coords.meperm_conf(d.meperm))?;
    build_and_print(coords.mcperm_conf(d.mcperm))?;

    let conf = BuildConf { parallel: !args.sequential, twist_flip_prun: !args.no_twist_flip, ..Default::default() };
    let wall = Instant::now();
    let (seconds, tables) = timed(|| TableSet::build(&conf));
    let tables = tables?;
    println!("table set: {} bytes, built in {:.3} sec ({:.3} sec wall clock, {})",
             tables.size_bytes(), seconds, wall.elapsed().as_secs_f64(), if conf.parallel { "parallel" } else { "sequential" });

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    print_average_bounds(&tables, &mut rng, args.samples, args.walk_len);
    Ok(())
}
