use std::num::NonZeroUsize;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use itertools::Itertools as _;
use minibvh::{
    Bvh, BvhSettings, TraversalStats, linear_intersect,
    scene::random::{random_ray, random_scene},
};
use rand::{SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Builds a BVH over a random scene and checks it against brute force ray casting.
#[derive(Debug, clap::Parser)]
struct CommandLineArguments {
    #[arg(short = 'n', long, default_value_t = 10_000, help = "Number of primitives")]
    primitives: usize,

    #[arg(short, long, default_value_t = 10_000, help = "Number of random rays to cast")]
    rays: usize,

    #[arg(short, long, default_value_t = 0, help = "Random seed for the scene and the rays")]
    seed: u64,

    #[arg(long, default_value_t = 100.0, help = "Half size of the scene cube")]
    extent: f64,

    #[arg(long, default_value_t = BvhSettings::DEFAULT_MAX_LEAF_SIZE, help = "Maximum primitives per leaf")]
    leaf_size: NonZeroUsize,

    #[arg(long, help = "Build the tree on a single thread")]
    serial: bool,

    #[arg(long, help = "Print the whole node tree")]
    print_tree: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CommandLineArguments::parse();

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let primitives = random_scene(&mut rng, args.primitives, args.extent);
    let rays: Vec<_> = (0..args.rays)
        .map(|_| random_ray(&mut rng, args.extent))
        .collect();

    let settings = BvhSettings::builder()
        .max_leaf_size(args.leaf_size)
        .parallel_build(!args.serial)
        .build();

    let start = Instant::now();
    let bvh = Bvh::build_with(primitives, &settings);
    info!(elapsed = ?start.elapsed(), "Build finished");

    println!("{}", bvh.statistics());
    if args.print_tree {
        bvh.print_tree();
    }

    let start = Instant::now();
    let (bvh_hits, stats): (Vec<_>, Vec<_>) = rays
        .par_iter()
        .map(|ray| {
            let mut stats = TraversalStats::default();
            let hit = bvh.intersect_with_stats(ray, &mut stats);
            (hit, stats)
        })
        .unzip();
    let bvh_elapsed = start.elapsed();

    let start = Instant::now();
    let linear_hits: Vec<_> = rays
        .par_iter()
        .map(|ray| linear_intersect(bvh.primitives(), ray))
        .collect();
    let linear_elapsed = start.elapsed();

    let mut total = TraversalStats::default();
    for s in stats {
        total += s;
    }
    let ray_count = args.rays.max(1) as f64;
    println!(
        "BVH: {:?}, {:.1} nodes, {:.1} leaves, {:.1} primitive tests per ray",
        bvh_elapsed,
        total.nodes_visited as f64 / ray_count,
        total.leaves_scanned as f64 / ray_count,
        total.primitive_tests as f64 / ray_count,
    );
    println!("Linear scan: {:?}", linear_elapsed);

    let hit_count = bvh_hits.iter().filter(|hit| hit.is_some()).count();
    println!("{hit_count} of {} rays hit", args.rays);

    let mismatches = bvh_hits
        .iter()
        .zip_eq(&linear_hits)
        .positions(|(a, b)| a != b)
        .collect_vec();
    if let Some(&first) = mismatches.first() {
        bail!(
            "{} rays disagree between BVH and linear scan, first is ray {}: {:?} vs {:?}",
            mismatches.len(),
            first,
            bvh_hits[first],
            linear_hits[first],
        );
    }

    Ok(())
}
