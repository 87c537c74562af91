use gconv_core::{decode, encode, enforce_undirected, remove_self_loops, Format, Graph, IndexMap};
use std::time::Instant;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let vertex_count = parse_vertex_count(args.get(2).map(|s| s.as_str()));

    if mode == "help" || mode == "--help" {
        println!("Usage: gconv-bench [mode] [vertex_count]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  tree        Branching tree (sparse, deep)");
        println!("  scalefree   Preferential attachment via edge sampling (hub-and-spoke)");
        println!("  smallworld  Watts-Strogatz ring lattice + shortcuts");
        println!("  random      Erdos-Renyi uniform random edges, self-loops included");
        println!();
        println!("Default vertex_count: 200000");
        return;
    }

    println!("gconv-bench");
    println!("===========");
    println!();

    let generators: Vec<(&str, fn(i64) -> Graph)> = match mode {
        "tree" => vec![("Branching tree", gen_tree)],
        "scalefree" => vec![("Scale-free (edge sampling)", gen_scale_free)],
        "smallworld" => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "all" => vec![
            ("Branching tree", gen_tree as fn(i64) -> Graph),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, i64::from(vertex_count));
    }
}

/// Vertex count argument; anything that is not an unsigned 32-bit number
/// falls back to the default.
fn parse_vertex_count(arg: Option<&str>) -> u32 {
    arg.and_then(|s| s.parse().ok()).unwrap_or(200_000)
}

fn run_benchmark(name: &str, generator: fn(i64) -> Graph, vertex_count: i64) {
    println!("--- {} ---", name);
    println!("Target: {} vertices", vertex_count);

    let t = Instant::now();
    let graph = generator(vertex_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} vertices, {} edges, ~{:.0}MB",
        gen_time.as_secs_f64(),
        graph.vertex_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );

    // Transforms on a copy so every format encodes the same graph
    let mut transformed = graph.clone();
    let t = Instant::now();
    let removed = remove_self_loops(&mut transformed);
    let loops_time = t.elapsed();
    let t = Instant::now();
    let added = enforce_undirected(&mut transformed);
    let undir_time = t.elapsed();
    println!(
        "Self-loops: {} removed in {:.1}ms; undirected: {} reciprocal edges in {:.1}ms",
        removed,
        loops_time.as_secs_f64() * 1000.0,
        added,
        undir_time.as_secs_f64() * 1000.0
    );

    let index = IndexMap::from_graph(&transformed);

    println!();
    println!(
        "{:>14} {:>6} {:>12} {:>12} {:>12}",
        "format", "sort", "bytes", "encode", "decode"
    );
    println!("{:->14} {:->6} {:->12} {:->12} {:->12}", "", "", "", "", "");

    for format in Format::ALL {
        for sort in [false, true] {
            let t = Instant::now();
            let bytes = match encode(format, &transformed, Some(&index), sort) {
                Ok(encoded) => encoded.into_bytes(),
                Err(e) => {
                    println!("{:>14} {:>6} error: {}", format.name(), sort, e);
                    continue;
                }
            };
            let encode_time = t.elapsed();

            let t = Instant::now();
            let decoded = decode(format, &bytes);
            let decode_time = t.elapsed();

            let decode_col = match decoded {
                Ok(d) if d.graph.edge_count() == transformed.edge_count() => {
                    format!("{:.1}ms", decode_time.as_secs_f64() * 1000.0)
                }
                Ok(d) => format!("{} edges?", d.graph.edge_count()),
                Err(e) => format!("error: {}", e),
            };
            println!(
                "{:>14} {:>6} {:>12} {:>10.1}ms {:>12}",
                format.name(),
                sort,
                bytes.len(),
                encode_time.as_secs_f64() * 1000.0,
                decode_col
            );
        }
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generators: O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: i64) -> i64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.0 >> 33) % max as u64) as i64
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Branching tree: each vertex spawns `branching` children, edges point
/// from parent to child only. Every child misses its reverse edge, so the
/// undirected closure doubles the edge count.
fn gen_tree(vertex_count: i64) -> Graph {
    let mut graph = Graph::with_capacity(vertex_count as usize);
    let branching = 3i64;

    graph.add_vertex(0);
    let mut next_id = 1i64;
    let mut frontier: Vec<i64> = vec![0];

    while next_id < vertex_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= vertex_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                graph.add_edge(parent, child);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Preferential attachment by picking a random existing edge and connecting
/// to one of its endpoints. Produces a skewed degree distribution, which
/// stresses the binary encoder's `max_degree` padding.
fn gen_scale_free(vertex_count: i64) -> Graph {
    let edges_per_vertex = 10i64;
    let mut graph = Graph::with_capacity(vertex_count as usize);
    let mut rng = FastRng::new(12345);

    let mut endpoints: Vec<i64> = Vec::with_capacity((vertex_count * edges_per_vertex * 2) as usize);

    // Seed: small clique
    let seed = 5i64.min(vertex_count);
    for i in 0..seed {
        graph.add_vertex(i);
    }
    for i in 0..seed {
        for j in (i + 1)..seed {
            graph.add_edge(i, j);
            endpoints.push(i);
            endpoints.push(j);
        }
    }

    for new_vertex in seed..vertex_count {
        graph.add_vertex(new_vertex);

        let attach = edges_per_vertex.min(new_vertex);
        for _ in 0..attach {
            if endpoints.is_empty() {
                break;
            }
            let target = endpoints[rng.next(endpoints.len() as i64) as usize];
            if target != new_vertex {
                graph.add_edge(new_vertex, target);
                endpoints.push(new_vertex);
                endpoints.push(target);
            }
        }
    }

    graph
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
fn gen_small_world(vertex_count: i64) -> Graph {
    let k = 10i64; // neighbors on each side
    let p = 0.05f64; // rewire probability
    let mut graph = Graph::with_capacity(vertex_count as usize);
    let mut rng = FastRng::new(67890);

    for i in 0..vertex_count {
        graph.add_vertex(i);
    }

    // Forward direction only; the closure adds the other half
    for i in 0..vertex_count {
        for j in 1..=k {
            let neighbor = (i + j) % vertex_count;
            if rng.next_f64() < p {
                let rewired = rng.next(vertex_count);
                graph.add_edge(i, if rewired != i { rewired } else { neighbor });
            } else {
                graph.add_edge(i, neighbor);
            }
        }
    }

    graph
}

/// Erdos-Renyi: ~10 uniform random edges per vertex. Self-loops and
/// parallel edges are kept to exercise both transforms.
fn gen_random(vertex_count: i64) -> Graph {
    let target_edges = vertex_count * 10;
    let mut graph = Graph::with_capacity(vertex_count as usize);
    let mut rng = FastRng::new(54321);

    for i in 0..vertex_count {
        graph.add_vertex(i);
    }

    for _ in 0..target_edges {
        let from = rng.next(vertex_count);
        let to = rng.next(vertex_count);
        graph.add_edge(from, to);
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_count_rejects_negative() {
        assert_eq!(parse_vertex_count(Some("-5")), 200_000);
        assert_eq!(parse_vertex_count(Some("1000")), 1000);
        assert_eq!(parse_vertex_count(None), 200_000);
    }

    #[test]
    fn test_generators_handle_tiny_counts() {
        let generators: [fn(i64) -> Graph; 4] =
            [gen_tree, gen_scale_free, gen_small_world, gen_random];
        for generator in generators {
            // The tree always has its root.
            assert!(generator(0).vertex_count() <= 1);
            assert!(generator(1).is_complete());
        }
    }
}
