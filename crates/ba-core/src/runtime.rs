//! Small runtime helpers: deterministic seeding from a string, and (behind
//! the `server` feature) the logging/interrupt wiring a hosting process
//! wants but a plain library embedding does not.

use rand::rngs::SmallRng;
use rand::RngCore;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

/// Hashes an arbitrary, `Hash`-able key into a `u64` and seeds a `SmallRng`
/// from it. Used both for the single "default seed" string a caller
/// supplies (`DirichletTree::set_seed`) and, in `ba-sim`, for deriving one
/// independent stream per batch from `(root_seed, batch_index)` — hashing a
/// composite key into a seed this way keeps every stream reproducible
/// without threading a shared, mutably-borrowed generator across callers.
pub fn rng_from_seed<K: Hash>(key: K) -> SmallRng {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    SmallRng::seed_from_u64(hasher.finish())
}

/// Discards `crate::SEED_WARMUP_DRAWS` values from a freshly-seeded
/// generator. `SmallRng`'s first outputs are not meaningfully "worse" than
/// later ones, but warming up keeps re-seeding behavior decoupled from
/// whatever the generator's internal state-mixing schedule happens to be.
pub fn warmup(rng: &mut SmallRng) {
    for _ in 0..crate::SEED_WARMUP_DRAWS {
        rng.next_u64();
    }
}

/// Initializes dual terminal+file logging: DEBUG to a timestamped file
/// under `logs/`, INFO to the terminal. Only compiled when a host opts
/// into the `server` feature.
#[cfg(feature = "server")]
pub fn init_logging() {
    use std::time::SystemTime;
    use std::time::UNIX_EPOCH;

    let _ = std::fs::create_dir_all("logs");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .build();
    let time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    let loggers: Vec<Box<dyn simplelog::SharedLogger>> =
        match std::fs::File::create(format!("logs/{}.log", time)) {
            Ok(file) => vec![
                term,
                simplelog::WriteLogger::new(log::LevelFilter::Debug, config, file),
            ],
            Err(_) => vec![term],
        };
    let _ = simplelog::CombinedLogger::init(loggers);
}

/// Global interrupt flag for graceful cancellation of a running posterior
/// simulation. Mirrors `rbp_core::{interrupted, brb}`.
#[cfg(feature = "server")]
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Whether a graceful interrupt has been requested. The parallel driver in
/// `ba-sim` polls this between elections within a batch.
#[cfg(feature = "server")]
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
}

/// Programmatically requests a graceful interrupt — e.g. from a host's own
/// Ctrl-C/signal handler, rather than the stdin listener
/// [`arm_graceful_interrupt`] arms. Sets the same flag [`interrupted`] reads.
#[cfg(feature = "server")]
pub fn request_interrupt() {
    INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
}

/// Clears a previously requested interrupt, so a process can start a fresh
/// simulation run after a prior one was cancelled.
#[cfg(feature = "server")]
pub fn clear_interrupt() {
    INTERRUPTED.store(false, std::sync::atomic::Ordering::Relaxed);
}

/// Arms a background thread that sets the interrupt flag when the caller
/// types "Q" + Enter on stdin. Opt-in: a library embedded in another host
/// should not unconditionally claim stdin.
#[cfg(feature = "server")]
pub fn arm_graceful_interrupt() {
    std::thread::spawn(|| loop {
        let mut buffer = String::new();
        if std::io::stdin().read_line(&mut buffer).is_ok() {
            if buffer.trim().eq_ignore_ascii_case("q") {
                log::warn!("graceful interrupt requested, finishing current batch...");
                INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_same_stream() {
        let mut a = rng_from_seed("audit-2026");
        let mut b = rng_from_seed("audit-2026");
        warmup(&mut a);
        warmup(&mut b);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    #[cfg(feature = "server")]
    fn request_interrupt_sets_flag_and_clear_interrupt_resets_it() {
        clear_interrupt();
        assert!(!interrupted());
        request_interrupt();
        assert!(interrupted());
        clear_interrupt();
        assert!(!interrupted());
    }

    #[test]
    fn different_seeds_yield_different_streams() {
        let mut a = rng_from_seed("audit-2026");
        let mut b = rng_from_seed("audit-2027");
        assert_ne!(a.next_u64(), b.next_u64());
    }
}
