//! The comparisons of the MtSyft study
//!
//! | Preset | Tag | Path | Policy | Sweep | Limit |
//! |--------|-----|------|--------|-------|-------|
//! | [`counter_tiers`] | `counter_<c>` | `core_80/envs_{n}` | containment | `n ∈ 80..=99` | 300 s |
//! | [`counter_coverage`] | `counter_{k}` | `core_1/` … `{n}` | suffix-exact | `k ∈ 1..=10`, `n ∈ 1..=100` | 300 s |
//! | [`robot_navigation`] | `rooms_{rooms}` | `envs_{n}` | containment | `rooms ∈ 2..=10`, `n ∈ 1..=rooms` | 1000 s |
//!
//! Figure 1 is `counter_tiers(8)` over MtSyft and cb-MtSyft; Figure 2 is
//! `counter_tiers(1)` over MtSyft and conj-MtSyft.

use super::BenchmarkFamily;
use crate::matcher::MatchPolicy;
use crate::runtime::{COUNTER_GAMES_TIMEOUT, ROBOT_NAVIGATION_TIMEOUT};
use crate::sweep::ParamRange;

/// Baseline multi-tier solver
pub const MTSYFT: &str = "MtSyft";
/// Common-core chained variant
pub const CB_MTSYFT: &str = "cb-MtSyft";
/// Refining-environments (conjunctive) variant
pub const CONJ_MTSYFT: &str = "conj-MtSyft";

/// Log file each solver appends to, by variant.
pub const DEFAULT_LOGS: [(&str, &str); 3] = [
    (MTSYFT, "res_mtsyft.csv"),
    (CB_MTSYFT, "res_cb_mtsyft.csv"),
    (CONJ_MTSYFT, "res_conj_mtsyft.csv"),
];

/// Core size of the tier-scaling counter games.
pub const TIERS_CORE: i64 = 80;

/// Last environment count of the tier-scaling sweep.
pub const TIERS_MAX_ENVS: i64 = 99;

/// Counter games with a fixed counter size, sweeping the number of
/// environment tiers at core 80.
///
/// Tier number `n - 80 + 1` is the x axis of the original bar charts.
#[must_use]
pub fn counter_tiers(counter: i64) -> BenchmarkFamily {
    BenchmarkFamily {
        name: format!("counter-tiers-{counter}"),
        tag: format!("counter_{counter}"),
        path: format!("core_{TIERS_CORE}/envs_{{n}}"),
        anchor: None,
        policy: MatchPolicy::Containment,
        timeout_secs: COUNTER_GAMES_TIMEOUT,
        sweep: vec![ParamRange::new("n", TIERS_CORE, TIERS_MAX_ENVS)],
    }
}

/// Counter games at core 1 over counter size `k` and environment count `n`.
///
/// Paths are matched by suffix so that `envs_1` never stands in for `n = 10`.
#[must_use]
pub fn counter_coverage() -> BenchmarkFamily {
    BenchmarkFamily {
        name: "counter-coverage".to_string(),
        tag: "counter_{k}".to_string(),
        path: "{n}".to_string(),
        anchor: Some("core_1/".to_string()),
        policy: MatchPolicy::SuffixExact,
        timeout_secs: COUNTER_GAMES_TIMEOUT,
        sweep: vec![ParamRange::new("k", 1, 10), ParamRange::new("n", 1, 100)],
    }
}

/// Robot navigation over room count and tier count (`n ≤ rooms`).
#[must_use]
pub fn robot_navigation() -> BenchmarkFamily {
    BenchmarkFamily {
        name: "robot-navigation".to_string(),
        tag: "rooms_{rooms}".to_string(),
        path: "envs_{n}".to_string(),
        anchor: None,
        policy: MatchPolicy::Containment,
        timeout_secs: ROBOT_NAVIGATION_TIMEOUT,
        sweep: vec![
            ParamRange::new("rooms", 2, 10),
            ParamRange::up_to("n", 1, "rooms"),
        ],
    }
}
