// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use log::debug;
use onsett_core::{
    ChangePointResult, Constraints, Diagnostics, OfflineDetector, OnsetError, Penalty,
    PruningStats, SeriesView, ValidatedConstraints, penalty_value, validate_constraints,
};
use onsett_costs::CostModel;
use std::borrow::Cow;
use std::time::Instant;

/// Configuration for [`Pelt`].
#[derive(Clone, Debug, PartialEq)]
pub struct PeltConfig {
    pub penalty: Penalty,
    /// Disabling pruning yields the same segmentation at quadratic cost.
    pub prune: bool,
}

impl Default for PeltConfig {
    fn default() -> Self {
        Self {
            penalty: Penalty::default(),
            prune: true,
        }
    }
}

impl PeltConfig {
    fn validate(&self) -> Result<(), OnsetError> {
        if let Penalty::Manual(value) = self.penalty
            && (!value.is_finite() || value <= 0.0)
        {
            return Err(OnsetError::invalid_input(format!(
                "PeltConfig.penalty must be finite and > 0.0; got {value}"
            )));
        }
        Ok(())
    }
}

/// Pruned Exact Linear Time offline detector.
#[derive(Debug)]
pub struct Pelt<C: CostModel> {
    cost_model: C,
    config: PeltConfig,
}

impl<C: CostModel> Pelt<C> {
    pub fn new(cost_model: C, config: PeltConfig) -> Result<Self, OnsetError> {
        config.validate()?;
        Ok(Self { cost_model, config })
    }

    pub fn cost_model(&self) -> &C {
        &self.cost_model
    }

    pub fn config(&self) -> &PeltConfig {
        &self.config
    }
}

#[derive(Clone, Debug)]
struct KernelResult {
    breakpoints: Vec<usize>,
    change_count: usize,
    objective: f64,
}

#[derive(Default, Clone, Copy, Debug)]
struct RuntimeStats {
    cost_evals: usize,
    candidates_considered: usize,
    candidates_pruned: usize,
}

fn checked_counter_increment(counter: &mut usize, name: &str) -> Result<(), OnsetError> {
    *counter = counter
        .checked_add(1)
        .ok_or_else(|| OnsetError::numerical_issue(format!("{name} counter overflow")))?;
    Ok(())
}

fn resolve_penalty_beta(
    penalty: &Penalty,
    n: usize,
    params_per_segment: usize,
) -> Result<f64, OnsetError> {
    let beta = penalty_value(penalty, n, params_per_segment)?;
    if !beta.is_finite() || beta <= 0.0 {
        return Err(OnsetError::invalid_input(format!(
            "resolved penalty must be finite and > 0.0; got beta={beta}"
        )));
    }
    Ok(beta)
}

fn evaluate_segment_cost<C: CostModel>(
    model: &C,
    cache: &C::Cache,
    start: usize,
    end: usize,
    runtime: &mut RuntimeStats,
) -> Result<f64, OnsetError> {
    checked_counter_increment(&mut runtime.cost_evals, "cost_evals")?;

    let segment_cost = model.segment_cost(cache, start, end);
    if !segment_cost.is_finite() {
        return Err(OnsetError::numerical_issue(format!(
            "non-finite segment cost at [{start}, {end}): {segment_cost}"
        )));
    }
    Ok(segment_cost)
}

fn build_targets(validated: &ValidatedConstraints, n: usize) -> Vec<usize> {
    let mut targets = validated.effective_candidates.clone();
    if targets.last().copied() != Some(n) {
        targets.push(n);
    }
    targets
}

fn reconstruct_breakpoints(
    n: usize,
    last_cp: &[usize],
) -> Result<(Vec<usize>, usize), OnsetError> {
    let mut reverse = vec![n];
    let mut cursor = n;
    let mut hops = 0usize;

    while cursor > 0 {
        hops += 1;
        if hops > n + 1 {
            return Err(OnsetError::invalid_input(
                "invalid DP backtrack state: cycle detected",
            ));
        }

        let tau = last_cp[cursor];
        if tau == usize::MAX {
            return Err(OnsetError::invalid_input(format!(
                "invalid DP backtrack state: missing predecessor at t={cursor}"
            )));
        }
        if tau >= cursor {
            return Err(OnsetError::invalid_input(format!(
                "invalid DP backtrack state: predecessor tau={tau} is not < t={cursor}"
            )));
        }
        if tau == 0 {
            break;
        }
        reverse.push(tau);
        cursor = tau;
    }

    reverse.reverse();
    let change_count = reverse.len().saturating_sub(1);
    Ok((reverse, change_count))
}

fn run_pelt_penalized<C: CostModel>(
    model: &C,
    cache: &C::Cache,
    n: usize,
    validated: &ValidatedConstraints,
    beta: f64,
    prune_candidates: bool,
    runtime: &mut RuntimeStats,
) -> Result<KernelResult, OnsetError> {
    let targets = build_targets(validated, n);
    let min_segment_len = validated.min_segment_len;

    // f[t]: optimal penalized cost of x[0..t]; f[0] = -beta so the first
    // segment is free and the objective counts beta once per change point.
    let mut f = vec![f64::INFINITY; n + 1];
    let mut last_cp = vec![usize::MAX; n + 1];
    f[0] = -beta;
    last_cp[0] = 0;

    let mut candidate_set = vec![0usize];

    for &t in &targets {
        let mut scored = vec![None; candidate_set.len()];
        let mut best_cost = f64::INFINITY;
        let mut best_tau = usize::MAX;

        for (idx, &tau) in candidate_set.iter().enumerate() {
            if t <= tau || t - tau < min_segment_len {
                continue;
            }
            if !f[tau].is_finite() {
                continue;
            }

            let segment_cost = evaluate_segment_cost(model, cache, tau, t, runtime)?;
            checked_counter_increment(&mut runtime.candidates_considered, "candidates_considered")?;

            let score_no_penalty = f[tau] + segment_cost;
            let candidate = score_no_penalty + beta;
            if !candidate.is_finite() {
                return Err(OnsetError::numerical_issue(format!(
                    "non-finite objective at t={t}, tau={tau}: F(tau)={}, segment_cost={segment_cost}, beta={beta}",
                    f[tau]
                )));
            }

            scored[idx] = Some(score_no_penalty);

            // Strict comparison keeps the lowest tau on ties.
            if candidate < best_cost {
                best_cost = candidate;
                best_tau = tau;
            }
        }

        if best_tau == usize::MAX {
            return Err(OnsetError::invalid_input(format!(
                "no feasible segmentation under constraints at t={t}; check min_segment_len and jump"
            )));
        }

        f[t] = best_cost;
        last_cp[t] = best_tau;

        let mut next_candidate_set = Vec::with_capacity(candidate_set.len() + 1);
        if prune_candidates {
            for (idx, &tau) in candidate_set.iter().enumerate() {
                match scored[idx] {
                    Some(score_no_penalty) if score_no_penalty > best_cost => {
                        checked_counter_increment(
                            &mut runtime.candidates_pruned,
                            "candidates_pruned",
                        )?;
                    }
                    _ => next_candidate_set.push(tau),
                }
            }
        } else {
            next_candidate_set.extend_from_slice(&candidate_set);
        }

        if t < n {
            next_candidate_set.push(t);
        }
        candidate_set = next_candidate_set;
    }

    if !f[n].is_finite() {
        return Err(OnsetError::invalid_input(
            "no feasible segmentation reached terminal index n",
        ));
    }

    let (breakpoints, change_count) = reconstruct_breakpoints(n, &last_cp)?;
    Ok(KernelResult {
        breakpoints,
        change_count,
        objective: f[n],
    })
}

impl<C: CostModel> OfflineDetector for Pelt<C> {
    fn detect(
        &self,
        x: &SeriesView<'_>,
        constraints: &Constraints,
    ) -> Result<ChangePointResult, OnsetError> {
        self.config.validate()?;

        let effective = Constraints {
            min_segment_len: constraints
                .min_segment_len
                .max(self.cost_model.min_segment_len()),
            ..constraints.clone()
        };
        let validated = validate_constraints(&effective, x.n)?;

        let cache = self.cost_model.precompute(x)?;
        let beta = resolve_penalty_beta(
            &self.config.penalty,
            x.n,
            self.cost_model.params_per_segment(),
        )?;

        let started_at = Instant::now();
        let mut runtime = RuntimeStats::default();
        let mut notes = vec![format!("penalty={}, beta={beta}", self.config.penalty)];
        let mut warnings = vec![];

        if effective.min_segment_len != constraints.min_segment_len {
            warnings.push(format!(
                "constraints.min_segment_len={} raised to {} required by cost model {}",
                constraints.min_segment_len,
                effective.min_segment_len,
                self.cost_model.name()
            ));
        }

        let kernel = run_pelt_penalized(
            &self.cost_model,
            &cache,
            x.n,
            &validated,
            beta,
            self.config.prune,
            &mut runtime,
        )?;

        let runtime_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            "pelt: n={}, beta={beta}, change_count={}, cost_evals={}, pruned={}/{}",
            x.n,
            kernel.change_count,
            runtime.cost_evals,
            runtime.candidates_pruned,
            runtime.candidates_considered
        );

        notes.push(format!(
            "final_objective={}, change_count={}",
            kernel.objective, kernel.change_count
        ));
        notes.push(format!(
            "min_segment_len={}, jump={}, cost_evals={}",
            validated.min_segment_len, validated.jump, runtime.cost_evals
        ));

        let diagnostics = Diagnostics {
            n: x.n,
            runtime_ms: Some(runtime_ms),
            notes,
            warnings,
            algorithm: Cow::Borrowed("pelt"),
            cost_model: Cow::Borrowed(self.cost_model.name()),
            penalty_beta: Some(beta),
            pruning_stats: Some(PruningStats {
                candidates_considered: runtime.candidates_considered,
                candidates_pruned: runtime.candidates_pruned,
            }),
            ..Diagnostics::default()
        };

        ChangePointResult::new(x.n, kernel.breakpoints, diagnostics)
    }
}
