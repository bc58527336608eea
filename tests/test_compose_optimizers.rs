//! End-to-end composition tests: assemble real optimizers out of the
//! transform chain and check they behave like the published algorithms.

use gradkit::prelude::*;
use num_traits::Float;

/// Quadratic bowl: loss = 0.5 * |p|², so the gradient is just p.
fn quadratic_grad(params: &[f64]) -> Vec<f64> {
    params.to_vec()
}

fn apply(params: &[f64], update: &[f64]) -> Vec<f64> {
    params.iter().zip(update.iter()).map(|(p, u)| p + u).collect()
}

#[test]
fn test_adam_minimizes_quadratic() {
    let mut params = vec![1.0, -3.0, 0.5];
    let initial_norm = global_norm(&params);

    let mut mu = vec![0.0; 3];
    let mut nu = vec![0.0; 3];
    let cfg = AdamConfig::default();
    for count in 0..300 {
        let g = quadratic_grad(&params);
        let (g, mu_next, nu_next) = scale_by_adam(&g, &mu, &nu, count, &cfg).unwrap();
        let update = scale(&g, -0.05);
        params = apply(&params, &update);
        mu = mu_next;
        nu = nu_next;
    }

    let final_norm = global_norm(&params);
    assert!(final_norm < 0.3, "expected convergence, got norm {final_norm}");
    assert!(final_norm < initial_norm);
}

#[test]
fn test_clipped_momentum_sgd_minimizes_quadratic() {
    let mut params = vec![4.0, -2.0];
    let mut momentum = vec![0.0; 2];
    let clip_cfg = GlobalNormConfig { max_norm: 1.0 };
    let trace_cfg = TraceConfig {
        decay: 0.9,
        nesterov: true,
    };
    for _ in 0..500 {
        let g = quadratic_grad(&params);
        let g = clip_by_global_norm(&g, &clip_cfg).unwrap();
        let (g, momentum_next) = trace(&g, &momentum, &trace_cfg).unwrap();
        let update = scale(&g, -0.01);
        params = apply(&params, &update);
        momentum = momentum_next;
    }
    assert!(global_norm(&params) < 0.5);
}

#[test]
fn test_lamb_style_chain_stays_finite() {
    // AdamW-flavored LAMB: weight decay into the gradient, Adam scaling,
    // then layer-wise trust-ratio rescaling of the parameters' update.
    let params = vec![0.5, -0.25, 1.5, 0.0];
    let grads = vec![10.0, -0.01, 0.0, 3.0];
    let zeros = vec![0.0; 4];

    let g = add_decayed_weights(&grads, &params, &DecayConfig { weight_decay: 0.01 }).unwrap();
    let (g, mu, nu) = scale_by_adam(&g, &zeros, &zeros, 0, &AdamConfig::default()).unwrap();
    let update = scale_by_trust_ratio(&g, &params, &TrustRatioConfig::default()).unwrap();

    assert!(update.iter().all(|v| v.is_finite()));
    assert!(mu.iter().all(|v| v.is_finite()));
    assert!(nu.iter().all(|v| v.is_finite()));
}

#[test]
fn test_schedule_warmup_chain() {
    // Linear warmup over 10 steps composed after an RMS scaler.
    let warmup = |count: u64| (count + 1).min(10) as f64 / 10.0;
    let mut nu = vec![0.0; 2];
    let g = [1.0, -1.0];

    let mut first_step_norm = 0.0;
    let mut tenth_step_norm = 0.0;
    for count in 0..10 {
        let (scaled, nu_next) = scale_by_rms(&g, &nu, &RmsConfig::default()).unwrap();
        let update = scale_by_schedule(&scaled, count, warmup);
        if count == 0 {
            first_step_norm = global_norm(&update);
        }
        if count == 9 {
            tenth_step_norm = global_norm(&update);
        }
        nu = nu_next;
    }
    // The schedule ramps the step size up even as the RMS denominator grows.
    assert!(first_step_norm < tenth_step_norm);
}

#[test]
fn test_transforms_never_mutate_inputs() {
    let g = vec![1.0, -2.0];
    let mu = vec![0.5, 0.5];
    let nu = vec![0.25, 0.25];
    let g_before = g.clone();
    let mu_before = mu.clone();
    let nu_before = nu.clone();

    let _ = scale_by_adam(&g, &mu, &nu, 7, &AdamConfig::default()).unwrap();
    let _ = scale_by_radam(&g, &mu, &nu, 7, &RAdamConfig::default()).unwrap();
    let _ = scale_by_belief(&g, &mu, &nu, 7, &BeliefConfig::default()).unwrap();
    let _ = centralize(&g);

    assert_eq!(g, g_before);
    assert_eq!(mu, mu_before);
    assert_eq!(nu, nu_before);
}

#[test]
fn test_f32_and_f64_both_supported() {
    let g32 = [1.0f32, -2.0];
    let g64 = [1.0f64, -2.0];
    let (out32, _, _) =
        scale_by_adam(&g32, &[0.0; 2], &[0.0; 2], 0, &AdamConfig::default()).unwrap();
    let (out64, _, _) =
        scale_by_adam(&g64, &[0.0; 2], &[0.0; 2], 0, &AdamConfig::default()).unwrap();
    for (a, b) in out32.iter().zip(out64.iter()) {
        assert!((*a as f64 - b).abs() < 1e-3);
    }
}
