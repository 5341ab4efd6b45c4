//! # PD Control Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nalgebra::Vector2;
use reacher_lib::{
    kinematics::{JointAngles, TwoLinkArm},
    pd_ctrl::PdCtrl,
};

fn pd_ctrl_benchmark(c: &mut Criterion) {
    // ---- Build the controller ----

    let mut pd_ctrl = PdCtrl::with_default_gains(TwoLinkArm::default());

    let state_err = Vector2::new(0.02, -0.01);
    let q_err = Vector2::new(0.3, -0.2);
    let q = JointAngles::new(0.4, 1.1);

    // ---- Run benchmarks ----

    c.bench_function("pd_control_end_effector", |b| {
        b.iter(|| pd_ctrl.pd_control_end_effector(black_box(&state_err), black_box(q), 0.01))
    });

    c.bench_function("pd_control_joint", |b| {
        b.iter(|| pd_ctrl.pd_control_joint(black_box(&q_err), 0.01))
    });
}

criterion_group!(benches, pd_ctrl_benchmark);
criterion_main!(benches);
