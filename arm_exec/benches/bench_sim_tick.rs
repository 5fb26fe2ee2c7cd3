//! # Simulation Tick Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arm_lib::{
    arm_ctrl::inverse_kinematics,
    data_store::DataStore,
    goal_loop::{self, GoalLoop},
    params::ArmExecParams,
    point::Point,
};

fn sim_tick_benchmark(c: &mut Criterion) {
    // ---- Build the reference simulation ----

    let exec_params: ArmExecParams =
        util::params::from_str(include_str!("../../params/arm_exec.toml")).unwrap();
    let gl_params: goal_loop::Params =
        util::params::from_str(include_str!("../../params/goal_loop.toml")).unwrap();

    let gl = GoalLoop::new(gl_params, exec_params.cycle_period_s()).unwrap();
    let mut ds = DataStore::new(&exec_params, gl);

    // Keep the arm tracking for the whole benchmark by alternating between two
    // goals faster than it can reach either
    let goals = [Point::new(0.375, 1.0), Point::new(-1.0, 0.5)];
    let mut i = 0usize;

    c.bench_function("sim_tick", |b| {
        b.iter(|| {
            if ds.num_cycles % 25 == 0 {
                ds.goal_loop.set_goal(goals[i % 2]);
                i += 1;
            }
            ds.tick();
        })
    });

    c.bench_function("inverse_kinematics", |b| {
        b.iter(|| {
            inverse_kinematics(
                black_box(Point::new(0.375, 1.0)),
                black_box(1.0),
                black_box(0.8),
                1.0,
                0.8,
            )
        })
    });
}

criterion_group!(benches, sim_tick_benchmark);
criterion_main!(benches);
