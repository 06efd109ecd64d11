//! Integration tests driving the hooks the way a host engine does

use approx::assert_relative_eq;
use em1d_core::config::{PerturbationParameters, SimulationParameters};
use em1d_core::core_types::{RowArray, ELECTRIC, EPSILON, EPSILON_RATE, MAGNETIC};
use em1d_core::{create_material_model, HostedSimulation, ModelError, SolverState};
use std::thread;

fn moving_params() -> SimulationParameters {
    let mut params = SimulationParameters {
        material_shape: "moving_gaussian".to_string(),
        ..Default::default()
    }
    .with_matched_perturbation(PerturbationParameters {
        amplitude: 0.5,
        width: 4e-6,
        offset: 10e-6,
        velocity: 1e8,
    });
    params.geometry.x_upper = 60e-6;
    params
}

#[test]
fn test_aux_follows_moving_perturbation() {
    let mut sim = HostedSimulation::new(moving_params()).unwrap();
    let centers = sim.state().grid.centers();

    let peak_cell = |aux: &RowArray| {
        aux.row(EPSILON)
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap()
    };

    let start = peak_cell(&sim.state().aux);
    assert_relative_eq!(centers[start], 10e-6, epsilon = sim.state().grid.delta());

    // 2e-13 s at 1e8 m/s moves the bump by 20 µm
    for _ in 0..4 {
        sim.prepare_stage(0).unwrap();
        sim.advance_time(5e-14).unwrap();
    }
    sim.prepare_stage(0).unwrap();
    let end = peak_cell(&sim.state().aux);
    assert_relative_eq!(centers[end], 30e-6, epsilon = sim.state().grid.delta());
}

#[test]
fn test_multi_stage_step_keeps_boundary_consistent() {
    let mut params = SimulationParameters::default();
    params.geometry.x_upper = 10e-6;
    params.excitation.kind = "gauss_pulse".to_string();
    let mut sim = HostedSimulation::new(params).unwrap();
    let g = sim.num_ghost();

    for _step in 0..3 {
        for stage in 0..3 {
            let mut buffers = sim.prepare_stage(stage).unwrap();
            // Stand-in for the engine's update: shift everything one cell up
            for row in [ELECTRIC, MAGNETIC] {
                let r = buffers.qbc.row_mut(row);
                r.copy_within(..r.len() - 1, 1);
            }
            sim.commit_stage(&buffers).unwrap();
        }
        sim.advance_time(0.01).unwrap();
    }

    assert_eq!(sim.steps(), 3);
    let buffers = sim.prepare_stage(0).unwrap();
    let expected = sim
        .model()
        .evaluate(sim.time(), &sim.state().grid.lower_ghost_centers(g))
        .unwrap();
    assert_eq!(&buffers.auxbc.row(EPSILON)[..g], expected.row(EPSILON));
    assert!(buffers.qbc.data.iter().all(|v| v.is_finite()));
}

#[test]
fn test_disjoint_ranges_match_full_evaluation() {
    let params = moving_params();
    let model = create_material_model(params.clone()).unwrap();
    let grid = em1d_core::Configuration::new(params)
        .unwrap()
        .grid()
        .unwrap();
    let centers = grid.centers_with_ghost(3);
    let t = 7e-14;
    let full = model.evaluate(t, &centers).unwrap();

    let (left, right) = centers.split_at(centers.len() / 2);
    let model_ref = model.as_ref();
    let (a, b) = thread::scope(|s| {
        let ha = s.spawn(|| model_ref.evaluate(t, left).unwrap());
        let hb = s.spawn(|| model_ref.evaluate(t, right).unwrap());
        (ha.join().unwrap(), hb.join().unwrap())
    });

    for row in 0..4 {
        let joined: Vec<f64> = a.row(row).iter().chain(b.row(row)).copied().collect();
        assert_eq!(joined.as_slice(), full.row(row));
    }
    assert!(full.row(EPSILON_RATE).iter().any(|&v| v != 0.0));
}

#[test]
fn test_wrong_host_shapes_are_reported() {
    let model = create_material_model(SimulationParameters::default()).unwrap();
    let grid = em1d_core::UniformGrid::new(0.0, 1e-6, 10).unwrap();

    let mut state = SolverState::new(grid, 0.0);
    state.aux = RowArray::field(10);
    assert!(matches!(
        model.before_step(&mut state),
        Err(ModelError::ShapeMismatch { array: "aux", expected_rows: 4, rows: 2, .. })
    ));

    let mut qbc = RowArray::aux(14);
    assert!(matches!(
        model.fill_field_lower(&grid, 0.0, &mut qbc, 2),
        Err(ModelError::ShapeMismatch { array: "qbc", .. })
    ));
}

#[test]
fn test_configuration_errors_stop_setup() {
    let params = SimulationParameters {
        material_shape: "moving_gaussian".to_string(),
        ..Default::default()
    }
    .with_matched_perturbation(PerturbationParameters {
        amplitude: 0.1,
        width: 0.0,
        offset: 0.0,
        velocity: 0.0,
    });
    let err = HostedSimulation::new(params).err().unwrap();
    assert!(err.is_configuration());
}
