//! Benchmark tests for the hot state-mapping path.
//!
//! Run with: cargo bench --bench map_state_bench

use criterion::{criterion_group, criterion_main, Criterion};
use openpad_mapper::{AxisDirection, ElementMap, ElementMapper, Mapper};
use openpad_types::element::{Axis, Button, PovDirection};
use openpad_types::state::{PhysicalButton, PhysicalButtonSet, PhysicalState};

fn full_layout() -> Mapper {
    Mapper::new(ElementMap {
        stick_left_x: Some(ElementMapper::Axis {
            axis: Axis::X,
            direction: AxisDirection::Both,
        }),
        stick_left_y: Some(ElementMapper::Axis {
            axis: Axis::Y,
            direction: AxisDirection::Both,
        }),
        stick_right_x: Some(ElementMapper::Axis {
            axis: Axis::RotX,
            direction: AxisDirection::Both,
        }),
        stick_right_y: Some(ElementMapper::Axis {
            axis: Axis::RotY,
            direction: AxisDirection::Both,
        }),
        trigger_lt: Some(ElementMapper::Axis {
            axis: Axis::Z,
            direction: AxisDirection::Both,
        }),
        trigger_rt: Some(ElementMapper::Axis {
            axis: Axis::RotZ,
            direction: AxisDirection::Both,
        }),
        dpad_up: Some(ElementMapper::Pov(PovDirection::Up)),
        dpad_down: Some(ElementMapper::Pov(PovDirection::Down)),
        dpad_left: Some(ElementMapper::Pov(PovDirection::Left)),
        dpad_right: Some(ElementMapper::Pov(PovDirection::Right)),
        button_a: Some(ElementMapper::Button(Button::new(0).expect("in range"))),
        button_b: Some(ElementMapper::Button(Button::new(1).expect("in range"))),
        button_x: Some(ElementMapper::Button(Button::new(2).expect("in range"))),
        button_y: Some(ElementMapper::Button(Button::new(3).expect("in range"))),
        button_lb: Some(ElementMapper::Button(Button::new(4).expect("in range"))),
        button_rb: Some(ElementMapper::Button(Button::new(5).expect("in range"))),
        button_back: Some(ElementMapper::Button(Button::new(6).expect("in range"))),
        button_start: Some(ElementMapper::Button(Button::new(7).expect("in range"))),
        button_ls: Some(ElementMapper::Button(Button::new(8).expect("in range"))),
        button_rs: Some(ElementMapper::Button(Button::new(9).expect("in range"))),
        ..Default::default()
    })
    .expect("valid layout")
}

fn bench_map_state(c: &mut Criterion) {
    let mapper = full_layout();
    let physical = PhysicalState {
        sticks: [1111, -2222, 3333, -4444],
        triggers: [100, 200],
        buttons: PhysicalButtonSet::from_buttons([
            PhysicalButton::A,
            PhysicalButton::DpadUp,
            PhysicalButton::RB,
        ]),
        ..PhysicalState::NEUTRAL
    };

    c.bench_function("map_state_full_layout", |b| {
        b.iter(|| std::hint::black_box(mapper.map_state(std::hint::black_box(&physical), 0)));
    });
}

fn bench_map_force_feedback(c: &mut Criterion) {
    let mapper = full_layout();
    let mut components = openpad_types::ZERO_MAGNITUDE_COMPONENTS;
    components[0] = 5_000.0;
    components[1] = -2_500.0;

    c.bench_function("map_force_feedback_default_actuators", |b| {
        b.iter(|| {
            std::hint::black_box(
                mapper.map_force_feedback(std::hint::black_box(components), 1.0),
            )
        });
    });
}

criterion_group!(benches, bench_map_state, bench_map_force_feedback);
criterion_main!(benches);
