use lunar_lander::descent::FlightState;
use lunar_lander::descent::integrator::integrate;

#[test]
fn zero_burn_is_ballistic() {
    let state = FlightState::classic();
    let next = integrate(&state, 10.0);
    assert_eq!(next.velocity_miles_s, 1.0 + 0.001 * 10.0);
    assert!((next.altitude_miles - 109.95).abs() < 1e-12);
}

#[test]
fn powered_step_tracks_rocket_equation() {
    let mut state = FlightState::classic();
    state.fuel_rate_lbs_s = 200.0;
    let s = 10.0;
    let next = integrate(&state, s);

    let m0 = state.total_weight_lbs;
    let m1 = m0 - s * state.fuel_rate_lbs_s;
    let exact_v =
        state.velocity_miles_s + state.gravity * s - state.exhaust_velocity * (m0 / m1).ln();
    assert!(
        (next.velocity_miles_s - exact_v).abs() < 1e-7,
        "series {} vs exact {}",
        next.velocity_miles_s,
        exact_v
    );
    // Thrust slows the fall relative to the ballistic step.
    let ballistic = integrate(&FlightState::classic(), s);
    assert!(next.velocity_miles_s < ballistic.velocity_miles_s);
    assert!(next.altitude_miles > ballistic.altitude_miles);
}

#[test]
fn series_is_cut_after_fifth_power() {
    let mut state = FlightState::classic();
    state.fuel_rate_lbs_s = 200.0;
    let s = 10.0;
    let next = integrate(&state, s);

    // Q = s·k/m = 2000/32500 = 4/65.
    let q: f64 = 4.0 / 65.0;
    assert!((next.velocity_miles_s - 0.8956758869011805).abs() < 1e-12);
    assert!((next.altitude_miles - 110.5155701048175).abs() < 1e-12);

    // What the series leaves out is exactly the sixth and higher powers of -ln(1 - Q).
    let exact_v =
        state.velocity_miles_s + state.gravity * s + state.exhaust_velocity * (1.0 - q).ln();
    let tail: f64 = (6..60).map(|n| q.powi(n) / n as f64).sum();
    let gap = next.velocity_miles_s - exact_v;
    assert!(
        (gap - state.exhaust_velocity * tail).abs() < 1e-13,
        "gap {gap} vs tail {}",
        state.exhaust_velocity * tail
    );
}
