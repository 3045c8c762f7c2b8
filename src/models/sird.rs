//! Euler time stepping of the SIRD system.
//!
//! ```text
//! dS/dt = -r·S·I
//! dI/dt =  r·S·I - (a + b)·I
//! dR/dt =  a·I
//! dD/dt =  b·I
//! ```
//!
//! Numerical notes:
//! - Neither scheme re-normalizes `S + I + R + D`; the total may drift away
//!   from the population over a long trace.
//! - The implicit scheme is only partially implicit. `S_t` is solved first and
//!   the infected update then uses that new `S_t` in its denominator, so its
//!   results differ from a fully implicit solve of the coupled system.
//! - Zero denominators in the implicit scheme produce non-finite values that
//!   are kept in the trace.

use log::warn;

use crate::domain::{EulerMethod, RateParameters, SimulationTrace, SirdState, TimeSeries};

/// Advance one explicit Euler step.
pub fn explicit_step(prev: SirdState, rates: &RateParameters, dt: f64) -> SirdState {
    let RateParameters {
        recovery: a,
        mortality: b,
        transmission: r,
    } = *rates;
    let new_infections = r * prev.susceptible * prev.infected;

    SirdState {
        susceptible: prev.susceptible - dt * new_infections,
        infected: prev.infected + dt * (new_infections - (a + b) * prev.infected),
        recovered: prev.recovered + dt * a * prev.infected,
        deceased: prev.deceased + dt * b * prev.infected,
    }
}

/// Advance one partially implicit Euler step.
pub fn implicit_step(prev: SirdState, rates: &RateParameters, dt: f64) -> SirdState {
    let RateParameters {
        recovery: a,
        mortality: b,
        transmission: r,
    } = *rates;

    let susceptible = prev.susceptible / (1.0 + dt * r * prev.infected);
    let infected = prev.infected / (1.0 - dt * r * susceptible + dt * (a + b));

    SirdState {
        susceptible,
        infected,
        recovered: prev.recovered + dt * a * infected,
        deceased: prev.deceased + dt * b * infected,
    }
}

/// Integrate from `initial` producing one state per entry of `days`.
///
/// The step size is the fixed `dt`, not the spacing of `days`; `days` only
/// labels the output samples.
pub fn simulate_from(
    initial: SirdState,
    days: &[f64],
    rates: &RateParameters,
    dt: f64,
    method: EulerMethod,
) -> SimulationTrace {
    let n = days.len();
    let mut trace = SimulationTrace {
        method,
        day: days.to_vec(),
        susceptible: Vec::with_capacity(n),
        infected: Vec::with_capacity(n),
        recovered: Vec::with_capacity(n),
        deceased: Vec::with_capacity(n),
    };
    if n == 0 {
        return trace;
    }

    let step: fn(SirdState, &RateParameters, f64) -> SirdState = match method {
        EulerMethod::Explicit => explicit_step,
        EulerMethod::Implicit => implicit_step,
    };

    let mut state = initial;
    push_state(&mut trace, state);
    for _ in 1..n {
        state = step(state, rates, dt);
        push_state(&mut trace, state);
    }

    if let Some(t) = trace.first_non_finite() {
        warn!(
            "{} produced a non-finite state at day {} (degenerate step denominator or overflow)",
            method.display_name(),
            trace.day[t]
        );
    }

    trace
}

/// Solve the SIRD system starting from the first observed sample, with one
/// output sample per observed day.
pub fn simulate(series: &TimeSeries, rates: &RateParameters, dt: f64, method: EulerMethod) -> SimulationTrace {
    simulate_from(series.initial_state(), series.day(), rates, dt, method)
}

fn push_state(trace: &mut SimulationTrace, state: SirdState) {
    trace.susceptible.push(state.susceptible);
    trace.infected.push(state.infected);
    trace.recovered.push(state.recovered);
    trace.deceased.push(state.deceased);
}
