//! Blocking test procedures
//!
//! Each procedure owns the actuators for its full duration and returns only
//! when it has finished; nothing else runs meanwhile. Every procedure ends
//! with injectors closed and the pump off.

use injector_hal::timer::Timebase;

use super::calc::PulseTiming;
use super::deadline::Deadline;
use crate::config::RunTimings;
use crate::params::{Mode, ParameterStore};
use crate::traits::{ActuatorBus, Display, Row};
use crate::ui::render::{self, Line};

const US_PER_SECOND: u32 = 1_000_000;

/// The hardware a procedure drives
pub struct Bench<A, T, D> {
    pub actuators: A,
    pub timer: T,
    pub display: D,
}

impl<A: ActuatorBus, T: Timebase, D: Display> Bench<A, T, D> {
    pub fn new(actuators: A, timer: T, display: D) -> Self {
        Self {
            actuators,
            timer,
            display,
        }
    }

    fn show(&mut self, row: Row, line: &Line) {
        render::show(&mut self.display, row, line);
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunReport {
    pub mode: Mode,
    /// Injector open/close pulses fired (1 for a full-flow hold)
    pub injector_pulses: u32,
    /// Wall time from pump on to pump off
    pub elapsed_us: u32,
}

/// Executes the test procedures
#[derive(Debug, Clone, Copy)]
pub struct TimingEngine {
    timings: RunTimings,
}

fn seconds_to_us(seconds: u32) -> u32 {
    seconds.saturating_mul(US_PER_SECOND)
}

fn non_negative<T: TryInto<u32>>(value: T) -> u32 {
    value.try_into().unwrap_or(0)
}

impl TimingEngine {
    pub fn new(timings: RunTimings) -> Self {
        Self { timings }
    }

    /// Run the procedure for `mode` with the current parameters
    pub fn run<A, T, D>(
        &self,
        bench: &mut Bench<A, T, D>,
        mode: Mode,
        store: &ParameterStore,
    ) -> RunReport
    where
        A: ActuatorBus,
        T: Timebase,
        D: Display,
    {
        bench.show(Row::Top, &render::title_line(mode, true));
        match mode {
            Mode::LeakTest => self.run_leak_test(bench, non_negative(store.leak_test().seconds())),
            Mode::FullFlow => self.run_full_flow(bench, non_negative(store.full_flow().seconds())),
            Mode::Rpm => {
                let p = store.rpm();
                self.run_constant_rpm(
                    bench,
                    non_negative(p.rpm()),
                    non_negative(p.duty()),
                    non_negative(p.seconds()),
                )
            }
            Mode::Pwm => {
                let p = store.pwm();
                self.run_pwm(
                    bench,
                    non_negative(p.pulses()),
                    u64::try_from(p.pulse_width_us()).unwrap_or(0),
                )
            }
        }
    }

    /// Pump only for `seconds`, injectors closed
    pub fn run_leak_test<A, T, D>(&self, bench: &mut Bench<A, T, D>, seconds: u32) -> RunReport
    where
        A: ActuatorBus,
        T: Timebase,
        D: Display,
    {
        info!("leak test: pump on for {} s", seconds);
        let started = bench.timer.now_us();

        bench.actuators.set_injectors_open(false);
        bench.actuators.set_pump_enabled(true);
        self.count_down(bench, seconds_to_us(seconds));
        bench.actuators.set_pump_enabled(false);

        self.finish(bench, Mode::LeakTest, 0, started)
    }

    /// Stabilize, then hold injectors open for `seconds`
    pub fn run_full_flow<A, T, D>(&self, bench: &mut Bench<A, T, D>, seconds: u32) -> RunReport
    where
        A: ActuatorBus,
        T: Timebase,
        D: Display,
    {
        info!("full flow: injectors open for {} s", seconds);
        let started = bench.timer.now_us();

        bench.actuators.set_pump_enabled(true);
        bench.timer.sleep_ms(self.timings.stabilize_ms);

        bench.actuators.set_injectors_open(true);
        self.count_down(bench, seconds_to_us(seconds));
        bench.actuators.set_injectors_open(false);
        bench.actuators.set_pump_enabled(false);

        self.finish(bench, Mode::FullFlow, 1, started)
    }

    /// Stabilize, then pulse at `rpm` and `duty_percent` for `seconds`
    ///
    /// Whole cycles only: a cycle that starts before the deadline runs to
    /// completion, so at least one cycle fires.
    pub fn run_constant_rpm<A, T, D>(
        &self,
        bench: &mut Bench<A, T, D>,
        rpm: u32,
        duty_percent: u32,
        seconds: u32,
    ) -> RunReport
    where
        A: ActuatorBus,
        T: Timebase,
        D: Display,
    {
        let timing = PulseTiming::for_rpm(rpm, duty_percent);
        info!(
            "rpm mode: cycle {} us, open {} us, close {} us, rpm {}, duty {}",
            timing.cycle_us,
            timing.open_us,
            timing.close_us,
            rpm,
            duty_percent
        );
        bench.show(Row::Top, &render::pulse_width_line(timing.open_us));
        let started = bench.timer.now_us();

        bench.actuators.set_pump_enabled(true);
        bench.timer.sleep_ms(self.timings.stabilize_ms);

        let mut pulses = 0u32;
        if timing.cycle_us == 0 {
            warn!("rpm mode: zero-length cycle, skipping injector pulses");
        } else {
            let deadline = Deadline::new(bench.timer.now_us(), seconds_to_us(seconds));
            loop {
                bench.actuators.set_injectors_open(true);
                bench.timer.sleep_us(u64::from(timing.open_us));
                bench.actuators.set_injectors_open(false);
                bench.timer.sleep_us(u64::from(timing.close_us));
                pulses = pulses.wrapping_add(1);

                if deadline.is_expired(bench.timer.now_us()) {
                    break;
                }
            }
        }
        bench.actuators.set_pump_enabled(false);

        self.finish(bench, Mode::Rpm, pulses, started)
    }

    /// Stabilize, then fire `pulses` pulses of `pulse_width_us` each
    pub fn run_pwm<A, T, D>(
        &self,
        bench: &mut Bench<A, T, D>,
        pulses: u32,
        pulse_width_us: u64,
    ) -> RunReport
    where
        A: ActuatorBus,
        T: Timebase,
        D: Display,
    {
        info!("pwm mode: {} pulses of {} us", pulses, pulse_width_us);
        let started = bench.timer.now_us();

        bench.actuators.set_pump_enabled(true);
        bench.timer.sleep_ms(self.timings.stabilize_ms);

        for fired in 1..=pulses {
            bench.actuators.set_injectors_open(true);
            bench.timer.sleep_us(pulse_width_us);
            bench.actuators.set_injectors_open(false);

            bench.show(Row::Top, &render::pulses_left_line(pulses - fired));
            bench.timer.sleep_ms(self.timings.pulse_gap_ms);
        }
        bench.actuators.set_pump_enabled(false);

        self.finish(bench, Mode::Pwm, pulses, started)
    }

    /// Wait out `duration_us`, refreshing the countdown every status poll
    fn count_down<A, T, D>(&self, bench: &mut Bench<A, T, D>, duration_us: u32)
    where
        A: ActuatorBus,
        T: Timebase,
        D: Display,
    {
        let poll_us = self.timings.status_poll_ms.saturating_mul(1000).max(1);
        let deadline = Deadline::new(bench.timer.now_us(), duration_us);
        loop {
            let now = bench.timer.now_us();
            if deadline.is_expired(now) {
                break;
            }
            let remaining = deadline.remaining_us(now);
            bench.show(Row::Bottom, &render::seconds_left_line(remaining));
            bench.timer.sleep_us(u64::from(remaining.min(poll_us)));
        }
    }

    fn finish<A, T, D>(
        &self,
        bench: &mut Bench<A, T, D>,
        mode: Mode,
        injector_pulses: u32,
        started: u32,
    ) -> RunReport
    where
        A: ActuatorBus,
        T: Timebase,
        D: Display,
    {
        bench.actuators.all_off();
        let report = RunReport {
            mode,
            injector_pulses,
            elapsed_us: bench.timer.now_us().wrapping_sub(started),
        };
        info!(
            "run finished: {} pulses in {} us",
            report.injector_pulses, report.elapsed_us
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FieldId;
    use crate::testing::{Actuation, MockActuators, MockDisplay, MockTimer, SimClock};

    type TestBench = Bench<MockActuators, MockTimer, MockDisplay>;

    fn bench_at(start_us: u32) -> (TestBench, SimClock) {
        let clock = SimClock::starting_at(start_us);
        let bench = Bench::new(
            MockActuators::new(clock.clone()),
            MockTimer::new(clock.clone()),
            MockDisplay::default(),
        );
        (bench, clock)
    }

    fn engine() -> TimingEngine {
        TimingEngine::new(RunTimings::default())
    }

    fn assert_safe_at_end(bench: &TestBench) {
        assert!(!bench.actuators.pump_on);
        assert!(!bench.actuators.injectors_open);
    }

    #[test]
    fn test_leak_test_runs_pump_only() {
        let (mut bench, _) = bench_at(0);
        let report = engine().run_leak_test(&mut bench, 10);

        let a = &bench.actuators;
        assert!(a.injector_opens().is_empty());
        assert_eq!(a.first(Actuation::Pump(true)), Some(0));
        assert_eq!(a.last(Actuation::Pump(false)), Some(10_000_000));
        assert_eq!(report.elapsed_us, 10_000_000);
        assert_eq!(report.injector_pulses, 0);
        assert_safe_at_end(&bench);
    }

    #[test]
    fn test_leak_test_countdown() {
        let (mut bench, _) = bench_at(0);
        engine().run_leak_test(&mut bench, 2);

        let history = bench.display.history(Row::Bottom);
        // One refresh per 100 ms poll
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].trim_end(), "2s left");
        assert_eq!(history[10].trim_end(), "1s left");
        assert_eq!(history[19].trim_end(), "1s left");
    }

    #[test]
    fn test_full_flow_stabilizes_then_holds_open() {
        let (mut bench, _) = bench_at(500);
        let report = engine().run_full_flow(&mut bench, 3);

        let a = &bench.actuators;
        assert_eq!(a.first(Actuation::Pump(true)), Some(500));
        assert_eq!(a.injector_opens(), [2_000_500]);
        let closed = a.first(Actuation::Injectors(false)).unwrap();
        assert_eq!(closed, 5_000_500);
        // Pump stays on until the injectors have closed
        assert!(a.last(Actuation::Pump(false)).unwrap() >= closed);
        assert_eq!(report.elapsed_us, 5_000_000);
        assert_safe_at_end(&bench);
    }

    #[test]
    fn test_constant_rpm_timing() {
        let (mut bench, _) = bench_at(0);
        let report = engine().run_constant_rpm(&mut bench, 1000, 50, 1);

        let opens = bench.actuators.injector_opens();
        let closes = bench.actuators.injector_closes();
        // 1 s of 120 ms cycles, last cycle started before the deadline
        assert_eq!(opens.len(), 9);
        assert_eq!(report.injector_pulses, 9);
        assert_eq!(opens[0], 2_000_000);
        for (open, close) in opens.iter().zip(closes.iter()) {
            assert_eq!(close - open, 60_000);
        }
        for pair in opens.windows(2) {
            assert_eq!(pair[1] - pair[0], 120_000);
        }
        assert!(bench.display.showed(Row::Top, "IPW: 60.000ms"));
        assert_safe_at_end(&bench);
    }

    #[test]
    fn test_constant_rpm_across_counter_wrap() {
        // Counter wraps 1.5 s into the run
        let (mut bench, clock) = bench_at(u32::MAX - 3_500_000);
        let report = engine().run_constant_rpm(&mut bench, 6000, 10, 5);

        // 5 s of 20 ms cycles
        assert_eq!(report.injector_pulses, 250);
        assert_eq!(report.elapsed_us, 7_000_000);
        assert!(clock.now() < 4_000_000);
        assert_safe_at_end(&bench);
    }

    #[test]
    fn test_constant_rpm_zero_speed_does_not_hang() {
        let (mut bench, _) = bench_at(0);
        let report = engine().run_constant_rpm(&mut bench, 0, 50, 5);
        assert_eq!(report.injector_pulses, 0);
        assert_eq!(report.elapsed_us, 2_000_000);
        assert_safe_at_end(&bench);
    }

    #[test]
    fn test_pwm_pulses_and_gap() {
        let (mut bench, _) = bench_at(0);
        let report = engine().run_pwm(&mut bench, 3, 40_000);

        let opens = bench.actuators.injector_opens();
        assert_eq!(opens, [2_000_000, 2_540_000, 3_080_000]);
        for (open, close) in opens.iter().zip(bench.actuators.injector_closes()) {
            assert_eq!(close - open, 40_000);
        }
        assert_eq!(report.injector_pulses, 3);
        assert_eq!(report.elapsed_us, 3_620_000);

        let top: std::vec::Vec<_> = bench
            .display
            .history(Row::Top)
            .into_iter()
            .map(str::trim_end)
            .collect();
        assert_eq!(top, ["pulses left 2", "pulses left 1", "pulses left 0"]);
        assert_safe_at_end(&bench);
    }

    #[test]
    fn test_long_pulse_is_chunked() {
        let (mut bench, clock) = bench_at(0);
        engine().run_pwm(&mut bench, 1, 1_000_000);
        assert_eq!(clock.now(), 2_000_000 + 1_000_000 + 500_000);
        assert!(bench.timer.delay_calls > 60);
    }

    #[test]
    fn test_run_dispatches_with_store_values() {
        let mut store = ParameterStore::factory();
        store.set(FieldId::PwmPulses, 2);
        store.set(FieldId::PwmPulseWidth, 2_500);

        let (mut bench, _) = bench_at(0);
        let report = engine().run(&mut bench, Mode::Pwm, &store);

        assert_eq!(report.mode, Mode::Pwm);
        assert_eq!(report.injector_pulses, 2);
        assert_eq!(bench.display.history(Row::Top)[0], "PWM Mode       *");
    }

    #[test]
    fn test_display_failure_does_not_abort_run() {
        let (mut bench, _) = bench_at(0);
        bench.display.fail = true;
        let report = engine().run_leak_test(&mut bench, 1);
        assert_eq!(report.elapsed_us, 1_000_000);
        assert_safe_at_end(&bench);
    }
}
