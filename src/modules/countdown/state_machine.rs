use crate::core::error::CountdownError;
use crate::core::models::{CountdownRun, RunState};
use crate::core::traits::{AudioCue, Clock, PresentationSink, TickDriver};
use crate::modules::countdown::progress_sample::ProgressSample;
use crate::modules::ui::progress_formatter::format_clock;
use tracing::{debug, info, warn};

/// Countdown state machine.
///
/// Owns the run record and is the only thing that mutates it. Every displayed
/// value is derived from `(end of run, total duration, now)` on each tick, so
/// irregular tick spacing never accumulates drift.
///
/// ```text
/// Idle ──start──▶ Running ◀──resume── Paused
///                   │  └────pause────────▲
///                   └──(time out)──▶ Finished
/// any state ──reset──▶ Idle
/// ```
pub struct Countdown {
    clock: Box<dyn Clock>,
    driver: Box<dyn TickDriver>,
    sink: Option<Box<dyn PresentationSink>>,
    audio: Option<Box<dyn AudioCue>>,

    state: RunState,
    total_ms: u64,
    run: Option<CountdownRun>,
    paused_remaining_ms: Option<u64>,
    // Whole-second value of the last beep
    last_beep_secs: Option<u64>,
    urgent: bool,
}

impl Countdown {
    pub fn new(clock: Box<dyn Clock>, driver: Box<dyn TickDriver>) -> Self {
        Self {
            clock,
            driver,
            sink: None,
            audio: None,
            state: RunState::Idle,
            total_ms: 0,
            run: None,
            paused_remaining_ms: None,
            last_beep_secs: None,
            urgent: false,
        }
    }

    /// Set the presentation sink
    pub fn with_presentation(mut self, sink: Box<dyn PresentationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the audio cue player
    pub fn with_audio(mut self, audio: Box<dyn AudioCue>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    #[cfg(test)]
    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Duration of the current countdown in milliseconds (0 before the first start)
    #[cfg(test)]
    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    /// Time left right now. Zero when idle or finished.
    #[cfg(test)]
    pub fn remaining_ms(&self) -> u64 {
        match self.state {
            RunState::Running => self
                .run
                .map(|run| run.remaining_ms(self.clock.now_ms()))
                .unwrap_or(0),
            RunState::Paused => self.paused_remaining_ms.unwrap_or(0),
            RunState::Idle | RunState::Finished => 0,
        }
    }

    /// Current progress, if a countdown is running or paused
    #[cfg(test)]
    pub fn sample(&self) -> Option<ProgressSample> {
        match self.state {
            RunState::Running | RunState::Paused => {
                Some(ProgressSample::derive(self.total_ms, self.remaining_ms()))
            }
            RunState::Idle | RunState::Finished => None,
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        if let Some(audio) = &mut self.audio {
            audio.set_volume(volume);
        }
    }

    /// Begin counting down from `duration_secs`.
    ///
    /// Only valid when idle or finished. A zero duration is refused and
    /// nothing changes.
    pub fn start(&mut self, duration_secs: u32) -> Result<(), CountdownError> {
        if matches!(self.state, RunState::Running | RunState::Paused) {
            return Err(self.refuse("start"));
        }
        if duration_secs == 0 {
            debug!("refusing to start a zero-length countdown");
            return Err(CountdownError::InvalidDuration);
        }

        let now = self.clock.now_ms();
        self.driver.cancel();

        self.total_ms = u64::from(duration_secs) * 1000;
        let run = CountdownRun::begin(now, self.total_ms);
        self.run = Some(run);
        self.paused_remaining_ms = None;
        self.last_beep_secs = None;
        self.urgent = false;

        let text = format_clock(u64::from(duration_secs));
        self.present(|s| {
            s.set_finished(false);
            s.set_urgent(false);
            s.show_running_panel();
            s.render_time(&text);
            s.render_progress(0.0);
        });
        self.enter(RunState::Running);
        self.driver.arm(now);

        info!(duration_secs, end_at_ms = run.end_at_ms(), "countdown started");
        Ok(())
    }

    /// Freeze the countdown, keeping the time that is left.
    pub fn pause(&mut self) -> Result<(), CountdownError> {
        if self.state != RunState::Running {
            return Err(self.refuse("pause"));
        }

        self.driver.cancel();
        let now = self.clock.now_ms();
        let remaining = self.run.take().map(|run| run.remaining_ms(now)).unwrap_or(0);
        self.paused_remaining_ms = Some(remaining);
        self.enter(RunState::Paused);

        info!(remaining_ms = remaining, "countdown paused");
        Ok(())
    }

    /// Continue a paused countdown from where it stopped.
    ///
    /// Progress is still measured against the original duration, so the
    /// reveal picks up exactly where it was.
    pub fn resume(&mut self) -> Result<(), CountdownError> {
        if self.state != RunState::Paused {
            return Err(self.refuse("resume"));
        }
        let Some(remaining) = self.paused_remaining_ms.take() else {
            return Err(self.refuse("resume"));
        };

        let now = self.clock.now_ms();
        let run = CountdownRun::begin(now, remaining);
        self.run = Some(run);
        self.enter(RunState::Running);
        info!(
            remaining_ms = run.duration_ms(),
            started_at_ms = run.started_at_ms(),
            end_at_ms = run.end_at_ms(),
            "countdown resumed"
        );

        if remaining == 0 {
            self.finish();
        } else {
            self.driver.arm(now);
        }
        Ok(())
    }

    /// Abandon whatever is happening and go back to the setup panel.
    pub fn reset(&mut self) {
        self.driver.cancel();
        self.run = None;
        self.paused_remaining_ms = None;
        self.last_beep_secs = None;
        self.urgent = false;

        self.present(|s| {
            s.set_urgent(false);
            s.set_finished(false);
            s.render_progress(0.0);
            s.show_setup_panel();
        });
        self.enter(RunState::Idle);

        info!("countdown reset");
    }

    /// Run a tick if the driver says one is due. Returns whether it did.
    pub fn pump(&mut self) -> bool {
        if !self.driver.is_armed() {
            return false;
        }
        let now = self.clock.now_ms();
        if !self.driver.poll(now) {
            return false;
        }
        self.tick(now);
        true
    }

    fn tick(&mut self, now_ms: u64) {
        let run = match (self.state, self.run) {
            (RunState::Running, Some(run)) => run,
            _ => {
                // Stale tick
                self.driver.cancel();
                return;
            }
        };

        let remaining = run.remaining_ms(now_ms);
        if remaining == 0 {
            self.finish();
            return;
        }

        let sample = ProgressSample::derive(self.total_ms, remaining);
        let text = format_clock(sample.whole_seconds());
        let fraction = sample.elapsed_fraction();
        self.present(|s| {
            s.render_time(&text);
            s.render_progress(fraction);
        });

        if sample.is_urgent() {
            if !self.urgent {
                self.urgent = true;
                self.present(|s| s.set_urgent(true));
                debug!(
                    seconds = sample.whole_seconds(),
                    remaining_ms = sample.remaining_ms(),
                    "entered urgent mode"
                );
            }
            if self.last_beep_secs != Some(sample.whole_seconds()) {
                self.last_beep_secs = Some(sample.whole_seconds());
                self.beep();
            }
        } else if self.urgent {
            self.urgent = false;
            self.present(|s| s.set_urgent(false));
        }
    }

    fn finish(&mut self) {
        if self.state != RunState::Running {
            return;
        }

        self.driver.cancel();
        self.run = None;
        self.paused_remaining_ms = None;
        self.urgent = false;

        let text = format_clock(0);
        self.present(|s| {
            s.render_time(&text);
            s.render_progress(1.0);
            s.set_urgent(false);
            s.set_finished(true);
        });
        self.enter(RunState::Finished);

        info!(duration_ms = self.total_ms, "countdown finished");
        if let Some(audio) = &mut self.audio {
            if let Err(e) = audio.play_completion() {
                warn!(error = %e, "completion sound failed");
            }
        }
    }

    fn beep(&mut self) {
        if let Some(audio) = &mut self.audio {
            if let Err(e) = audio.play_beep() {
                warn!(error = %e, "beep failed");
            }
        }
    }

    fn enter(&mut self, state: RunState) {
        self.state = state;
        self.present(|s| s.set_run_state(state));
    }

    fn present(&mut self, f: impl FnOnce(&mut Box<dyn PresentationSink>)) {
        if let Some(sink) = &mut self.sink {
            f(sink);
        }
    }

    fn refuse(&self, operation: &'static str) -> CountdownError {
        debug!(operation, state = %self.state, "ignoring countdown request");
        CountdownError::InvalidTransition {
            operation,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::TickCadence;
    use crate::modules::countdown::clock::ManualClock;
    use crate::modules::countdown::testing::{
        Call, CallLog, FailingAudio, RecordingAudio, RecordingSink,
    };
    use crate::modules::countdown::tick_driver::IntervalDriver;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn harness(cadence: TickCadence) -> (Countdown, ManualClock, CallLog) {
        let clock = ManualClock::new();
        let log = CallLog::new();
        let countdown = Countdown::new(
            Box::new(clock.clone()),
            Box::new(IntervalDriver::new(cadence)),
        )
        .with_presentation(Box::new(RecordingSink::new(&log)))
        .with_audio(Box::new(RecordingAudio::new(&log)));
        (countdown, clock, log)
    }

    /// Advance in `step_ms` increments, pumping every step, until the run ends.
    fn run_out(countdown: &mut Countdown, clock: &ManualClock, step_ms: u64) {
        for _ in 0..100_000 {
            if countdown.state() != RunState::Running {
                return;
            }
            clock.advance(step_ms);
            countdown.pump();
        }
        panic!("countdown never finished");
    }

    fn seconds_of(text: &str) -> u64 {
        let (mins, secs) = text.split_once(':').expect("MM:SS");
        mins.parse::<u64>().unwrap() * 60 + secs.parse::<u64>().unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn three_second_countdown_with_one_second_ticks() {
        let (mut countdown, clock, log) = harness(TickCadence::Second);

        countdown.start(3).unwrap();
        for t in [1_000, 2_000, 3_000] {
            clock.set(t);
            assert!(countdown.pump());
        }

        assert_eq!(log.times(), vec!["00:03", "00:02", "00:01", "00:00"]);
        let progress = log.progress();
        assert_eq!(progress.len(), 4);
        assert_close(progress[0], 0.0);
        assert_close(progress[1], 0.33);
        assert_close(progress[2], 0.67);
        assert_close(progress[3], 1.0);
        assert_eq!(log.beep_times(), vec!["00:02", "00:01"]);
        assert_eq!(countdown.state(), RunState::Finished);
        assert_eq!(log.count(&Call::Completion), 1);
    }

    #[test]
    fn sixty_five_seconds_pause_and_resume() {
        let (mut countdown, clock, log) = harness(TickCadence::Second);

        countdown.start(65).unwrap();
        assert_eq!(log.times()[0], "01:05");

        clock.set(5_000);
        countdown.pump();
        countdown.pause().unwrap();
        assert_eq!(countdown.remaining_ms(), 60_000);

        // Time spent paused does not count
        clock.advance(30_000);
        assert_eq!(countdown.remaining_ms(), 60_000);

        countdown.resume().unwrap();
        assert_eq!(countdown.remaining_ms(), 60_000);

        clock.advance(1_000);
        countdown.pump();
        assert_eq!(log.times().last().unwrap(), "00:59");
        assert_close(*log.progress().last().unwrap(), 6.0 / 65.0);
    }

    #[test]
    fn immediate_resume_loses_no_time() {
        let (mut countdown, clock, _log) = harness(TickCadence::Frame);

        countdown.start(20).unwrap();
        clock.set(7_321);
        countdown.pause().unwrap();
        let at_pause = countdown.remaining_ms();
        countdown.resume().unwrap();

        assert_eq!(countdown.remaining_ms(), at_pause);
        assert_eq!(at_pause, 12_679);
    }

    // ── Start validation ──────────────────────────────────────────────────────

    #[test]
    fn zero_duration_never_leaves_idle() {
        let (mut countdown, _clock, log) = harness(TickCadence::Frame);

        assert_eq!(countdown.start(0), Err(CountdownError::InvalidDuration));
        assert_eq!(countdown.state(), RunState::Idle);
        assert!(log.calls().is_empty());
        assert!(!countdown.pump());
    }

    #[test]
    fn start_while_running_or_paused_is_refused() {
        let (mut countdown, _clock, _log) = harness(TickCadence::Frame);

        countdown.start(10).unwrap();
        assert_eq!(
            countdown.start(5),
            Err(CountdownError::InvalidTransition {
                operation: "start",
                state: RunState::Running,
            })
        );
        assert_eq!(countdown.total_ms(), 10_000);

        countdown.pause().unwrap();
        assert!(countdown.start(5).is_err());
        assert_eq!(countdown.state(), RunState::Paused);
    }

    #[test]
    fn finished_countdown_can_start_again() {
        let (mut countdown, clock, log) = harness(TickCadence::Second);

        countdown.start(1).unwrap();
        run_out(&mut countdown, &clock, 1_000);
        assert_eq!(countdown.state(), RunState::Finished);

        log.clear();
        countdown.start(2).unwrap();
        assert_eq!(countdown.state(), RunState::Running);
        assert!(log.calls().contains(&Call::Finished(false)));
        assert_eq!(log.times(), vec!["00:02"]);
    }

    // ── Completion ────────────────────────────────────────────────────────────

    #[test]
    fn every_positive_duration_finishes_exactly_once() {
        for duration in [1, 2, 7, 11, 30] {
            let (mut countdown, clock, log) = harness(TickCadence::Frame);

            countdown.start(duration).unwrap();
            run_out(&mut countdown, &clock, 16);
            for _ in 0..50 {
                clock.advance(16);
                assert!(!countdown.pump());
            }

            assert_eq!(countdown.state(), RunState::Finished);
            assert_eq!(log.count(&Call::Completion), 1, "duration {duration}");
            assert_eq!(log.count(&Call::Finished(true)), 1, "duration {duration}");
            assert_eq!(log.count(&Call::State(RunState::Finished)), 1);
        }
    }

    #[test]
    fn finish_reveals_everything_and_clears_urgent() {
        let (mut countdown, clock, log) = harness(TickCadence::Second);

        countdown.start(2).unwrap();
        run_out(&mut countdown, &clock, 1_000);

        let calls = log.calls();
        let tail = &calls[calls.len() - 6..];
        assert_eq!(
            tail,
            &[
                Call::Time("00:00".to_string()),
                Call::Progress(1.0),
                Call::Urgent(false),
                Call::Finished(true),
                Call::State(RunState::Finished),
                Call::Completion,
            ]
        );
        assert!(!countdown.is_urgent());
        assert_eq!(countdown.remaining_ms(), 0);
    }

    #[test]
    fn audio_failure_does_not_stop_the_countdown() {
        let clock = ManualClock::new();
        let log = CallLog::new();
        let mut countdown = Countdown::new(
            Box::new(clock.clone()),
            Box::new(IntervalDriver::new(TickCadence::Second)),
        )
        .with_presentation(Box::new(RecordingSink::new(&log)))
        .with_audio(Box::new(FailingAudio::new(&log)));

        countdown.start(3).unwrap();
        run_out(&mut countdown, &clock, 1_000);

        assert_eq!(countdown.state(), RunState::Finished);
        assert_eq!(log.count(&Call::Beep), 2);
        assert_eq!(log.count(&Call::Completion), 1);
    }

    #[test]
    fn works_without_sink_or_audio() {
        let clock = ManualClock::new();
        let mut countdown = Countdown::new(
            Box::new(clock.clone()),
            Box::new(IntervalDriver::new(TickCadence::Frame)),
        );

        countdown.start(1).unwrap();
        run_out(&mut countdown, &clock, 16);
        assert_eq!(countdown.state(), RunState::Finished);
    }

    // ── Second cadence under frame polling ────────────────────────────────────

    #[test]
    fn second_cadence_shows_every_second_when_polled_each_frame() {
        for duration in 120..=130u32 {
            let (mut countdown, clock, log) = harness(TickCadence::Second);
            countdown.start(duration).unwrap();
            run_out(&mut countdown, &clock, 16);

            let shown: Vec<u64> = log.times().iter().map(|t| seconds_of(t)).collect();
            let expected: Vec<u64> = (0..=u64::from(duration)).rev().collect();
            assert_eq!(shown, expected, "duration {duration}");

            let deadline = u64::from(duration) * 1_000;
            let late_by = clock.now_ms() - deadline;
            assert!(late_by < 16, "duration {duration} finished {late_by} ms late");

            assert_eq!(log.count(&Call::Beep), 10, "duration {duration}");
            assert_eq!(log.count(&Call::Completion), 1);
        }
    }

    // ── Monotonicity ──────────────────────────────────────────────────────────

    #[test]
    fn samples_are_monotonic_under_irregular_ticks() {
        let (mut countdown, clock, log) = harness(TickCadence::Frame);
        let steps = [16, 250, 3, 999, 1_500, 40, 17, 620, 2_001, 16];

        countdown.start(25).unwrap();
        let mut i = 0;
        while countdown.state() == RunState::Running {
            clock.advance(steps[i % steps.len()]);
            countdown.pump();
            i += 1;
        }

        let progress = log.progress();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");

        let seconds: Vec<u64> = log.times().iter().map(|t| seconds_of(t)).collect();
        assert!(seconds.windows(2).all(|w| w[0] >= w[1]), "{seconds:?}");
        assert_eq!(seconds.last(), Some(&0));
    }

    // ── Urgent mode and beeps ─────────────────────────────────────────────────

    #[test]
    fn urgent_boundary_is_ten_seconds() {
        let (mut countdown, clock, _log) = harness(TickCadence::Second);

        countdown.start(12).unwrap();
        clock.set(1_000);
        countdown.pump();
        assert_eq!(countdown.sample().unwrap().whole_seconds(), 11);
        assert!(!countdown.is_urgent());

        clock.set(2_000);
        countdown.pump();
        assert_eq!(countdown.sample().unwrap().whole_seconds(), 10);
        assert!(countdown.is_urgent());

        run_out(&mut countdown, &clock, 1_000);
        assert!(!countdown.is_urgent());
    }

    #[test]
    fn frame_rate_ticks_beep_once_per_second() {
        let (mut countdown, clock, log) = harness(TickCadence::Frame);

        countdown.start(12).unwrap();
        run_out(&mut countdown, &clock, 16);

        let beeps = log.beep_times();
        assert_eq!(beeps.iter().filter(|t| *t == "00:09").count(), 1);
        assert_eq!(
            beeps,
            vec![
                "00:10", "00:09", "00:08", "00:07", "00:06", "00:05", "00:04", "00:03",
                "00:02", "00:01",
            ]
        );
        assert_eq!(log.count(&Call::Urgent(true)), 1);
    }

    #[test]
    fn resume_within_the_same_second_does_not_beep_again() {
        let (mut countdown, clock, log) = harness(TickCadence::Frame);

        countdown.start(5).unwrap();
        clock.advance(16);
        countdown.pump();
        assert_eq!(log.count(&Call::Beep), 1);

        countdown.pause().unwrap();
        countdown.resume().unwrap();
        clock.advance(16);
        countdown.pump();
        assert_eq!(log.count(&Call::Beep), 1);
    }

    // ── Pause / resume / reset ────────────────────────────────────────────────

    #[test]
    fn pause_and_resume_are_idempotent() {
        let (mut countdown, _clock, _log) = harness(TickCadence::Frame);

        assert!(countdown.resume().is_err());
        assert!(countdown.pause().is_err());

        countdown.start(30).unwrap();
        assert_eq!(
            countdown.resume(),
            Err(CountdownError::InvalidTransition {
                operation: "resume",
                state: RunState::Running,
            })
        );

        countdown.pause().unwrap();
        let remaining = countdown.remaining_ms();
        assert!(countdown.pause().is_err());
        assert_eq!(countdown.state(), RunState::Paused);
        assert_eq!(countdown.remaining_ms(), remaining);
    }

    #[test]
    fn paused_countdown_ignores_time_passing() {
        let (mut countdown, clock, log) = harness(TickCadence::Frame);

        countdown.start(2).unwrap();
        countdown.pause().unwrap();
        clock.advance(10_000);

        assert!(!countdown.pump());
        assert_eq!(countdown.state(), RunState::Paused);
        assert_eq!(log.count(&Call::Completion), 0);
    }

    #[test]
    fn resume_with_nothing_left_finishes_immediately() {
        let (mut countdown, clock, log) = harness(TickCadence::Second);

        countdown.start(1).unwrap();
        clock.advance(1_500);
        countdown.pause().unwrap();
        assert_eq!(countdown.remaining_ms(), 0);

        countdown.resume().unwrap();
        assert_eq!(countdown.state(), RunState::Finished);
        assert_eq!(log.count(&Call::Completion), 1);
    }

    #[test]
    fn reset_from_running_cancels_ticks_and_hides_towers() {
        let (mut countdown, clock, log) = harness(TickCadence::Second);

        countdown.start(12).unwrap();
        clock.set(3_000);
        countdown.pump();
        assert!(countdown.is_urgent());

        log.clear();
        countdown.reset();
        assert_eq!(
            log.calls(),
            vec![
                Call::Urgent(false),
                Call::Finished(false),
                Call::Progress(0.0),
                Call::SetupPanel,
                Call::State(RunState::Idle),
            ]
        );
        assert_eq!(countdown.state(), RunState::Idle);
        assert!(!countdown.is_urgent());

        clock.advance(60_000);
        assert!(!countdown.pump());
        assert_eq!(log.count(&Call::Completion), 0);
    }

    #[test]
    fn reset_is_valid_from_every_state() {
        let (mut countdown, clock, _log) = harness(TickCadence::Second);

        countdown.reset();
        assert_eq!(countdown.state(), RunState::Idle);

        countdown.start(1).unwrap();
        countdown.pause().unwrap();
        countdown.reset();
        assert_eq!(countdown.state(), RunState::Idle);
        assert!(countdown.resume().is_err());

        countdown.start(1).unwrap();
        run_out(&mut countdown, &clock, 1_000);
        countdown.reset();
        assert_eq!(countdown.state(), RunState::Idle);
        assert!(countdown.sample().is_none());
    }
}
