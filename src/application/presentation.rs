use crate::core::events::{AppEvent, EventSender, TimerEvent};
use crate::core::models::{Panel, RunState};
use crate::core::traits::PresentationSink;
use tracing::warn;

/// Presentation sink that turns countdown output into [`TimerEvent`]s.
///
/// The events are applied to `AppState` on the next drain of the event queue,
/// before the frame is rendered.
pub struct ChannelSink {
    event_tx: EventSender,
}

impl ChannelSink {
    pub fn new(event_tx: EventSender) -> Self {
        Self { event_tx }
    }

    fn emit(&self, event: TimerEvent) {
        if let Err(e) = self.event_tx.try_send(AppEvent::Timer(event)) {
            warn!(error = %e, "dropped presentation update");
        }
    }
}

impl PresentationSink for ChannelSink {
    fn render_time(&mut self, formatted: &str) {
        self.emit(TimerEvent::TimeRendered {
            text: formatted.to_string(),
        });
    }

    fn render_progress(&mut self, fraction: f64) {
        self.emit(TimerEvent::ProgressRendered { fraction });
    }

    fn set_urgent(&mut self, urgent: bool) {
        self.emit(TimerEvent::UrgentChanged { urgent });
    }

    fn set_finished(&mut self, finished: bool) {
        self.emit(TimerEvent::FinishedChanged { finished });
    }

    fn show_setup_panel(&mut self) {
        self.emit(TimerEvent::PanelChanged { panel: Panel::Setup });
    }

    fn show_running_panel(&mut self) {
        self.emit(TimerEvent::PanelChanged {
            panel: Panel::Running,
        });
    }

    fn set_run_state(&mut self, state: RunState) {
        self.emit(TimerEvent::RunStateChanged { state });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn calls_become_timer_events_in_order() {
        let (tx, rx) = bounded(8);
        let mut sink = ChannelSink::new(tx);

        sink.show_running_panel();
        sink.render_time("01:05");
        sink.render_progress(0.25);

        let events: Vec<_> = rx.try_iter().collect();
        assert!(matches!(
            events[0],
            AppEvent::Timer(TimerEvent::PanelChanged { panel: Panel::Running })
        ));
        assert!(matches!(
            &events[1],
            AppEvent::Timer(TimerEvent::TimeRendered { text }) if text == "01:05"
        ));
        assert!(matches!(
            events[2],
            AppEvent::Timer(TimerEvent::ProgressRendered { fraction }) if fraction == 0.25
        ));
    }

    #[test]
    fn full_queue_does_not_panic() {
        let (tx, rx) = bounded(1);
        let mut sink = ChannelSink::new(tx);

        sink.set_urgent(true);
        sink.set_finished(true);

        assert_eq!(rx.try_iter().count(), 1);
    }
}
