use super::RaceSignal;
use crate::event_log::RaceEvent;

/// Receives what happens during a run, in processing order.
///
/// Every input event is delivered through `handle_event` (including events
/// the processor skipped), and each signal it caused follows immediately
/// after. Handlers observe only; they cannot change competitor state.
pub trait SignalHandler {
    fn handle_event(&mut self, _event: &RaceEvent) {}

    fn handle_signal(&mut self, signal: &RaceSignal);

    fn handle_signals(&mut self, signals: &[RaceSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}

impl<H: SignalHandler + ?Sized> SignalHandler for &mut H {
    fn handle_event(&mut self, event: &RaceEvent) {
        (**self).handle_event(event);
    }

    fn handle_signal(&mut self, signal: &RaceSignal) {
        (**self).handle_signal(signal);
    }

    fn handle_signals(&mut self, signals: &[RaceSignal]) {
        (**self).handle_signals(signals);
    }
}
