use std::cell::Cell;

use inline_callback::{position_of, Callback, CallbackIdentity};

type Handler<'a> = Callback<'a, fn(u8) -> bool>;

/// Fixed-size dispatch table owned by one context. Handles are not `Sync`, so a table
/// reached from an interrupt needs its own critical section around it.
struct EventTable<'a, const N: usize> {
    slots: [Handler<'a>; N],
}

impl<'a, const N: usize> EventTable<'a, N> {
    fn new() -> Self {
        Self {
            slots: [Handler::unbound(); N],
        }
    }

    fn register(&mut self, handler: Handler<'a>) -> bool {
        match self.slots.iter_mut().find(|slot| !slot.is_bound()) {
            Some(slot) => {
                *slot = handler;
                true
            }
            None => false,
        }
    }

    fn unregister(&mut self, handler: &Handler<'a>) -> bool {
        match self.slots.iter_mut().find(|slot| slot.is_bound() && slot.points_to_same(handler)) {
            Some(slot) => {
                *slot = Handler::unbound();
                true
            }
            None => false,
        }
    }

    /// Returns how many handlers consumed the event.
    fn dispatch(&self, event: u8) -> usize {
        self.slots.iter().filter(|slot| slot.call(event)).count()
    }
}

struct Led {
    lit: Cell<u32>,
}

impl Led {
    fn on_event(&self, event: u8) -> bool {
        if event % 2 == 0 {
            self.lit.set(self.lit.get() + 1);
            return true;
        }
        false
    }
}

fn log_event(event: u8) -> bool {
    println!("event {event}");
    true
}

fn main() {
    const N_EVENTS: u8 = 16;

    let red = Led { lit: Cell::new(0) };
    let green = Led { lit: Cell::new(0) };

    let mut table: EventTable<'_, 4> = EventTable::new();
    assert!(table.register(Handler::from_fn(log_event)));
    assert!(table.register(Handler::from_method(&red, Led::on_event)));
    assert!(table.register(Handler::from_method(&green, Led::on_event)));

    for event in 0..N_EVENTS {
        let consumed = table.dispatch(event);
        println!("event {event} consumed by {consumed} handlers");
    }

    assert!(table.unregister(&Handler::from_method(&green, Led::on_event)));
    assert!(!table.unregister(&Handler::from_method(&green, Led::on_event)));
    table.dispatch(0);
    println!("red lit {} times, green lit {} times", red.lit.get(), green.lit.get());

    let reset = Callback::<fn()>::unbound();
    let handlers: Vec<&dyn CallbackIdentity> = table
        .slots
        .iter()
        .map(|slot| slot as &dyn CallbackIdentity)
        .collect();
    let mixed: [&dyn CallbackIdentity; 2] = [&reset, handlers[1]];
    println!(
        "red handler at {:?} in table, {:?} in mixed list",
        position_of(&handlers, &Handler::from_method(&red, Led::on_event)),
        position_of(&mixed, &Handler::from_method(&red, Led::on_event)),
    );
}
