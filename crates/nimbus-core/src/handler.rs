//! Event handling.

use crate::event::Event;

/// Trait for consuming events in simulation components.
pub trait EventHandler {
    /// Processes the event destined to this component.
    fn on(&mut self, event: Event);
}

/// Enables the use of pattern matching syntax for processing different types of events
/// by downcasting the event payload from [`EventData`](crate::event::EventData) to user-defined types.
///
/// Match arms need not be exhaustive. If the event payload does not match any of the specified arms,
/// the macro logs the event as unhandled under `ERROR` level.
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use serde::Serialize;
/// use nimbus_core::{cast, Event, EventHandler, Simulation, SimulationContext};
///
/// #[derive(Clone, Serialize)]
/// pub struct SomeEvent {
///     some_field: u32,
/// }
///
/// pub struct Component {
///     ctx: SimulationContext,
/// }
///
/// impl EventHandler for Component {
///     fn on(&mut self, event: Event) {
///         cast!(match event.data {
///             SomeEvent { some_field } => {
///                 // event processing logic...
///             }
///         })
///     }
/// }
///
/// let mut sim = Simulation::new(123);
/// let comp_ctx = sim.create_context("comp");
/// let comp_id = sim.add_handler("comp", Rc::new(RefCell::new(Component { ctx: comp_ctx })));
/// let mut client_ctx = sim.create_context("client");
/// client_ctx.emit(SomeEvent { some_field: 16 }, comp_id, 1.2);
/// sim.step_until_no_events();
/// ```
#[macro_export]
macro_rules! cast {
    ( match $event:ident.data { $( $type:ident { $($tt:tt)* } => { $($expr:tt)* } )+ } ) => {
        $(
            if $event.data.is::<$type>() {
                if let Ok(__value) = $event.data.downcast::<$type>() {
                    let $type { $($tt)* } = *__value;
                    $($expr)*
                }
            } else
        )*
        {
            $crate::log::log_unhandled_event($event);
        }
    }
}
