//! Form Operations
//!
//! Supporting machinery used by the form component:
//!
//! - `TimerQueue` - keyed, cancellable deadlines backing debounced rules
//! - `serialize_snapshot` - textual rendering of a form snapshot for `save`

pub mod debounce;
pub mod serialize;

pub use debounce::{TimerHandle, TimerQueue};
pub use serialize::{serialize_snapshot, SaveFormat};
