//! Pure data structures (DTOs) implementing the [`ActorEntity`](crate::framework::ActorEntity) trait.

pub mod backpack;
pub mod gem;
pub mod notice;
pub mod pool;
pub mod scene;
pub mod stats;

pub use backpack::*;
pub use gem::*;
pub use notice::*;
pub use pool::*;
pub use scene::*;
pub use stats::*;
