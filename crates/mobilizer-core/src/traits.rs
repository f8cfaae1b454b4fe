//! Movement-scoped entities.
//!
//! Organizations and roles always belong to exactly one movement. Code that
//! must never mix data across movements filters through [`MovementScoped`].

use crate::ids::MovementId;

/// Trait for entities that belong to a specific movement.
///
/// Object-safe, so it can be used as `&dyn MovementScoped`.
///
/// # Example
///
/// ```
/// use mobilizer_core::{MovementId, MovementScoped};
///
/// struct Chapter {
///     movement_id: MovementId,
/// }
///
/// impl MovementScoped for Chapter {
///     fn movement_id(&self) -> MovementId {
///         self.movement_id
///     }
/// }
///
/// let movement = MovementId::new();
/// let chapter = Chapter { movement_id: movement };
/// assert!(chapter.belongs_to(movement));
/// ```
pub trait MovementScoped {
    /// Returns the movement this entity belongs to.
    fn movement_id(&self) -> MovementId;

    /// True when the entity belongs to `movement_id`.
    fn belongs_to(&self, movement_id: MovementId) -> bool {
        self.movement_id() == movement_id
    }
}
