//! Player control marker component
//!
//! Отмечает entity которым управляет игрок через input events движка.

use bevy::prelude::Component;

/// Marker component для player-controlled entity
///
/// Input systems используют `With<Player>` filter — intent events движка
/// применяются только к этому актору.
///
/// # Single-player
/// В single-player режиме ровно один entity имеет этот компонент.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
