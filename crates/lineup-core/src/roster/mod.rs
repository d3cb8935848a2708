// Rostered players and the positions they are eligible for.

pub mod player;
pub mod position;
