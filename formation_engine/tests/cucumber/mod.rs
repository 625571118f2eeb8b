mod formation_world;
mod setups;
mod steps;

pub use formation_world::FormationWorld;
