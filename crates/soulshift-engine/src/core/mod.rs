pub mod bootstrap;
pub mod contact;
pub mod physics;
pub mod rng;
pub mod scene;
pub mod time;
pub mod world;
