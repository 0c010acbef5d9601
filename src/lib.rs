#![allow(dead_code)]
#![warn(clippy::cargo)]
#![allow(clippy::comparison_chain)]

pub mod circuit;
pub mod error;
pub mod gate;
pub mod math;
pub mod mcry;
pub mod prep;
pub mod sim;
pub mod state;
pub mod transpile;

#[doc(hidden)]
pub mod prelude {
    pub use crate::{
        circuit::Circuit,
        error::{Error, Result},
        gate::Gate,
        prep::{prepare, Strategy},
        state::{CState, RState},
        transpile::{transpile, RyStrategy},
    };
}
