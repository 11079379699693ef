pub mod capacitor;
pub mod controlled_sources;
pub mod current_source;
pub mod diode;
pub mod inductor;
pub mod nonlinear;
pub mod resistor;
pub mod voltage_source;
