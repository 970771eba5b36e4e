//! Integration tests exercising the engine through the store boundary

mod helpers;

mod gate_flow;
mod graph_flow;
mod reporting;
