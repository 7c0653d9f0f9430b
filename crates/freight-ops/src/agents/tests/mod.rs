mod common;
mod compliance;
mod route_optimizer;
mod settlement;
