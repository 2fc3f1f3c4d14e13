#[macro_use]
extern crate approx;
extern crate nalgebra as na;
extern crate shard3d;

mod pipeline;
