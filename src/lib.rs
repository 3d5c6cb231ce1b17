#![no_std]
extern crate alloc;

pub mod controllers;
pub mod devices;

#[macro_use]
pub mod holonomic;
pub mod tracking;

#[macro_use]
pub mod utils;
