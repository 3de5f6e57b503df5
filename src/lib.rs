#![no_std]

pub mod app;
