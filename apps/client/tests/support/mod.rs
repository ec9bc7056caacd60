#![allow(dead_code)]

pub mod game_phases;
